//! Interactive list browsing: `bugdesk browse`.
//!
//! A menu loop over [`BugListPage`]: page through results, change filters
//! and sort, open a bug to edit or delete it, or report a new one.

use anyhow::{Context, Result, bail};
use console::{Term, style};
use dialoguer::Select;

use bugdesk::models::Ordering;
use bugdesk::pages::{BugDetailPage, BugListPage, Confirm, DeleteOutcome, NewBugPage, Submission};
use bugdesk::ui;

use super::prompts::{choose_severity, choose_status, fill_bug_form, optional_text};
use super::App;
use crate::ListArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListAction {
    Open,
    Next,
    Previous,
    Search,
    Severity,
    Status,
    Tag,
    Sort,
    Clear,
    New,
    Delete,
    Quit,
}

impl ListAction {
    fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open a bug",
            Self::Next => "Next page",
            Self::Previous => "Previous page",
            Self::Search => "Search",
            Self::Severity => "Filter by severity",
            Self::Status => "Filter by status",
            Self::Tag => "Filter by tag",
            Self::Sort => "Sort",
            Self::Clear => "Clear filters",
            Self::New => "Report a new bug",
            Self::Delete => "Delete a bug",
            Self::Quit => "Quit",
        }
    }
}

/// Actions that make sense for the current list state.
fn available_actions(page: &BugListPage) -> Vec<ListAction> {
    let mut actions = Vec::new();
    let has_rows = !page.bugs().is_empty();
    if has_rows {
        actions.push(ListAction::Open);
    }
    if page.has_next() {
        actions.push(ListAction::Next);
    }
    if page.has_previous() {
        actions.push(ListAction::Previous);
    }
    actions.extend([
        ListAction::Search,
        ListAction::Severity,
        ListAction::Status,
        ListAction::Tag,
        ListAction::Sort,
    ]);
    if page.filters().has_active_filters() {
        actions.push(ListAction::Clear);
    }
    actions.push(ListAction::New);
    if has_rows {
        actions.push(ListAction::Delete);
    }
    actions.push(ListAction::Quit);
    actions
}

fn select<T: AsRef<str>>(prompt: &str, items: &[T]) -> Result<usize> {
    let labels: Vec<&str> = items.iter().map(|item| item.as_ref()).collect();
    Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to read selection")
}

/// Ask which row on the current page, or `None` for "back".
fn pick_bug(page: &BugListPage, prompt: &str) -> Result<Option<uuid::Uuid>> {
    let mut items: Vec<String> = page
        .bugs()
        .iter()
        .map(|bug| format!("{} [{}] [{}]", bug.title, bug.severity.label(), bug.status.label()))
        .collect();
    items.push("Back".to_string());
    let index = select(prompt, &items)?;
    Ok(page.bugs().get(index).map(|bug| bug.id))
}

pub async fn cmd_browse(app: &App, args: ListArgs) -> Result<()> {
    let api = app.api()?;
    if !console::user_attended() {
        bail!("`bugdesk browse` needs an interactive terminal. Use `bugdesk list` instead.");
    }

    let filters = super::bugs::filters_from_args(args, app.config.default_ordering());
    let mut page = BugListPage::with_filters(api.clone(), filters);
    let term = Term::stdout();
    let confirm = ui::confirmer(app.config.yes);

    loop {
        ui::with_spinner("Loading bugs...", page.sync()).await;
        term.clear_screen().ok();
        ui::print_list(&page);
        println!();

        let actions = available_actions(&page);
        let labels: Vec<&str> = actions.iter().map(ListAction::label).collect();
        match actions[select("What next?", &labels)?] {
            ListAction::Open => {
                if let Some(id) = pick_bug(&page, "Open which bug?")? {
                    let mut detail = BugDetailPage::new(api.clone(), id);
                    if detail_loop(&mut detail, confirm.as_ref(), &term).await? {
                        page.load().await;
                    }
                }
            }
            ListAction::Next => {
                page.next_page();
            }
            ListAction::Previous => {
                page.previous_page();
            }
            ListAction::Search => {
                let current = page.filters().search.clone().unwrap_or_default();
                page.set_search(optional_text(&format!("{}Search", ui::icons::SEARCH), &current)?);
            }
            ListAction::Severity => page.set_severity(choose_severity()?),
            ListAction::Status => page.set_status(choose_status()?),
            ListAction::Tag => {
                let current = page.filters().tag.clone().unwrap_or_default();
                page.set_tag(optional_text("Tag", &current)?);
            }
            ListAction::Sort => {
                let labels: Vec<&str> = Ordering::ALL.iter().map(Ordering::label).collect();
                page.set_ordering(Ordering::ALL[select("Sort by", &labels)?]);
            }
            ListAction::Clear => page.clear_filters(),
            ListAction::New => {
                let mut new_page = NewBugPage::new(api.clone());
                fill_bug_form(&mut new_page.form)?;
                match ui::with_spinner("Creating bug report...", new_page.submit()).await {
                    Submission::Navigate(_) => page.load().await,
                    Submission::Invalid(errors) => {
                        ui::print_field_errors(&errors);
                        pause(&term)?;
                    }
                    Submission::Failed(message) => {
                        ui::failure(&message);
                        pause(&term)?;
                    }
                    Submission::Saved | Submission::Ignored => {}
                }
            }
            ListAction::Delete => {
                if let Some(id) = pick_bug(&page, "Delete which bug?")? {
                    // failures land in the list notice
                    page.delete(id, confirm.as_ref()).await;
                }
            }
            ListAction::Quit => return Ok(()),
        }
    }
}

fn pause(term: &Term) -> Result<()> {
    println!("{}", style("Press any key to continue").dim());
    term.read_key().context("Failed to read key")?;
    Ok(())
}

/// One bug's screen. Returns true when the list needs a reload.
async fn detail_loop(
    detail: &mut BugDetailPage,
    confirm: &dyn Confirm,
    term: &Term,
) -> Result<bool> {
    ui::with_spinner("Loading bug report...", detail.load()).await;
    let mut changed = false;

    loop {
        term.clear_screen().ok();
        ui::print_detail_page(detail);
        println!();
        if detail.bug().is_none() {
            pause(term)?;
            return Ok(changed);
        }

        let choice = select(
            "What next?",
            &[
                format!("{}Edit", ui::icons::PENCIL),
                format!("{}Delete", ui::icons::TRASH),
                "Back".to_string(),
            ],
        )?;
        match choice {
            0 => {
                if let Some(form) = detail.begin_edit() {
                    fill_bug_form(form)?;
                }
                match ui::with_spinner("Saving changes...", detail.submit_edit()).await {
                    Submission::Saved => changed = true,
                    Submission::Invalid(errors) => {
                        ui::print_field_errors(&errors);
                        detail.cancel_edit();
                        pause(term)?;
                    }
                    _ => detail.cancel_edit(),
                }
            }
            1 => match detail.delete(confirm).await {
                (DeleteOutcome::Deleted, _) => return Ok(true),
                (DeleteOutcome::Cancelled, _) | (DeleteOutcome::Failed(_), _) => {}
            },
            _ => return Ok(changed),
        }
    }
}
