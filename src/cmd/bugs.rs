//! Bug report commands: `bugdesk list|show|new|edit|delete`.

use anyhow::{Result, bail};
use console::style;

use bugdesk::models::BugFilters;
use bugdesk::pages::{BugDetailPage, BugListPage, DeleteOutcome, LoadState, NewBugPage};
use bugdesk::ui;

use super::prompts::{apply_fields, fill_bug_form, has_any};
use super::{App, finish, parse_id, route_hint};
use crate::{BugFields, ListArgs};

pub fn filters_from_args(args: ListArgs, default_ordering: bugdesk::models::Ordering) -> BugFilters {
    BugFilters {
        search: args.search,
        severity: args.severity,
        status: args.status,
        tag: args.tag,
        created_after: args.created_after,
        created_before: args.created_before,
        ordering: args.sort.unwrap_or(default_ordering),
        page: args.page.max(1),
    }
}

pub async fn cmd_list(app: &App, args: ListArgs) -> Result<()> {
    let api = app.api()?;
    let filters = filters_from_args(args, app.config.default_ordering());
    let mut page = BugListPage::with_filters(api, filters);
    ui::with_spinner("Loading bugs...", page.load()).await;

    if let LoadState::Failed(message) = page.state() {
        bail!(message.clone());
    }
    ui::print_list(&page);
    Ok(())
}

pub async fn cmd_show(app: &App, id: &str) -> Result<()> {
    let api = app.api()?;
    let mut page = BugDetailPage::new(api, parse_id(id)?);
    ui::with_spinner("Loading bug report...", page.load()).await;

    if let Some(error) = page.error() {
        bail!(error.to_string());
    }
    ui::print_detail_page(&page);
    Ok(())
}

pub async fn cmd_new(app: &App, fields: BugFields) -> Result<()> {
    let api = app.api()?;
    let mut page = NewBugPage::new(api);
    if has_any(&fields) {
        apply_fields(&mut page.form, fields);
    } else if console::user_attended() {
        println!("{}{}", ui::icons::PENCIL, style("New bug report").bold());
        fill_bug_form(&mut page.form)?;
    }

    let submission = ui::with_spinner("Creating bug report...", page.submit()).await;
    let route = finish(submission)?;
    if let Some(bug) = page.created() {
        ui::success(&format!("Created \"{}\" ({})", bug.title, bug.id));
        println!("View it with `bugdesk show {}`", bug.id);
    }
    if let Some(route) = route {
        println!("Back to the list: `{}`", route_hint(&route));
    }
    Ok(())
}

pub async fn cmd_edit(app: &App, id: &str, fields: BugFields) -> Result<()> {
    let api = app.api()?;
    let mut page = BugDetailPage::new(api, parse_id(id)?);
    ui::with_spinner("Loading bug report...", page.load()).await;
    if let Some(error) = page.error() {
        bail!(error.to_string());
    }

    let interactive = !has_any(&fields);
    if interactive && !console::user_attended() {
        bail!("Nothing to change. Pass field flags such as --status, or run in a terminal.");
    }
    let Some(form) = page.begin_edit() else {
        bail!("Bug report not found");
    };
    if interactive {
        fill_bug_form(form)?;
    } else {
        apply_fields(form, fields);
    }

    let submission = ui::with_spinner("Saving changes...", page.submit_edit()).await;
    finish(submission)?;
    ui::success("Bug report updated");
    ui::print_detail_page(&page);
    Ok(())
}

pub async fn cmd_delete(app: &App, id: &str) -> Result<()> {
    let api = app.api()?;
    let mut page = BugDetailPage::new(api, parse_id(id)?);
    let confirm = ui::confirmer(app.config.yes);

    match page.delete(confirm.as_ref()).await {
        (DeleteOutcome::Deleted, route) => {
            ui::success("Bug report deleted");
            if let Some(route) = route {
                println!("Back to the list: `{}`", route_hint(&route));
            }
            Ok(())
        }
        (DeleteOutcome::Cancelled, _) => {
            println!("Cancelled.");
            Ok(())
        }
        (DeleteOutcome::Failed(message), _) => bail!(message),
    }
}
