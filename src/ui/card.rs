//! Bug card (list row) and list screen rendering.

use console::style;

use super::badges::{severity_badge, status_badge, tag_chip};
use super::icons::{BUG, WARN};
use super::terminal_width;
use crate::models::BugReport;
use crate::pages::{BugListPage, LoadState};

/// Tags shown on a card before collapsing the rest into `+N`.
pub const CARD_TAG_LIMIT: usize = 3;
const DESCRIPTION_LINES: usize = 2;

/// The tags a card shows and how many are hidden.
pub fn visible_tags(tags: &[String]) -> (&[String], usize) {
    let shown = tags.len().min(CARD_TAG_LIMIT);
    (&tags[..shown], tags.len() - shown)
}

/// Wrap and clamp text to `lines` lines, marking truncation with an ellipsis.
pub fn clamp_lines(text: &str, width: usize, lines: usize) -> Vec<String> {
    let wrapped: Vec<String> = textwrap::wrap(text, width.max(10))
        .into_iter()
        .map(|line| line.into_owned())
        .collect();
    if wrapped.len() <= lines {
        return wrapped;
    }
    let mut clamped: Vec<String> = wrapped.into_iter().take(lines).collect();
    if let Some(last) = clamped.last_mut() {
        last.push('…');
    }
    clamped
}

pub fn render_card(bug: &BugReport, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}{}\n", BUG, style(&bug.title).bold()));

    for line in clamp_lines(&bug.description, width.saturating_sub(3), DESCRIPTION_LINES) {
        out.push_str(&format!("   {}\n", style(line).dim()));
    }

    let mut badges = vec![severity_badge(bug.severity), status_badge(bug.status)];
    let (shown, hidden) = visible_tags(&bug.tags);
    badges.extend(shown.iter().map(|tag| tag_chip(tag)));
    if hidden > 0 {
        badges.push(style(format!("+{}", hidden)).cyan().to_string());
    }
    out.push_str(&format!("   {}\n", badges.join(" ")));

    out.push_str(&format!(
        "   {}\n",
        style(format!(
            "Updated {}  ·  id {}",
            bug.updated_at.format("%Y-%m-%d"),
            bug.id
        ))
        .dim()
    ));
    out
}

fn filter_line(page: &BugListPage) -> String {
    let filters = page.filters();
    let mut parts = Vec::new();
    if let Some(search) = &filters.search {
        parts.push(format!("search \"{}\"", search));
    }
    if let Some(severity) = filters.severity {
        parts.push(format!("severity {}", severity.label()));
    }
    if let Some(status) = filters.status {
        parts.push(format!("status {}", status.label()));
    }
    if let Some(tag) = &filters.tag {
        parts.push(format!("tag {}", tag));
    }
    if parts.is_empty() {
        parts.push("all bugs".to_string());
    }
    format!(
        "{}  ·  sorted by {}  ·  page {}",
        parts.join(", "),
        filters.ordering.label(),
        filters.page
    )
}

/// The whole list screen: header, filters, notices, rows and pagination.
pub fn render_list(page: &BugListPage, width: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style("Bug Reports").bold().underlined()));
    out.push_str(&format!("{}\n\n", style(filter_line(page)).dim()));

    if let Some(notice) = page.notice() {
        out.push_str(&format!("{}{}\n\n", WARN, style(notice).red()));
    }

    match page.state() {
        LoadState::Idle | LoadState::Loading => {
            out.push_str(&format!("{}\n", style("Loading...").dim()));
        }
        LoadState::Failed(message) => {
            out.push_str(&format!("{}\n", style(message).red()));
        }
        LoadState::Loaded(_) if page.is_empty() => {
            out.push_str("No bug reports found\n");
            out.push_str(&format!(
                "{}\n",
                style("Create your first bug report with `bugdesk new`").dim()
            ));
        }
        LoadState::Loaded(_) => {
            for bug in page.bugs() {
                out.push_str(&render_card(bug, width));
                out.push('\n');
            }
            if let Some(summary) = page.summary() {
                out.push_str(&summary);
            }
            let mut nav = Vec::new();
            if page.has_previous() {
                nav.push("previous page available");
            }
            if page.has_next() {
                nav.push("next page available");
            }
            if !nav.is_empty() {
                out.push_str(&format!("  ({})", nav.join(", ")));
            }
            out.push('\n');
        }
    }
    out
}

pub fn print_list(page: &BugListPage) {
    print!("{}", render_list(page, terminal_width()));
}
