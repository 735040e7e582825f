//! Full bug report view.

use chrono::{DateTime, Utc};
use console::style;

use super::badges::{severity_badge, status_badge, tag_chip};
use super::icons::{BUG, WARN};
use super::terminal_width;
use crate::models::BugReport;
use crate::pages::BugDetailPage;

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn section(out: &mut String, heading: &str, body: &str, width: usize) {
    out.push_str(&format!("\n{}\n", style(heading).bold()));
    for line in textwrap::wrap(body, width.max(20)) {
        out.push_str(&format!("  {}\n", line));
    }
}

/// Every populated field of a report; empty optional sections are left out.
pub fn render_detail(bug: &BugReport, width: usize) -> String {
    let body_width = width.saturating_sub(2);
    let mut out = String::new();
    out.push_str(&format!("{}{}\n", BUG, style(&bug.title).bold().underlined()));
    out.push_str(&format!(
        "{} {}\n",
        severity_badge(bug.severity),
        status_badge(bug.status)
    ));
    if !bug.tags.is_empty() {
        let chips: Vec<String> = bug.tags.iter().map(|tag| tag_chip(tag)).collect();
        out.push_str(&format!("{}\n", chips.join(" ")));
    }

    section(&mut out, "Description", &bug.description, body_width);
    let optional = [
        ("Steps to Reproduce", &bug.steps_to_reproduce),
        ("Expected Result", &bug.expected_result),
        ("Actual Result", &bug.actual_result),
        ("Environment", &bug.environment),
    ];
    for (heading, value) in optional {
        if let Some(text) = value {
            section(&mut out, heading, text, body_width);
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "{}\n",
        style(format!("Reported by {}", bug.created_by.username)).dim()
    ));
    out.push_str(&format!(
        "{}\n",
        style(format!("Created {}", format_timestamp(&bug.created_at))).dim()
    ));
    out.push_str(&format!(
        "{}\n",
        style(format!("Updated {}", format_timestamp(&bug.updated_at))).dim()
    ));
    out.push_str(&format!("{}\n", style(format!("ID {}", bug.id)).dim()));
    out
}

/// The detail screen, including loading and error states.
pub fn render_detail_page(page: &BugDetailPage, width: usize) -> String {
    let mut out = String::new();
    if let Some(error) = page.error() {
        out.push_str(&format!("{}{}\n", WARN, style(error).red()));
    }
    match page.bug() {
        Some(bug) => out.push_str(&render_detail(bug, width)),
        None if page.is_loading() => out.push_str("Loading...\n"),
        None if page.error().is_none() => out.push_str("Bug report not found\n"),
        None => {}
    }
    out
}

pub fn print_detail_page(page: &BugDetailPage) {
    print!("{}", render_detail_page(page, terminal_width()));
}
