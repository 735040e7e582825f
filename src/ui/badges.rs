//! Severity and status badges.

use console::{Style, style};

use crate::models::{Severity, Status};

pub fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Low => Style::new().green(),
        Severity::Medium => Style::new().yellow(),
        Severity::High => Style::new().color256(208),
        Severity::Critical => Style::new().red().bold(),
    }
}

pub fn status_style(status: Status) -> Style {
    match status {
        Status::Open => Style::new().blue(),
        Status::InProgress => Style::new().magenta(),
        Status::Resolved => Style::new().green(),
        Status::Closed => Style::new().dim(),
    }
}

pub fn severity_badge(severity: Severity) -> String {
    severity_style(severity)
        .apply_to(format!("[{}]", severity.label()))
        .to_string()
}

pub fn status_badge(status: Status) -> String {
    status_style(status)
        .apply_to(format!("[{}]", status.label()))
        .to_string()
}

pub fn tag_chip(tag: &str) -> String {
    style(format!("#{}", tag)).cyan().to_string()
}
