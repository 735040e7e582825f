//! Terminal rendering for bugdesk screens.
//!
//! Renderers return `String`s so they can be tested with ANSI codes stripped;
//! the `print_*` helpers write them to stdout at the current terminal width.

pub mod badges;
pub mod card;
pub mod detail;
pub mod icons;
pub mod prompt;
pub mod spinner;

use console::style;
use terminal_size::{Width, terminal_size};

use crate::forms::FieldErrors;

pub use card::{print_list, render_card, render_list, visible_tags};
pub use detail::{print_detail_page, render_detail, render_detail_page};
pub use prompt::{AssumeYes, TerminalConfirm, confirmer};
pub use spinner::with_spinner;

const DEFAULT_WIDTH: usize = 80;
const MAX_WIDTH: usize = 100;

/// Render width: the terminal's, capped for readability, or 80 when unknown.
pub fn terminal_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .filter(|&w| w > 0)
        .map_or(DEFAULT_WIDTH, |w| w.min(MAX_WIDTH))
}

pub fn success(message: &str) {
    println!("{}{}", icons::CHECK, style(message).green());
}

pub fn failure(message: &str) {
    eprintln!("{}{}", icons::CROSS, style(message).red());
}

pub fn render_field_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for (field, message) in errors.iter() {
        out.push_str(&format!("  {} {}\n", style(format!("{}:", field)).bold(), message));
    }
    out
}

pub fn print_field_errors(errors: &FieldErrors) {
    eprintln!("{}{}", icons::WARN, style("Please fix the following:").yellow());
    eprint!("{}", render_field_errors(errors));
}
