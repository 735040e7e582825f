//! Interactive form filling with `dialoguer`.

use anyhow::{Context, Result};
use dialoguer::{Input, Password, Select};

use bugdesk::forms::{BugForm, LoginForm, RegisterForm};
use bugdesk::models::{Severity, Status};

use crate::BugFields;

fn text(prompt: &str, initial: &str, required: bool) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(!required)
        .interact_text()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))
}

fn secret(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))
}

/// Pick one value from `options` by label, starting at `current`.
fn choose<T: Copy>(prompt: &str, options: &[(T, &str)], current: usize) -> Result<T> {
    let labels: Vec<&str> = options.iter().map(|(_, label)| *label).collect();
    let index = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(current)
        .interact()
        .with_context(|| format!("Failed to read {}", prompt.to_lowercase()))?;
    Ok(options[index].0)
}

pub fn fill_login(form: &mut LoginForm) -> Result<()> {
    if form.username.is_empty() {
        form.username = text("Username", "", true)?;
    }
    if form.password.is_empty() {
        form.password = secret("Password")?;
    }
    Ok(())
}

pub fn fill_register(form: &mut RegisterForm) -> Result<()> {
    if form.username.is_empty() {
        form.username = text("Username", "", true)?;
    }
    if form.email.is_empty() {
        form.email = text("Email", "", true)?;
    }
    if form.password.is_empty() {
        form.password = secret("Password")?;
        form.password_confirm = secret("Confirm password")?;
    }
    Ok(())
}

/// Walk every bug form field, pre-filled with its current value.
pub fn fill_bug_form(form: &mut BugForm) -> Result<()> {
    form.title = text("Title", &form.title, true)?;
    form.description = text("Description", &form.description, true)?;
    form.steps_to_reproduce = text("Steps to reproduce", &form.steps_to_reproduce, false)?;
    form.expected_result = text("Expected result", &form.expected_result, false)?;
    form.actual_result = text("Actual result", &form.actual_result, false)?;

    let severities: Vec<(Severity, &str)> = Severity::ALL.iter().map(|s| (*s, s.label())).collect();
    let current = Severity::ALL
        .iter()
        .position(|s| s.as_str() == form.severity)
        .unwrap_or(1);
    form.severity = choose("Severity", &severities, current)?.as_str().to_string();

    let statuses: Vec<(Status, &str)> = Status::ALL.iter().map(|s| (*s, s.label())).collect();
    let current = Status::ALL
        .iter()
        .position(|s| s.as_str() == form.status)
        .unwrap_or(0);
    form.status = choose("Status", &statuses, current)?.as_str().to_string();

    form.environment = text("Environment", &form.environment, false)?;
    form.tags = text("Tags (comma-separated)", &form.tags, false)?;
    Ok(())
}

pub fn choose_severity() -> Result<Option<Severity>> {
    let mut options: Vec<(Option<Severity>, &str)> = vec![(None, "Any severity")];
    options.extend(Severity::ALL.iter().map(|s| (Some(*s), s.label())));
    choose("Severity", &options, 0)
}

pub fn choose_status() -> Result<Option<Status>> {
    let mut options: Vec<(Option<Status>, &str)> = vec![(None, "Any status")];
    options.extend(Status::ALL.iter().map(|s| (Some(*s), s.label())));
    choose("Status", &options, 0)
}

/// Free-text prompt where an empty answer means "no value".
pub fn optional_text(prompt: &str, initial: &str) -> Result<Option<String>> {
    let value = text(prompt, initial, false)?;
    Ok(Some(value.trim().to_string()).filter(|v| !v.is_empty()))
}

/// True when at least one field flag was given.
pub fn has_any(fields: &BugFields) -> bool {
    [
        &fields.title,
        &fields.description,
        &fields.steps,
        &fields.expected,
        &fields.actual,
        &fields.severity,
        &fields.status,
        &fields.environment,
        &fields.tags,
    ]
    .iter()
    .any(|field| field.is_some())
}

/// Overlay the given flags on `form`; absent flags keep the current value.
pub fn apply_fields(form: &mut BugForm, fields: BugFields) {
    let overlay = |target: &mut String, value: Option<String>| {
        if let Some(value) = value {
            *target = value;
        }
    };
    overlay(&mut form.title, fields.title);
    overlay(&mut form.description, fields.description);
    overlay(&mut form.steps_to_reproduce, fields.steps);
    overlay(&mut form.expected_result, fields.expected);
    overlay(&mut form.actual_result, fields.actual);
    overlay(&mut form.severity, fields.severity);
    overlay(&mut form.status, fields.status);
    overlay(&mut form.environment, fields.environment);
    overlay(&mut form.tags, fields.tags);
}
