//! Account commands: `bugdesk register|login|logout|whoami|refresh`.

use anyhow::{Result, bail};
use console::style;

use bugdesk::errors::ClientError;
use bugdesk::pages::{LoginPage, RegisterPage, Route, after_logout, home_redirect};
use bugdesk::ui;

use super::prompts::{fill_login, fill_register};
use super::{App, finish, route_hint};

pub async fn cmd_register(
    app: &mut App,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    password_confirm: Option<String>,
) -> Result<()> {
    let mut page = RegisterPage::new();
    page.form.username = username.unwrap_or_default();
    page.form.email = email.unwrap_or_default();
    if let Some(password) = password {
        page.form.password_confirm = password_confirm.unwrap_or_else(|| password.clone());
        page.form.password = password;
    }
    if console::user_attended() {
        fill_register(&mut page.form)?;
    }

    let submission = ui::with_spinner("Creating account...", page.submit(&mut app.auth)).await;
    let route = finish(submission)?;
    ui::success(&format!(
        "Account created. Signed in as {}",
        app.auth.state().username().unwrap_or_default()
    ));
    if let Some(route) = route {
        println!("Next: {}", style(route_hint(&route)).cyan());
    }
    Ok(())
}

pub async fn cmd_login(
    app: &mut App,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let mut page = LoginPage::new();
    page.form.username = username.unwrap_or_default();
    page.form.password = password.unwrap_or_default();
    if console::user_attended() {
        fill_login(&mut page.form)?;
    }

    let submission = ui::with_spinner("Signing in...", page.submit(&mut app.auth)).await;
    finish(submission)?;
    ui::success(&format!(
        "Signed in as {}",
        app.auth.state().username().unwrap_or_default()
    ));
    Ok(())
}

pub fn cmd_logout(app: &mut App) -> Result<()> {
    let was_signed_in = app.auth.state().is_authenticated();
    app.auth.logout()?;
    if was_signed_in {
        ui::success("Signed out");
    } else {
        println!("Not signed in.");
    }
    println!("Sign in again with `{}`", route_hint(&after_logout()));
    Ok(())
}

pub fn cmd_whoami(app: &App) {
    match app.auth.state().username() {
        Some(username) => println!(
            "{}{} at {}",
            ui::icons::USER,
            style(username).bold(),
            app.config.api_url()
        ),
        None => println!("Not signed in."),
    }
    match home_redirect(app.auth.state()) {
        Some(route) => println!("Next: `{}`", route_hint(&route)),
        None => println!(
            "Sign in with `{}` or create an account with `{}`",
            route_hint(&Route::Login),
            route_hint(&Route::Register)
        ),
    }
}

pub async fn cmd_refresh(app: &mut App) -> Result<()> {
    match ui::with_spinner("Refreshing session...", app.auth.refresh()).await {
        Ok(()) => {
            ui::success("Session refreshed");
            Ok(())
        }
        Err(ClientError::NotSignedIn) => bail!("Not signed in. Run `bugdesk login` first."),
        Err(err) => {
            let message = err.display_message("Failed to refresh session");
            if err.as_api().is_some_and(|api| api.is_unauthorized()) {
                bail!("{}. Run `bugdesk login` to sign in again.", message);
            }
            bail!(message)
        }
    }
}
