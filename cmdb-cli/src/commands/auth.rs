//! Auth commands - register, login, logout, whoami

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::Confirm;

use cmdb_core::domain::is_valid_email;
use cmdb_core::{Error, LogEvent, OperationResult, Role, User};

use super::{get_context, get_logger, log_event, log_failure};
use crate::output;

fn check_email(email: &str) -> Result<()> {
    if !is_valid_email(email) {
        bail!("Please enter a valid email address");
    }
    Ok(())
}

/// Register the first user of a fresh installation
pub fn register(email: &str, role: Role, force: bool, json: bool) -> Result<()> {
    check_email(email)?;
    let mut ctx = get_context()?;
    let logger = get_logger();

    if !ctx.auth.is_first_run() {
        if !force {
            bail!(
                "{} user(s) are already registered. Sign in and use 'cmdb users add', \
                 or pass --force to replace every account.",
                ctx.auth.users().len()
            );
        }
        if !json {
            output::warning(&format!(
                "This will delete all {} registered user(s) and keep only {}.",
                ctx.auth.users().len(),
                email
            ));
            if !Confirm::new()
                .with_prompt("Are you sure?")
                .default(false)
                .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
        }
    }

    let user = ctx.auth.register(email, role)?;
    log_event(&logger, LogEvent::new("user_registered").with_user(&user.email));

    if json {
        return output::json(&OperationResult::ok(user));
    }
    output::success(&format!("Registered {} as {}", user.email, user.role.label()));
    println!("Run 'cmdb login {}' to sign in.", user.email);
    Ok(())
}

/// Sign in as a registered user
pub fn login(email: &str, json: bool) -> Result<()> {
    check_email(email)?;
    let mut ctx = get_context()?;
    let logger = get_logger();

    if ctx.auth.is_first_run() {
        bail!("No users are registered yet. Run 'cmdb register <email>' first.");
    }

    match ctx.auth.login(email) {
        Ok(user) => {
            log_event(&logger, LogEvent::new("login").with_user(&user.email));
            if json {
                return output::json(&OperationResult::ok(user));
            }
            output::success(&format!("Signed in as {} ({})", user.email, user.role.label()));
            Ok(())
        }
        Err(err @ Error::UnknownUser(_)) => {
            log_failure(&logger, LogEvent::new("login_failed").with_user(email), &err);
            if json {
                output::json(&OperationResult::<User>::from(Err(err)))?;
                std::process::exit(1);
            }
            bail!("Invalid credentials: no account is registered for {}", email);
        }
        Err(err) => Err(err.into()),
    }
}

/// Sign out
pub fn logout(json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let logger = get_logger();

    let email = ctx.auth.session().user_email().map(str::to_string);
    ctx.auth.logout()?;

    let mut event = LogEvent::new("logout");
    if let Some(email) = &email {
        event = event.with_user(email);
    }
    log_event(&logger, event);

    if json {
        return output::json(&OperationResult::ok(email));
    }
    match email {
        Some(email) => output::success(&format!("Signed out {}", email)),
        None => output::info("Not signed in"),
    }
    Ok(())
}

/// Show the signed-in user
pub fn whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let current = ctx.auth.current_user().cloned();

    if json {
        return output::json(&current);
    }
    match current {
        Some(user) => println!("{} ({})", user.email.bold(), output::role_label(user.role)),
        None => println!("{}", "Not signed in".dimmed()),
    }
    Ok(())
}
