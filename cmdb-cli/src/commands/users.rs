//! Users command - user management panel

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use cmdb_core::domain::is_valid_email;
use cmdb_core::{Capability, Error, LogEvent, OperationResult, Role, Route};

use super::{get_context, get_logger, log_event, log_failure, require_view};
use crate::output;

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List registered users
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a user (administrators only)
    Add {
        /// Email of the new user
        email: String,
        /// Role of the new user
        #[arg(long, default_value = "user")]
        role: Role,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a user other than yourself
    Remove {
        /// Email of the user to remove
        email: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: UsersCommands) -> Result<()> {
    match command {
        UsersCommands::List { json } => list(json),
        UsersCommands::Add { email, role, json } => add(&email, role, json),
        UsersCommands::Remove { email, force, json } => remove(&email, force, json),
    }
}

fn list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_view(&ctx, Route::Settings)?;

    let users = ctx.auth.users().as_slice();
    if json {
        return output::json(&users);
    }

    if users.is_empty() {
        println!("{}", "No users found".dimmed());
        return Ok(());
    }
    let current = ctx.auth.session().user_email();
    println!("{}", output::users_table(users, current));
    Ok(())
}

fn add(email: &str, role: Role, json: bool) -> Result<()> {
    if !is_valid_email(email) {
        bail!("Please enter a valid email address");
    }

    let mut ctx = get_context()?;
    let logger = get_logger();
    require_view(&ctx, Route::Settings)?;
    ctx.auth.policy().require(Capability::AddUsers)?;

    if !ctx.auth.add_user(email, role)? {
        let err = Error::validation(format!("User already exists: {}", email));
        log_failure(&logger, LogEvent::new("user_add_failed").with_user(email), &err);
        if json {
            output::json(&OperationResult::<()>::fail(err.to_string()))?;
        } else {
            output::error("User already exists");
        }
        std::process::exit(1);
    }

    log_event(&logger, LogEvent::new("user_added").with_user(email));
    if json {
        return output::json(&OperationResult::ok(email));
    }
    output::success(&format!("User {} added as {}", email, role.label()));
    Ok(())
}

fn remove(email: &str, force: bool, json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let logger = get_logger();
    require_view(&ctx, Route::Settings)?;

    if !ctx.auth.users().contains(email) {
        bail!("User '{}' not found", email);
    }

    if !force && !json {
        println!(
            "\n{}",
            format!("Remove {}? This action cannot be undone.", email).yellow()
        );
        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    match ctx.auth.remove_user(email) {
        Ok(_) => {
            log_event(&logger, LogEvent::new("user_removed").with_user(email));
            if json {
                return output::json(&OperationResult::ok(email));
            }
            output::success("User removed successfully");
            Ok(())
        }
        Err(err @ Error::SelfRemoval(_)) => {
            log_failure(&logger, LogEvent::new("user_remove_failed").with_user(email), &err);
            bail!("You cannot remove your own account")
        }
        Err(err) => Err(err.into()),
    }
}
