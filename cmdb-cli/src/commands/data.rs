//! Delete-all-data command - the settings danger zone

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use cmdb_core::{Capability, LogEvent, OperationResult, Route};

use super::{get_context, get_logger, log_event, require_view};
use crate::output;

pub fn run(force: bool, json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let logger = get_logger();
    require_view(&ctx, Route::Settings)?;
    ctx.auth.policy().require(Capability::DeleteAllData)?;

    if !force && !json {
        println!(
            "\n{}",
            "This action will delete all application data except user accounts.".red()
        );
        println!("{}\n", "This action cannot be undone.".dimmed());
        if !Confirm::new()
            .with_prompt("Are you sure you want to continue?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    let wiped = ctx.auth.delete_all_data()?;

    let mut event = LogEvent::new("data_deleted");
    if let Some(email) = ctx.auth.session().user_email() {
        event = event.with_user(email);
    }
    log_event(&logger, event);

    if json {
        return output::json(&OperationResult::ok(wiped));
    }
    output::success("All data has been deleted");
    if !wiped.is_empty() {
        println!("{}", format!("Removed: {}", wiped.join(", ")).dimmed());
    }
    Ok(())
}
