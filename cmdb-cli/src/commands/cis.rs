//! Configuration items command - inventory list, search and create

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use cmdb_core::domain::inventory::{CiStatus, CiType, ConfigItem, Environment, NewConfigItem};
use cmdb_core::{CmdbContext, LogEvent, OperationResult, Route};

use super::{get_context, get_logger, log_event, require_view};
use crate::output;

#[derive(Subcommand)]
pub enum CisCommands {
    /// List configuration items
    List {
        /// Filter by name, type or ID
        #[arg(long, short)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a configuration item
    Add {
        #[arg(long)]
        name: String,
        /// server, application, database, network, storage or other
        #[arg(long = "type")]
        ci_type: CiType,
        /// active, maintenance, inactive or retired
        #[arg(long, default_value = "active")]
        status: CiStatus,
        /// Owning team or department
        #[arg(long)]
        owner: String,
        #[arg(long, default_value = "production")]
        environment: Environment,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn status_cell(status: CiStatus) -> String {
    match status {
        CiStatus::Active => status.label().green().to_string(),
        CiStatus::UnderMaintenance => status.label().yellow().to_string(),
        CiStatus::Inactive | CiStatus::Retired => status.label().dimmed().to_string(),
    }
}

/// Print the inventory table
pub fn render(items: &[ConfigItem]) {
    if items.is_empty() {
        println!("{}", "No configuration items found".dimmed());
        return;
    }
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Type", "Status", "Owner", "Environment", "Last Updated"]);
    for ci in items {
        table.add_row(vec![
            ci.id.clone(),
            ci.name.clone(),
            ci.ci_type.label().to_string(),
            status_cell(ci.status),
            ci.owner.clone(),
            ci.environment.label().to_string(),
            ci.last_updated.clone(),
        ]);
    }
    println!("{}", table);
}

/// Show the configuration items view
pub fn show(ctx: &CmdbContext, search: Option<&str>) -> Result<()> {
    let items = ctx.inventory.search(search.unwrap_or_default())?;
    render(&items);
    Ok(())
}

pub fn run(command: CisCommands) -> Result<()> {
    let ctx = get_context()?;
    require_view(&ctx, Route::ConfigurationItems)?;

    match command {
        CisCommands::List { search, json } => {
            if json {
                let items = ctx.inventory.search(search.as_deref().unwrap_or_default())?;
                return output::json(&items);
            }
            show(&ctx, search.as_deref())?;
        }
        CisCommands::Add {
            name,
            ci_type,
            status,
            owner,
            environment,
            json,
        } => {
            let actor = ctx
                .auth
                .session()
                .user_email()
                .context("Sign in to create configuration items")?
                .to_string();
            let form = NewConfigItem {
                name,
                ci_type,
                status,
                owner,
                environment,
            };
            let item = ctx.inventory.create_config_item(form, &actor)?;
            log_event(
                &get_logger(),
                LogEvent::new("ci_created")
                    .with_user(&actor)
                    .with_command(format!("cis add {}", item.id)),
            );

            if json {
                return output::json(&OperationResult::ok(item));
            }
            output::success(&format!("{} has been successfully created as {}", item.name, item.id));
        }
    }
    Ok(())
}
