//! Settings command - database connection and device import forms
//!
//! Values are only saved; nothing connects to the database or calls the
//! import source.

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Password};
use serde::Serialize;

use cmdb_core::domain::settings::mask_secret;
use cmdb_core::domain::{DatabaseConnection, DatabaseType, DeviceImport, ImportSource};
use cmdb_core::{LogEvent, OperationResult, Route};

use super::{get_context, get_logger, log_event, require_view};
use crate::output;

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Manage the saved database connection
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Manage device imports
    Imports {
        #[command(subcommand)]
        command: ImportsCommands,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Show the saved connection
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a connection, replacing the current one
    Set {
        /// Database type (mysql, postgres, sqlserver)
        #[arg(long = "type", default_value = "mysql")]
        db_type: DatabaseType,
        #[arg(long)]
        host: String,
        /// Port (defaults to the engine's standard port)
        #[arg(long)]
        port: Option<String>,
        #[arg(long)]
        username: String,
        /// Password (prompted if omitted)
        #[arg(long, env = "CMDB_DB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Database name
        #[arg(long)]
        database: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the saved connection
    Delete {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ImportsCommands {
    /// List recorded imports
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import devices from Azure or Intune
    Add {
        /// Import source (azure, intune)
        #[arg(long, default_value = "azure")]
        source: ImportSource,
        /// API key (prompted if omitted)
        #[arg(long, env = "CMDB_IMPORT_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(long)]
        tenant_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an import by its number in 'imports list'
    Delete {
        number: usize,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Connection as displayed, password masked
#[derive(Serialize)]
struct ConnectionView {
    #[serde(rename = "type")]
    db_type: DatabaseType,
    host: String,
    port: String,
    username: String,
    password: String,
    database: String,
}

impl From<DatabaseConnection> for ConnectionView {
    fn from(c: DatabaseConnection) -> Self {
        Self {
            db_type: c.db_type,
            password: mask_secret(&c.password),
            host: c.host,
            port: c.port,
            username: c.username,
            database: c.database,
        }
    }
}

/// Import as displayed, API key masked
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportView {
    number: usize,
    source: ImportSource,
    api_key: String,
    tenant_id: String,
    timestamp: String,
}

impl ImportView {
    fn new(number: usize, import: DeviceImport) -> Self {
        Self {
            number,
            source: import.source,
            api_key: mask_secret(&import.api_key),
            tenant_id: import.tenant_id,
            timestamp: import.timestamp,
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

pub fn run(command: SettingsCommands) -> Result<()> {
    match command {
        SettingsCommands::Db { command } => run_db(command),
        SettingsCommands::Imports { command } => run_imports(command),
    }
}

fn run_db(command: DbCommands) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    require_view(&ctx, Route::Settings)?;

    match command {
        DbCommands::Show { json } => {
            let connection = ctx.settings.database_connection()?.map(ConnectionView::from);
            if json {
                return output::json(&connection);
            }
            let Some(c) = connection else {
                println!("{}", "No database connection configured".dimmed());
                return Ok(());
            };
            let mut table = output::create_table();
            table.set_header(vec!["Type", "Host", "Database", "Username", "Password"]);
            table.add_row(vec![
                c.db_type.label().to_string(),
                format!("{}:{}", c.host, c.port),
                c.database,
                c.username,
                c.password,
            ]);
            println!("{}", table);
        }
        DbCommands::Set {
            db_type,
            host,
            port,
            username,
            password,
            database,
            json,
        } => {
            let password = match password {
                Some(p) => p,
                None => Password::new().with_prompt("Database password").interact()?,
            };
            let connection = DatabaseConnection {
                db_type,
                host,
                port: port.unwrap_or_else(|| db_type.default_port().to_string()),
                username,
                password,
                database,
            };
            ctx.settings.save_database_connection(&connection)?;
            log_event(&logger, LogEvent::new("database_connection_saved"));

            if json {
                return output::json(&OperationResult::ok(ConnectionView::from(connection)));
            }
            output::success("Database connection saved successfully");
        }
        DbCommands::Delete { force, json } => {
            if ctx.settings.database_connection()?.is_none() {
                bail!("No database connection configured");
            }
            if !force && !json && !confirm("Delete the database connection? This cannot be undone")? {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            let deleted = ctx.settings.delete_database_connection()?;
            log_event(&logger, LogEvent::new("database_connection_deleted"));

            if json {
                return output::json(&OperationResult::ok(deleted));
            }
            output::success("Database connection deleted");
        }
    }
    Ok(())
}

fn run_imports(command: ImportsCommands) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    require_view(&ctx, Route::Settings)?;

    match command {
        ImportsCommands::List { json } => {
            let imports: Vec<ImportView> = ctx
                .settings
                .device_imports()?
                .into_iter()
                .enumerate()
                .map(|(i, import)| ImportView::new(i + 1, import))
                .collect();
            if json {
                return output::json(&imports);
            }
            if imports.is_empty() {
                println!("{}", "No device imports yet".dimmed());
                return Ok(());
            }
            let mut table = output::create_table();
            table.set_header(vec!["#", "Source", "Tenant ID", "API Key", "Imported"]);
            for view in imports {
                table.add_row(vec![
                    view.number.to_string(),
                    view.source.label().to_string(),
                    view.tenant_id,
                    view.api_key,
                    view.timestamp,
                ]);
            }
            println!("{}", table);
        }
        ImportsCommands::Add {
            source,
            api_key,
            tenant_id,
            json,
        } => {
            let api_key = match api_key {
                Some(k) => k,
                None => Password::new().with_prompt("API Key").interact()?,
            };
            let import = ctx.settings.add_device_import(source, &api_key, &tenant_id)?;
            log_event(
                &logger,
                LogEvent::new("devices_imported").with_command(format!("imports add {}", source.label())),
            );

            if json {
                let number = ctx.settings.device_imports()?.len();
                return output::json(&OperationResult::ok(ImportView::new(number, import)));
            }
            output::success(&format!("Devices imported from {}", source.label()));
        }
        ImportsCommands::Delete {
            number,
            force,
            json,
        } => {
            if number == 0 {
                bail!("Import numbers start at 1");
            }
            if !force && !json && !confirm(&format!("Delete device import #{}?", number))? {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            let removed = ctx.settings.delete_device_import(number - 1)?;
            log_event(&logger, LogEvent::new("device_import_deleted"));

            if json {
                return output::json(&OperationResult::ok(ImportView::new(number, removed)));
            }
            output::success(&format!(
                "Deleted {} import for tenant {}",
                removed.source.label(),
                removed.tenant_id
            ));
        }
    }
    Ok(())
}
