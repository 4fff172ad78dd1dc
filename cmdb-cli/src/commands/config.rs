//! Config command - view and change settings.json

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use serde_json::json;

use cmdb_core::config::Config;

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change stored configuration values
    Set {
        /// Store file name, relative to the data directory
        #[arg(long)]
        store_file: Option<String>,
        /// Record commands in the event log
        #[arg(long)]
        event_log: Option<bool>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let data_dir = get_data_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&data_dir)?;
            if json {
                return output::json(&json!({
                    "dataDir": data_dir.to_string_lossy(),
                    "storeFile": config.store_file,
                    "eventLog": config.event_log,
                }));
            }
            println!("{}", "Configuration".bold());
            println!("  Data directory: {}", data_dir.display());
            println!("  Store file: {}", config.store_file);
            println!("  Event log: {}", if config.event_log { "on" } else { "off" });
        }
        ConfigCommands::Set {
            store_file,
            event_log,
            json,
        } => {
            if store_file.is_none() && event_log.is_none() {
                bail!("Nothing to change. Pass --store-file and/or --event-log.");
            }
            std::fs::create_dir_all(&data_dir)?;
            let mut config = Config::load(&data_dir)?;
            if let Some(file) = store_file {
                if file.trim().is_empty() {
                    bail!("Store file name cannot be empty");
                }
                config.store_file = file;
            }
            if let Some(enabled) = event_log {
                config.event_log = enabled;
            }
            config.save(&data_dir)?;
            tracing::info!(store_file = %config.store_file, event_log = config.event_log, "Saved configuration");

            if json {
                return output::json(&json!({
                    "storeFile": config.store_file,
                    "eventLog": config.event_log,
                }));
            }
            output::success("Configuration saved");
        }
    }
    Ok(())
}
