//! CMDB CLI - sign-in, users and settings for the CMDB console

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use cmdb_core::services::Breakdown;
use cmdb_core::{LogEvent, Role};
use commands::{auth, categories, cis, config, dashboard, data, logs, open, reports, settings, status, users};

/// CMDB - configuration management database console
#[derive(Parser)]
#[command(name = "cmdb", version, about, long_about = None)]
struct Cli {
    /// Show info-level diagnostics on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Show debug-level diagnostics on stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show users, session and settings summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register an account (replaces every existing user)
    Register {
        email: String,
        /// Role of the new account
        #[arg(long, default_value = "admin")]
        role: Role,
        /// Allow replacing existing users
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in as a registered user
    Login {
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        command: users::UsersCommands,
    },

    /// Open a console view by path (e.g. /dashboard)
    Open {
        path: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Key metrics, recent changes and CI distribution
    Dashboard {
        /// Group the distribution by type or environment
        #[arg(long, default_value = "type")]
        by: Breakdown,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration items inventory
    Cis {
        #[command(subcommand)]
        command: cis::CisCommands,
    },

    /// Configuration item categories
    Categories {
        #[command(subcommand)]
        command: categories::CategoriesCommands,
    },

    /// Report catalogue
    Reports {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Database connection and device import settings
    Settings {
        #[command(subcommand)]
        command: settings::SettingsCommands,
    },

    /// Delete all data except users and the session (admin only)
    DeleteAllData {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// View and change settings.json
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Status { .. } => "status",
            Commands::Register { .. } => "register",
            Commands::Login { .. } => "login",
            Commands::Logout { .. } => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Users { .. } => "users",
            Commands::Open { .. } => "open",
            Commands::Dashboard { .. } => "dashboard",
            Commands::Cis { .. } => "cis",
            Commands::Categories { .. } => "categories",
            Commands::Reports { .. } => "reports",
            Commands::Settings { .. } => "settings",
            Commands::DeleteAllData { .. } => "delete-all-data",
            Commands::Logs { .. } => "logs",
            Commands::Config { .. } => "config",
        }
    }
}

fn init_tracing(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.debug);

    let name = cli.command.name();
    if !matches!(cli.command, Commands::Logs { .. } | Commands::Config { .. }) {
        commands::log_event(
            &commands::get_logger(),
            LogEvent::new("command_executed").with_command(name),
        );
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(command = name, error = ?e, "Command failed");
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Status { json } => status::run(json),
        Commands::Register {
            email,
            role,
            force,
            json,
        } => auth::register(&email, role, force, json),
        Commands::Login { email, json } => auth::login(&email, json),
        Commands::Logout { json } => auth::logout(json),
        Commands::Whoami { json } => auth::whoami(json),
        Commands::Users { command } => users::run(command),
        Commands::Open { path, json } => open::run(&path, json),
        Commands::Dashboard { by, json } => dashboard::run(by, json),
        Commands::Cis { command } => cis::run(command),
        Commands::Categories { command } => categories::run(command),
        Commands::Reports { json } => reports::run(json),
        Commands::Settings { command } => settings::run(command),
        Commands::DeleteAllData { force, json } => data::run(force, json),
        Commands::Logs { command } => logs::run(command),
        Commands::Config { command } => config::run(command),
    }
}
