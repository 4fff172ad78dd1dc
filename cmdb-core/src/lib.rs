//! CMDB Core - identity, session and access control for the CMDB console
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: Core entities (User, Role, Session, IdentityStore, settings and inventory records)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Business logic (auth, access policy, route guards, settings, inventory, logging)
//! - **adapters**: Concrete implementations (DuckDB store, in-memory store)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbStore;
use adapters::memory::MemoryStore;
use config::Config;
use ports::KeyValueStore;
use services::{AuthService, InventoryService, Navigation, SettingsService, StatusSummary};

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{IdentityStore, Role, Session, User};
pub use services::{Capability, EntryPoint, LogEvent, LoggingService, Route};

/// Main context for console operations
///
/// Constructed once per process. Construction performs the single hydration
/// read of identity and session state from the store.
pub struct CmdbContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub auth: AuthService,
    pub settings: SettingsService,
    pub inventory: InventoryService,
}

impl CmdbContext {
    /// Open the DuckDB-backed context in `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let db_path = data_dir.join(&config.store_file);
        let store = DuckDbStore::open(&db_path)
            .with_context(|| format!("Failed to open store at {}", db_path.display()))?;
        Self::with_store(config, Arc::new(store))
    }

    /// Context over an in-memory store; nothing is persisted
    pub fn in_memory() -> Result<Self> {
        Self::with_store(Config::default(), Arc::new(MemoryStore::new()))
    }

    /// Context over any store implementation
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let auth = AuthService::load(Arc::clone(&store)).context("Failed to load auth state")?;
        let settings = SettingsService::new(Arc::clone(&store));
        let inventory = InventoryService::new(Arc::clone(&store));

        Ok(Self {
            config,
            store,
            auth,
            settings,
            inventory,
        })
    }

    /// Resolve a navigation against the current auth state
    pub fn navigate(&self, location: &str) -> Navigation {
        services::navigate(&self.auth, location)
    }

    pub fn status(&self) -> domain::result::Result<StatusSummary> {
        services::get_status(&self.auth, &self.settings)
    }
}
