//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod access;
mod auth;
pub mod guard;
pub mod inventory;
pub mod logging;
pub mod migration;
mod settings;
pub mod status;

pub use access::{AccessPolicy, Capability};
pub use auth::AuthService;
pub use guard::{navigate, FirstRunGuard, Navigation, Route, RouteGuard};
pub use inventory::{Breakdown, Dashboard, InventoryService, Metric, Slice};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use settings::SettingsService;
pub use status::{get_status, SessionSummary, StatusSummary};
