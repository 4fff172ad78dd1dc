//! Core domain entities
//!
//! Plain data structures with validation logic - no I/O.

mod identity;
pub mod inventory;
pub mod result;
mod session;
pub mod settings;
mod user;

pub use identity::IdentityStore;
pub use session::Session;
pub use settings::{DatabaseConnection, DatabaseType, DeviceImport, ImportSource};
pub use user::{is_valid_email, Role, User};
