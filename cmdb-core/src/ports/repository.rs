//! Repository port - key-value storage abstraction

use crate::domain::result::Result;

/// Well-known keys in the persistent store
pub mod keys {
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
    pub const USER_EMAIL: &str = "userEmail";
    pub const USERS: &str = "users";
    pub const DATABASE_CONNECTION: &str = "databaseConnection";
    pub const DEVICE_IMPORTS: &str = "deviceImports";
    pub const CONFIGURATION_ITEMS: &str = "configurationItems";
    pub const CATEGORIES: &str = "categories";
    pub const AUDIT_LOG: &str = "auditLog";

    /// Keys that survive a delete-all-data wipe
    pub const PRESERVED: &[&str] = &[USERS, IS_LOGGED_IN, USER_EMAIL];
}

/// Durable string key-value store
///
/// The auth and settings services read and write through this trait only,
/// so the storage medium can be swapped without touching their logic.
/// Values are opaque strings; JSON encoding is the caller's concern.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// All keys currently stored, sorted
    fn list(&self) -> Result<Vec<String>>;

    /// Remove `key`; no-op if absent
    fn delete(&self, key: &str) -> Result<()>;
}
