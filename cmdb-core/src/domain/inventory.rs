//! Inventory records shown by the console views
//!
//! Configuration items, their categories, the audit trail of changes and
//! the report catalogue. The JSON shape matches what the console keeps under
//! the `configurationItems`, `categories` and `auditLog` keys.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Kind of tracked asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CiType {
    Server,
    Application,
    Database,
    Network,
    Storage,
    Other,
}

impl CiType {
    pub const ALL: [CiType; 6] = [
        CiType::Server,
        CiType::Application,
        CiType::Database,
        CiType::Network,
        CiType::Storage,
        CiType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CiType::Server => "Server",
            CiType::Application => "Application",
            CiType::Database => "Database",
            CiType::Network => "Network",
            CiType::Storage => "Storage",
            CiType::Other => "Other",
        }
    }
}

impl std::str::FromStr for CiType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CiType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::validation(format!(
                    "Unknown type '{}'. Expected server, application, database, network, storage or other",
                    s
                ))
            })
    }
}

/// Lifecycle state of a configuration item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CiStatus {
    Active,
    #[serde(rename = "Under Maintenance")]
    UnderMaintenance,
    Inactive,
    Retired,
}

impl CiStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CiStatus::Active => "Active",
            CiStatus::UnderMaintenance => "Under Maintenance",
            CiStatus::Inactive => "Inactive",
            CiStatus::Retired => "Retired",
        }
    }
}

impl std::str::FromStr for CiStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "maintenance" | "under-maintenance" | "under maintenance" => Ok(Self::UnderMaintenance),
            "inactive" => Ok(Self::Inactive),
            "retired" => Ok(Self::Retired),
            _ => Err(Error::validation(format!(
                "Unknown status '{}'. Expected active, maintenance, inactive or retired",
                s
            ))),
        }
    }
}

/// Deployment environment of a configuration item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    Production,
    Development,
    Testing,
    Staging,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Production,
        Environment::Development,
        Environment::Testing,
        Environment::Staging,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Environment::Production => "Production",
            Environment::Development => "Development",
            Environment::Testing => "Testing",
            Environment::Staging => "Staging",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Environment::ALL
            .into_iter()
            .find(|e| e.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::validation(format!(
                    "Unknown environment '{}'. Expected production, development, testing or staging",
                    s
                ))
            })
    }
}

/// A tracked IT asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub ci_type: CiType,
    pub status: CiStatus,
    pub owner: String,
    pub environment: Environment,
    /// `YYYY-MM-DD`
    pub last_updated: String,
}

impl ConfigItem {
    /// Case-insensitive match on name, type or ID
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.ci_type.label().to_lowercase().contains(&term)
            || self.id.to_lowercase().contains(&term)
    }

    /// Numeric part of a `CI-<n>` identifier
    pub fn number(&self) -> Option<u32> {
        self.id.strip_prefix("CI-")?.parse().ok()
    }
}

/// Fields of the create-CI form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConfigItem {
    pub name: String,
    pub ci_type: CiType,
    pub status: CiStatus,
    pub owner: String,
    pub environment: Environment,
}

impl NewConfigItem {
    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim().chars().count();
        if name < 2 {
            return Err(Error::validation("Name must be at least 2 characters."));
        }
        if name > 50 {
            return Err(Error::validation("Name must be at most 50 characters."));
        }
        if self.owner.trim().chars().count() < 2 {
            return Err(Error::validation("Owner must be at least 2 characters."));
        }
        Ok(())
    }
}

/// What happened to a configuration item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Relate,
}

impl AuditAction {
    pub fn label(&self) -> &'static str {
        match self {
            AuditAction::Create => "Create",
            AuditAction::Update => "Update",
            AuditAction::Delete => "Delete",
            AuditAction::Relate => "Relate",
        }
    }
}

/// One row of the recent-changes table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub ci_id: String,
    pub ci_name: String,
    pub action: AuditAction,
    pub user: String,
    pub timestamp: String,
    pub details: String,
}

impl AuditEntry {
    pub fn new(
        id: impl Into<String>,
        item: &ConfigItem,
        action: AuditAction,
        user: impl Into<String>,
        at: DateTime<Utc>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            ci_id: item.id.clone(),
            ci_name: item.name.clone(),
            action,
            user: user.into(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            details: details.into(),
        }
    }
}

/// Badge colour of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryColor {
    Blue,
    Green,
    Amber,
    Purple,
    Rose,
}

impl CategoryColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryColor::Blue => "blue",
            CategoryColor::Green => "green",
            CategoryColor::Amber => "amber",
            CategoryColor::Purple => "purple",
            CategoryColor::Rose => "rose",
        }
    }
}

impl std::str::FromStr for CategoryColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "amber" => Ok(Self::Amber),
            "purple" => Ok(Self::Purple),
            "rose" => Ok(Self::Rose),
            _ => Err(Error::validation(format!(
                "Unknown color '{}'. Expected blue, green, amber, purple or rose",
                s
            ))),
        }
    }
}

/// A grouping of configuration items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub item_count: u32,
    pub color: CategoryColor,
}

impl Category {
    /// Validate the create-category form; new categories hold no items
    pub fn new(
        id: u64,
        name: impl Into<String>,
        description: impl Into<String>,
        color: CategoryColor,
    ) -> Result<Self> {
        let name = name.into();
        let description = description.into();
        if name.trim().chars().count() < 2 {
            return Err(Error::validation("Category name must be at least 2 characters"));
        }
        if description.trim().chars().count() < 10 {
            return Err(Error::validation("Description must be at least 10 characters"));
        }
        Ok(Self {
            id,
            name,
            description,
            item_count: 0,
            color,
        })
    }
}

/// Entry of the report catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub date: &'static str,
}
