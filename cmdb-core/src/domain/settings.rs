//! Settings records persisted by the settings screens
//!
//! Both are stored as form values only. No database connection is opened
//! and no device import is executed.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Supported database engines for the connection form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Mysql,
    Postgres,
    Sqlserver,
}

impl DatabaseType {
    pub fn label(&self) -> &'static str {
        match self {
            DatabaseType::Mysql => "MySQL",
            DatabaseType::Postgres => "PostgreSQL",
            DatabaseType::Sqlserver => "SQL Server",
        }
    }

    /// Port shown as the form placeholder
    pub fn default_port(&self) -> &'static str {
        match self {
            DatabaseType::Mysql => "3306",
            DatabaseType::Postgres => "5432",
            DatabaseType::Sqlserver => "1433",
        }
    }
}

impl std::str::FromStr for DatabaseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mysql" => Ok(Self::Mysql),
            "postgres" => Ok(Self::Postgres),
            "sqlserver" => Ok(Self::Sqlserver),
            other => Err(Error::validation(format!(
                "Unknown database type '{}'. Expected mysql, postgres or sqlserver",
                other
            ))),
        }
    }
}

/// Saved database connection form (`databaseConnection` key)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConnection {
    #[serde(rename = "type")]
    pub db_type: DatabaseType,
    pub host: String,
    /// Kept as entered; the form does not coerce it to a number
    pub port: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConnection {
    /// Every field is required
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("Host", &self.host),
            ("Port", &self.port),
            ("Username", &self.username),
            ("Password", &self.password),
            ("Database name", &self.database),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("{} is required", name)));
            }
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Device import sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportSource {
    Azure,
    Intune,
}

impl ImportSource {
    pub fn label(&self) -> &'static str {
        match self {
            ImportSource::Azure => "Azure",
            ImportSource::Intune => "Intune",
        }
    }
}

impl std::str::FromStr for ImportSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "azure" => Ok(Self::Azure),
            "intune" => Ok(Self::Intune),
            other => Err(Error::validation(format!(
                "Unknown import source '{}'. Expected azure or intune",
                other
            ))),
        }
    }
}

/// One entry of the `deviceImports` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceImport {
    pub source: ImportSource,
    pub api_key: String,
    pub tenant_id: String,
    /// RFC 3339 timestamp of when the import was recorded
    pub timestamp: String,
}

impl DeviceImport {
    pub fn new(
        source: ImportSource,
        api_key: impl Into<String>,
        tenant_id: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        let tenant_id = tenant_id.into();
        if api_key.trim().is_empty() {
            return Err(Error::validation("API Key is required"));
        }
        if tenant_id.trim().is_empty() {
            return Err(Error::validation("Tenant ID is required"));
        }
        Ok(Self {
            source,
            api_key,
            tenant_id,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

/// Mask a secret for display, keeping the last four characters
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}
