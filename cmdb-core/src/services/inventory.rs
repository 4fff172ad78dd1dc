//! Inventory service - configuration items, categories, audit trail, reports
//!
//! Until something is created, each list reads as the built-in sample
//! inventory. The first write persists the full list, so a delete-all-data
//! wipe brings the samples back.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::inventory::{
    AuditAction, AuditEntry, Category, CategoryColor, CiStatus, CiType, ConfigItem, Environment,
    NewConfigItem, Report,
};
use crate::domain::result::{Error, Result};
use crate::ports::{keys, KeyValueStore};

use super::auth::read_json;

/// First number handed out for `CI-<n>` identifiers
const FIRST_CI_NUMBER: u32 = 1001;

const REPORTS: &[Report] = &[
    Report {
        id: 1,
        title: "Monthly Asset Utilization",
        description: "Overview of asset usage and allocation across departments",
        date: "May 1, 2025",
    },
    Report {
        id: 2,
        title: "Maintenance Schedule",
        description: "Upcoming maintenance activities for all tracked assets",
        date: "April 28, 2025",
    },
    Report {
        id: 3,
        title: "Asset Lifecycle Analysis",
        description: "Analysis of asset depreciation and replacement forecasts",
        date: "April 25, 2025",
    },
];

fn sample_item(
    number: u32,
    name: &str,
    ci_type: CiType,
    status: CiStatus,
    owner: &str,
    environment: Environment,
    last_updated: &str,
) -> ConfigItem {
    ConfigItem {
        id: format!("CI-{}", number),
        name: name.to_string(),
        ci_type,
        status,
        owner: owner.to_string(),
        environment,
        last_updated: last_updated.to_string(),
    }
}

fn sample_items() -> Vec<ConfigItem> {
    use CiStatus::*;
    use CiType::*;
    use Environment::*;

    vec![
        sample_item(1001, "Web Server", Server, Active, "IT Infrastructure", Production, "2025-04-28"),
        sample_item(1002, "Database Server", Database, Active, "Database Team", Production, "2025-04-26"),
        sample_item(1003, "Employee Portal", Application, UnderMaintenance, "Internal Applications", Production, "2025-04-25"),
        sample_item(1004, "VPN Gateway", Network, Active, "Network Operations", Production, "2025-04-22"),
        sample_item(1005, "Customer Relationship Management", Application, Active, "Sales Operations", Production, "2025-04-20"),
        sample_item(1006, "File Storage System", Storage, Active, "Infrastructure Team", Production, "2025-04-18"),
        sample_item(1007, "Dev Environment Server", Server, Active, "Development Team", Development, "2025-04-14"),
        sample_item(1008, "QA Testing Database", Database, Active, "QA Team", Testing, "2025-04-13"),
        sample_item(1009, "Legacy Inventory System", Application, Retired, "Warehouse Operations", Production, "2025-02-20"),
    ]
}

fn sample_audit() -> Vec<AuditEntry> {
    let entry = |id: &str, ci_id: &str, ci_name: &str, action, user: &str, ts: &str, details: &str| {
        AuditEntry {
            id: id.to_string(),
            ci_id: ci_id.to_string(),
            ci_name: ci_name.to_string(),
            action,
            user: user.to_string(),
            timestamp: ts.to_string(),
            details: details.to_string(),
        }
    };

    vec![
        entry("audit-005", "CI-1001", "Web Server", AuditAction::Update, "admin@example.com", "2025-04-28T10:30:00Z", "Updated server specifications"),
        entry("audit-004", "CI-1003", "Employee Portal", AuditAction::Update, "john.smith@example.com", "2025-04-25T09:15:00Z", "Updated status to maintenance"),
        entry("audit-003", "CI-1007", "Dev Environment Server", AuditAction::Create, "emily.davis@example.com", "2025-04-14T13:25:00Z", "Provisioned new development server"),
        entry("audit-002", "CI-1008", "QA Testing Database", AuditAction::Create, "lisa.johnson@example.com", "2025-04-13T15:40:00Z", "Created new database configuration item"),
        entry("audit-001", "CI-1009", "Legacy Inventory System", AuditAction::Update, "mike.williams@example.com", "2025-02-20T08:30:00Z", "Changed status to retired"),
    ]
}

fn sample_categories() -> Vec<Category> {
    let category = |id, name: &str, description: &str, item_count, color| Category {
        id,
        name: name.to_string(),
        description: description.to_string(),
        item_count,
        color,
    };

    vec![
        category(1, "Hardware", "Physical equipment including servers, desktops, and networking devices", 127, CategoryColor::Blue),
        category(2, "Software", "Applications, operating systems, and middleware", 94, CategoryColor::Green),
        category(3, "Network", "Routers, switches, and connectivity equipment", 53, CategoryColor::Amber),
        category(4, "Cloud Services", "Virtual machines, storage, and cloud-based resources", 86, CategoryColor::Purple),
        category(5, "IoT Devices", "Connected devices and sensors", 42, CategoryColor::Rose),
    ]
}

/// Dashboard metric card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: usize,
}

/// How the distribution chart groups items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakdown {
    Type,
    Environment,
}

impl std::str::FromStr for Breakdown {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "type" => Ok(Self::Type),
            "environment" => Ok(Self::Environment),
            other => Err(Error::validation(format!(
                "Unknown breakdown '{}'. Expected type or environment",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub name: &'static str,
    pub value: usize,
}

/// Everything the dashboard view shows
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub metrics: Vec<Metric>,
    pub recent_changes: Vec<AuditEntry>,
    pub breakdown: Breakdown,
    pub distribution: Vec<Slice>,
}

/// Reads and writes the inventory lists in the key-value store
pub struct InventoryService {
    store: Arc<dyn KeyValueStore>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // === Configuration items ===

    /// All items, most recently created first
    pub fn config_items(&self) -> Result<Vec<ConfigItem>> {
        Ok(read_json(self.store.as_ref(), keys::CONFIGURATION_ITEMS)?.unwrap_or_else(sample_items))
    }

    /// Items whose name, type or ID contains `term`; an empty term matches all
    pub fn search(&self, term: &str) -> Result<Vec<ConfigItem>> {
        let items = self.config_items()?;
        let term = term.trim();
        if term.is_empty() {
            return Ok(items);
        }
        Ok(items.into_iter().filter(|ci| ci.matches(term)).collect())
    }

    /// Create an item from the form and record a `create` audit entry by `actor`
    pub fn create_config_item(&self, form: NewConfigItem, actor: &str) -> Result<ConfigItem> {
        self.create_config_item_at(form, actor, Utc::now())
    }

    fn create_config_item_at(
        &self,
        form: NewConfigItem,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<ConfigItem> {
        form.validate()?;
        let mut items = self.config_items()?;
        let number = items
            .iter()
            .filter_map(ConfigItem::number)
            .max()
            .map_or(FIRST_CI_NUMBER, |n| n + 1);

        let item = ConfigItem {
            id: format!("CI-{}", number),
            name: form.name.trim().to_string(),
            ci_type: form.ci_type,
            status: form.status,
            owner: form.owner.trim().to_string(),
            environment: form.environment,
            last_updated: at.format("%Y-%m-%d").to_string(),
        };

        let mut audit = self.audit_log()?;
        let audit_number = audit
            .iter()
            .filter_map(|a| a.id.strip_prefix("audit-")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        audit.insert(
            0,
            AuditEntry::new(
                format!("audit-{:03}", audit_number),
                &item,
                AuditAction::Create,
                actor,
                at,
                format!("Created new {} configuration item", item.ci_type.label().to_lowercase()),
            ),
        );

        items.insert(0, item.clone());
        self.write(keys::CONFIGURATION_ITEMS, &items)?;
        self.write(keys::AUDIT_LOG, &audit)?;

        tracing::info!(id = %item.id, name = %item.name, actor, "Created configuration item");
        Ok(item)
    }

    // === Audit trail ===

    /// Changes, newest first
    pub fn audit_log(&self) -> Result<Vec<AuditEntry>> {
        let mut entries: Vec<AuditEntry> =
            read_json(self.store.as_ref(), keys::AUDIT_LOG)?.unwrap_or_else(sample_audit);
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    // === Dashboard ===

    pub fn metrics(&self) -> Result<Vec<Metric>> {
        let items = self.config_items()?;
        let count = |status: CiStatus| items.iter().filter(|ci| ci.status == status).count();

        Ok(vec![
            Metric { label: "Total CIs", value: items.len() },
            Metric { label: "Active CIs", value: count(CiStatus::Active) },
            Metric { label: "In Maintenance", value: count(CiStatus::UnderMaintenance) },
            Metric { label: "Retired", value: count(CiStatus::Retired) },
        ])
    }

    /// Item counts per type or environment, empty groups left out
    pub fn distribution(&self, breakdown: Breakdown) -> Result<Vec<Slice>> {
        let items = self.config_items()?;
        let slices = match breakdown {
            Breakdown::Type => {
                let mut counts: HashMap<CiType, usize> = HashMap::new();
                for ci in &items {
                    *counts.entry(ci.ci_type).or_default() += 1;
                }
                CiType::ALL
                    .into_iter()
                    .map(|t| Slice { name: t.label(), value: counts.get(&t).copied().unwrap_or(0) })
                    .collect::<Vec<_>>()
            }
            Breakdown::Environment => {
                let mut counts: HashMap<Environment, usize> = HashMap::new();
                for ci in &items {
                    *counts.entry(ci.environment).or_default() += 1;
                }
                Environment::ALL
                    .into_iter()
                    .map(|e| Slice { name: e.label(), value: counts.get(&e).copied().unwrap_or(0) })
                    .collect::<Vec<_>>()
            }
        };
        Ok(slices.into_iter().filter(|s| s.value > 0).collect())
    }

    pub fn dashboard(&self, breakdown: Breakdown, recent: usize) -> Result<Dashboard> {
        let mut recent_changes = self.audit_log()?;
        recent_changes.truncate(recent);
        Ok(Dashboard {
            metrics: self.metrics()?,
            recent_changes,
            breakdown,
            distribution: self.distribution(breakdown)?,
        })
    }

    // === Categories ===

    pub fn categories(&self) -> Result<Vec<Category>> {
        Ok(read_json(self.store.as_ref(), keys::CATEGORIES)?.unwrap_or_else(sample_categories))
    }

    /// Create an empty category
    pub fn create_category(
        &self,
        name: &str,
        description: &str,
        color: CategoryColor,
    ) -> Result<Category> {
        let mut categories = self.categories()?;
        if categories.iter().any(|c| c.name.eq_ignore_ascii_case(name.trim())) {
            return Err(Error::validation(format!("Category '{}' already exists", name.trim())));
        }
        let id = categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let category = Category::new(id, name.trim(), description.trim(), color)?;

        categories.push(category.clone());
        self.write(keys::CATEGORIES, &categories)?;
        tracing::info!(id, name = %category.name, "Created category");
        Ok(category)
    }

    pub fn delete_category(&self, id: u64) -> Result<Category> {
        let mut categories = self.categories()?;
        let Some(index) = categories.iter().position(|c| c.id == id) else {
            return Err(Error::not_found(format!("category {}", id)));
        };
        let removed = categories.remove(index);
        self.write(keys::CATEGORIES, &categories)?;
        tracing::info!(id, name = %removed.name, "Deleted category");
        Ok(removed)
    }

    // === Reports ===

    pub fn reports(&self) -> &'static [Report] {
        REPORTS
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use chrono::TimeZone;

    fn service() -> (Arc<MemoryStore>, InventoryService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), InventoryService::new(store))
    }

    fn form(name: &str) -> NewConfigItem {
        NewConfigItem {
            name: name.to_string(),
            ci_type: CiType::Server,
            status: CiStatus::Active,
            owner: "Messaging Team".to_string(),
            environment: Environment::Staging,
        }
    }

    #[test]
    fn test_sample_inventory_until_first_write() {
        let (store, inventory) = service();
        assert_eq!(inventory.config_items().unwrap().len(), 9);
        assert_eq!(inventory.categories().unwrap().len(), 5);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_search() {
        let (_store, inventory) = service();
        let names: Vec<_> = inventory
            .search("server")
            .unwrap()
            .into_iter()
            .map(|ci| ci.name)
            .collect();
        assert_eq!(names, vec!["Web Server", "Database Server", "Dev Environment Server"]);

        assert_eq!(inventory.search("ci-1004").unwrap()[0].name, "VPN Gateway");
        assert_eq!(inventory.search("  ").unwrap().len(), 9);
        assert!(inventory.search("mainframe").unwrap().is_empty());
    }

    #[test]
    fn test_create_config_item_prepends_and_audits() {
        let (store, inventory) = service();
        let at = Utc.with_ymd_and_hms(2025, 5, 2, 8, 0, 0).unwrap();

        let item = inventory
            .create_config_item_at(form(" Mail Relay "), "admin@x.com", at)
            .unwrap();
        assert_eq!(item.id, "CI-1010");
        assert_eq!(item.name, "Mail Relay");
        assert_eq!(item.last_updated, "2025-05-02");

        let items = inventory.config_items().unwrap();
        assert_eq!(items.len(), 10);
        assert_eq!(items[0], item);
        assert!(store.get(keys::CONFIGURATION_ITEMS).unwrap().is_some());

        let audit = inventory.audit_log().unwrap();
        assert_eq!(audit[0].id, "audit-006");
        assert_eq!(audit[0].action, AuditAction::Create);
        assert_eq!(audit[0].user, "admin@x.com");
        assert_eq!(audit[0].ci_id, "CI-1010");
        assert_eq!(audit[0].timestamp, "2025-05-02T08:00:00Z");
    }

    #[test]
    fn test_invalid_form_writes_nothing() {
        let (store, inventory) = service();
        assert!(inventory.create_config_item(form("M"), "admin@x.com").is_err());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_metrics_follow_inventory() {
        let (_store, inventory) = service();
        let metrics = inventory.metrics().unwrap();
        let values: Vec<_> = metrics.iter().map(|m| (m.label, m.value)).collect();
        assert_eq!(
            values,
            vec![("Total CIs", 9), ("Active CIs", 7), ("In Maintenance", 1), ("Retired", 1)]
        );

        let mut retiring = form("Old Fax Gateway");
        retiring.status = CiStatus::Retired;
        inventory.create_config_item(retiring, "admin@x.com").unwrap();
        assert_eq!(inventory.metrics().unwrap()[3].value, 2);
    }

    #[test]
    fn test_distribution_skips_empty_groups() {
        let (_store, inventory) = service();
        let by_env = inventory.distribution(Breakdown::Environment).unwrap();
        assert_eq!(
            by_env,
            vec![
                Slice { name: "Production", value: 7 },
                Slice { name: "Development", value: 1 },
                Slice { name: "Testing", value: 1 },
            ]
        );

        let by_type = inventory.distribution(Breakdown::Type).unwrap();
        assert!(by_type.iter().all(|s| s.name != "Other"));
        assert_eq!(by_type.iter().map(|s| s.value).sum::<usize>(), 9);
    }

    #[test]
    fn test_dashboard_limits_recent_changes() {
        let (_store, inventory) = service();
        let dashboard = inventory.dashboard(Breakdown::Type, 3).unwrap();
        assert_eq!(dashboard.recent_changes.len(), 3);
        assert_eq!(dashboard.recent_changes[0].id, "audit-005");
        assert_eq!(dashboard.metrics.len(), 4);
    }

    #[test]
    fn test_category_create_and_delete() {
        let (_store, inventory) = service();
        let created = inventory
            .create_category("Printers", "Shared office printers and scanners", CategoryColor::Rose)
            .unwrap();
        assert_eq!(created.id, 6);
        assert_eq!(created.item_count, 0);

        let err = inventory
            .create_category("hardware", "Duplicate of the hardware group", CategoryColor::Blue)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert_eq!(inventory.delete_category(6).unwrap().name, "Printers");
        assert!(matches!(inventory.delete_category(6), Err(Error::NotFound(_))));
        assert_eq!(inventory.categories().unwrap().len(), 5);
    }

    #[test]
    fn test_reports_catalogue() {
        let (_store, inventory) = service();
        let titles: Vec<_> = inventory.reports().iter().map(|r| r.title).collect();
        assert_eq!(
            titles,
            vec!["Monthly Asset Utilization", "Maintenance Schedule", "Asset Lifecycle Analysis"]
        );
    }
}
