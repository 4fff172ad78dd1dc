//! Settings service - saved database connection and device import records

use std::sync::Arc;

use chrono::Utc;

use crate::domain::result::{Error, Result};
use crate::domain::{DatabaseConnection, DeviceImport, ImportSource};
use crate::ports::{keys, KeyValueStore};

use super::auth::read_json;

/// Persists the settings forms to the key-value store
pub struct SettingsService {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // === Database connection ===

    /// The saved connection, if any
    pub fn database_connection(&self) -> Result<Option<DatabaseConnection>> {
        read_json(self.store.as_ref(), keys::DATABASE_CONNECTION)
    }

    /// Validate and save a connection, replacing any previous one
    pub fn save_database_connection(&self, connection: &DatabaseConnection) -> Result<()> {
        connection.validate()?;
        let json = serde_json::to_string(connection)?;
        self.store.set(keys::DATABASE_CONNECTION, &json)?;
        tracing::info!(
            db_type = connection.db_type.label(),
            address = %connection.address(),
            "Saved database connection"
        );
        Ok(())
    }

    /// Delete the saved connection; returns whether one existed
    pub fn delete_database_connection(&self) -> Result<bool> {
        let existed = self.store.get(keys::DATABASE_CONNECTION)?.is_some();
        self.store.delete(keys::DATABASE_CONNECTION)?;
        Ok(existed)
    }

    // === Device imports ===

    /// Recorded imports, oldest first
    pub fn device_imports(&self) -> Result<Vec<DeviceImport>> {
        Ok(read_json(self.store.as_ref(), keys::DEVICE_IMPORTS)?.unwrap_or_default())
    }

    /// Record an import from `source`, stamped with the current time
    pub fn add_device_import(
        &self,
        source: ImportSource,
        api_key: &str,
        tenant_id: &str,
    ) -> Result<DeviceImport> {
        let import = DeviceImport::new(source, api_key, tenant_id, Utc::now())?;
        let mut imports = self.device_imports()?;
        imports.push(import.clone());
        self.write_imports(&imports)?;
        tracing::info!(source = import.source.label(), "Recorded device import");
        Ok(import)
    }

    /// Delete the import at `index` (0-based, oldest first)
    pub fn delete_device_import(&self, index: usize) -> Result<DeviceImport> {
        let mut imports = self.device_imports()?;
        if index >= imports.len() {
            return Err(Error::not_found(format!(
                "device import #{} (have {})",
                index,
                imports.len()
            )));
        }
        let removed = imports.remove(index);
        self.write_imports(&imports)?;
        Ok(removed)
    }

    fn write_imports(&self, imports: &[DeviceImport]) -> Result<()> {
        let json = serde_json::to_string(imports)?;
        self.store.set(keys::DEVICE_IMPORTS, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::DatabaseType;

    fn service() -> (Arc<MemoryStore>, SettingsService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), SettingsService::new(store))
    }

    fn connection() -> DatabaseConnection {
        DatabaseConnection {
            db_type: DatabaseType::Mysql,
            host: "localhost".into(),
            port: "3306".into(),
            username: "root".into(),
            password: "secret".into(),
            database: "cmdb".into(),
        }
    }

    #[test]
    fn test_connection_save_load_delete() {
        let (_store, settings) = service();
        assert_eq!(settings.database_connection().unwrap(), None);

        settings.save_database_connection(&connection()).unwrap();
        assert_eq!(settings.database_connection().unwrap(), Some(connection()));

        assert!(settings.delete_database_connection().unwrap());
        assert!(!settings.delete_database_connection().unwrap());
        assert_eq!(settings.database_connection().unwrap(), None);
    }

    #[test]
    fn test_invalid_connection_not_saved() {
        let (store, settings) = service();
        let mut bad = connection();
        bad.host = " ".into();
        assert!(matches!(
            settings.save_database_connection(&bad),
            Err(Error::Validation(_))
        ));
        assert_eq!(store.get(keys::DATABASE_CONNECTION).unwrap(), None);
    }

    #[test]
    fn test_malformed_connection_reads_as_none() {
        let (store, settings) = service();
        store.set(keys::DATABASE_CONNECTION, "not json").unwrap();
        assert_eq!(settings.database_connection().unwrap(), None);
    }

    #[test]
    fn test_imports_append_and_delete_by_index() {
        let (_store, settings) = service();
        settings.add_device_import(ImportSource::Azure, "k1", "t1").unwrap();
        settings.add_device_import(ImportSource::Intune, "k2", "t2").unwrap();
        settings.add_device_import(ImportSource::Azure, "k3", "t3").unwrap();

        let removed = settings.delete_device_import(1).unwrap();
        assert_eq!(removed.api_key, "k2");

        let remaining: Vec<_> = settings
            .device_imports()
            .unwrap()
            .into_iter()
            .map(|i| i.tenant_id)
            .collect();
        assert_eq!(remaining, vec!["t1", "t3"]);

        assert!(matches!(
            settings.delete_device_import(5),
            Err(Error::NotFound(_))
        ));
    }
}
