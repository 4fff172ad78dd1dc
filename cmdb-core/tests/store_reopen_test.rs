//! Store reopen tests
//!
//! Each CLI invocation opens the store file afresh, so state written by one
//! process must be visible to the next and migrations must stay idempotent.
//!
//! Run with: cargo test --test store_reopen_test -- --nocapture

use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;

use cmdb_core::adapters::duckdb::DuckDbStore;
use cmdb_core::config::Config;
use cmdb_core::ports::{keys, KeyValueStore};
use cmdb_core::{CmdbContext, Role};

#[test]
fn test_sequential_connections() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test_sequential.duckdb");

    for i in 0..5 {
        let start = Instant::now();
        let store = DuckDbStore::open(&db_path).unwrap();
        let applied = store.run_migrations().unwrap();
        assert!(applied.applied.is_empty(), "migrations re-applied on open {}", i);
        store.set("counter", &i.to_string()).unwrap();
        println!("Connection {}: opened in {:?}", i, start.elapsed());
    }

    let store = DuckDbStore::open(&db_path).unwrap();
    assert_eq!(store.get("counter").unwrap().as_deref(), Some("4"));
}

#[test]
fn test_context_reopen_keeps_identity_and_settings() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut ctx = CmdbContext::new(temp_dir.path()).unwrap();
        ctx.auth.register("root@example.com", Role::Admin).unwrap();
        ctx.auth.login("root@example.com").unwrap();
        ctx.auth.add_user("ops@example.com", Role::User).unwrap();
    }

    let ctx = CmdbContext::new(temp_dir.path()).unwrap();
    assert_eq!(ctx.auth.users().len(), 2);
    assert!(ctx.auth.has_role(Role::Admin));
    assert_eq!(ctx.auth.session().user_email(), Some("root@example.com"));
}

#[test]
fn test_configured_store_file_is_used() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        store_file: "console.duckdb".to_string(),
        ..Config::default()
    };
    config.save(temp_dir.path()).unwrap();

    {
        let mut ctx = CmdbContext::new(temp_dir.path()).unwrap();
        ctx.auth.register("root@example.com", Role::Admin).unwrap();
    }

    assert!(temp_dir.path().join("console.duckdb").exists());
    assert!(!temp_dir.path().join("cmdb.duckdb").exists());

    let store: Arc<dyn KeyValueStore> =
        Arc::new(DuckDbStore::open(&temp_dir.path().join("console.duckdb")).unwrap());
    assert!(store.get(keys::USERS).unwrap().is_some());
}

#[test]
fn test_inventory_survives_restart_and_resets_on_wipe() {
    use cmdb_core::domain::inventory::{CiStatus, CiType, Environment, NewConfigItem};

    let temp_dir = TempDir::new().unwrap();
    let created = {
        let mut ctx = CmdbContext::new(temp_dir.path()).unwrap();
        ctx.auth.register("root@example.com", Role::Admin).unwrap();
        ctx.auth.login("root@example.com").unwrap();
        let form = NewConfigItem {
            name: "Mail Relay".to_string(),
            ci_type: CiType::Server,
            status: CiStatus::Active,
            owner: "Messaging Team".to_string(),
            environment: Environment::Production,
        };
        ctx.inventory.create_config_item(form, "root@example.com").unwrap()
    };

    let mut ctx = CmdbContext::new(temp_dir.path()).unwrap();
    assert_eq!(ctx.inventory.config_items().unwrap()[0], created);
    assert_eq!(ctx.inventory.audit_log().unwrap()[0].user, "root@example.com");

    let wiped = ctx.auth.delete_all_data().unwrap();
    assert_eq!(wiped, vec![keys::AUDIT_LOG, keys::CONFIGURATION_ITEMS]);
    assert!(ctx.inventory.search("Mail Relay").unwrap().is_empty());
    assert!(ctx.auth.session().is_logged_in());
}
