//! Integration tests for the auth flow over a real DuckDB store
//!
//! Each test opens a fresh store file in a temp directory and reopens it
//! where a "process restart" matters.
//!
//! Run with: cargo test --test auth_flow_tests -- --nocapture

use std::sync::Arc;

use tempfile::TempDir;

use cmdb_core::adapters::duckdb::DuckDbStore;
use cmdb_core::adapters::memory::MemoryStore;
use cmdb_core::config::Config;
use cmdb_core::ports::{keys, KeyValueStore};
use cmdb_core::services::{AuthService, Navigation};
use cmdb_core::{CmdbContext, Error, Role, Route, Session, User};

// ============================================================================
// Test Helpers
// ============================================================================

/// Open a DuckDB-backed context in a temp dir
fn open_context(temp_dir: &TempDir) -> CmdbContext {
    CmdbContext::new(temp_dir.path()).expect("Failed to open context")
}

/// Context with a registered admin who is signed in
fn admin_context(temp_dir: &TempDir) -> CmdbContext {
    let mut ctx = open_context(temp_dir);
    ctx.auth.register("admin@x.com", Role::Admin).unwrap();
    ctx.auth.login("admin@x.com").unwrap();
    ctx
}

// ============================================================================
// Identity store laws
// ============================================================================

#[test]
fn test_add_user_sequence_never_duplicates_email() {
    let store = Arc::new(MemoryStore::new());
    let mut auth = AuthService::load(store).unwrap();

    let emails = ["a@x.com", "b@x.com", "a@x.com", "c@x.com", "b@x.com", "a@x.com"];
    for (i, email) in emails.iter().enumerate() {
        let role = if i % 2 == 0 { Role::User } else { Role::Admin };
        auth.add_user(email, role).unwrap();
    }

    let mut seen: Vec<&str> = auth.users().iter().map(|u| u.email.as_str()).collect();
    let total = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), total);
    assert_eq!(total, 3);
}

#[test]
fn test_register_always_leaves_exactly_one_user() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = open_context(&temp_dir);

    for prior in 0..4 {
        for i in 0..prior {
            ctx.auth.add_user(&format!("u{}@x.com", i), Role::User).unwrap();
        }
        ctx.auth.register("owner@x.com", Role::Admin).unwrap();
        assert_eq!(ctx.auth.users().len(), 1);
    }
}

#[test]
fn test_duplicate_add_keeps_first_role() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = admin_context(&temp_dir);

    assert!(ctx.auth.add_user("a@x.com", Role::User).unwrap());
    assert!(!ctx.auth.add_user("a@x.com", Role::Admin).unwrap());

    let matching: Vec<&User> = ctx.auth.users().iter().filter(|u| u.email == "a@x.com").collect();
    assert_eq!(matching, vec![&User::new("a@x.com", Role::User)]);
}

// ============================================================================
// Session laws
// ============================================================================

#[test]
fn test_login_logout_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = open_context(&temp_dir);
    ctx.auth.register("a@x.com", Role::User).unwrap();
    let before = ctx.auth.session().clone();

    ctx.auth.login("a@x.com").unwrap();
    ctx.auth.logout().unwrap();

    assert_eq!(ctx.auth.session(), &before);
    assert_eq!(ctx.auth.session(), &Session::logged_out());
    assert!(ctx.auth.current_user().is_none());
}

#[test]
fn test_has_role_false_without_user() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = open_context(&temp_dir);
    assert!(!ctx.auth.has_role(Role::Admin));
    assert!(!ctx.auth.has_role(Role::User));
}

#[test]
fn test_unknown_login_leaves_session_logged_out() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = open_context(&temp_dir);
    ctx.auth.register("a@x.com", Role::Admin).unwrap();

    let result = ctx.auth.login("ghost@x.com");
    assert!(matches!(result, Err(Error::UnknownUser(_))));
    assert!(!ctx.auth.session().is_logged_in());
    assert_eq!(ctx.store.get(keys::IS_LOGGED_IN).unwrap(), None);
}

#[test]
fn test_unchecked_self_removal_keeps_session() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = admin_context(&temp_dir);
    ctx.auth.add_user("b@x.com", Role::User).unwrap();

    assert!(ctx.auth.remove_user_unchecked("admin@x.com").unwrap());
    assert!(!ctx.auth.users().contains("admin@x.com"));
    assert!(ctx.auth.session().is_logged_in());
    assert_eq!(ctx.auth.session().user_email(), Some("admin@x.com"));
}

#[test]
fn test_guarded_self_removal_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = admin_context(&temp_dir);

    assert!(matches!(
        ctx.auth.remove_user("admin@x.com"),
        Err(Error::SelfRemoval(_))
    ));
    assert!(ctx.auth.users().contains("admin@x.com"));
}

#[test]
fn test_session_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut ctx = admin_context(&temp_dir);
        ctx.auth.add_user("b@x.com", Role::User).unwrap();
    }

    let ctx = open_context(&temp_dir);
    assert_eq!(ctx.auth.users().len(), 2);
    assert_eq!(ctx.auth.current_user(), Some(&User::new("admin@x.com", Role::Admin)));
    assert!(ctx.auth.has_role(Role::Admin));
}

#[test]
fn test_logout_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut ctx = admin_context(&temp_dir);
        ctx.auth.logout().unwrap();
    }

    let ctx = open_context(&temp_dir);
    assert!(!ctx.auth.session().is_logged_in());
    assert_eq!(ctx.auth.users().len(), 1);
}

// ============================================================================
// Delete all data
// ============================================================================

#[test]
fn test_delete_all_data_preserves_auth_keys_only() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = admin_context(&temp_dir);
    ctx.auth.add_user("b@x.com", Role::User).unwrap();
    ctx.settings
        .add_device_import("azure".parse().unwrap(), "key", "tenant")
        .unwrap();
    ctx.store.set("reportFilters", r#"{"range":"30d"}"#).unwrap();

    let before: Vec<Option<String>> = keys::PRESERVED
        .iter()
        .map(|k| ctx.store.get(k).unwrap())
        .collect();

    ctx.auth.delete_all_data().unwrap();

    let after: Vec<Option<String>> = keys::PRESERVED
        .iter()
        .map(|k| ctx.store.get(k).unwrap())
        .collect();
    assert_eq!(before, after);

    let mut remaining = ctx.store.list().unwrap();
    remaining.sort();
    let mut expected: Vec<String> = keys::PRESERVED.iter().map(|k| k.to_string()).collect();
    expected.sort();
    assert_eq!(remaining, expected);
    assert!(ctx.settings.device_imports().unwrap().is_empty());
}

#[test]
fn test_delete_all_data_when_logged_out_keeps_users() {
    let store = Arc::new(DuckDbStore::open_in_memory().unwrap());
    let mut ctx = CmdbContext::with_store(Config::default(), store).unwrap();
    ctx.auth.register("a@x.com", Role::Admin).unwrap();
    ctx.store.set(keys::DATABASE_CONNECTION, "{}").unwrap();

    let wiped = ctx.auth.delete_all_data().unwrap();
    assert_eq!(wiped, vec![keys::DATABASE_CONNECTION.to_string()]);
    assert_eq!(ctx.store.list().unwrap(), vec![keys::USERS.to_string()]);
}

// ============================================================================
// Guards
// ============================================================================

#[test]
fn test_fresh_install_never_reaches_protected_views() {
    let ctx = CmdbContext::in_memory().unwrap();
    for route in Route::PROTECTED {
        let nav = ctx.navigate(route.path());
        assert!(nav.is_redirect(), "{:?} should redirect", route);
    }
    assert_eq!(ctx.navigate("/").rendered(), Route::Landing);
    assert_eq!(ctx.navigate("/register").rendered(), Route::Register);
}

#[test]
fn test_signed_out_redirects_to_login_with_origin() {
    let mut ctx = CmdbContext::in_memory().unwrap();
    ctx.auth.register("a@x.com", Role::User).unwrap();

    assert_eq!(
        ctx.navigate("/settings"),
        Navigation::Redirect {
            to: Route::Login,
            from: Some("/settings".to_string()),
        }
    );

    ctx.auth.login("a@x.com").unwrap();
    assert_eq!(
        ctx.navigate("/settings"),
        Navigation::Allow { route: Route::Settings }
    );
}

#[test]
fn test_first_run_guard_applies_even_with_session() {
    let mut ctx = CmdbContext::in_memory().unwrap();
    ctx.auth.register("a@x.com", Role::Admin).unwrap();
    ctx.auth.login("a@x.com").unwrap();
    ctx.auth.remove_user_unchecked("a@x.com").unwrap();

    assert_eq!(
        ctx.navigate("/dashboard"),
        Navigation::Redirect { to: Route::Register, from: None }
    );
}

#[test]
fn test_unknown_path_renders_not_found() {
    let ctx = CmdbContext::in_memory().unwrap();
    assert_eq!(ctx.navigate("/does-not-exist").rendered(), Route::NotFound);
}
