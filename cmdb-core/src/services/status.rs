//! Status summary - users, session and saved settings at a glance

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::Role;

use super::auth::AuthService;
use super::settings::SettingsService;

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub first_run: bool,
    pub total_users: usize,
    pub admin_users: usize,
    pub session: SessionSummary,
    pub database_connection: Option<String>,
    pub device_imports: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub logged_in: bool,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// Collect the overall status
pub fn get_status(auth: &AuthService, settings: &SettingsService) -> Result<StatusSummary> {
    let current = auth.current_user();
    let connection = settings.database_connection()?;

    Ok(StatusSummary {
        first_run: auth.is_first_run(),
        total_users: auth.users().len(),
        admin_users: auth.users().count_role(Role::Admin),
        session: SessionSummary {
            logged_in: auth.session().is_logged_in(),
            email: current.map(|u| u.email.clone()),
            role: current.map(|u| u.role),
        },
        database_connection: connection
            .map(|c| format!("{} at {}/{}", c.db_type.label(), c.address(), c.database)),
        device_imports: settings.device_imports()?.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::memory::MemoryStore;
    use crate::domain::{DatabaseConnection, DatabaseType};

    #[test]
    fn test_status_reflects_state() {
        let store = Arc::new(MemoryStore::new());
        let mut auth = AuthService::load(store.clone()).unwrap();
        let settings = SettingsService::new(store);

        let status = get_status(&auth, &settings).unwrap();
        assert!(status.first_run);
        assert!(!status.session.logged_in);

        auth.register("root@x.com", Role::Admin).unwrap();
        auth.add_user("u@x.com", Role::User).unwrap();
        auth.login("root@x.com").unwrap();
        settings
            .save_database_connection(&DatabaseConnection {
                db_type: DatabaseType::Postgres,
                host: "db".into(),
                port: "5432".into(),
                username: "cmdb".into(),
                password: "pw".into(),
                database: "assets".into(),
            })
            .unwrap();

        let status = get_status(&auth, &settings).unwrap();
        assert!(!status.first_run);
        assert_eq!(status.total_users, 2);
        assert_eq!(status.admin_users, 1);
        assert_eq!(status.session.role, Some(Role::Admin));
        assert_eq!(
            status.database_connection.as_deref(),
            Some("PostgreSQL at db:5432/assets")
        );
        assert_eq!(status.device_imports, 0);
    }
}
