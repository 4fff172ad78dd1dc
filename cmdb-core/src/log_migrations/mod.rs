//! Event log migrations - embedded SQL files
//!
//! Kept separate from the store migrations because the event log lives in
//! its own database file (logs.duckdb).

/// All log migrations, embedded at compile time.
/// Format: (filename, sql_content)
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
