//! SQL DDL for initializing the account storage.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `identifier` UNIQUE, so duplicate registrations fail inside the insert itself
/// - `credential_hash` in PHC string format; plaintext secrets never reach this table
/// - `created_at` RFC3339 text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier TEXT NOT NULL UNIQUE,
    credential_hash TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339
);
"#;
