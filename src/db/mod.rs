//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the account storage handle and pool construction

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::DbAccount;
pub use schema::SQLITE_INIT;
pub use sqlite::{AccountsStorage, SqlitePool, connect};
