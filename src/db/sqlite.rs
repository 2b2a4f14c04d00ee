use crate::db::models::DbAccount;
use crate::db::schema::SQLITE_INIT;
use crate::error::DeskError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the SQLite database at `database_url` and make sure the schema exists.
pub async fn connect(database_url: &str) -> Result<AccountsStorage, DeskError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    let storage = AccountsStorage::new(pool);
    storage.init_schema().await?;
    debug!(database_url, "account storage connected");
    Ok(storage)
}

#[derive(Clone)]
pub struct AccountsStorage {
    pool: SqlitePool,
}

impl AccountsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), DeskError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a new account. Returns the row id.
    ///
    /// Uniqueness is decided by the `UNIQUE(identifier)` constraint during the insert,
    /// so two concurrent registrations of one identifier cannot both succeed.
    pub async fn insert(&self, identifier: &str, credential_hash: &str) -> Result<i64, DeskError> {
        let created_at = Utc::now().to_rfc3339();
        let outcome = sqlx::query(
            "INSERT INTO accounts (identifier, credential_hash, created_at) VALUES (?, ?, ?)",
        )
        .bind(identifier)
        .bind(credential_hash)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match outcome {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DeskError::DuplicateIdentifier)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_by_identifier(&self, identifier: &str) -> Result<Option<DbAccount>, DeskError> {
        let row = sqlx::query(
            r#"SELECT id, identifier, credential_hash, created_at
               FROM accounts WHERE identifier = ?"#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn count(&self) -> Result<i64, DeskError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    fn row_to_model(row: SqliteRow) -> Result<DbAccount, DeskError> {
        let id: i64 = row.try_get("id")?;
        let identifier: String = row.try_get("identifier")?;
        let credential_hash: String = row.try_get("credential_hash")?;
        let created_at_str: String = row.try_get("created_at")?;

        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(DbAccount {
            id,
            identifier,
            credential_hash,
            created_at,
        })
    }
}
