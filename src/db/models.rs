use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One row of the `accounts` table.
#[derive(Clone, PartialEq, FromRow)]
pub struct DbAccount {
    pub id: i64,
    pub identifier: String,
    pub credential_hash: String,
    pub created_at: DateTime<Utc>,
}

// Debug output never includes the hash.
impl std::fmt::Debug for DbAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbAccount")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("credential_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}
