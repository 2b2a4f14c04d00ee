use crate::db::AccountsStorage;
use crate::error::DeskError;
use crate::service::password::SecretHasher;
use crate::types::account::Credentials;
use std::sync::Arc;
use tracing::{info, warn};

/// Registration and login over an injected [`AccountsStorage`].
#[derive(Clone)]
pub struct AccountService {
    storage: AccountsStorage,
    hasher: SecretHasher,
    /// Verified against when the identifier is unknown, so both failure paths cost one Argon2 run.
    dummy_hash: Arc<str>,
}

impl AccountService {
    pub async fn new(storage: AccountsStorage, hasher: SecretHasher) -> Result<Self, DeskError> {
        let dummy_hash = {
            let hasher = hasher.clone();
            tokio::task::spawn_blocking(move || hasher.hash("marketdesk-dummy-secret")).await??
        };
        Ok(Self {
            storage,
            hasher,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    pub fn storage(&self) -> &AccountsStorage {
        &self.storage
    }

    /// Hash the secret and insert the account. Fails with `DuplicateIdentifier` if taken.
    pub async fn register(&self, creds: &Credentials) -> Result<i64, DeskError> {
        let hash = self.hash_blocking(creds.secret().to_owned()).await?;
        let id = self.storage.insert(&creds.identifier, &hash).await?;
        info!(identifier = %creds.identifier, id, "account registered");
        Ok(id)
    }

    /// Returns the identifier on success. Unknown identifier and wrong secret both
    /// surface as `InvalidCredentials`.
    pub async fn authenticate(&self, creds: &Credentials) -> Result<String, DeskError> {
        let account = self.storage.get_by_identifier(&creds.identifier).await?;

        let stored_hash: Arc<str> = match &account {
            Some(row) => Arc::from(row.credential_hash.as_str()),
            None => self.dummy_hash.clone(),
        };

        let verified = self
            .verify_blocking(creds.secret().to_owned(), stored_hash)
            .await?;

        match account {
            Some(row) if verified => {
                info!(identifier = %row.identifier, "login succeeded");
                Ok(row.identifier)
            }
            _ => {
                warn!(identifier = %creds.identifier, "login rejected");
                Err(DeskError::InvalidCredentials)
            }
        }
    }

    async fn hash_blocking(&self, secret: String) -> Result<String, DeskError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&secret)).await?
    }

    async fn verify_blocking(&self, secret: String, stored_hash: Arc<str>) -> Result<bool, DeskError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &stored_hash)).await?
    }
}
