use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw JSON body of `/api/register` and `/api/login`.
/// `username` / `password` are accepted for older clients.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsPayload {
    #[serde(default, alias = "username")]
    pub identifier: Option<Value>,
    #[serde(default, alias = "password")]
    pub secret: Option<Value>,
}

/// Validated identifier/secret pair.
#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub identifier: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
