use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::middleware::credentials::CredentialsBody;
use crate::types::account::{HealthResponse, LoginResponse, RegisterResponse};
use crate::{DeskError, router::DeskState};

/// POST /api/register -> 201 on success; the secret is never echoed back.
pub async fn register_handler(
    State(state): State<DeskState>,
    CredentialsBody(creds): CredentialsBody,
) -> Result<impl IntoResponse, DeskError> {
    state.accounts.register(&creds).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "account registered",
        }),
    ))
}

/// POST /api/login -> 200 `{identifier}`.
pub async fn login_handler(
    State(state): State<DeskState>,
    CredentialsBody(creds): CredentialsBody,
) -> Result<Json<LoginResponse>, DeskError> {
    let identifier = state.accounts.authenticate(&creds).await?;
    Ok(Json(LoginResponse { identifier }))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
