use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::handlers::accounts::{health_handler, login_handler, register_handler};
use crate::service::AccountService;

/// Shared state handed to every handler. Holds the injected account service; there is
/// no process-wide database handle.
#[derive(Clone)]
pub struct DeskState {
    pub accounts: AccountService,
}

impl DeskState {
    pub fn new(accounts: AccountService) -> Self {
        Self { accounts }
    }
}

pub fn desk_router(state: DeskState, body_limit: usize) -> Router {
    Router::new()
        .route("/api/register", post(register_handler))
        .route("/api/login", post(login_handler))
        .route("/healthz", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
