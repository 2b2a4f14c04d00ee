use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use marketdesk::config::HashingConfig;
use marketdesk::db::{self, AccountsStorage};
use marketdesk::router::{DeskState, desk_router};
use marketdesk::{AccountService, SecretHasher};

const BODY_LIMIT: usize = 64 * 1024;

struct TestApp {
    app: Router,
    storage: AccountsStorage,
    path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

async fn spawn_app(tag: &str) -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut path = std::env::temp_dir();
    path.push(format!(
        "marketdesk-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", path.display());
    let storage = db::connect(&database_url)
        .await
        .expect("failed to open sqlite");

    let hashing = HashingConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    };
    let hasher = SecretHasher::new(&hashing).expect("invalid hashing params");
    let accounts = AccountService::new(storage.clone(), hasher)
        .await
        .expect("failed to build account service");

    TestApp {
        app: desk_router(DeskState::new(accounts), BODY_LIMIT),
        storage,
        path,
    }
}

async fn post_json(app: &Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(body.into())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn register_then_login_sequence() {
    let t = spawn_app("sequence").await;
    let alice = r#"{"identifier":"alice","secret":"pw1"}"#;

    let (status, body) = post_json(&t.app, "/api/register", alice).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "account registered");

    let (status, body) = post_json(
        &t.app,
        "/api/register",
        r#"{"identifier":"alice","secret":"other"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "DUPLICATE_IDENTIFIER");

    let (status, body) = post_json(&t.app, "/api/login", alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"identifier": "alice"}));

    let (status, body) = post_json(
        &t.app,
        "/api/login",
        r#"{"identifier":"alice","secret":"wrong"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

    let (status, unknown) = post_json(
        &t.app,
        "/api/login",
        r#"{"identifier":"bob","secret":"pw1"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, body);

    assert_eq!(t.storage.count().await.unwrap(), 1);
}

#[tokio::test]
async fn stored_credential_is_a_hash() {
    let t = spawn_app("stored").await;
    let (status, _) = post_json(
        &t.app,
        "/api/register",
        r#"{"username":"carol","password":"hunter2"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let row = t
        .storage
        .get_by_identifier("carol")
        .await
        .unwrap()
        .expect("account missing");
    assert_ne!(row.credential_hash, "hunter2");
    assert!(row.credential_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn missing_fields_are_rejected_without_persisting() {
    let t = spawn_app("missing").await;
    for payload in [
        r#"{"identifier":"dave"}"#,
        r#"{"secret":"pw"}"#,
        r#"{"identifier":"","secret":"pw"}"#,
        r#"{"identifier":"dave","secret":null}"#,
        r#"["dave","pw"]"#,
        "not json",
    ] {
        let (status, body) = post_json(&t.app, "/api/register", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "payload {payload}");
    }
    assert_eq!(t.storage.count().await.unwrap(), 0);

    let (status, _) = post_json(&t.app, "/api/login", r#"{"identifier":"dave"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_returns_413() {
    let t = spawn_app("body-limit").await;
    let secret = "a".repeat(BODY_LIMIT + 1024);
    let payload = format!(r#"{{"identifier":"eve","secret":"{secret}"}}"#);

    let (status, body) = post_json(&t.app, "/api/register", payload).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(body["error"]["message"], "request body too large");
    assert_eq!(t.storage.count().await.unwrap(), 0);
}

#[tokio::test]
async fn healthz_reports_ok() {
    let t = spawn_app("healthz").await;
    let resp = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let t = spawn_app("cors").await;
    let resp = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/login")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
