use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use marketdesk::config::Config;
use marketdesk::router::{DeskState, desk_router};
use marketdesk::{AccountService, SecretHasher, db};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        body_limit_bytes = cfg.basic.body_limit_bytes
    );

    let storage = db::connect(&cfg.basic.database_url).await?;
    info!(accounts = storage.count().await?, "account storage ready");

    let hasher = SecretHasher::new(&cfg.hashing)?;
    let accounts = AccountService::new(storage, hasher).await?;

    let state = DeskState::new(accounts);
    let app = desk_router(state, cfg.basic.body_limit_bytes);

    let listener = TcpListener::bind(cfg.basic.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
