use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = sqlite_admin::config::Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        data_dir = %cfg.data_dir.display(),
        listen = %cfg.listen_addr(),
        loglevel = %cfg.loglevel,
        secure_cookie = cfg.secure_cookie,
        cookie_secret = if cfg.cookie_secret.is_some() { "<set>" } else { "<generated>" },
    );

    let state = sqlite_admin::AdminState::new(&cfg)?;
    state.catalog().ensure_dir().await?;
    let app = sqlite_admin::admin_router(state);

    let addr = cfg.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
