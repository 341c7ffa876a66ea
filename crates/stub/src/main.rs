use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notely_stub::config::StubConfig;
use notely_stub::StubState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notely_stub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = StubConfig::from_env()?;
    let addr = config.addr();

    // --- Start server ---
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Starting stub notes backend");

    let app = notely_stub::routes::app(StubState::new());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Stub stopped");
    Ok(())
}

/// Resolve on Ctrl-C. If the handler cannot be installed, run until killed.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!("Received SIGINT (Ctrl-C), shutting down");
}
