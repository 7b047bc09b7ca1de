use clinic_dashboard::{AppState, Config, WebhookClient, router};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!("failed to load .env: {err}");
        }
    }

    let config = Config::from_env();
    if !config.dist_dir.join("index.html").exists() {
        warn!(
            "no client bundle at {}, only built-in pages will be served",
            config.dist_dir.display()
        );
    }

    let webhooks = WebhookClient::from_config(&config)?;
    let app = router(AppState::new(webhooks, config.dist_dir.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    info!("serving static files from {}", config.dist_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
