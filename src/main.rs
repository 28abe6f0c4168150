use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
#[cfg(test)]
mod test_support;
mod workers;

use config::settings::AppConfig;
use infrastructure::db::pool::{connect_to_db, run_migrations};
use infrastructure::provider::client::ProviderClient;
use infrastructure::storage::s3::StorageService;
use modules::notifications::dispatcher::NotificationDispatcher;
use modules::notifications::memory_host::MemoryHost;
use modules::videos::repository::VideoRepository;
use state::AppState;
use workers::notifier::{PushSender, start_notification_worker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("Missing required environment variable")?;

    let pool = connect_to_db(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool).await.context("Failed to run migrations")?;

    let storage = StorageService::new(&config.storage);
    let provider = ProviderClient::new(&config.provider).context("Failed to build provider client")?;

    let host = MemoryHost::new().with_limits(config.notification_limit, config.view_limit);
    let host = if config.open_windows {
        host
    } else {
        host.without_window_opening()
    };
    let host = Arc::new(host);
    let (push, rx) = PushSender::channel(config.push_queue_capacity);
    tokio::spawn(start_notification_worker(
        NotificationDispatcher::new(host.clone()),
        rx,
    ));

    let port = config.server_port;
    let state = AppState::new(
        config,
        Arc::new(VideoRepository::new(pool)),
        Arc::new(storage),
        Arc::new(provider),
        push,
        host,
    );

    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
