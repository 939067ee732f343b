use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tatra_api::{app, AppState};
use tatra_core::BookingRepository;
use tatra_store::{app_config::Config, JsonFileStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tatra_api=debug,tatra_store=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Tatra Tours API on port {}", config.server.port);

    let store = JsonFileStore::open(
        &config.storage.bookings_file,
        config.storage.queue_capacity,
    )
    .await
    .with_context(|| {
        format!(
            "Failed to open bookings file {}",
            config.storage.bookings_file.display()
        )
    })?;
    let store: Arc<dyn BookingRepository> = Arc::new(store);

    let app = app(AppState::new(store, &config));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host / server.port")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
