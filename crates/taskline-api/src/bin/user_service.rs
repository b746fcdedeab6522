// User service
//
// Plain record keeping, no broker: the same persist/list contract as tasks
// without the event step.

use anyhow::{Context, Result};
use taskline_api::config::{StorageMode, UserServiceConfig};
use taskline_api::users;
use taskline_storage::StorageBackend;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskline=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("user-service starting...");

    let config = UserServiceConfig::from_env().context("Failed to load configuration")?;

    let store = match config.storage_mode {
        StorageMode::Mongo => StorageBackend::mongo(&config.mongodb_url, &config.database)
            .await
            .context("Invalid MongoDB connection string")?,
        StorageMode::InMemory => StorageBackend::in_memory(),
    };
    if store.is_dev_mode() {
        tracing::warn!("Using in-memory storage (dev mode), records are lost on restart");
    } else {
        match store.ping().await {
            Ok(()) => tracing::info!("Connected to MongoDB"),
            Err(e) => tracing::warn!(error = %e, "MongoDB not reachable yet; requests will fail until it is"),
        }
    }

    let state = users::AppState { store };
    let app = users::routes(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("User service listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
