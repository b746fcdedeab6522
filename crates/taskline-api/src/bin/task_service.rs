// Task service
//
// Startup ordering is deliberately loose: the HTTP listener binds before the
// broker connection exists. The connect loop runs in the background with a
// bounded retry budget, and creation requests that arrive while it has not
// succeeded are answered 503 after the record is persisted.

use std::sync::Arc;

use anyhow::{Context, Result};
use taskline_api::config::{StorageMode, TaskServiceConfig};
use taskline_api::tasks;
use taskline_broker::{AmqpTransport, ConnectionManager};
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

    tracing::info!("task-service starting...");

    let config = TaskServiceConfig::from_env().context("Failed to load configuration")?;

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

    // Broker connection is established in the background; serving starts now
    let transport = Arc::new(AmqpTransport::new(
        config.amqp_url.as_str(),
        config.queue.as_str(),
    ));
    let broker = Arc::new(ConnectionManager::new(
        transport,
        config.queue.as_str(),
        config.retry.clone(),
        config.connect_timeout,
    ));
    broker.spawn_connect();

    let state = tasks::AppState { store, broker };
    let app = tasks::routes(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Task service listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
