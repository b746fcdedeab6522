// Service configuration from environment variables

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use taskline_broker::ConnectRetryPolicy;

/// Storage selection: MongoDB (default) or in-memory dev mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageMode {
    /// MongoDB document store (default)
    #[default]
    Mongo,
    /// In-memory storage, data lost on restart
    InMemory,
}

impl FromStr for StorageMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" | "" => Ok(StorageMode::Mongo),
            "memory" | "inmemory" | "in-memory" => Ok(StorageMode::InMemory),
            _ => anyhow::bail!("Unknown storage mode: {}. Use 'mongo' or 'memory'", s),
        }
    }
}

/// Configuration for the task service binary
#[derive(Debug, Clone)]
pub struct TaskServiceConfig {
    pub http_port: u16,
    pub storage_mode: StorageMode,
    pub mongodb_url: String,
    pub database: String,
    pub amqp_url: String,
    pub queue: String,
    pub retry: ConnectRetryPolicy,
    pub connect_timeout: Duration,
}

impl TaskServiceConfig {
    /// Load configuration with the historical defaults (docker service
    /// names for the store and broker, port 3002)
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_port: env_parsed("HTTP_PORT", 3002)?,
            storage_mode: std::env::var("STORAGE_MODE").unwrap_or_default().parse()?,
            mongodb_url: env_or("MONGODB_URL", "mongodb://mongo:27017"),
            database: env_or("MONGODB_DATABASE", "tasks"),
            amqp_url: env_or("AMQP_URL", "amqp://rabbitmq:5672/%2f"),
            queue: env_or("BROKER_QUEUE", "task_created"),
            retry: ConnectRetryPolicy::new(
                env_parsed("BROKER_RETRY_ATTEMPTS", 5)?,
                Duration::from_millis(env_parsed("BROKER_RETRY_DELAY_MS", 3000)?),
            ),
            connect_timeout: Duration::from_millis(env_parsed(
                "BROKER_CONNECT_TIMEOUT_MS",
                10_000,
            )?),
        })
    }
}

/// Configuration for the user service binary
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    pub http_port: u16,
    pub storage_mode: StorageMode,
    pub mongodb_url: String,
    pub database: String,
}

impl UserServiceConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_port: env_parsed("HTTP_PORT", 3001)?,
            storage_mode: std::env::var("STORAGE_MODE").unwrap_or_default().parse()?,
            mongodb_url: env_or("MONGODB_URL", "mongodb://mongo:27017"),
            database: env_or("MONGODB_DATABASE", "users"),
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid value for {name}: {value}")),
        Err(_) => Ok(default),
    }
}
