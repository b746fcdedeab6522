// Broker transport seam
//
// The connection manager only sees these traits; production wires in the
// lapin-backed AMQP transport, tests script their own.

use async_trait::async_trait;
use lapin::{
    options::{BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use tracing::info;

use crate::error::BrokerError;

/// A live, usable conduit to the broker
#[async_trait]
pub trait BrokerChannel: Send + Sync {
    /// Send one message to the named queue, fire-and-forget
    async fn publish(&self, queue: &str, payload: &[u8]) -> Result<(), BrokerError>;
}

/// Factory for broker channels; one call per connection attempt
#[async_trait]
pub trait BrokerTransport: Send + Sync {
    /// Open a connection, open a channel, and assert the destination queue
    async fn connect(&self) -> Result<Box<dyn BrokerChannel>, BrokerError>;
}

/// RabbitMQ transport backed by lapin
pub struct AmqpTransport {
    url: String,
    queue: String,
}

impl AmqpTransport {
    pub fn new(url: impl Into<String>, queue: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            queue: queue.into(),
        }
    }
}

#[async_trait]
impl BrokerTransport for AmqpTransport {
    async fn connect(&self) -> Result<Box<dyn BrokerChannel>, BrokerError> {
        let connection = Connection::connect(&self.url, ConnectionProperties::default())
            .await
            .map_err(|e| BrokerError::Connect(format!("failed to connect to RabbitMQ: {e}")))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| BrokerError::Connect(format!("failed to create channel: {e}")))?;

        // Declaring is idempotent; re-asserting an existing queue is a no-op
        channel
            .queue_declare(
                &self.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| {
                BrokerError::Connect(format!("failed to declare queue {}: {e}", self.queue))
            })?;

        info!(queue = %self.queue, "Connected to RabbitMQ");

        Ok(Box::new(AmqpChannel {
            _connection: connection,
            channel,
        }))
    }
}

/// Holds the connection alongside the channel so it is not dropped while
/// the channel is in use.
struct AmqpChannel {
    _connection: Connection,
    channel: Channel,
}

#[async_trait]
impl BrokerChannel for AmqpChannel {
    async fn publish(&self, queue: &str, payload: &[u8]) -> Result<(), BrokerError> {
        self.channel
            .basic_publish(
                "",
                queue,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default(),
            )
            .await
            .map_err(|e| BrokerError::Publish(e.to_string()))?;
        Ok(())
    }
}
