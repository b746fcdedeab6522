// RabbitMQ connectivity for the task service
//
// Decision: The transport is a trait seam so the connection lifecycle can be
// exercised without a running broker.
// Decision: Connection establishment is retried a bounded number of times at
// startup and never supervised afterwards; readiness is a queryable state,
// not a precondition for serving HTTP.

pub mod error;
pub mod manager;
pub mod retry;
pub mod transport;

pub use error::BrokerError;
pub use manager::{BrokerState, ConnectionManager};
pub use retry::ConnectRetryPolicy;
pub use transport::{AmqpTransport, BrokerChannel, BrokerTransport};
