// Broker error types

use thiserror::Error;

/// Errors from the broker connection manager.
///
/// `NotReady` and `Publish` are distinct on purpose: callers need to tell
/// "no usable channel exists" apart from "the send failed on a live channel".
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Connection attempt failed (network, handshake, or queue declaration)
    #[error("broker connection failed: {0}")]
    Connect(String),

    /// Publish was requested while no connection is established
    #[error("broker connection not made")]
    NotReady,

    /// The underlying send failed after the channel was established
    #[error("publish failed: {0}")]
    Publish(String),
}
