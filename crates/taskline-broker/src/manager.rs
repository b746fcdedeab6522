// Broker connection lifecycle
//
// The manager owns a single connection + channel pair for the process. The
// channel slot is written exactly once, on the Connecting -> Ready
// transition; the state word is published with release ordering after the
// write so request handlers never observe a torn handle. There is no path
// back out of Ready and no health monitoring: a broker that drops mid-life
// stays "ready" and publishes fail (documented scope limit).

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::error::BrokerError;
use crate::retry::ConnectRetryPolicy;
use crate::transport::{BrokerChannel, BrokerTransport};

const DISCONNECTED: u8 = 0;
const CONNECTING: u8 = 1;
const READY: u8 = 2;
const UNAVAILABLE: u8 = 3;

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerState {
    /// Initial state, before the connect loop has started
    Disconnected,
    /// Connect loop in progress, attempts remaining
    Connecting,
    /// Live channel available for publishing
    Ready,
    /// Retry budget exhausted; terminal for the process lifetime
    Unavailable,
}

impl BrokerState {
    fn from_u8(value: u8) -> Self {
        match value {
            CONNECTING => BrokerState::Connecting,
            READY => BrokerState::Ready,
            UNAVAILABLE => BrokerState::Unavailable,
            _ => BrokerState::Disconnected,
        }
    }
}

/// Owns the outbound broker connection for the process.
///
/// Constructed once at startup and injected into request handlers; handlers
/// only read the state word and never wait on connection establishment.
pub struct ConnectionManager {
    transport: Arc<dyn BrokerTransport>,
    queue: String,
    policy: ConnectRetryPolicy,
    connect_timeout: Duration,
    state: AtomicU8,
    channel: RwLock<Option<Box<dyn BrokerChannel>>>,
}

impl ConnectionManager {
    pub fn new(
        transport: Arc<dyn BrokerTransport>,
        queue: impl Into<String>,
        policy: ConnectRetryPolicy,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            queue: queue.into(),
            policy,
            connect_timeout,
            state: AtomicU8::new(DISCONNECTED),
            channel: RwLock::new(None),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> BrokerState {
        BrokerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// True only while a live channel is available
    pub fn is_ready(&self) -> bool {
        self.state.load(Ordering::Acquire) == READY
    }

    /// Queue this manager publishes to
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Start the connect loop as a background task.
    ///
    /// Returns immediately; HTTP serving must not wait on the broker.
    pub fn spawn_connect(self: &Arc<Self>) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            manager.run_connect_loop().await;
        });
    }

    /// Run the bounded-retry connect loop to completion (Ready or
    /// Unavailable). Only the first caller runs it; later calls are no-ops.
    pub async fn run_connect_loop(&self) {
        if self
            .state
            .compare_exchange(DISCONNECTED, CONNECTING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("broker connect loop already started, skipping");
            return;
        }

        for attempt in 1..=self.policy.max_attempts {
            match tokio::time::timeout(self.connect_timeout, self.transport.connect()).await {
                Ok(Ok(channel)) => {
                    *self.channel.write().await = Some(channel);
                    // Release-publish after the handle is in place
                    self.state.store(READY, Ordering::Release);
                    info!(queue = %self.queue, attempt, "Broker connection established");
                    return;
                }
                Ok(Err(e)) => {
                    warn!(attempt, max_attempts = self.policy.max_attempts, error = %e,
                        "Broker connection attempt failed");
                }
                Err(_) => {
                    warn!(attempt, max_attempts = self.policy.max_attempts,
                        timeout_ms = self.connect_timeout.as_millis() as u64,
                        "Broker connection attempt timed out");
                }
            }

            if self.policy.has_attempts_remaining(attempt) {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        self.state.store(UNAVAILABLE, Ordering::Release);
        error!(
            max_attempts = self.policy.max_attempts,
            "Broker unavailable, giving up for the process lifetime"
        );
    }

    /// Publish one message to the configured queue.
    ///
    /// Fails with `NotReady` unless the manager is Ready; messages are never
    /// buffered while the connection is down. A send failure on a live
    /// channel surfaces as `Publish` and does not reset readiness.
    pub async fn publish(&self, payload: &[u8]) -> Result<(), BrokerError> {
        if !self.is_ready() {
            return Err(BrokerError::NotReady);
        }

        let guard = self.channel.read().await;
        let channel = guard.as_ref().ok_or(BrokerError::NotReady)?;
        channel.publish(&self.queue, payload).await
    }
}
