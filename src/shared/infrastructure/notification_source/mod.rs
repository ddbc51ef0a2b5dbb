// Port for the store's change notification channel.
//
// Purpose
// - Listen on a named channel through a connection and hand back the payloads.
//
// Boundaries
// - A subscription lives as long as the connection it was opened on. When the
//   connection drops, the payload receiver closes and the handle is dead.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum NotificationSourceError {
    #[error("not connected to {0}")]
    NotConnected(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Opaque token for one active listen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

#[derive(Debug)]
pub struct Subscription {
    pub handle: SubscriptionHandle,
    pub channel: String,
    pub payloads: mpsc::UnboundedReceiver<String>,
}

#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn listen(
        &self,
        target: &str,
        channel: &str,
    ) -> Result<Subscription, NotificationSourceError>;
}

pub mod in_memory;
