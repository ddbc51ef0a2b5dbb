// Port for upstream connection liveness.
//
// Purpose
// - Report UP and DOWN transitions for a named connection target.
//
// Boundaries
// - Delivery is at most once per transition. Nothing here reconnects; the
//   implementation behind the port owns the physical connection.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum ConnectionMonitorError {
    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Liveness {
    Up(String),
    Down(String),
}

impl Liveness {
    pub fn target(&self) -> &str {
        match self {
            Liveness::Up(target) | Liveness::Down(target) => target,
        }
    }
}

pub type LivenessStream = mpsc::UnboundedReceiver<Liveness>;

#[async_trait]
pub trait ConnectionMonitor: Send + Sync {
    async fn monitor(&self, target: &str) -> Result<LivenessStream, ConnectionMonitorError>;
}

pub mod in_memory;
