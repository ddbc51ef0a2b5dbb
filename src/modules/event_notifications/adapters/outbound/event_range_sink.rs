// Outbound port towards the consumer of event ranges.
//
// Purpose
// - Hand each dispatched batch to whoever reads the events back from the store.
//
// Responsibilities
// - Preserve batch order. The dispatcher never calls emit with an empty batch.

use crate::modules::event_notifications::core::event_range::EventRange;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("consumer has gone away")]
    Closed,

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait EventRangeSink: Send + Sync {
    async fn emit(&self, batch: Vec<EventRange>) -> Result<(), SinkError>;
}

/// Forwards batches into a channel read by the consumer task.
pub struct ChannelEventRangeSink {
    sender: mpsc::UnboundedSender<Vec<EventRange>>,
}

impl ChannelEventRangeSink {
    pub fn new(sender: mpsc::UnboundedSender<Vec<EventRange>>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl EventRangeSink for ChannelEventRangeSink {
    async fn emit(&self, batch: Vec<EventRange>) -> Result<(), SinkError> {
        self.sender.send(batch).map_err(|_| SinkError::Closed)
    }
}
