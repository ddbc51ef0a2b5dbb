use crate::modules::event_notifications::adapters::outbound::event_range_sink::{
    EventRangeSink, SinkError,
};
use crate::modules::event_notifications::core::decode::{DecodeError, decode_payload};
use crate::modules::event_notifications::core::event_range::EventRange;
use crate::modules::event_notifications::core::state::DispatcherState;
use crate::modules::event_notifications::use_cases::dispatch_event_ranges::config::{
    DispatcherConfig, MalformedPayloadPolicy,
};
use crate::modules::event_notifications::use_cases::dispatch_event_ranges::message::{
    DispatcherMessage, DispatcherStatus,
};
use crate::shared::infrastructure::connection_monitor::{ConnectionMonitorError, Liveness};
use crate::shared::infrastructure::notification_source::{
    NotificationSource, NotificationSourceError, Subscription, SubscriptionHandle,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum DispatcherError {
    #[error(transparent)]
    Monitor(#[from] ConnectionMonitorError),

    #[error("failed to subscribe to {channel}: {source}")]
    Subscribe {
        channel: String,
        source: NotificationSourceError,
    },

    #[error("malformed payload {payload:?}: {source}")]
    Decode { payload: String, source: DecodeError },

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("demand must be at least 1")]
    InvalidDemand,

    #[error("dispatcher has stopped")]
    Stopped,
}

/// Owns the dispatcher state and applies one mailbox message at a time.
pub struct Dispatcher<TSource, TSink>
where
    TSource: NotificationSource + 'static,
    TSink: EventRangeSink + 'static,
{
    on_malformed: MalformedPayloadPolicy,
    state: DispatcherState,
    source: Arc<TSource>,
    sink: Arc<TSink>,
    mailbox: mpsc::WeakUnboundedSender<DispatcherMessage>,
    forwarder: Option<JoinHandle<()>>,
}

impl<TSource, TSink> Dispatcher<TSource, TSink>
where
    TSource: NotificationSource + 'static,
    TSink: EventRangeSink + 'static,
{
    pub fn new(
        config: &DispatcherConfig,
        source: Arc<TSource>,
        sink: Arc<TSink>,
        mailbox: mpsc::WeakUnboundedSender<DispatcherMessage>,
    ) -> Self {
        Self {
            on_malformed: config.on_malformed,
            state: DispatcherState::new(&config.listen_to, &config.schema),
            source,
            sink,
            mailbox,
            forwarder: None,
        }
    }

    pub fn state(&self) -> &DispatcherState {
        &self.state
    }

    pub fn status(&self) -> DispatcherStatus {
        DispatcherStatus {
            connection: self.state.connection(),
            demand: self.state.demand(),
            queued: self.state.queued(),
        }
    }

    pub async fn handle(&mut self, message: DispatcherMessage) -> Result<(), DispatcherError> {
        match message {
            DispatcherMessage::Liveness(liveness) if liveness.target() != self.state.target() => {
                debug!(target_name = liveness.target(), "ignoring liveness for another target");
                Ok(())
            }
            DispatcherMessage::Liveness(Liveness::Up(_)) => self.subscribe().await,
            DispatcherMessage::Liveness(Liveness::Down(_)) => {
                self.release_subscription().await;
                self.state.disconnected();
                info!(
                    target_name = self.state.target(),
                    queued = self.state.queued(),
                    "connection down, subscription cleared"
                );
                Ok(())
            }
            DispatcherMessage::Notification {
                handle,
                channel,
                payload,
            } => self.notification(handle, &channel, payload).await,
            DispatcherMessage::Demand(n) => {
                let batch = self.state.add_demand(n);
                self.emit(batch).await
            }
            DispatcherMessage::Status(reply) => {
                // The requester may have given up waiting.
                let _ = reply.send(self.status());
                Ok(())
            }
        }
    }

    async fn subscribe(&mut self) -> Result<(), DispatcherError> {
        self.release_subscription().await;
        let channel = self.state.channel().to_string();
        let subscription = self
            .source
            .listen(self.state.target(), &channel)
            .await
            .map_err(|source| DispatcherError::Subscribe {
                channel: channel.clone(),
                source,
            })?;

        self.state.subscribed(subscription.handle);
        info!(
            target_name = self.state.target(),
            channel = %channel,
            handle = %subscription.handle,
            "subscribed"
        );
        self.forwarder = Some(forward(subscription, self.mailbox.clone()));
        Ok(())
    }

    /// Stops the current forwarder. Its payload receiver is dropped once the
    /// task is gone, which closes the listen at the source.
    async fn release_subscription(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
            // Cancelled is the expected outcome; the wait only makes the drop happen now.
            let _ = forwarder.await;
        }
    }

    async fn notification(
        &mut self,
        handle: SubscriptionHandle,
        channel: &str,
        payload: String,
    ) -> Result<(), DispatcherError> {
        if !self.state.accepts(handle, channel) {
            debug!(%handle, channel, "discarding notification outside the live subscription");
            return Ok(());
        }

        let range = match decode_payload(&payload) {
            Ok(range) => range,
            Err(source) => match self.on_malformed {
                MalformedPayloadPolicy::Fail => {
                    return Err(DispatcherError::Decode { payload, source });
                }
                MalformedPayloadPolicy::Skip => {
                    warn!(payload = %payload, error = %source, "skipping malformed payload");
                    return Ok(());
                }
            },
        };

        debug!(stream_id = %range.stream_id, "queued event range");
        let batch = self.state.push(range);
        self.emit(batch).await
    }

    async fn emit(&self, batch: Vec<EventRange>) -> Result<(), DispatcherError> {
        if batch.is_empty() {
            return Ok(());
        }
        debug!(
            count = batch.len(),
            demand = self.state.demand(),
            queued = self.state.queued(),
            "dispatching event ranges"
        );
        self.sink.emit(batch).await?;
        Ok(())
    }
}

/// Pumps a subscription's payloads into the dispatcher mailbox until either side closes.
fn forward(
    subscription: Subscription,
    mailbox: mpsc::WeakUnboundedSender<DispatcherMessage>,
) -> JoinHandle<()> {
    let Subscription {
        handle,
        channel,
        mut payloads,
    } = subscription;
    tokio::spawn(async move {
        while let Some(payload) = payloads.recv().await {
            let Some(mailbox) = mailbox.upgrade() else {
                break;
            };
            let message = DispatcherMessage::Notification {
                handle,
                channel: channel.clone(),
                payload,
            };
            if mailbox.send(message).is_err() {
                break;
            }
        }
        debug!(%handle, "subscription closed");
    })
}
