// Dispatcher runner.
//
// Purpose
// - Spawn the task that owns the dispatcher and drain its mailbox one message at a time.
// - Give the consumer a handle to declare demand and inspect the dispatcher.
//
// Failure
// - The first fatal error ends the task. The JoinHandle carries it to whoever supervises.

use crate::modules::event_notifications::adapters::outbound::event_range_sink::EventRangeSink;
use crate::modules::event_notifications::use_cases::dispatch_event_ranges::config::DispatcherConfig;
use crate::modules::event_notifications::use_cases::dispatch_event_ranges::handler::{
    Dispatcher, DispatcherError,
};
use crate::modules::event_notifications::use_cases::dispatch_event_ranges::message::{
    DispatcherMessage, DispatcherStatus,
};
use crate::shared::infrastructure::connection_monitor::{ConnectionMonitor, LivenessStream};
use crate::shared::infrastructure::notification_source::NotificationSource;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Clone)]
pub struct DispatcherHandle {
    mailbox: mpsc::UnboundedSender<DispatcherMessage>,
}

impl DispatcherHandle {
    /// Declares capacity for `n` more event ranges.
    pub fn request(&self, n: u64) -> Result<(), DispatcherError> {
        if n == 0 {
            return Err(DispatcherError::InvalidDemand);
        }
        self.mailbox
            .send(DispatcherMessage::Demand(n))
            .map_err(|_| DispatcherError::Stopped)
    }

    pub async fn status(&self) -> Result<DispatcherStatus, DispatcherError> {
        let (reply, status) = oneshot::channel();
        self.mailbox
            .send(DispatcherMessage::Status(reply))
            .map_err(|_| DispatcherError::Stopped)?;
        status.await.map_err(|_| DispatcherError::Stopped)
    }
}

pub struct RunningDispatcher {
    pub handle: DispatcherHandle,
    pub task: JoinHandle<Result<(), DispatcherError>>,
}

pub async fn spawn_dispatcher<TMonitor, TSource, TSink>(
    config: DispatcherConfig,
    monitor: Arc<TMonitor>,
    source: Arc<TSource>,
    sink: Arc<TSink>,
) -> Result<RunningDispatcher, DispatcherError>
where
    TMonitor: ConnectionMonitor + 'static,
    TSource: NotificationSource + 'static,
    TSink: EventRangeSink + 'static,
{
    let liveness = monitor.monitor(&config.listen_to).await?;
    let (mailbox, inbox) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(&config, source, sink, mailbox.downgrade());

    relay_liveness(liveness, mailbox.clone());
    info!(
        target_name = %config.listen_to,
        channel = %config.channel(),
        "dispatcher started"
    );
    let task = tokio::spawn(run(dispatcher, inbox));

    Ok(RunningDispatcher {
        handle: DispatcherHandle { mailbox },
        task,
    })
}

fn relay_liveness(mut liveness: LivenessStream, mailbox: mpsc::UnboundedSender<DispatcherMessage>) {
    tokio::spawn(async move {
        while let Some(transition) = liveness.recv().await {
            if mailbox.send(DispatcherMessage::Liveness(transition)).is_err() {
                break;
            }
        }
    });
}

async fn run<TSource, TSink>(
    mut dispatcher: Dispatcher<TSource, TSink>,
    mut inbox: mpsc::UnboundedReceiver<DispatcherMessage>,
) -> Result<(), DispatcherError>
where
    TSource: NotificationSource + 'static,
    TSink: EventRangeSink + 'static,
{
    while let Some(message) = inbox.recv().await {
        if let Err(err) = dispatcher.handle(message).await {
            error!(
                error = %err,
                queued = dispatcher.state().queued(),
                "dispatcher stopped, buffered event ranges are lost"
            );
            return Err(err);
        }
    }
    info!("dispatcher mailbox closed");
    Ok(())
}
