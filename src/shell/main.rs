use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt};

use event_notifications::modules::event_notifications::adapters::outbound::event_range_sink::ChannelEventRangeSink;
use event_notifications::modules::event_notifications::use_cases::dispatch_event_ranges::runner::{
    DispatcherHandle, RunningDispatcher, spawn_dispatcher,
};
use event_notifications::modules::event_notifications::core::event_range::EventRange;
use event_notifications::shared::infrastructure::connection_monitor::in_memory::InMemoryConnectionMonitor;
use event_notifications::shared::infrastructure::notification_source::in_memory::InMemoryNotificationSource;
use event_notifications::shell::config::load_config;

const INITIAL_DEMAND: u64 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = load_config()?;
    let target = config.listen_to.clone();
    let channel = config.channel();

    // In-memory deps for now
    let monitor = Arc::new(InMemoryConnectionMonitor::new());
    let source = Arc::new(InMemoryNotificationSource::new());
    let (batches_tx, batches_rx) = mpsc::unbounded_channel();
    let sink = Arc::new(ChannelEventRangeSink::new(batches_tx));

    let RunningDispatcher { handle, task } =
        spawn_dispatcher(config, monitor.clone(), source.clone(), sink).await?;

    source.connect(&target).await;
    monitor.up(&target).await;
    handle.request(INITIAL_DEMAND)?;
    tokio::spawn(consume(batches_rx, handle.clone()));

    tracing::info!(
        "reading payloads for {} from stdin (\":down\" and \":up\" flip the connection)",
        channel
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tokio::select! {
        result = task => {
            result??;
        }
        result = async {
            while let Some(line) = lines.next_line().await? {
                match line.trim() {
                    "" => {}
                    ":down" => {
                        source.disconnect(&target).await;
                        monitor.down(&target).await;
                    }
                    ":up" => {
                        source.connect(&target).await;
                        monitor.up(&target).await;
                    }
                    payload => {
                        source.notify(&channel, payload).await;
                    }
                }
            }
            anyhow::Ok(())
        } => {
            result?;
            let status = handle.status().await?;
            tracing::info!(
                queued = status.queued,
                demand = status.demand,
                "stdin closed, shutting down"
            );
        }
    }
    Ok(())
}

/// Prints each range as a JSON line and asks for one more per range seen.
async fn consume(mut batches: mpsc::UnboundedReceiver<Vec<EventRange>>, handle: DispatcherHandle) {
    while let Some(batch) = batches.recv().await {
        for range in &batch {
            match serde_json::to_string(range) {
                Ok(line) => println!("{line}"),
                Err(err) => tracing::warn!(error = %err, "failed to render event range"),
            }
        }
        if handle.request(batch.len() as u64).is_err() {
            break;
        }
    }
}
