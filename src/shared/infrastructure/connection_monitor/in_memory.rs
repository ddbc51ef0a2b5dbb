// In memory implementation of the ConnectionMonitor port.
//
// Purpose
// - Let tests and local runs flip a target UP or DOWN by hand.

use crate::shared::infrastructure::connection_monitor::{
    ConnectionMonitor, ConnectionMonitorError, Liveness, LivenessStream,
};
use tokio::sync::{Mutex, mpsc};

#[derive(Default)]
pub struct InMemoryConnectionMonitor {
    watchers: Mutex<Vec<(String, mpsc::UnboundedSender<Liveness>)>>,
    is_offline: bool,
}

impl InMemoryConnectionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub async fn up(&self, target: &str) -> usize {
        self.publish(Liveness::Up(target.to_string())).await
    }

    pub async fn down(&self, target: &str) -> usize {
        self.publish(Liveness::Down(target.to_string())).await
    }

    async fn publish(&self, liveness: Liveness) -> usize {
        let mut watchers = self.watchers.lock().await;
        watchers.retain(|(_, sender)| !sender.is_closed());
        watchers
            .iter()
            .filter(|(target, _)| target == liveness.target())
            .filter(|(_, sender)| sender.send(liveness.clone()).is_ok())
            .count()
    }
}

#[async_trait::async_trait]
impl ConnectionMonitor for InMemoryConnectionMonitor {
    async fn monitor(&self, target: &str) -> Result<LivenessStream, ConnectionMonitorError> {
        if self.is_offline {
            return Err(ConnectionMonitorError::Backend(
                "Connection monitor offline".into(),
            ));
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        self.watchers.lock().await.push((target.to_string(), sender));
        Ok(receiver)
    }
}

#[cfg(test)]
mod in_memory_connection_monitor_tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn before_each() -> InMemoryConnectionMonitor {
        InMemoryConnectionMonitor::new()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_transitions_for_the_watched_target(
        before_each: InMemoryConnectionMonitor,
    ) {
        let monitor = before_each;
        let mut stream = monitor.monitor("primary").await.expect("monitor failed");

        assert_eq!(monitor.up("primary").await, 1);
        assert_eq!(monitor.up("replica").await, 0);
        assert_eq!(monitor.down("primary").await, 1);

        assert_eq!(stream.recv().await, Some(Liveness::Up("primary".into())));
        assert_eq!(stream.recv().await, Some(Liveness::Down("primary".into())));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_forget_watchers_that_went_away(before_each: InMemoryConnectionMonitor) {
        let monitor = before_each;
        drop(monitor.monitor("primary").await.unwrap());
        assert_eq!(monitor.up("primary").await, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_if_the_monitor_is_offline(mut before_each: InMemoryConnectionMonitor) {
        before_each.toggle_offline();
        let result = before_each.monitor("primary").await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Connection monitor offline")
        );
    }
}
