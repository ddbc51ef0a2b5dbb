// In memory event range sink.
//
// Purpose
// - Record every emitted batch so tests can assert on order and pacing.

use crate::modules::event_notifications::adapters::outbound::event_range_sink::{
    EventRangeSink, SinkError,
};
use crate::modules::event_notifications::core::event_range::EventRange;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryEventRangeSink {
    batches: RwLock<Vec<Vec<EventRange>>>,
    is_offline: bool,
}

impl InMemoryEventRangeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub async fn batches(&self) -> Vec<Vec<EventRange>> {
        self.batches.read().await.clone()
    }

    /// All received ranges, flattened in delivery order.
    pub async fn received(&self) -> Vec<EventRange> {
        self.batches.read().await.concat()
    }
}

#[async_trait::async_trait]
impl EventRangeSink for InMemoryEventRangeSink {
    async fn emit(&self, batch: Vec<EventRange>) -> Result<(), SinkError> {
        if self.is_offline {
            return Err(SinkError::Backend("Event range sink offline".into()));
        }

        self.batches.write().await.push(batch);
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_event_range_sink_tests {
    use super::*;
    use crate::tests::fixtures::event_ranges::make_event_ranges;
    use rstest::{fixture, rstest};

    #[fixture]
    fn before_each() -> (Vec<EventRange>, InMemoryEventRangeSink) {
        (make_event_ranges(3), InMemoryEventRangeSink::new())
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_record_batches_in_order(
        before_each: (Vec<EventRange>, InMemoryEventRangeSink),
    ) {
        let (ranges, sink) = before_each;
        sink.emit(ranges[..1].to_vec()).await.expect("emit failed");
        sink.emit(ranges[1..].to_vec()).await.expect("emit failed");

        assert_eq!(sink.batches().await.len(), 2);
        assert_eq!(sink.received().await, ranges);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_if_the_sink_is_offline(
        before_each: (Vec<EventRange>, InMemoryEventRangeSink),
    ) {
        let (ranges, mut sink) = before_each;
        sink.toggle_offline();
        let result = sink.emit(ranges).await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Event range sink offline")
        );
    }
}
