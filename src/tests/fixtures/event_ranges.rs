// Shared test fixtures for EventRange.

use crate::modules::event_notifications::core::event_range::EventRange;

pub struct EventRangeBuilder {
    inner: EventRange,
}

impl Default for EventRangeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl EventRangeBuilder {
    pub fn new() -> Self {
        Self {
            inner: EventRange {
                stream_id: "stream-12345".to_string(),
                stream_sequence: 1,
                first_version: 1,
                last_version: 5,
            },
        }
    }

    pub fn stream_id(mut self, v: impl Into<String>) -> Self {
        self.inner.stream_id = v.into();
        self
    }

    pub fn stream_sequence(mut self, v: i64) -> Self {
        self.inner.stream_sequence = v;
        self
    }

    pub fn first_version(mut self, v: i64) -> Self {
        self.inner.first_version = v;
        self
    }

    pub fn last_version(mut self, v: i64) -> Self {
        self.inner.last_version = v;
        self
    }

    pub fn build(self) -> EventRange {
        self.inner
    }
}

/// `count` distinct ranges on alternating streams, sequence numbers 1..=count.
pub fn make_event_ranges(count: usize) -> Vec<EventRange> {
    (1..=count as i64)
        .map(|n| {
            EventRangeBuilder::new()
                .stream_id(format!("stream-{}", n % 2))
                .stream_sequence(n)
                .first_version(n * 10)
                .last_version(n * 10 + 2)
                .build()
        })
        .collect()
}

#[cfg(test)]
mod event_range_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_delegates_to_new() {
        assert_eq!(
            EventRangeBuilder::default().build(),
            EventRange::new("stream-12345", 1, 1, 5)
        );
    }

    #[rstest]
    fn it_should_make_distinct_ranges_in_sequence_order() {
        let ranges = make_event_ranges(3);
        let sequences: Vec<i64> = ranges.iter().map(|r| r.stream_sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert_ne!(ranges[0], ranges[2]);
    }
}
