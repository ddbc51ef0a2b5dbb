// One contiguous append announced by the event store.
//
// Purpose
// - Carry the stream identifier and the version span a consumer should read back.
//
// Wire shape
// - "<stream_id>,<stream_sequence>,<first_version>,<last_version>".
// - stream_id may contain commas; the three integers never do.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct EventRange {
    pub stream_id: String,
    pub stream_sequence: i64,
    pub first_version: i64,
    pub last_version: i64,
}

impl EventRange {
    pub fn new(
        stream_id: impl Into<String>,
        stream_sequence: i64,
        first_version: i64,
        last_version: i64,
    ) -> Self {
        Self {
            stream_id: stream_id.into(),
            stream_sequence,
            first_version,
            last_version,
        }
    }

    /// Renders the range in the notification payload format.
    pub fn to_payload(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EventRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.stream_id, self.stream_sequence, self.first_version, self.last_version
        )
    }
}

#[cfg(test)]
mod event_range_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_render_the_payload_format() {
        let range = EventRange::new("stream-12345", 1, 1, 5);
        assert_eq!(range.to_payload(), "stream-12345,1,1,5");
    }

    #[rstest]
    fn it_should_keep_commas_inside_the_stream_id() {
        let range = EventRange::new("tenant,orders,42", 7, 10, 12);
        assert_eq!(range.to_payload(), "tenant,orders,42,7,10,12");
    }

    #[rstest]
    fn it_should_serialize_to_json_with_named_fields() {
        let range = EventRange::new("stream-1", 2, 3, 4);
        let json = serde_json::to_value(&range).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "stream_id": "stream-1",
                "stream_sequence": 2,
                "first_version": 3,
                "last_version": 4,
            })
        );
    }
}
