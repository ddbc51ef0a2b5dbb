// Pure payload decoder.
//
// Purpose
// - Turn one raw notification payload into an EventRange.
//
// Responsibilities
// - Split from the right: the last three fields are the integers, everything
//   before them (commas included) is the stream identifier.
// - Never perform input or output.

use crate::modules::event_notifications::core::event_range::EventRange;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected at least 4 comma separated fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("{field} is not an integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
}

pub fn decode_payload(payload: &str) -> Result<EventRange, DecodeError> {
    let mut fields = payload.rsplitn(4, ',');
    let (Some(last_version), Some(first_version), Some(stream_sequence), Some(stream_id)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(DecodeError::WrongFieldCount {
            found: payload.split(',').count(),
        });
    };

    Ok(EventRange {
        stream_id: stream_id.to_string(),
        stream_sequence: parse_integer("stream_sequence", stream_sequence)?,
        first_version: parse_integer("first_version", first_version)?,
        last_version: parse_integer("last_version", last_version)?,
    })
}

fn parse_integer(field: &'static str, value: &str) -> Result<i64, DecodeError> {
    value.parse().map_err(|_| DecodeError::InvalidInteger {
        field,
        value: value.to_string(),
    })
}
