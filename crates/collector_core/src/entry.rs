use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// A normalized log record.
///
/// The timestamp is a first-class attribute held at nanosecond granularity;
/// the body carries every remaining field exactly as the producing stage
/// decoded it. Ownership moves to the consuming sink on emission.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Entry {
    pub timestamp: DateTime<Utc>,
    pub body: Map<String, Value>,
}

impl Entry {
    pub fn new(timestamp: DateTime<Utc>, body: Map<String, Value>) -> Self {
        Self { timestamp, body }
    }

    /// Builds an entry from a wire timestamp expressed in nanoseconds since
    /// the Unix epoch. Every `i64` nanosecond count is representable.
    pub fn from_unix_nanos(nanos: i64, body: Map<String, Value>) -> Self {
        Self::new(DateTime::from_timestamp_nanos(nanos), body)
    }
}
