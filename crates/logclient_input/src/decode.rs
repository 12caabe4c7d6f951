use collector_core::Entry;
use serde_json::Value;
use thiserror::Error;

/// Per-line decode failures. Each one costs exactly the offending line.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("line is not a JSON object")]
    NotAnObject,
    #[error("record has no `Timestamp` field")]
    MissingTimestamp,
    #[error("record `Timestamp` is not numeric")]
    TimestampNotNumeric,
    #[error("record `Timestamp` of {micros} microseconds is out of range")]
    TimestampOutOfRange { micros: f64 },
}

/// Decodes one stdout line into a normalized entry.
///
/// The wire format is one JSON object per line with a numeric `Timestamp`
/// field counting microseconds since the Unix epoch. The timestamp is
/// promoted out of the body and converted to nanoseconds; everything else is
/// carried verbatim.
pub fn decode_line(line: &[u8]) -> Result<Entry, DecodeError> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let value: Value = serde_json::from_slice(line).map_err(DecodeError::Json)?;
    let Value::Object(mut body) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let micros = body
        .get("Timestamp")
        .ok_or(DecodeError::MissingTimestamp)?
        .as_f64()
        .ok_or(DecodeError::TimestampNotNumeric)?;
    body.remove("Timestamp");

    // Wire microseconds -> internal nanoseconds.
    let nanos = micros * 1_000.0;
    if !(nanos >= i64::MIN as f64 && nanos < i64::MAX as f64) {
        return Err(DecodeError::TimestampOutOfRange { micros });
    }
    Ok(Entry::from_unix_nanos(nanos as i64, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use serde_json::json;

    #[test]
    fn promotes_the_timestamp_and_keeps_remaining_fields() {
        let entry =
            decode_line(br#"{"Data":"x","HostName":"h","Timestamp":1680277695000000.0}"#).unwrap();

        assert_eq!(
            entry.timestamp.timestamp_nanos_opt(),
            Some(1_680_277_695_000_000_000)
        );
        assert!(!entry.body.contains_key("Timestamp"));
        assert_eq!(entry.body.get("Data"), Some(&json!("x")));
        assert_eq!(entry.body.get("HostName"), Some(&json!("h")));
        assert_eq!(entry.body.len(), 2);
    }

    #[test]
    fn integer_timestamps_decode_too() {
        let entry = decode_line(br#"{"Timestamp":1500000}"#).unwrap();
        assert_eq!(entry.timestamp.timestamp_nanos_opt(), Some(1_500_000_000));
        assert!(entry.body.is_empty());
    }

    #[test]
    fn sub_microsecond_fractions_are_truncated() {
        let entry = decode_line(br#"{"Timestamp":1.5}"#).unwrap();
        assert_eq!(entry.timestamp.timestamp_nanos_opt(), Some(1_500));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            decode_line(b"{not-json}"),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(decode_line(b""), Err(DecodeError::Json(_))));
        assert!(matches!(decode_line(b"   "), Err(DecodeError::Json(_))));
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(matches!(decode_line(b"[1,2]"), Err(DecodeError::NotAnObject)));
        assert!(matches!(decode_line(b"42"), Err(DecodeError::NotAnObject)));
    }

    #[test]
    fn rejects_missing_or_non_numeric_timestamp() {
        assert!(matches!(
            decode_line(br#"{"Data":"x"}"#),
            Err(DecodeError::MissingTimestamp)
        ));
        assert!(matches!(
            decode_line(br#"{"Timestamp":"1680277695"}"#),
            Err(DecodeError::TimestampNotNumeric)
        ));
        assert!(matches!(
            decode_line(br#"{"Timestamp":null}"#),
            Err(DecodeError::TimestampNotNumeric)
        ));
    }

    #[test]
    fn rejects_timestamps_outside_the_nanosecond_range() {
        assert!(matches!(
            decode_line(br#"{"Timestamp":1e30}"#),
            Err(DecodeError::TimestampOutOfRange { .. })
        ));
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let entry = decode_line(b"{\"Timestamp\":0}\r").unwrap();
        assert_eq!(entry.timestamp, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn nested_structures_survive_verbatim() {
        let entry =
            decode_line(br#"{"Timestamp":1,"Resource":{"path":"/etc","flags":["r","w"]}}"#)
                .unwrap();
        assert_eq!(
            entry.body.get("Resource"),
            Some(&json!({"path":"/etc","flags":["r","w"]}))
        );
    }
}
