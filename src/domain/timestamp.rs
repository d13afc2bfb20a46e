// Timestamp canonicalization for heterogeneous sensor payloads
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Convert any of the timestamp shapes the API is known to emit into a
/// canonical UTC instant. Detection order: a seconds/nanoseconds wire pair,
/// an epoch-milliseconds number, an RFC 3339 string. Anything absent or
/// unparsable yields the current instant, since the UI must never block on a
/// malformed timestamp.
pub fn normalize(raw: Option<&Value>) -> DateTime<Utc> {
    normalize_at(raw, Utc::now())
}

/// Like [`normalize`] but with an injected clock, so the fallback branch is
/// deterministic in tests.
pub fn normalize_at(raw: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(value) = raw else {
        return now;
    };

    if let Some(instant) = from_wire_pair(value) {
        return instant;
    }

    if let Some(millis) = as_epoch_millis(value) {
        if let Some(instant) = DateTime::from_timestamp_millis(millis) {
            return instant;
        }
        return now;
    }

    if let Some(text) = value.as_str() {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return parsed.with_timezone(&Utc);
        }
    }

    now
}

/// Structured `{seconds, nanoseconds}` pair, including the underscored
/// spelling some document stores use on the wire.
fn from_wire_pair(value: &Value) -> Option<DateTime<Utc>> {
    let seconds = value
        .get("seconds")
        .or_else(|| value.get("_seconds"))?
        .as_i64()?;
    let nanoseconds = value
        .get("nanoseconds")
        .or_else(|| value.get("_nanoseconds"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let millis = seconds
        .checked_mul(1000)?
        .checked_add(nanoseconds / 1_000_000)?;
    DateTime::from_timestamp_millis(millis)
}

fn as_epoch_millis(value: &Value) -> Option<i64> {
    if let Some(millis) = value.as_i64() {
        return Some(millis);
    }
    value.as_f64().map(|millis| millis as i64)
}
