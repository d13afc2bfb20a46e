// Raw payload normalization - reconciles inconsistent API field names
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::reading::{CanonicalReading, PollutantLevels};
use crate::domain::timestamp;

// Known aliases per canonical field, probed in order; the first present
// value wins. Field names vary across deployments and cities.
pub const PM25_ALIASES: &[&str] = &["pm25", "pm2_5", "PM25"];
pub const PM10_ALIASES: &[&str] = &["pm10", "pm_10", "PM10"];
pub const PM1_ALIASES: &[&str] = &["pm1", "pm1_0", "PM1"];
pub const CO2_ALIASES: &[&str] = &["co2", "CO2"];
pub const NO2_ALIASES: &[&str] = &["no2", "NO2"];
pub const O3_ALIASES: &[&str] = &["o3", "O3"];
pub const CO_ALIASES: &[&str] = &["co", "CO"];
pub const SO2_ALIASES: &[&str] = &["so2", "SO2"];
pub const TEMPERATURE_ALIASES: &[&str] = &["temperatura", "temperature", "temp"];
pub const HUMIDITY_ALIASES: &[&str] = &["humedad", "humidity"];
pub const TIMESTAMP_ALIASES: &[&str] = &["timestamp", "timestamp_firestore", "fecha"];

/// Project a raw API payload into a canonical reading.
///
/// Returns `None` when the payload lacks a truthy `ok` flag or a nested
/// data object - the single "no data" signal; callers treat it as not
/// found, not as a failure. Everything else is best-effort: missing fields
/// default, malformed timestamps fall back to the current instant.
pub fn normalize_reading(payload: &Value, requested_city: &str) -> Option<CanonicalReading> {
    normalize_reading_at(payload, requested_city, Utc::now())
}

/// Like [`normalize_reading`] with an injected clock for the timestamp
/// fallback.
pub fn normalize_reading_at(
    payload: &Value,
    requested_city: &str,
    now: DateTime<Utc>,
) -> Option<CanonicalReading> {
    if !payload.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return None;
    }
    let data = payload.get("datos").or_else(|| payload.get("data"))?;
    if !data.is_object() {
        return None;
    }

    let city = resolve_city(payload, data, requested_city);
    let levels = PollutantLevels {
        pm25: probe_concentration(data, PM25_ALIASES),
        pm10: probe_concentration(data, PM10_ALIASES),
        pm1: probe_concentration(data, PM1_ALIASES),
        co2: probe_concentration(data, CO2_ALIASES),
        no2: probe_concentration(data, NO2_ALIASES),
        o3: probe_concentration(data, O3_ALIASES),
        co: probe_concentration(data, CO_ALIASES),
        so2: probe_concentration(data, SO2_ALIASES),
    };
    let temperature = probe_number(data, TEMPERATURE_ALIASES).unwrap_or(0.0);
    let humidity = probe_number(data, HUMIDITY_ALIASES).unwrap_or(0.0);
    let instant = timestamp::normalize_at(probe_value(data, TIMESTAMP_ALIASES), now);

    Some(CanonicalReading::new(
        city,
        levels,
        temperature,
        humidity,
        instant,
    ))
}

/// Envelope city, then nested city, then whatever the caller asked for.
fn resolve_city(payload: &Value, data: &Value, requested_city: &str) -> String {
    [payload.get("ciudad"), data.get("ciudad")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|c| !c.is_empty())
        .unwrap_or(requested_city)
        .to_string()
}

fn probe_value<'a>(data: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| data.get(*alias))
}

/// First present alias as a number; numeric strings are tolerated.
fn probe_number(data: &Value, aliases: &[&str]) -> Option<f64> {
    let value = probe_value(data, aliases)?;
    if let Some(number) = value.as_f64() {
        return Some(number);
    }
    value.as_str().and_then(|text| text.trim().parse().ok())
}

/// Concentrations are non-negative; absent or garbled values become zero.
fn probe_concentration(data: &Value, aliases: &[&str]) -> f64 {
    probe_number(data, aliases)
        .filter(|n| n.is_finite())
        .map(|n| n.max(0.0))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::domain::air_quality::AirQualityLevel;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_600_000_000_000).unwrap()
    }

    #[test]
    fn normalizes_a_complete_payload() {
        let payload = json!({
            "ok": true,
            "ciudad": "morelia",
            "datos": {"pm2_5": 40.0, "timestamp": 1_700_000_000_000_i64},
        });

        let reading = normalize_reading_at(&payload, "fallback", fixed_now()).unwrap();
        assert_eq!(reading.city, "morelia");
        assert_eq!(reading.levels.pm25, 40.0);
        assert_eq!(reading.levels.pm10, 0.0);
        assert_eq!(reading.levels.o3, 0.0);
        assert_eq!(reading.classification.category, AirQualityLevel::Poor);
        assert_eq!(reading.timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn failure_envelopes_yield_none() {
        assert!(normalize_reading_at(&json!({"ok": false}), "x", fixed_now()).is_none());
        assert!(normalize_reading_at(&json!({"ok": true}), "x", fixed_now()).is_none());
        assert!(normalize_reading_at(&json!({"datos": {}}), "x", fixed_now()).is_none());
        assert!(
            normalize_reading_at(&json!({"ok": true, "datos": "garbage"}), "x", fixed_now())
                .is_none()
        );
    }

    #[test]
    fn aliases_are_probed_in_order() {
        let payload = json!({
            "ok": true,
            "datos": {"pm25": 10.0, "pm2_5": 99.0},
        });
        let reading = normalize_reading_at(&payload, "x", fixed_now()).unwrap();
        assert_eq!(reading.levels.pm25, 10.0);

        let payload = json!({
            "ok": true,
            "datos": {"PM25": 22.0, "PM10": 31.0, "temperatura": 18.5},
        });
        let reading = normalize_reading_at(&payload, "x", fixed_now()).unwrap();
        assert_eq!(reading.levels.pm25, 22.0);
        assert_eq!(reading.levels.pm10, 31.0);
        assert_eq!(reading.temperature, 18.5);
    }

    #[test]
    fn city_resolution_prefers_the_envelope() {
        let payload = json!({
            "ok": true,
            "ciudad": "patzcuaro",
            "datos": {"ciudad": "taretan"},
        });
        let reading = normalize_reading_at(&payload, "requested", fixed_now()).unwrap();
        assert_eq!(reading.city, "patzcuaro");

        let payload = json!({"ok": true, "datos": {"ciudad": "taretan"}});
        let reading = normalize_reading_at(&payload, "requested", fixed_now()).unwrap();
        assert_eq!(reading.city, "taretan");

        let payload = json!({"ok": true, "datos": {}});
        let reading = normalize_reading_at(&payload, "requested", fixed_now()).unwrap();
        assert_eq!(reading.city, "requested");
    }

    #[test]
    fn timestamp_keys_are_probed_in_order() {
        let payload = json!({
            "ok": true,
            "datos": {
                "timestamp": 1_700_000_000_000_i64,
                "fecha": "2020-01-01T00:00:00Z",
            },
        });
        let reading = normalize_reading_at(&payload, "x", fixed_now()).unwrap();
        assert_eq!(reading.timestamp.timestamp_millis(), 1_700_000_000_000);

        let payload = json!({
            "ok": true,
            "datos": {"timestamp_firestore": {"seconds": 1_700_000_000, "nanoseconds": 0}},
        });
        let reading = normalize_reading_at(&payload, "x", fixed_now()).unwrap();
        assert_eq!(reading.timestamp.timestamp_millis(), 1_700_000_000_000);

        let payload = json!({"ok": true, "datos": {"fecha": "2023-11-14T22:13:20Z"}});
        let reading = normalize_reading_at(&payload, "x", fixed_now()).unwrap();
        assert_eq!(reading.timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn missing_timestamp_defaults_to_now() {
        let payload = json!({"ok": true, "datos": {"pm25": 5.0}});
        let reading = normalize_reading_at(&payload, "x", fixed_now()).unwrap();
        assert_eq!(reading.timestamp, fixed_now());
    }

    #[test]
    fn concentrations_are_clamped_but_temperature_is_not() {
        let payload = json!({
            "ok": true,
            "datos": {"pm25": -3.0, "temperatura": -5.5, "humedad": "61.5"},
        });
        let reading = normalize_reading_at(&payload, "x", fixed_now()).unwrap();
        assert_eq!(reading.levels.pm25, 0.0);
        assert_eq!(reading.temperature, -5.5);
        assert_eq!(reading.humidity, 61.5);
    }
}
