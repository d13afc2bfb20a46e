// Relative time formatting for reading freshness
use chrono::{DateTime, Utc};

/// Render how long ago a reading was taken, relative to `now`. Beyond a day
/// the relative phrasing stops being useful, so the full date is shown
/// instead.
pub fn format_relative(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = now.signed_duration_since(instant).num_minutes();

    if minutes < 1 {
        "updated now".to_string()
    } else if minutes < 60 {
        format!("updated {minutes} min ago")
    } else if minutes < 1440 {
        format!("updated {} h ago", minutes / 60)
    } else {
        instant.format("%A, %B %d, %Y, %H:%M").to_string()
    }
}

/// Freshness label for an optional instant; a reading with no usable
/// timestamp renders as an unknown date rather than failing.
pub fn format_last_updated(instant: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match instant {
        Some(instant) => format_relative(instant, now),
        None => "unknown date".to_string(),
    }
}
