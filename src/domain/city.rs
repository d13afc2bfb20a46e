// City domain model
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub total_measurements: u64,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_update: Option<DateTime<Utc>>,
}

impl City {
    pub fn new(
        id: String,
        name: Option<String>,
        total_measurements: u64,
        last_update: Option<DateTime<Utc>>,
    ) -> Self {
        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| Self::format_name(&id));
        Self {
            id,
            name,
            total_measurements,
            last_update,
        }
    }

    fn format_name(id: &str) -> String {
        // Convert "lazaro_cardenas_" to "lazaro cardenas"
        id.trim_end_matches('_').replace('_', " ")
    }
}
