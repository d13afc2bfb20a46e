// Canonical sensor reading produced by payload normalization
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::air_quality::{self, Classification};

/// Alias-resolved pollutant concentrations (µg/m³, CO2 in ppm). Absent
/// fields default to zero.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PollutantLevels {
    pub pm25: f64,
    pub pm10: f64,
    pub pm1: f64,
    pub co2: f64,
    pub no2: f64,
    pub o3: f64,
    pub co: f64,
    pub so2: f64,
}

/// The normalized sensor record consumed by the view layer.
///
/// A reading is a pure projection of one raw payload plus the instant it was
/// normalized at; it is created fresh on every poll result and never
/// mutated, so the derived classification cannot go stale.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalReading {
    pub city: String,
    #[serde(flatten)]
    pub levels: PollutantLevels,
    pub temperature: f64,
    pub humidity: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub classification: Classification,
}

impl CanonicalReading {
    pub fn new(
        city: String,
        levels: PollutantLevels,
        temperature: f64,
        humidity: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let classification = air_quality::classify(levels.pm25);
        Self {
            city,
            levels,
            temperature,
            humidity,
            timestamp,
            classification,
        }
    }
}
