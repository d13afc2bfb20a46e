// Gateway trait for the remote sensor and forecasting API
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::city::City;
use crate::domain::forecast::{PatternSummary, QuickForecast, WeeklyForecast};
use crate::domain::reading::CanonicalReading;
use crate::domain::recommendation::{PollutantAnalysis, Recommendation};

/// Failure modes for an upstream fetch. "No data for this city" is not an
/// error; gateways report it as `Ok(None)` and callers treat it as not
/// found.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network failure: {message}")]
    Network { message: String },
    #[error("upstream service returned status {status}")]
    Upstream { status: u16 },
}

impl FetchError {
    pub fn is_server_failure(&self) -> bool {
        matches!(self, FetchError::Upstream { status } if *status >= 500)
    }
}

#[async_trait]
pub trait SensorGateway: Send + Sync {
    /// Latest reading across the whole network, no city filter.
    async fn latest_reading(&self) -> Result<Option<CanonicalReading>, FetchError>;

    /// Latest reading for one city.
    async fn reading_for_city(&self, city: &str) -> Result<Option<CanonicalReading>, FetchError>;

    /// Known city identifiers with metadata.
    async fn list_cities(&self) -> Result<Vec<City>, FetchError>;

    /// Sensor network status; schema is owned by the API and passed through.
    async fn network_status(&self) -> Result<Value, FetchError>;

    /// Multi-day forecast.
    async fn forecast(&self, city: &str, days: u32) -> Result<Option<WeeklyForecast>, FetchError>;

    /// Short-horizon forecast.
    async fn quick_forecast(&self, city: &str) -> Result<Option<QuickForecast>, FetchError>;

    /// Historical pattern summary over the given number of months.
    async fn patterns(&self, city: &str, months: u32)
        -> Result<Option<PatternSummary>, FetchError>;

    /// Narrative recommendations.
    async fn recommendations(&self, city: &str) -> Result<Option<Recommendation>, FetchError>;

    /// Pollutant-focused analysis.
    async fn pollutant_analysis(&self, city: &str)
        -> Result<Option<PollutantAnalysis>, FetchError>;

    /// Short recommendation.
    async fn quick_recommendation(&self, city: &str)
        -> Result<Option<Recommendation>, FetchError>;

    /// Aggregate recommendation stats; schema passed through.
    async fn recommendation_stats(&self) -> Result<Value, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_failures_are_5xx_only() {
        assert!(FetchError::Upstream { status: 500 }.is_server_failure());
        assert!(FetchError::Upstream { status: 503 }.is_server_failure());
        assert!(!FetchError::Upstream { status: 418 }.is_server_failure());
        assert!(
            !FetchError::Network {
                message: "connection refused".to_string()
            }
            .is_server_failure()
        );
    }
}
