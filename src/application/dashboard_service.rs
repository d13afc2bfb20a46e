// Dashboard service - Use case for composing a city dashboard
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::application::sensor_gateway::{FetchError, SensorGateway};
use crate::domain::air_quality;
use crate::domain::forecast::{self, QuickForecast, WeeklyForecast};
use crate::domain::format;
use crate::domain::reading::CanonicalReading;
use crate::domain::recommendation::Recommendation;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub city: String,
    pub reading: Option<CanonicalReading>,
    pub forecast: Option<WeeklyForecast>,
    pub quick_forecast: Option<QuickForecast>,
    pub recommendation: Option<Recommendation>,
    pub insights: Vec<String>,
    pub quality_percent: Option<u8>,
    pub last_updated: String,
}

#[derive(Clone)]
pub struct DashboardService {
    gateway: Arc<dyn SensorGateway>,
}

impl DashboardService {
    pub fn new(gateway: Arc<dyn SensorGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch everything a city dashboard shows in one concurrent sweep.
    /// Only the reading fetch is fatal; forecast and recommendation
    /// sections degrade to empty with a warning.
    pub async fn snapshot(&self, city: &str, days: u32) -> Result<DashboardSnapshot, FetchError> {
        let (reading, weekly, quick, recommendation) = tokio::join!(
            self.gateway.reading_for_city(city),
            self.gateway.forecast(city, days),
            self.gateway.quick_forecast(city),
            self.gateway.quick_recommendation(city),
        );

        let reading = reading?;
        let weekly = weekly.unwrap_or_else(|e| {
            tracing::warn!("forecast for {city} unavailable: {e}");
            None
        });
        let quick = quick.unwrap_or_else(|e| {
            tracing::warn!("quick forecast for {city} unavailable: {e}");
            None
        });
        let recommendation = recommendation.unwrap_or_else(|e| {
            tracing::warn!("recommendation for {city} unavailable: {e}");
            None
        });

        let insights = weekly.as_ref().map(forecast::insights).unwrap_or_default();
        let quality_percent = reading
            .as_ref()
            .map(|r| air_quality::quality_percent(r.levels.pm25));
        let last_updated =
            format::format_last_updated(reading.as_ref().map(|r| r.timestamp), Utc::now());

        Ok(DashboardSnapshot {
            city: city.to_string(),
            reading,
            forecast: weekly,
            quick_forecast: quick,
            recommendation,
            insights,
            quality_percent,
            last_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    use crate::domain::city::City;
    use crate::domain::forecast::{ForecastSummary, PatternSummary};
    use crate::domain::recommendation::PollutantAnalysis;
    use crate::infrastructure::normalize;

    struct FakeGateway {
        forecast_fails: bool,
    }

    #[async_trait]
    impl SensorGateway for FakeGateway {
        async fn latest_reading(&self) -> Result<Option<CanonicalReading>, FetchError> {
            Ok(None)
        }

        async fn reading_for_city(
            &self,
            city: &str,
        ) -> Result<Option<CanonicalReading>, FetchError> {
            let payload = json!({
                "ok": true,
                "ciudad": city,
                "datos": {"pm2_5": 40.0, "timestamp": 1_700_000_000_000_i64},
            });
            Ok(normalize::normalize_reading(&payload, city))
        }

        async fn list_cities(&self) -> Result<Vec<City>, FetchError> {
            Ok(Vec::new())
        }

        async fn network_status(&self) -> Result<Value, FetchError> {
            Ok(Value::Null)
        }

        async fn forecast(
            &self,
            _city: &str,
            _days: u32,
        ) -> Result<Option<WeeklyForecast>, FetchError> {
            if self.forecast_fails {
                return Err(FetchError::Upstream { status: 500 });
            }
            Ok(Some(WeeklyForecast {
                summary: Some(ForecastSummary {
                    good_days: 5,
                    moderate_days: 1,
                    poor_days: 1,
                }),
                ..Default::default()
            }))
        }

        async fn quick_forecast(&self, _city: &str) -> Result<Option<QuickForecast>, FetchError> {
            Ok(Some(QuickForecast::default()))
        }

        async fn patterns(
            &self,
            _city: &str,
            _months: u32,
        ) -> Result<Option<PatternSummary>, FetchError> {
            Ok(None)
        }

        async fn recommendations(&self, _city: &str) -> Result<Option<Recommendation>, FetchError> {
            Ok(None)
        }

        async fn pollutant_analysis(
            &self,
            _city: &str,
        ) -> Result<Option<PollutantAnalysis>, FetchError> {
            Ok(None)
        }

        async fn quick_recommendation(
            &self,
            city: &str,
        ) -> Result<Option<Recommendation>, FetchError> {
            Ok(Some(Recommendation {
                city: city.to_string(),
                text: "• Keep windows closed this afternoon".to_string(),
            }))
        }

        async fn recommendation_stats(&self) -> Result<Value, FetchError> {
            Ok(Value::Null)
        }
    }

    #[tokio::test]
    async fn snapshot_composes_all_sections() {
        let service = DashboardService::new(Arc::new(FakeGateway {
            forecast_fails: false,
        }));
        let snapshot = service.snapshot("morelia", 7).await.unwrap();

        assert_eq!(snapshot.city, "morelia");
        assert_eq!(snapshot.reading.as_ref().unwrap().levels.pm25, 40.0);
        assert!(snapshot.forecast.is_some());
        assert!(snapshot.recommendation.is_some());
        assert!(snapshot.insights.iter().any(|l| l.contains("1 day(s)")));
        assert_eq!(snapshot.quality_percent, Some(73));
    }

    #[tokio::test]
    async fn failed_forecast_degrades_to_empty() {
        let service = DashboardService::new(Arc::new(FakeGateway {
            forecast_fails: true,
        }));
        let snapshot = service.snapshot("morelia", 7).await.unwrap();

        assert!(snapshot.reading.is_some());
        assert!(snapshot.forecast.is_none());
        assert!(snapshot.insights.is_empty());
    }
}
