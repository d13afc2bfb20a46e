// HTTP client for the remote sensor, forecasting and recommendation API
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::application::sensor_gateway::{FetchError, SensorGateway};
use crate::domain::city::City;
use crate::domain::forecast::{PatternSummary, QuickForecast, WeeklyForecast};
use crate::domain::reading::CanonicalReading;
use crate::domain::recommendation::{PollutantAnalysis, Recommendation};
use crate::domain::timestamp;
use crate::infrastructure::normalize;

// City used when the network-wide latest reading carries no city of its own.
const UNKNOWN_CITY: &str = "ubicacion_desconocida";

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RawCity {
    id: String,
    #[serde(default)]
    nombre: Option<String>,
    #[serde(default)]
    total_mediciones: Option<u64>,
    #[serde(default)]
    ultima_actualizacion: Option<Value>,
}

impl ApiClient {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json(&self, path_and_query: &str) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, path_and_query);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GET {url} returned {status}");
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| FetchError::Network {
            message: format!("invalid response body: {e}"),
        })
    }

    /// 404 means "no data" for every endpoint on this API.
    async fn get_optional(&self, path_and_query: &str) -> Result<Option<Value>, FetchError> {
        match self.get_json(path_and_query).await {
            Ok(payload) => Ok(Some(payload)),
            Err(FetchError::Upstream { status: 404 }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Unwrap a success envelope: `ok` must be true, then the first present
/// nested key is taken, falling back to the envelope itself (some endpoints
/// inline their payload at the top level).
fn success_payload(payload: Value, nested_keys: &[&str]) -> Option<Value> {
    if !payload.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return None;
    }
    for key in nested_keys {
        if let Some(nested) = payload.get(*key) {
            return Some(nested.clone());
        }
    }
    Some(payload)
}

/// Best-effort typed parse; a shape mismatch degrades to the type's
/// defaults rather than surfacing an error.
fn lenient<T: for<'de> Deserialize<'de> + Default>(value: Value) -> T {
    serde_json::from_value(value).unwrap_or_default()
}

#[async_trait]
impl SensorGateway for ApiClient {
    async fn latest_reading(&self) -> Result<Option<CanonicalReading>, FetchError> {
        let Some(payload) = self.get_optional("/sensores/ultima").await? else {
            return Ok(None);
        };
        Ok(normalize::normalize_reading(&payload, UNKNOWN_CITY))
    }

    async fn reading_for_city(&self, city: &str) -> Result<Option<CanonicalReading>, FetchError> {
        let path = format!("/sensores/ciudad?ciudad={}", urlencoding::encode(city));
        let Some(payload) = self.get_optional(&path).await? else {
            return Ok(None);
        };
        Ok(normalize::normalize_reading(&payload, city))
    }

    async fn list_cities(&self) -> Result<Vec<City>, FetchError> {
        let payload = self.get_json("/sensores/ciudades").await?;
        let Some(raw) = success_payload(payload, &["ciudades"]) else {
            return Ok(Vec::new());
        };

        let raw_cities: Vec<RawCity> = lenient(raw);
        let cities = raw_cities
            .into_iter()
            .map(|c| {
                let last_update = c
                    .ultima_actualizacion
                    .as_ref()
                    .map(|v| timestamp::normalize(Some(v)));
                City::new(
                    c.id,
                    c.nombre,
                    c.total_mediciones.unwrap_or(0),
                    last_update,
                )
            })
            .collect();
        Ok(cities)
    }

    async fn network_status(&self) -> Result<Value, FetchError> {
        self.get_json("/sensores/estado").await
    }

    async fn forecast(&self, city: &str, days: u32) -> Result<Option<WeeklyForecast>, FetchError> {
        let path = format!(
            "/prediccion?ciudad={}&dias={days}&formato=json",
            urlencoding::encode(city)
        );
        let Some(payload) = self.get_optional(&path).await? else {
            return Ok(None);
        };
        Ok(success_payload(payload, &["prediccion"]).map(lenient))
    }

    async fn quick_forecast(&self, city: &str) -> Result<Option<QuickForecast>, FetchError> {
        let path = format!("/prediccion/rapida?ciudad={}", urlencoding::encode(city));
        let Some(payload) = self.get_optional(&path).await? else {
            return Ok(None);
        };
        Ok(success_payload(payload, &[]).map(lenient))
    }

    async fn patterns(
        &self,
        city: &str,
        months: u32,
    ) -> Result<Option<PatternSummary>, FetchError> {
        let path = format!(
            "/prediccion/patrones?ciudad={}&meses={months}",
            urlencoding::encode(city)
        );
        let Some(payload) = self.get_optional(&path).await? else {
            return Ok(None);
        };
        Ok(success_payload(payload, &[]).map(lenient))
    }

    async fn recommendations(&self, city: &str) -> Result<Option<Recommendation>, FetchError> {
        let path = format!("/recomendaciones?ciudad={}", urlencoding::encode(city));
        let Some(payload) = self.get_optional(&path).await? else {
            return Ok(None);
        };
        Ok(success_payload(payload, &[]).map(lenient))
    }

    async fn pollutant_analysis(
        &self,
        city: &str,
    ) -> Result<Option<PollutantAnalysis>, FetchError> {
        let path = format!(
            "/recomendaciones/contaminantes?ciudad={}",
            urlencoding::encode(city)
        );
        let Some(payload) = self.get_optional(&path).await? else {
            return Ok(None);
        };
        Ok(success_payload(payload, &[]).map(lenient))
    }

    async fn quick_recommendation(
        &self,
        city: &str,
    ) -> Result<Option<Recommendation>, FetchError> {
        let path = format!(
            "/recomendaciones/rapidas?ciudad={}",
            urlencoding::encode(city)
        );
        let Some(payload) = self.get_optional(&path).await? else {
            return Ok(None);
        };
        Ok(success_payload(payload, &[]).map(lenient))
    }

    async fn recommendation_stats(&self) -> Result<Value, FetchError> {
        self.get_json("/recomendaciones/estadisticas").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new(
            "http://localhost:3000/api/".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:3000/api");
    }

    #[test]
    fn success_payload_unwraps_nested_keys() {
        let payload = json!({"ok": true, "prediccion": {"confianza": "Alta"}});
        let nested = success_payload(payload, &["prediccion"]).unwrap();
        assert_eq!(nested["confianza"], "Alta");
    }

    #[test]
    fn success_payload_falls_back_to_the_envelope() {
        let payload = json!({"ok": true, "proximasHoras": []});
        let nested = success_payload(payload.clone(), &[]).unwrap();
        assert_eq!(nested, payload);
    }

    #[test]
    fn failure_envelope_is_rejected() {
        assert!(success_payload(json!({"ok": false}), &[]).is_none());
        assert!(success_payload(json!({}), &[]).is_none());
    }

    #[test]
    fn lenient_parse_degrades_to_defaults() {
        let forecast: WeeklyForecast = lenient(json!({"tendenciaSemanal": "not-a-list"}));
        assert!(forecast.daily.is_empty());

        let forecast: WeeklyForecast = lenient(json!({
            "tendenciaSemanal": [{"dia": "lunes", "pm25": 12.5, "tendencia": "↓"}],
        }));
        assert_eq!(forecast.daily.len(), 1);
    }
}
