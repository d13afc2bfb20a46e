// HTTP request handlers
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::application::sensor_gateway::FetchError;
use crate::application::ui_settings::{DisplaySettings, style_directives};
use crate::infrastructure::json_stream::stream_from_receiver;
use crate::presentation::app_state::AppState;

#[derive(Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

#[derive(Deserialize)]
pub struct MonthsQuery {
    pub months: Option<u32>,
}

#[derive(Deserialize)]
pub struct LiveQuery {
    pub interval_ms: Option<u64>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// "No data" response with the actions the view offers: retry, or fall
/// back to the default city.
fn not_found_response(city: &str, fallback_city: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "kind": "not_found",
            "message": format!("no data available for {city}"),
            "retry": true,
            "fallback_city": fallback_city,
        })),
    )
        .into_response()
}

/// Fetch failures render an inline panel body, never a bare status.
fn error_response(err: FetchError) -> Response {
    let (kind, message) = match &err {
        FetchError::Network { .. } => (
            "network",
            "could not reach the sensor service, please retry",
        ),
        FetchError::Upstream { .. } if err.is_server_failure() => {
            ("server", "temporary technical problem, try again later")
        }
        FetchError::Upstream { .. } => ("upstream", "the sensor service rejected the request"),
    };

    tracing::warn!("upstream fetch failed: {err}");
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "kind": kind,
            "message": message,
            "detail": err.to_string(),
            "retry": true,
        })),
    )
        .into_response()
}

/// Latest reading across the network, no city filter
pub async fn latest_reading(State(state): State<Arc<AppState>>) -> Response {
    match state.gateway.latest_reading().await {
        Ok(Some(reading)) => Json(reading).into_response(),
        Ok(None) => not_found_response("the sensor network", &state.default_city),
        Err(e) => error_response(e),
    }
}

/// Latest reading for one city
pub async fn city_reading(
    Path(city): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.gateway.reading_for_city(&city).await {
        Ok(Some(reading)) => Json(reading).into_response(),
        Ok(None) => not_found_response(&city, &state.default_city),
        Err(e) => error_response(e),
    }
}

/// List known cities
pub async fn list_cities(State(state): State<Arc<AppState>>) -> Response {
    match state.gateway.list_cities().await {
        Ok(cities) => Json(cities).into_response(),
        Err(e) => error_response(e),
    }
}

/// Sensor network status, passed through from the API
pub async fn network_status(State(state): State<Arc<AppState>>) -> Response {
    match state.gateway.network_status().await {
        Ok(status) => Json(status).into_response(),
        Err(e) => error_response(e),
    }
}

/// Composite dashboard snapshot for one city
pub async fn get_dashboard(
    Path(city): Path<String>,
    Query(query): Query<DaysQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let days = query.days.unwrap_or(7);
    match state.dashboard_service.snapshot(&city, days).await {
        Ok(snapshot) if snapshot.reading.is_some() => Json(snapshot).into_response(),
        Ok(_) => not_found_response(&city, &state.default_city),
        Err(e) => error_response(e),
    }
}

/// Live reading feed for one city (chunked NDJSON)
pub async fn stream_live(
    Path(city): Path<String>,
    Query(query): Query<LiveQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let interval = query.interval_ms.map(Duration::from_millis);
    let rx = state.live_service.stream_city(&city, interval);
    stream_from_receiver(rx)
}

/// Multi-day forecast
pub async fn get_forecast(
    Path(city): Path<String>,
    Query(query): Query<DaysQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let days = query.days.unwrap_or(7);
    match state.gateway.forecast(&city, days).await {
        Ok(Some(forecast)) => Json(forecast).into_response(),
        Ok(None) => not_found_response(&city, &state.default_city),
        Err(e) => error_response(e),
    }
}

/// Short-horizon forecast
pub async fn get_quick_forecast(
    Path(city): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.gateway.quick_forecast(&city).await {
        Ok(Some(forecast)) => Json(forecast).into_response(),
        Ok(None) => not_found_response(&city, &state.default_city),
        Err(e) => error_response(e),
    }
}

/// Historical pattern summary
pub async fn get_patterns(
    Path(city): Path<String>,
    Query(query): Query<MonthsQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let months = query.months.unwrap_or(3);
    match state.gateway.patterns(&city, months).await {
        Ok(Some(patterns)) => Json(patterns).into_response(),
        Ok(None) => not_found_response(&city, &state.default_city),
        Err(e) => error_response(e),
    }
}

/// Narrative recommendations with extracted main points
pub async fn get_recommendations(
    Path(city): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.gateway.recommendations(&city).await {
        Ok(Some(recommendation)) => Json(json!({
            "city": recommendation.city,
            "text": recommendation.text,
            "main_points": recommendation.main_points(),
        }))
        .into_response(),
        Ok(None) => not_found_response(&city, &state.default_city),
        Err(e) => error_response(e),
    }
}

/// Pollutant-focused analysis
pub async fn get_pollutant_analysis(
    Path(city): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.gateway.pollutant_analysis(&city).await {
        Ok(Some(analysis)) => Json(analysis).into_response(),
        Ok(None) => not_found_response(&city, &state.default_city),
        Err(e) => error_response(e),
    }
}

/// Short recommendation
pub async fn get_quick_recommendation(
    Path(city): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.gateway.quick_recommendation(&city).await {
        Ok(Some(recommendation)) => Json(recommendation).into_response(),
        Ok(None) => not_found_response(&city, &state.default_city),
        Err(e) => error_response(e),
    }
}

/// Aggregate recommendation stats, passed through from the API
pub async fn recommendation_stats(State(state): State<Arc<AppState>>) -> Response {
    match state.gateway.recommendation_stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => error_response(e),
    }
}

/// Current display settings plus the style directives they imply
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Response {
    let settings = state.ui_settings.load();
    Json(json!({
        "settings": settings,
        "directives": style_directives(&settings),
    }))
    .into_response()
}

/// Replace the persisted display settings wholesale
pub async fn put_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<DisplaySettings>,
) -> Response {
    state.ui_settings.save(&settings);
    Json(json!({
        "settings": settings,
        "directives": style_directives(&settings),
    }))
    .into_response()
}

/// Remove every persisted display setting
pub async fn delete_settings(State(state): State<Arc<AppState>>) -> StatusCode {
    state.ui_settings.reset();
    StatusCode::NO_CONTENT
}
