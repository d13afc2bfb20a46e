// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::live_service::LiveFeedService;
use crate::application::ui_settings::UiSettingsService;
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::config::load_config;
use crate::infrastructure::settings_store::FileSettingsStore;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    city_reading, delete_settings, get_dashboard, get_forecast, get_patterns,
    get_pollutant_analysis, get_quick_forecast, get_quick_recommendation, get_recommendations,
    get_settings, health_check, latest_reading, list_cities, network_status, put_settings,
    recommendation_stats, stream_live,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_config()?;

    // Create gateway (infrastructure layer)
    let gateway = Arc::new(ApiClient::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.api.timeout_secs),
    )?);

    // Create services (application layer)
    let dashboard_service = DashboardService::new(gateway.clone());
    let live_service = LiveFeedService::new(
        gateway.clone(),
        Duration::from_millis(config.polling.interval_ms),
    );
    let settings_store = Arc::new(FileSettingsStore::open(&config.ui.settings_path)?);
    let ui_settings = UiSettingsService::new(settings_store);

    // Create application state
    let state = Arc::new(AppState {
        gateway,
        dashboard_service,
        live_service,
        ui_settings,
        default_city: config.polling.default_city.clone(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/cities", get(list_cities))
        .route("/status", get(network_status))
        .route("/readings/latest", get(latest_reading))
        .route("/readings/:city", get(city_reading))
        .route("/dashboards/:city", get(get_dashboard))
        .route("/live/:city", get(stream_live))
        .route("/forecast/:city", get(get_forecast))
        .route("/forecast/:city/quick", get(get_quick_forecast))
        .route("/patterns/:city", get(get_patterns))
        .route("/recommendations/:city", get(get_recommendations))
        .route("/recommendations/:city/pollutants", get(get_pollutant_analysis))
        .route("/recommendations/:city/quick", get(get_quick_recommendation))
        .route("/stats/recommendations", get(recommendation_stats))
        .route(
            "/settings",
            get(get_settings).put(put_settings).delete(delete_settings),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("starting aire-dashboard service on {addr}");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
