// Application state for HTTP handlers
use std::sync::Arc;

use crate::application::dashboard_service::DashboardService;
use crate::application::live_service::LiveFeedService;
use crate::application::sensor_gateway::SensorGateway;
use crate::application::ui_settings::UiSettingsService;

pub struct AppState {
    pub gateway: Arc<dyn SensorGateway>,
    pub dashboard_service: DashboardService,
    pub live_service: LiveFeedService,
    pub ui_settings: UiSettingsService,
    pub default_city: String,
}
