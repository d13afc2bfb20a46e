// Application layer - Use cases and ports
pub mod dashboard_service;
pub mod live_service;
pub mod polling;
pub mod sensor_gateway;
pub mod ui_settings;
