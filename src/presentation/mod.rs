// Presentation layer - HTTP surface consumed by the view
pub mod app_state;
pub mod handlers;
