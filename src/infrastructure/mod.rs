// Infrastructure layer - External dependencies and adapters
pub mod api_client;
pub mod config;
pub mod json_stream;
pub mod normalize;
pub mod settings_store;
