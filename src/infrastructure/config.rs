// Runtime configuration loaded from file and environment
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub polling: PollingSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_city")]
    pub default_city: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiSettings {
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_interval_ms() -> u64 {
    30_000
}

fn default_city() -> String {
    "morelia".to_string()
}

fn default_settings_path() -> String {
    "config/ui-settings.toml".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            default_city: default_city(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
        }
    }
}

/// Optional TOML file plus AIRE_-prefixed environment variables, e.g.
/// `AIRE_API__BASE_URL` overrides `api.base_url`.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("AIRE").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
