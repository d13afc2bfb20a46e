// Display and accessibility preferences with pluggable persistence
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub const FONT_SIZE_KEY: &str = "accessibility-fontSize";
pub const HIGH_CONTRAST_KEY: &str = "accessibility-highContrast";
pub const THEME_KEY: &str = "theme";
pub const CONTRAST_KEY: &str = "contrast";
pub const FONT_KEY: &str = "font-size";

const ALL_KEYS: &[&str] = &[
    FONT_SIZE_KEY,
    HIGH_CONTRAST_KEY,
    THEME_KEY,
    CONTRAST_KEY,
    FONT_KEY,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Explicit display configuration. Font scale is a percentage of the root
/// font size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub font_scale: u32,
    pub high_contrast: bool,
    pub theme: ThemeMode,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            font_scale: 100,
            high_contrast: false,
            theme: ThemeMode::Light,
        }
    }
}

/// Key-value persistence port. Values are plain strings, overwritten
/// wholesale on save and removed wholesale on reset.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Side-effect description for applying settings; the view layer executes
/// these against its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StyleDirective {
    RootFontPercent(u32),
    SetClass { name: String, enabled: bool },
    ColorScheme(ThemeMode),
}

/// Pure projection of a settings struct into the side effects the view
/// layer must apply.
pub fn style_directives(settings: &DisplaySettings) -> Vec<StyleDirective> {
    vec![
        StyleDirective::RootFontPercent(settings.font_scale),
        StyleDirective::SetClass {
            name: "high-contrast".to_string(),
            enabled: settings.high_contrast,
        },
        StyleDirective::ColorScheme(settings.theme),
    ]
}

#[derive(Clone)]
pub struct UiSettingsService {
    store: Arc<dyn SettingsStore>,
}

impl UiSettingsService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Load persisted settings, defaulting each missing or unparsable value.
    pub fn load(&self) -> DisplaySettings {
        let defaults = DisplaySettings::default();
        let font_scale = self
            .store
            .get(FONT_SIZE_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.font_scale);
        let high_contrast = self
            .store
            .get(HIGH_CONTRAST_KEY)
            .map(|v| v == "true")
            .unwrap_or(defaults.high_contrast);
        let theme = match self.store.get(THEME_KEY).as_deref() {
            Some("dark") => ThemeMode::Dark,
            Some(_) => ThemeMode::Light,
            None => defaults.theme,
        };

        DisplaySettings {
            font_scale,
            high_contrast,
            theme,
        }
    }

    pub fn save(&self, settings: &DisplaySettings) {
        self.store
            .set(FONT_SIZE_KEY, &settings.font_scale.to_string());
        self.store
            .set(HIGH_CONTRAST_KEY, &settings.high_contrast.to_string());
        let theme = match settings.theme {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        self.store.set(THEME_KEY, theme);
        let contrast = if settings.high_contrast { "high" } else { "normal" };
        self.store.set(CONTRAST_KEY, contrast);
        self.store.set(FONT_KEY, &settings.font_scale.to_string());
    }

    /// Drop every persisted key, returning the view to defaults.
    pub fn reset(&self) {
        for key in ALL_KEYS {
            self.store.remove(key);
        }
    }
}
