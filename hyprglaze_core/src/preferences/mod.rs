//! User preferences: the persisted record, partial updates and the store

mod storage;
mod store;

pub use storage::{JsonFileStorage, KeyValueStore, MemoryStorage};
pub use store::{PreferenceStore, SubscriptionId};

use crate::theme::{ThemeId, ThemeMode};
use serde::{Deserialize, Serialize};

/// Storage key of the theme mode string
pub const THEME_MODE_KEY: &str = "hyprglaze-theme-mode";
/// Storage key of the theme preset string
pub const THEME_PRESET_KEY: &str = "hyprglaze-theme-preset";
/// Storage key of the JSON blob holding the remaining sections
pub const CONFIG_KEY: &str = "hyprglaze-config";

/// Everything the user can change at runtime
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: ThemePreferences,
    pub weather: WeatherPreferences,
    pub ui: UiPreferences,
    pub performance: PerformancePreferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreferences {
    pub mode: ThemeMode,
    pub preset: ThemeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherPreferences {
    #[serde(rename = "updateInterval")]
    pub update_interval_ms: u64,
    #[serde(rename = "apiTimeout")]
    pub api_timeout_ms: u64,
    pub enable_geolocation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPreferences {
    pub show_seconds: bool,
    #[serde(rename = "animationDuration")]
    pub animation_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePreferences {
    pub enable_lazy_loading: bool,
    #[serde(rename = "debounceDelay")]
    pub debounce_delay_ms: u64,
}

impl Default for WeatherPreferences {
    fn default() -> Self {
        Self {
            update_interval_ms: 30 * 60 * 1000,
            api_timeout_ms: 10_000,
            enable_geolocation: true,
        }
    }
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            show_seconds: false,
            animation_duration_ms: 300,
        }
    }
}

impl Default for PerformancePreferences {
    fn default() -> Self {
        Self {
            enable_lazy_loading: true,
            debounce_delay_ms: 300,
        }
    }
}

/// Partial update; every absent field keeps its current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemePatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformancePatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemePatch {
    pub mode: Option<ThemeMode>,
    pub preset: Option<ThemeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherPatch {
    #[serde(rename = "updateInterval")]
    pub update_interval_ms: Option<u64>,
    #[serde(rename = "apiTimeout")]
    pub api_timeout_ms: Option<u64>,
    pub enable_geolocation: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiPatch {
    pub show_seconds: Option<bool>,
    #[serde(rename = "animationDuration")]
    pub animation_duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformancePatch {
    pub enable_lazy_loading: Option<bool>,
    #[serde(rename = "debounceDelay")]
    pub debounce_delay_ms: Option<u64>,
}

impl PreferencesPatch {
    pub fn theme_preset(preset: ThemeId) -> Self {
        Self {
            theme: Some(ThemePatch {
                preset: Some(preset),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn theme_mode(mode: ThemeMode) -> Self {
        Self {
            theme: Some(ThemePatch {
                mode: Some(mode),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn ui(ui: UiPatch) -> Self {
        Self {
            ui: Some(ui),
            ..Default::default()
        }
    }

    pub fn weather(weather: WeatherPatch) -> Self {
        Self {
            weather: Some(weather),
            ..Default::default()
        }
    }

    /// Merge into `prefs`, section by section
    pub fn apply_to(&self, prefs: &mut Preferences) {
        if let Some(theme) = &self.theme {
            if let Some(mode) = theme.mode {
                prefs.theme.mode = mode;
            }
            if let Some(preset) = theme.preset {
                prefs.theme.preset = preset;
            }
        }
        if let Some(weather) = &self.weather {
            if let Some(v) = weather.update_interval_ms {
                prefs.weather.update_interval_ms = v;
            }
            if let Some(v) = weather.api_timeout_ms {
                prefs.weather.api_timeout_ms = v;
            }
            if let Some(v) = weather.enable_geolocation {
                prefs.weather.enable_geolocation = v;
            }
        }
        if let Some(ui) = &self.ui {
            if let Some(v) = ui.show_seconds {
                prefs.ui.show_seconds = v;
            }
            if let Some(v) = ui.animation_duration_ms {
                prefs.ui.animation_duration_ms = v;
            }
        }
        if let Some(performance) = &self.performance {
            if let Some(v) = performance.enable_lazy_loading {
                prefs.performance.enable_lazy_loading = v;
            }
            if let Some(v) = performance.debounce_delay_ms {
                prefs.performance.debounce_delay_ms = v;
            }
        }
    }
}

/// Sections stored together under [`CONFIG_KEY`]
#[derive(Debug, Serialize)]
struct StoredConfig<'a> {
    weather: &'a WeatherPreferences,
    ui: &'a UiPreferences,
    performance: &'a PerformancePreferences,
}
