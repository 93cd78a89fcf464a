//! Configuration management

use crate::constants::{app, intervals};
use crate::utils::{AppError, Result};
use hyprglaze_core::preferences::Preferences;
use hyprglaze_core::providers::TASK_MANAGER_COMMAND;
use hyprglaze_core::retry::RetryPolicy;
use hyprglaze_core::tiling::{AutoTilingOptions, TriggerMode, DEFAULT_ENDPOINT, DEFAULT_THRESHOLD};
use hyprglaze_core::weather::{
    Position, WeatherServiceConfig, DEFAULT_FORECAST_URL, DEFAULT_GEOCODE_URL,
    DEFAULT_IP_GEOLOCATION_URL,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    pub ui: UiConfig,
    pub weather: WeatherConfig,
    pub tiling: TilingConfig,
    pub system: SystemConfig,
    pub agent: AgentConfig,
    pub logging: LoggingConfig,
}

/// How the bar line is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    /// `%{F#rrggbb}` color tags understood by lemonbar
    Lemonbar,
}

/// UI-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub format: OutputFormat,
    /// Where the theme stylesheet is written; defaults next to the config file
    pub style_path: Option<PathBuf>,
    pub show_tray: bool,
    pub max_tray_icons: usize,
}

/// Weather widget configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub enabled: bool,
    pub forecast_url: String,
    pub geocode_url: String,
    pub ip_geolocation_url: String,
    /// Fixed coordinate; when absent the position comes from IP geolocation
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub cache_ttl_minutes: u64,
    pub max_attempts: u32,
}

/// Auto-tiling connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingConfig {
    pub enabled: bool,
    pub url: String,
    pub threshold: f64,
    pub trigger: TriggerMode,
}

/// System monitoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub update_interval_ms: u64,
    pub memory_warning_threshold: f32,
    pub cpu_warning_threshold: f32,
    /// Window manager command sent when the CPU/memory segment is clicked
    pub task_manager_command: String,
}

/// Link to the external metrics agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// File or FIFO that receives volume and tray commands as JSON lines;
    /// without it those commands are only logged
    pub command_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            style_path: None,
            show_tray: true,
            max_tray_icons: 8,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            ip_geolocation_url: DEFAULT_IP_GEOLOCATION_URL.to_string(),
            latitude: None,
            longitude: None,
            cache_ttl_minutes: 30,
            max_attempts: 3,
        }
    }
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_ENDPOINT.to_string(),
            threshold: DEFAULT_THRESHOLD,
            trigger: TriggerMode::default(),
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: intervals::SYSTEM_UPDATE,
            memory_warning_threshold: 0.8,
            cpu_warning_threshold: 0.8,
            task_manager_command: TASK_MANAGER_COMMAND.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: app::DEFAULT_LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }
}

impl BarConfig {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_file_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it does not exist
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| AppError::config(format!("Failed to read config file: {}", e)))?;

            let config: BarConfig = toml::from_str(&content)
                .map_err(|e| AppError::config(format!("Failed to parse config: {}", e)))?;

            log::info!("Loaded configuration from {:?}", config_path);
            config
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            log::info!("Created default configuration at {:?}", config_path);
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)
            .map_err(|e| AppError::config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", config_path);
        Ok(())
    }

    /// `<config_dir>/hyprglaze/config.toml`
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(app::CONFIG_FILE))
    }

    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::config("Cannot determine config directory"))?;
        Ok(config_dir.join(app::CONFIG_DIR))
    }

    /// Stylesheet written by the theme controller
    pub fn style_path(&self) -> Result<PathBuf> {
        match &self.ui.style_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join(app::STYLE_FILE)),
        }
    }

    /// Validate configuration values
    pub fn validate(&mut self) -> Result<()> {
        self.ui.max_tray_icons = self.ui.max_tray_icons.clamp(1, 64);

        // A half-specified position is useless
        if self.weather.latitude.is_some() != self.weather.longitude.is_some() {
            log::warn!("Ignoring weather position with only one coordinate");
            self.weather.latitude = None;
            self.weather.longitude = None;
        }
        if let Some(lat) = self.weather.latitude.as_mut() {
            *lat = lat.clamp(-90.0, 90.0);
        }
        if let Some(lon) = self.weather.longitude.as_mut() {
            *lon = lon.clamp(-180.0, 180.0);
        }
        self.weather.cache_ttl_minutes = self.weather.cache_ttl_minutes.clamp(1, 24 * 60);
        self.weather.max_attempts = self.weather.max_attempts.clamp(1, 10);

        if !self.tiling.threshold.is_finite() {
            self.tiling.threshold = DEFAULT_THRESHOLD;
        }
        self.tiling.threshold = self.tiling.threshold.clamp(0.0, 1.0);
        if !self.tiling.url.starts_with("ws://") && !self.tiling.url.starts_with("wss://") {
            return Err(AppError::config(format!(
                "Tiling url must be a ws:// or wss:// address, got {}",
                self.tiling.url
            )));
        }

        self.system.update_interval_ms = self.system.update_interval_ms.max(250);
        self.system.memory_warning_threshold = self.system.memory_warning_threshold.clamp(0.1, 1.0);
        self.system.cpu_warning_threshold = self.system.cpu_warning_threshold.clamp(0.1, 1.0);

        if self.system.task_manager_command.trim().is_empty() {
            self.system.task_manager_command = TASK_MANAGER_COMMAND.to_string();
        }

        if self.logging.level.trim().is_empty() {
            self.logging.level = app::DEFAULT_LOG_LEVEL.to_string();
        }

        Ok(())
    }

    /// Weather pipeline settings; timeouts come from the stored preferences
    pub fn weather_service_config(&self, preferences: &Preferences) -> WeatherServiceConfig {
        let fixed_position = match (self.weather.latitude, self.weather.longitude) {
            (Some(latitude), Some(longitude)) => Some(Position {
                latitude,
                longitude,
            }),
            _ => None,
        };

        WeatherServiceConfig {
            forecast_url: self.weather.forecast_url.clone(),
            geocode_url: self.weather.geocode_url.clone(),
            ip_geolocation_url: self.weather.ip_geolocation_url.clone(),
            request_timeout: Duration::from_millis(preferences.weather.api_timeout_ms.max(1000)),
            cache_ttl: Duration::from_secs(self.weather.cache_ttl_minutes * 60),
            fixed_position,
            retry: RetryPolicy {
                max_attempts: self.weather.max_attempts,
                ..RetryPolicy::default()
            },
            ..WeatherServiceConfig::default()
        }
    }

    pub fn auto_tiling_options(&self) -> AutoTilingOptions {
        AutoTilingOptions {
            url: self.tiling.url.clone(),
            threshold: self.tiling.threshold,
            trigger: self.tiling.trigger,
        }
    }

    pub fn system_update_interval(&self) -> Duration {
        Duration::from_millis(self.system.update_interval_ms)
    }
}
