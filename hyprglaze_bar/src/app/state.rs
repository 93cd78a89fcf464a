//! Application state management

use crate::config::BarConfig;
use hyprglaze_core::preferences::Preferences;
use hyprglaze_core::providers::{AudioDevice, ProviderSnapshot};
use hyprglaze_core::tiling::ConnectionState;
use hyprglaze_core::weather::WeatherStatus;
use hyprglaze_core::ThemeId;
use std::time::Duration;
use tokio::time::Instant;

/// Everything the widgets read while rendering
#[derive(Debug)]
pub struct AppState {
    pub config: BarConfig,

    /// Copy of the preference store, refreshed by its listener
    pub preferences: Preferences,

    /// Latest aggregated provider output
    pub providers: ProviderSnapshot,

    pub weather: WeatherStatus,

    /// Auto-tiling connection, `None` when disabled
    pub tiling: Option<ConnectionState>,

    /// Last tiling size seen on the connection
    pub tiling_size: Option<f64>,

    pub ui_state: UiState,
}

/// UI-specific state
#[derive(Debug)]
pub struct UiState {
    pub tray_expanded: bool,
    pub theme_menu_expanded: bool,
    pub volume: VolumeState,
}

/// Debounces volume changes before they reach the audio provider
#[derive(Debug)]
pub struct VolumeState {
    last_volume_change: Option<Instant>,
    debounce: Duration,
    pending: Option<f32>,
}

impl AppState {
    pub fn new(config: BarConfig, preferences: Preferences) -> Self {
        let debounce = Duration::from_millis(preferences.performance.debounce_delay_ms);
        Self {
            config,
            preferences,
            providers: ProviderSnapshot::default(),
            weather: WeatherStatus::default(),
            tiling: None,
            tiling_size: None,
            ui_state: UiState::new(debounce),
        }
    }

    pub fn theme(&self) -> ThemeId {
        self.preferences.theme.preset
    }

    pub fn show_seconds(&self) -> bool {
        self.preferences.ui.show_seconds
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.ui_state
            .volume
            .set_debounce(Duration::from_millis(preferences.performance.debounce_delay_ms));
        self.preferences = preferences;
    }

    pub fn master_audio_device(&self) -> Option<&AudioDevice> {
        self.providers.audio.as_ref()?.default_playback_device.as_ref()
    }

    /// Volume the next relative change starts from: a pending value wins over
    /// what the provider last reported
    pub fn effective_volume(&self) -> Option<f32> {
        self.ui_state
            .volume
            .pending()
            .or_else(|| self.master_audio_device().map(|d| d.volume))
    }

    pub fn is_cpu_high(&self) -> bool {
        self.providers
            .cpu
            .map(|c| c.usage > self.config.system.cpu_warning_threshold * 100.0)
            .unwrap_or(false)
    }

    pub fn is_memory_high(&self) -> bool {
        self.providers
            .memory
            .map(|m| m.usage > self.config.system.memory_warning_threshold * 100.0)
            .unwrap_or(false)
    }
}

impl UiState {
    fn new(volume_debounce: Duration) -> Self {
        Self {
            tray_expanded: false,
            theme_menu_expanded: false,
            volume: VolumeState::new(volume_debounce),
        }
    }

    pub fn toggle_tray(&mut self) {
        self.tray_expanded = !self.tray_expanded;
    }

    pub fn toggle_theme_menu(&mut self) {
        self.theme_menu_expanded = !self.theme_menu_expanded;
    }
}

impl VolumeState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            last_volume_change: None,
            debounce,
            pending: None,
        }
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn pending(&self) -> Option<f32> {
        self.pending
    }

    /// Ask for `volume`; returns it when it should be sent now, otherwise it is
    /// held until [`VolumeState::flush`] finds the debounce window over
    pub fn request(&mut self, volume: f32, now: Instant) -> Option<f32> {
        let volume = volume.clamp(0.0, 100.0);
        if self.window_open(now) {
            self.pending = Some(volume);
            None
        } else {
            self.pending = None;
            self.last_volume_change = Some(now);
            Some(volume)
        }
    }

    /// Release a held value once the debounce window has passed
    pub fn flush(&mut self, now: Instant) -> Option<f32> {
        if self.window_open(now) {
            return None;
        }
        let volume = self.pending.take()?;
        self.last_volume_change = Some(now);
        Some(volume)
    }

    /// When a held value becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending?;
        self.last_volume_change.map(|t| t + self.debounce)
    }

    fn window_open(&self, now: Instant) -> bool {
        self.last_volume_change
            .map(|t| now.duration_since(t) < self.debounce)
            .unwrap_or(false)
    }
}
