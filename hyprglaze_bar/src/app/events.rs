//! Event handling system for the application

use hyprglaze_core::providers::{AudioState, MouseButton, SystemTray, WindowManagerState};
use hyprglaze_core::{ThemeId, ThemeMode};
use serde::Deserialize;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Focus a workspace by name
    FocusWorkspace(String),

    /// Raw window manager command
    RunCommand(String),

    /// Flip the tiling direction of the focused container
    ToggleTilingDirection,

    /// Absolute volume, 0 to 100
    SetVolume(f32),

    /// Volume adjustment requested
    VolumeAdjust(f32),

    ToggleMute,

    /// Open the task manager through the window manager
    OpenTaskManager,

    TrayClick {
        icon_id: String,
        button: MouseButton,
    },

    /// Expand or collapse the tray segment
    TrayToggle,

    /// Expand or collapse the theme picker
    ThemeMenuToggle,

    ThemeChanged(ThemeId),
    ThemeModeChanged(ThemeMode),
    ThemeToggle,

    /// Desktop switched between dark and light appearance
    SystemAppearance { dark: bool },

    /// Time format toggle
    TimeFormatToggle,

    WeatherRefresh,
    WeatherClearCache,

    /// State pushed by the external providers
    ProviderUpdate(ProviderUpdate),

    /// Application shutdown requested
    Shutdown,
}

/// Provider output delivered as one JSON object per line
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProviderUpdate {
    pub window_manager: Option<WindowManagerState>,
    pub audio: Option<AudioState>,
    pub system_tray: Option<SystemTray>,
}

/// Event bus for handling application events
pub struct EventBus {
    sender: mpsc::UnboundedSender<AppEvent>,
    receiver: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.sender.clone()
    }

    /// Wait for the next event; the bus keeps a sender so this never yields `None`
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.receiver.recv().await
    }

}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
