//! Window manager and metrics provider state
//!
//! Providers publish into watch channels; the aggregator merges them into a
//! single [`ProviderSnapshot`] for the presentation layer.

mod aggregator;
mod commands;
mod system_monitor;

pub use aggregator::{provider_channels, ProviderAggregator, ProviderFeeds, ProviderSources};
pub use commands::{CommandDispatcher, MouseButton, ProviderCommand, TASK_MANAGER_COMMAND};
pub use system_monitor::{spawn_system_monitor, RollingAverage, SystemMonitor};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub name: String,
    pub display_name: Option<String>,
    pub has_focus: bool,
    pub is_displayed: bool,
}

impl Workspace {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingMode {
    pub name: String,
    pub display_name: Option<String>,
}

impl BindingMode {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TilingDirection {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowManagerState {
    pub workspaces: Vec<Workspace>,
    pub binding_modes: Vec<BindingMode>,
    pub tiling_direction: TilingDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CpuStats {
    /// Percent, averaged over all cores
    pub usage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MemoryStats {
    pub usage: f32,
    pub total: u64,
    pub used: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioDevice {
    pub name: String,
    /// 0 to 100
    pub volume: f32,
    pub is_muted: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioState {
    pub default_playback_device: Option<AudioDevice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayIcon {
    pub id: String,
    pub tooltip: String,
    pub icon_url: String,
    pub process_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemTray {
    pub icons: Vec<TrayIcon>,
}

/// Latest output of every provider; `None` until that provider has emitted
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProviderSnapshot {
    pub window_manager: Option<WindowManagerState>,
    pub cpu: Option<CpuStats>,
    pub memory: Option<MemoryStats>,
    pub audio: Option<AudioState>,
    pub system_tray: Option<SystemTray>,
}

impl ProviderSnapshot {
    pub fn focused_workspace(&self) -> Option<&Workspace> {
        self.window_manager
            .as_ref()?
            .workspaces
            .iter()
            .find(|w| w.has_focus)
    }
}
