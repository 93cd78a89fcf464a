//! UI components module

pub mod clock;
pub mod system_info;
pub mod theme_selector;
pub mod tiling_info;
pub mod tray;
pub mod volume_control;
pub mod weather;
pub mod workspace_info;

pub use clock::ClockWidget;
pub use system_info::SystemInfoWidget;
pub use theme_selector::ThemeSelectorWidget;
pub use tiling_info::TilingWidget;
pub use tray::TrayWidget;
pub use volume_control::VolumeWidget;
pub use weather::WeatherWidget;
pub use workspace_info::WorkspaceWidget;

use super::Widget;

/// Left to right
pub fn default_widgets() -> Vec<Box<dyn Widget>> {
    vec![
        Box::new(WorkspaceWidget),
        Box::new(TilingWidget),
        Box::new(SystemInfoWidget),
        Box::new(VolumeWidget),
        Box::new(WeatherWidget),
        Box::new(TrayWidget),
        Box::new(ThemeSelectorWidget),
        Box::new(ClockWidget),
    ]
}
