//! hyprglaze_bar - a themeable text status bar
//!
//! Renders window manager state, system metrics, volume, weather, tray and
//! clock as one line on stdout and reads click actions and provider updates
//! from stdin.

pub mod app;
pub mod config;
pub mod constants;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use app::{BarApp, Services};
pub use config::BarConfig;
pub use utils::{AppError, Result};
