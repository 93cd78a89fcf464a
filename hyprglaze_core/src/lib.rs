//! hyprglaze_core - services behind the hyprglaze status bar
//!
//! Preferences and themes, the weather pipeline, the auto-tiling connection
//! to the window manager and the provider aggregator.

pub mod error;
pub mod logging;
pub mod preferences;
pub mod providers;
pub mod retry;
pub mod theme;
pub mod tiling;
pub mod weather;

pub use error::{CoreError, ErrorCode, ErrorReport, GeolocationError, Result, Severity};
pub use logging::initialize_logging;
pub use preferences::{PreferenceStore, Preferences, PreferencesPatch};
pub use providers::{ProviderAggregator, ProviderSnapshot};
pub use retry::{with_retry, RetryPolicy};
pub use theme::{ThemeController, ThemeId, ThemeMode};
pub use tiling::{AutoTilingController, AutoTilingOptions, ConnectionState, TriggerMode};
pub use weather::{WeatherRefresher, WeatherService, WeatherServiceConfig, WeatherSnapshot};
