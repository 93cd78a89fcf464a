//! Application constants and configuration values

/// Update intervals in milliseconds
pub mod intervals {
    pub const SYSTEM_UPDATE: u64 = 1000;
    pub const CLOCK_TICK: u64 = 1000;
}

/// Icons and symbols
pub mod icons {
    pub const VOLUME_MUTED: &str = "🔇";
    pub const VOLUME_LOW: &str = "🔈";
    pub const VOLUME_MEDIUM: &str = "🔉";
    pub const VOLUME_HIGH: &str = "🔊";

    pub const CPU_ICON: &str = "🔥";
    pub const MEMORY_ICON: &str = "💾";
    pub const WARNING: &str = "⚠️";

    pub const TILING_HORIZONTAL: &str = "⇆";
    pub const TILING_VERTICAL: &str = "⇅";
    pub const TRAY_COLLAPSED: &str = "▸";
    pub const TRAY_EXPANDED: &str = "▾";
    pub const THEME: &str = "🎨";
    pub const THEME_MODE_TOGGLE: &str = "◐";

    /// Shown in place of a widget that failed to render
    pub const RETRY_MARKER: &str = "⟳";

    /// Weather glyph for an icon name from the weather codes table
    pub fn weather(icon_name: &str) -> &'static str {
        match icon_name {
            "sun" => "☀️",
            "moon" => "🌙",
            "cloudy" => "⛅",
            "cloud-moon" => "☁️",
            "cloud" => "☁️",
            "cloud-drizzle" => "🌦️",
            "cloud-rain" => "🌧️",
            "cloud-snow" => "🌨️",
            "cloud-lightning" => "⛈️",
            _ => "🌡️",
        }
    }
}

/// Application metadata
pub mod app {
    pub const NAME: &str = "hyprglaze_bar";
    pub const CONFIG_DIR: &str = "hyprglaze";
    pub const CONFIG_FILE: &str = "config.toml";
    pub const STYLE_FILE: &str = "theme.css";
    pub const DEFAULT_LOG_LEVEL: &str = "info";
    pub const SEGMENT_SEPARATOR: &str = " | ";
}
