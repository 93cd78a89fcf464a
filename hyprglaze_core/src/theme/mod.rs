//! Theme presets: identifiers, bundles and the registry that maps between them

mod controller;
mod registry;
mod style;

pub use controller::ThemeController;
pub use registry::{all, by_category, metadata, preview, resolve};
pub use style::{apply_bundle, CssFile, StyleTarget, StyleVariables, STYLE_VARIABLE_NAMES};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a built-in theme preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeId {
    HyprDark,
    HyprLight,
    NordDark,
    NordLight,
    CatppuccinMocha,
    CatppuccinLatte,
    Dracula,
    TokyoNight,
    GruvboxDark,
    GruvboxLight,
    OneDark,
    SolarizedDark,
    SolarizedLight,
    MaterialDark,
    MaterialLight,
    Cyberpunk,
    Forest,
    Ocean,
    Sunset,
    Aurora,
}

impl ThemeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HyprDark => "hypr-dark",
            Self::HyprLight => "hypr-light",
            Self::NordDark => "nord-dark",
            Self::NordLight => "nord-light",
            Self::CatppuccinMocha => "catppuccin-mocha",
            Self::CatppuccinLatte => "catppuccin-latte",
            Self::Dracula => "dracula",
            Self::TokyoNight => "tokyo-night",
            Self::GruvboxDark => "gruvbox-dark",
            Self::GruvboxLight => "gruvbox-light",
            Self::OneDark => "one-dark",
            Self::SolarizedDark => "solarized-dark",
            Self::SolarizedLight => "solarized-light",
            Self::MaterialDark => "material-dark",
            Self::MaterialLight => "material-light",
            Self::Cyberpunk => "cyberpunk",
            Self::Forest => "forest",
            Self::Ocean => "ocean",
            Self::Sunset => "sunset",
            Self::Aurora => "aurora",
        }
    }
}

impl Default for ThemeId {
    fn default() -> Self {
        Self::HyprDark
    }
}

impl FromStr for ThemeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        registry::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("Unknown theme preset: {}", s))
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Theme mode preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Dark,
    Light,
    Auto, // Follow system appearance
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Dark
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            "auto" => Ok(Self::Auto),
            _ => Err(format!("Unknown theme mode: {}", s)),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeCategory {
    Dark,
    Light,
}

impl ThemeCategory {
    pub fn mode(&self) -> ThemeMode {
        match self {
            Self::Dark => ThemeMode::Dark,
            Self::Light => ThemeMode::Light,
        }
    }
}

/// Seven named colors of a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub background: &'static str,
    pub text: &'static str,
    pub text_muted: &'static str,
    pub icon: &'static str,
    pub primary: &'static str,
    pub primary_border: &'static str,
    pub button_border: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typography {
    pub font_mono: &'static str,
    pub font_sans: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacing {
    pub xs: &'static str,
    pub sm: &'static str,
    pub md: &'static str,
    pub lg: &'static str,
    pub xl: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub fast: &'static str,
    pub normal: &'static str,
    pub slow: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Easings {
    pub ease_in_out: &'static str,
    pub ease_out: &'static str,
    pub spring: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animations {
    pub duration: Durations,
    pub easing: Easings,
}

/// Complete visual bundle of a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeBundle {
    pub colors: ColorPalette,
    pub typography: Typography,
    pub spacing: Spacing,
    pub animations: Animations,
}

/// Three swatch colors shown in a theme picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreview {
    pub background: &'static str,
    pub primary: &'static str,
    pub text: &'static str,
}

/// Display information for a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeMetadata {
    pub id: ThemeId,
    pub name: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub category: ThemeCategory,
    pub tags: &'static [&'static str],
    pub preview: ThemePreview,
}
