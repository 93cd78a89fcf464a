//! Projection of a theme bundle onto named style variables

use super::ThemeBundle;
use crate::error::{CoreError, Result};
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Every variable written by [`apply_bundle`], in write order
pub const STYLE_VARIABLE_NAMES: [&str; 20] = [
    "--color-background",
    "--color-text",
    "--color-text-muted",
    "--color-icon",
    "--color-primary",
    "--color-primary-border",
    "--color-button-border",
    "--font-mono",
    "--font-sans",
    "--spacing-xs",
    "--spacing-sm",
    "--spacing-md",
    "--spacing-lg",
    "--spacing-xl",
    "--duration-fast",
    "--duration-normal",
    "--duration-slow",
    "--easing-ease-in-out",
    "--easing-ease-out",
    "--easing-spring",
];

/// Something that holds globally addressable style variables
pub trait StyleTarget: Send {
    fn set_property(&mut self, name: &'static str, value: &str);

    /// Make the written values visible to consumers
    fn commit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Write every field of `bundle` into `target`.
///
/// Re-applying the same bundle leaves the target unchanged.
pub fn apply_bundle<T: StyleTarget + ?Sized>(bundle: &ThemeBundle, target: &mut T) -> Result<()> {
    let c = &bundle.colors;
    target.set_property("--color-background", c.background);
    target.set_property("--color-text", c.text);
    target.set_property("--color-text-muted", c.text_muted);
    target.set_property("--color-icon", c.icon);
    target.set_property("--color-primary", c.primary);
    target.set_property("--color-primary-border", c.primary_border);
    target.set_property("--color-button-border", c.button_border);

    let t = &bundle.typography;
    target.set_property("--font-mono", t.font_mono);
    target.set_property("--font-sans", t.font_sans);

    let s = &bundle.spacing;
    target.set_property("--spacing-xs", s.xs);
    target.set_property("--spacing-sm", s.sm);
    target.set_property("--spacing-md", s.md);
    target.set_property("--spacing-lg", s.lg);
    target.set_property("--spacing-xl", s.xl);

    let a = &bundle.animations;
    target.set_property("--duration-fast", a.duration.fast);
    target.set_property("--duration-normal", a.duration.normal);
    target.set_property("--duration-slow", a.duration.slow);
    target.set_property("--easing-ease-in-out", a.easing.ease_in_out);
    target.set_property("--easing-ease-out", a.easing.ease_out);
    target.set_property("--easing-spring", a.easing.spring);

    target.commit()
}

/// In-memory variable table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleVariables {
    values: BTreeMap<&'static str, String>,
}

impl StyleVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render as a `:root` CSS block
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in &self.values {
            css.push_str(&format!("  {}: {};\n", name, value));
        }
        css.push_str("}\n");
        css
    }
}

impl StyleTarget for StyleVariables {
    fn set_property(&mut self, name: &'static str, value: &str) {
        if self.values.get(name).map(String::as_str) != Some(value) {
            self.values.insert(name, value.to_string());
        }
    }
}

/// CSS file that external stylesheets can import
#[derive(Debug)]
pub struct CssFile {
    path: PathBuf,
    variables: StyleVariables,
    written: Option<String>,
}

impl CssFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            variables: StyleVariables::new(),
            written: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn variables(&self) -> &StyleVariables {
        &self.variables
    }
}

impl StyleTarget for CssFile {
    fn set_property(&mut self, name: &'static str, value: &str) {
        self.variables.set_property(name, value);
    }

    fn commit(&mut self) -> Result<()> {
        let css = self.variables.to_css();
        if self.written.as_deref() == Some(css.as_str()) {
            debug!("Theme stylesheet unchanged, skipping write");
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CoreError::storage(format!("Failed to create style directory: {}", e))
            })?;
        }
        std::fs::write(&self.path, &css)
            .map_err(|e| CoreError::storage(format!("Failed to write stylesheet: {}", e)))?;

        info!("Wrote theme stylesheet to {:?}", self.path);
        self.written = Some(css);
        Ok(())
    }
}
