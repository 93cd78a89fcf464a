use super::{apply_bundle, metadata, resolve, StyleTarget, ThemeCategory, ThemeId, ThemeMode};
use crate::error::Result;
use crate::preferences::{PreferenceStore, PreferencesPatch, ThemePatch};
use log::info;
use std::sync::Arc;

/// Keeps the active preset, the theme mode and the style target in sync
pub struct ThemeController {
    preferences: Arc<PreferenceStore>,
    target: Box<dyn StyleTarget>,
    system_dark: bool,
}

impl ThemeController {
    pub fn new(preferences: Arc<PreferenceStore>, target: Box<dyn StyleTarget>) -> Self {
        Self {
            preferences,
            target,
            system_dark: true,
        }
    }

    pub fn current_preset(&self) -> ThemeId {
        self.preferences.get().theme.preset
    }

    pub fn current_mode(&self) -> ThemeMode {
        self.preferences.get().theme.mode
    }

    pub fn is_dark(&self) -> bool {
        metadata(self.current_preset()).category == ThemeCategory::Dark
    }

    /// Write the stored preset into the style target
    pub fn apply_current(&mut self) -> Result<()> {
        apply_bundle(&resolve(self.current_preset()), self.target.as_mut())
    }

    /// Select a preset; the mode follows its category
    pub fn set_preset(&mut self, id: ThemeId) -> Result<()> {
        let mode = metadata(id).category.mode();
        self.store(Some(mode), id);
        info!("Theme preset set to {} ({})", id, mode);
        self.apply_current()
    }

    pub fn set_mode(&mut self, mode: ThemeMode) -> Result<()> {
        let preset = self.preset_for(mode);
        self.store(Some(mode), preset);
        info!("Theme mode set to {}, using {}", mode, preset);
        self.apply_current()
    }

    /// Flip between the default dark and light presets
    pub fn toggle(&mut self) -> Result<()> {
        let next = if self.is_dark() {
            ThemeId::HyprLight
        } else {
            ThemeId::HyprDark
        };
        self.set_preset(next)
    }

    /// Record the desktop appearance; in auto mode this re-resolves the theme
    pub fn set_system_appearance(&mut self, dark: bool) -> Result<()> {
        self.system_dark = dark;
        if self.current_mode() != ThemeMode::Auto {
            return Ok(());
        }
        let preset = self.preset_for(ThemeMode::Auto);
        if preset != self.current_preset() {
            self.store(None, preset);
            info!("System appearance changed, switching to {}", preset);
        }
        self.apply_current()
    }

    fn preset_for(&self, mode: ThemeMode) -> ThemeId {
        match mode {
            ThemeMode::Dark => ThemeId::HyprDark,
            ThemeMode::Light => ThemeId::HyprLight,
            ThemeMode::Auto if self.system_dark => ThemeId::HyprDark,
            ThemeMode::Auto => ThemeId::HyprLight,
        }
    }

    fn store(&self, mode: Option<ThemeMode>, preset: ThemeId) {
        self.preferences.update(&PreferencesPatch {
            theme: Some(ThemePatch {
                mode,
                preset: Some(preset),
            }),
            ..Default::default()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryStorage;
    use crate::theme::StyleVariables;
    use std::sync::Mutex;

    /// Shares the variable table with the test body
    #[derive(Clone, Default)]
    struct SharedVariables(Arc<Mutex<StyleVariables>>);

    impl StyleTarget for SharedVariables {
        fn set_property(&mut self, name: &'static str, value: &str) {
            self.0.lock().unwrap().set_property(name, value);
        }
    }

    impl SharedVariables {
        fn background(&self) -> Option<String> {
            self.0
                .lock()
                .unwrap()
                .get("--color-background")
                .map(str::to_string)
        }
    }

    fn controller() -> (ThemeController, Arc<PreferenceStore>, SharedVariables) {
        let store = Arc::new(PreferenceStore::new(Box::new(MemoryStorage::new())));
        let vars = SharedVariables::default();
        let controller = ThemeController::new(store.clone(), Box::new(vars.clone()));
        (controller, store, vars)
    }

    #[test]
    fn preset_sets_mode_from_category() {
        let (mut theme, store, vars) = controller();
        theme.set_preset(ThemeId::NordLight).unwrap();

        let prefs = store.get();
        assert_eq!(prefs.theme.preset, ThemeId::NordLight);
        assert_eq!(prefs.theme.mode, ThemeMode::Light);
        assert_eq!(vars.background().as_deref(), Some("rgb(236 239 244)"));
    }

    #[test]
    fn toggle_switches_between_default_presets() {
        let (mut theme, _, _) = controller();
        theme.set_preset(ThemeId::Dracula).unwrap();
        theme.toggle().unwrap();
        assert_eq!(theme.current_preset(), ThemeId::HyprLight);
        theme.toggle().unwrap();
        assert_eq!(theme.current_preset(), ThemeId::HyprDark);
        assert_eq!(theme.current_mode(), ThemeMode::Dark);
    }

    #[test]
    fn auto_mode_follows_system_appearance() {
        let (mut theme, _, vars) = controller();
        theme.set_system_appearance(false).unwrap();
        // not in auto mode yet, nothing changes
        assert_eq!(theme.current_preset(), ThemeId::HyprDark);

        theme.set_mode(ThemeMode::Auto).unwrap();
        assert_eq!(theme.current_preset(), ThemeId::HyprLight);
        assert_eq!(theme.current_mode(), ThemeMode::Auto);

        theme.set_system_appearance(true).unwrap();
        assert_eq!(theme.current_preset(), ThemeId::HyprDark);
        assert_eq!(theme.current_mode(), ThemeMode::Auto);
        assert_eq!(vars.background().as_deref(), Some("rgb(15 15 15)"));
    }

    #[test]
    fn explicit_modes_pick_default_presets() {
        let (mut theme, _, _) = controller();
        theme.set_mode(ThemeMode::Light).unwrap();
        assert_eq!(theme.current_preset(), ThemeId::HyprLight);
        theme.set_mode(ThemeMode::Dark).unwrap();
        assert_eq!(theme.current_preset(), ThemeId::HyprDark);
    }
}
