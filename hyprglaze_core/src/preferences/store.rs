use super::{
    KeyValueStore, Preferences, PreferencesPatch, StoredConfig, CONFIG_KEY, THEME_MODE_KEY,
    THEME_PRESET_KEY,
};
use crate::error::{CoreError, Result};
use log::{debug, error, info, warn};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

pub type SubscriptionId = u64;

type Listener = Arc<dyn Fn(&Preferences) + Send + Sync>;

struct Inner {
    prefs: Preferences,
    storage: Box<dyn KeyValueStore>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: SubscriptionId,
}

/// Process-wide preference state with change notification.
///
/// Updates are applied synchronously: a read issued after `update` returns
/// always sees the new values. Listeners run after the lock is released.
pub struct PreferenceStore {
    inner: Mutex<Inner>,
}

impl PreferenceStore {
    /// Load from `storage`, falling back to defaults for anything missing or corrupt
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        let prefs = load_preferences(storage.as_ref());
        info!(
            "Loaded preferences: theme {} ({})",
            prefs.theme.preset, prefs.theme.mode
        );
        Self {
            inner: Mutex::new(Inner {
                prefs,
                storage,
                listeners: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Listeners run outside the lock
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self) -> Preferences {
        self.lock().prefs.clone()
    }

    /// Merge `patch`, persist, then notify subscribers
    pub fn update(&self, patch: &PreferencesPatch) {
        let (snapshot, listeners) = {
            let mut inner = self.lock();
            patch.apply_to(&mut inner.prefs);
            let prefs = inner.prefs.clone();
            persist(inner.storage.as_mut(), &prefs);
            let listeners: Vec<Listener> =
                inner.listeners.iter().map(|(_, l)| l.clone()).collect();
            (prefs, listeners)
        };
        notify(&listeners, &snapshot);
    }

    /// Restore the built-in defaults
    pub fn reset(&self) {
        let (snapshot, listeners) = {
            let mut inner = self.lock();
            inner.prefs = Preferences::default();
            if let Err(e) = inner
                .storage
                .remove_many(&[THEME_MODE_KEY, THEME_PRESET_KEY, CONFIG_KEY])
            {
                warn!("Failed to clear stored preferences: {}", e);
            }
            let listeners: Vec<Listener> =
                inner.listeners.iter().map(|(_, l)| l.clone()).collect();
            (inner.prefs.clone(), listeners)
        };
        info!("Preferences reset to defaults");
        notify(&listeners, &snapshot);
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Preferences) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        debug!("Preference subscriber {} added", id);
        id
    }

    /// Returns false when `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(sid, _)| *sid != id);
        inner.listeners.len() != before
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.get())?)
    }

    /// Apply a (possibly partial) exported document. Invalid input changes nothing.
    pub fn import_json(&self, json: &str) -> Result<()> {
        let patch: PreferencesPatch = serde_json::from_str(json).map_err(|e| {
            error!("Rejected preference import: {}", e);
            CoreError::from(e)
        })?;
        self.update(&patch);
        info!("Imported preferences");
        Ok(())
    }
}

fn load_preferences(storage: &dyn KeyValueStore) -> Preferences {
    let mut prefs = Preferences::default();

    match storage.get(THEME_MODE_KEY) {
        Ok(Some(raw)) => match raw.parse() {
            Ok(mode) => prefs.theme.mode = mode,
            Err(e) => warn!("Ignoring stored theme mode: {}", e),
        },
        Ok(None) => {}
        Err(e) => warn!("Failed to read theme mode: {}", e),
    }

    match storage.get(THEME_PRESET_KEY) {
        Ok(Some(raw)) => match raw.parse() {
            Ok(preset) => prefs.theme.preset = preset,
            Err(e) => warn!("Ignoring stored theme preset: {}", e),
        },
        Ok(None) => {}
        Err(e) => warn!("Failed to read theme preset: {}", e),
    }

    match storage.get(CONFIG_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<PreferencesPatch>(&raw) {
            Ok(mut patch) => {
                // theme lives under its own keys
                patch.theme = None;
                patch.apply_to(&mut prefs);
            }
            Err(e) => warn!("Ignoring corrupt stored configuration: {}", e),
        },
        Ok(None) => {}
        Err(e) => warn!("Failed to read stored configuration: {}", e),
    }

    prefs
}

fn persist(storage: &mut dyn KeyValueStore, prefs: &Preferences) {
    let mode = prefs.theme.mode.to_string();
    let config = StoredConfig {
        weather: &prefs.weather,
        ui: &prefs.ui,
        performance: &prefs.performance,
    };
    let json = match serde_json::to_string(&config) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize configuration: {}", e);
            return;
        }
    };

    let entries = [
        (THEME_MODE_KEY, mode.as_str()),
        (THEME_PRESET_KEY, prefs.theme.preset.as_str()),
        (CONFIG_KEY, json.as_str()),
    ];
    if let Err(e) = storage.set_many(&entries) {
        warn!("Failed to persist preferences: {}", e);
    }
}

fn notify(listeners: &[Listener], prefs: &Preferences) {
    for listener in listeners {
        if catch_unwind(AssertUnwindSafe(|| listener(prefs))).is_err() {
            error!("Preference listener panicked");
        }
    }
}
