// Chunk: docs/chunks/minimap_settings - Persisted minimap settings
//!
//! The user-facing minimap preferences: whether it is shown, how wide it is,
//! and whether the debug overlay is drawn.
//!
//! Resolution order for each setting, first match wins:
//!
//! 1. a URL query override (`?minimap=0&minimap_width=150`)
//! 2. the primary storage key
//! 3. the legacy storage key, kept readable for older installs
//! 4. the default
//!
//! Malformed values at any level are ignored and resolution falls through.
//! Writes always go to the primary key.
//!
//! Changes are broadcast on a [`SettingsBus`] so every list instance in the
//! process picks them up. Storage changes made by another context arrive via
//! [`SettingsStore::handle_storage_event`].

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::storage::Storage;

// =============================================================================
// Keys and Limits
// =============================================================================

pub const ENABLED_KEY: &str = "lite-notebook.minimap.enabled";
pub const LEGACY_ENABLED_KEY: &str = "minimap-enabled";
pub const WIDTH_KEY: &str = "lite-notebook.minimap.width";
pub const LEGACY_WIDTH_KEY: &str = "minimap-width";
pub const DEBUG_KEY: &str = "lite-notebook.minimap.debug";

pub const QUERY_ENABLED: &str = "minimap";
pub const QUERY_WIDTH: &str = "minimap_width";
pub const QUERY_DEBUG: &str = "minimap_debug";

/// Every storage key the settings are read from
pub const SETTINGS_KEYS: [&str; 5] = [
    ENABLED_KEY,
    LEGACY_ENABLED_KEY,
    WIDTH_KEY,
    LEGACY_WIDTH_KEY,
    DEBUG_KEY,
];

pub const MIN_WIDTH: f32 = 60.0;
pub const MAX_WIDTH: f32 = 320.0;
pub const DEFAULT_WIDTH: f32 = 120.0;

/// Returns true if `key` belongs to the settings key family.
pub fn is_settings_key(key: &str) -> bool {
    SETTINGS_KEYS.contains(&key)
}

// =============================================================================
// Values
// =============================================================================

/// The effective minimap preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimapSettings {
    pub enabled: bool,
    /// Minimap width in pixels, within `[MIN_WIDTH, MAX_WIDTH]`
    pub width: f32,
    pub debug: bool,
}

impl Default for MinimapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            width: DEFAULT_WIDTH,
            debug: false,
        }
    }
}

/// Parses a boolean flag (`1/true/yes/on`, `0/false/no/off`).
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parses a width, rejecting anything outside `[MIN_WIDTH, MAX_WIDTH]`.
pub fn parse_width(value: &str) -> Option<f32> {
    let width: f32 = value.trim().parse().ok()?;
    (width.is_finite() && (MIN_WIDTH..=MAX_WIDTH).contains(&width)).then_some(width)
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Settings forced by the page URL.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QueryOverrides {
    pub enabled: Option<bool>,
    pub width: Option<f32>,
    pub debug: Option<bool>,
}

impl QueryOverrides {
    /// Parses a query string, with or without the leading `?`.
    ///
    /// When a key repeats, the last valid value wins.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut overrides = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                QUERY_ENABLED => overrides.enabled = parse_bool(&value).or(overrides.enabled),
                QUERY_WIDTH => overrides.width = parse_width(&value).or(overrides.width),
                QUERY_DEBUG => overrides.debug = parse_bool(&value).or(overrides.debug),
                _ => {}
            }
        }
        overrides
    }

    /// Parses the query of a full URL. An unparseable URL has no overrides.
    pub fn from_url(url: &str) -> Self {
        match Url::parse(url) {
            Ok(url) => Self::parse(url.query().unwrap_or("")),
            Err(e) => {
                debug!(error = %e, "ignoring unparseable page url");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.width.is_none() && self.debug.is_none()
    }

    /// Applies the overrides on top of `settings`.
    pub fn apply(&self, settings: MinimapSettings) -> MinimapSettings {
        MinimapSettings {
            enabled: self.enabled.unwrap_or(settings.enabled),
            width: self.width.unwrap_or(settings.width),
            debug: self.debug.unwrap_or(settings.debug),
        }
    }
}

fn read_key<S: Storage + ?Sized>(storage: &S, key: &str) -> Option<String> {
    match storage.get(key) {
        Ok(value) => value,
        Err(e) => {
            debug!(key, error = %e, "settings read failed");
            None
        }
    }
}

fn read_setting<S, T>(storage: &S, keys: &[&str], parse: fn(&str) -> Option<T>) -> Option<T>
where
    S: Storage + ?Sized,
{
    keys.iter()
        .find_map(|key| read_key(storage, key).as_deref().and_then(parse))
}

/// Resolves the stored settings, falling back to defaults per field.
pub fn load_stored_settings<S: Storage + ?Sized>(storage: &S) -> MinimapSettings {
    let defaults = MinimapSettings::default();
    MinimapSettings {
        enabled: read_setting(storage, &[ENABLED_KEY, LEGACY_ENABLED_KEY], parse_bool)
            .unwrap_or(defaults.enabled),
        width: read_setting(storage, &[WIDTH_KEY, LEGACY_WIDTH_KEY], parse_width).unwrap_or(defaults.width),
        debug: read_setting(storage, &[DEBUG_KEY], parse_bool).unwrap_or(defaults.debug),
    }
}

/// Resolves the effective settings from storage and query overrides.
pub fn load_settings<S: Storage + ?Sized>(storage: &S, overrides: &QueryOverrides) -> MinimapSettings {
    overrides.apply(load_stored_settings(storage))
}

// =============================================================================
// SettingsBus
// =============================================================================

/// Broadcasts settings changes to every subscribed list instance.
///
/// Messages carry the stored settings. Each receiver applies its own query
/// overrides on top.
#[derive(Debug, Default)]
pub struct SettingsBus {
    subscribers: Mutex<Vec<Sender<MinimapSettings>>>,
}

static GLOBAL_BUS: LazyLock<Arc<SettingsBus>> = LazyLock::new(|| Arc::new(SettingsBus::new()));

impl SettingsBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide bus.
    pub fn global() -> Arc<SettingsBus> {
        Arc::clone(&GLOBAL_BUS)
    }

    /// Subscribes to changes. Dropping the subscription unsubscribes.
    pub fn subscribe(&self) -> SettingsSubscription {
        let (sender, receiver) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        SettingsSubscription { receiver }
    }

    /// Sends `settings` to every live subscriber. Returns how many got it.
    pub fn publish(&self, settings: MinimapSettings) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|sender| sender.send(settings).is_ok());
        subscribers.len()
    }

    /// Number of subscribers, including any dropped since the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Receiving end of a [`SettingsBus`] subscription.
#[derive(Debug)]
pub struct SettingsSubscription {
    receiver: Receiver<MinimapSettings>,
}

impl SettingsSubscription {
    /// Drains pending broadcasts and returns the newest, if any.
    pub fn latest(&self) -> Option<MinimapSettings> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(settings) => latest = Some(settings),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return latest,
            }
        }
    }
}

// =============================================================================
// SettingsStore
// =============================================================================

/// Reads, writes and broadcasts the minimap settings.
#[derive(Debug)]
pub struct SettingsStore<S: Storage> {
    storage: S,
    overrides: QueryOverrides,
    /// Settings as persisted, before query overrides
    stored: MinimapSettings,
    current: MinimapSettings,
    bus: Arc<SettingsBus>,
}

impl<S: Storage> SettingsStore<S> {
    /// Creates a store and loads the current settings.
    pub fn new(storage: S, overrides: QueryOverrides, bus: Arc<SettingsBus>) -> Self {
        let stored = load_stored_settings(&storage);
        let current = overrides.apply(stored);
        debug!(?current, "loaded minimap settings");
        Self {
            storage,
            overrides,
            stored,
            current,
            bus,
        }
    }

    /// The effective settings.
    pub fn current(&self) -> MinimapSettings {
        self.current
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn bus(&self) -> &Arc<SettingsBus> {
        &self.bus
    }

    /// The settings as persisted, ignoring query overrides.
    pub fn stored(&self) -> MinimapSettings {
        self.stored
    }

    /// Re-reads storage. Returns the new effective settings if they changed.
    pub fn load(&mut self) -> Option<MinimapSettings> {
        self.adopt(load_stored_settings(&self.storage))
            .then_some(self.current)
    }

    /// Adopts stored settings broadcast by another instance. This
    /// instance's query overrides still win. Returns whether the effective
    /// settings changed.
    pub fn adopt(&mut self, stored: MinimapSettings) -> bool {
        self.stored = stored;
        let next = self.overrides.apply(stored);
        let changed = next != self.current;
        self.current = next;
        changed
    }

    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        self.write(ENABLED_KEY, format_bool(enabled), |s| s.enabled = enabled)
    }

    /// Sets the width, clamped into `[MIN_WIDTH, MAX_WIDTH]`. Non-finite
    /// widths are ignored.
    pub fn set_width(&mut self, width: f32) -> bool {
        if !width.is_finite() {
            return false;
        }
        let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        self.write(WIDTH_KEY, &width.to_string(), |s| s.width = width)
    }

    pub fn set_debug(&mut self, debug: bool) -> bool {
        self.write(DEBUG_KEY, format_bool(debug), |s| s.debug = debug)
    }

    /// Handles a storage change from another context. Keys outside the
    /// settings family are ignored. Returns the new settings if they changed.
    pub fn handle_storage_event(&mut self, key: &str) -> Option<MinimapSettings> {
        if !is_settings_key(key) {
            return None;
        }
        let changed = self.load()?;
        self.bus.publish(self.stored);
        Some(changed)
    }

    /// Persists one value and broadcasts the stored settings. A failed
    /// write still updates this session. Returns whether the effective
    /// settings changed.
    fn write(&mut self, key: &str, value: &str, update: impl FnOnce(&mut MinimapSettings)) -> bool {
        if let Err(e) = self.storage.set(key, value) {
            debug!(key, error = %e, "settings write failed");
        }
        let mut stored = self.stored;
        update(&mut stored);
        if stored == self.stored {
            return false;
        }
        let changed = self.adopt(stored);
        self.bus.publish(stored);
        changed
    }
}
