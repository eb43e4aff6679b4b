//! Persisted user preferences.
//!
//! The only preference is the page size. [`SettingsStore`] reads it once at
//! startup, validates it, and writes it back when the user saves the
//! settings dialog. Both operations announce the resolved [`Settings`] as a
//! message so the list controller can pick them up:
//!
//! - [`SettingsStore::init`] emits [`SettingsLoadedMsg`]
//! - [`SettingsStore::submit`] emits [`SettingsSavedMsg`]
//!
//! Storage is behind the [`SettingsBackend`] trait. [`FileBackend`] keeps a
//! flat JSON object of string values in the user's config directory and
//! [`MemoryBackend`] keeps it in memory.

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SettingsError;

/// Page size used when nothing valid is stored.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Storage key of the page size.
pub const PAGE_SIZE_KEY: &str = "page_limit";

/// User display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Resolves a raw stored or typed value. Anything that is not a positive
    /// integer, surrounding whitespace aside, falls back to the default.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let page_size = raw
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page_size }
    }
}

/// Emitted once the stored settings have been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsLoadedMsg(pub Settings);

/// Emitted after the user saved the settings dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsSavedMsg(pub Settings);

/// String key-value storage scoped to this client.
pub trait SettingsBackend: Send {
    /// Value for `key`, or `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// In-memory storage, mostly for tests and `--no-persist` runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl SettingsBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON file storage.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/maillog-browser/settings.json`, or the working directory
    /// when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("maillog-browser")
            .join("settings.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read_to_string(&self.path)?;
        let values: BTreeMap<String, serde_json::Value> = serde_json::from_str(&data)?;
        Ok(values
            .into_iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect())
    }
}

impl Default for FileBackend {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl SettingsBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut values) => values.remove(key),
            Err(e) => {
                log::warn!("Failed to read settings from {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        // An unreadable file is replaced rather than blocking the save.
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Owner of the persisted [`Settings`].
pub struct SettingsStore {
    backend: Box<dyn SettingsBackend>,
    settings: Settings,
}

impl SettingsStore {
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            settings: Settings::default(),
        }
    }

    /// Current settings as last loaded or saved.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Reads the stored page size. Absent or invalid values resolve to
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn load(&mut self) -> Settings {
        let raw = self.backend.get(PAGE_SIZE_KEY);
        self.settings = Settings::from_raw(raw.as_deref());
        log::info!(
            "Settings loaded: page size {} (stored value {:?})",
            self.settings.page_size,
            raw
        );
        self.settings
    }

    /// Validates `pending_page_size` the same way as [`load`](Self::load) and
    /// persists the result. Persistence is best effort: a failed write is
    /// logged and the resolved settings are still returned and adopted.
    pub fn save(&mut self, pending_page_size: &str) -> Settings {
        self.settings = Settings::from_raw(Some(pending_page_size));
        let value = self.settings.page_size.to_string();
        match self.backend.set(PAGE_SIZE_KEY, &value) {
            Ok(()) => log::info!("Settings saved: page size {}", value),
            Err(e) => log::warn!("Settings not persisted (page size {}): {}", value, e),
        }
        self.settings
    }

    /// Loads the settings and returns the command announcing them.
    pub fn init(&mut self) -> Cmd {
        let settings = self.load();
        notify(move || Box::new(SettingsLoadedMsg(settings)) as Msg)
    }

    /// Saves the settings and returns the command announcing them.
    pub fn submit(&mut self, pending_page_size: &str) -> Cmd {
        let settings = self.save(pending_page_size);
        notify(move || Box::new(SettingsSavedMsg(settings)) as Msg)
    }
}

fn notify<F>(make: F) -> Cmd
where
    F: Fn() -> Msg + Send + 'static,
{
    bubbletea_tick(Duration::from_nanos(1), move |_| make())
}
