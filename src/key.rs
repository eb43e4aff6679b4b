//! Key bindings and the help line built from them.
//!
//! Components declare their bindings as [`Binding`] values and group them
//! through the [`KeyMap`] trait, so the app can render a one-line help
//! footer for whatever is focused.

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// A set of keys that trigger one action, with its help text.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<(KeyCode, KeyModifiers)>,
    help_key: String,
    help_desc: String,
    enabled: bool,
}

impl Binding {
    /// Binding for plain keys without modifiers.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys: keys.into_iter().map(|k| (k, KeyModifiers::NONE)).collect(),
            help_key: String::new(),
            help_desc: String::new(),
            enabled: true,
        }
    }

    /// Adds a key with modifiers, e.g. `ctrl+c`.
    pub fn with_chord(mut self, code: KeyCode, modifiers: KeyModifiers) -> Self {
        self.keys.push((code, modifiers));
        self
    }

    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help_key = key.into();
        self.help_desc = desc.into();
        self
    }

    pub fn help_key(&self) -> &str {
        &self.help_key
    }

    pub fn help_desc(&self) -> &str {
        &self.help_desc
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// True if `msg` is one of this binding's keys. Plain bindings also
    /// accept shifted input, since terminals report `SHIFT` for capitals.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled
            && self.keys.iter().any(|(code, mods)| {
                *code == msg.key
                    && (*mods == msg.modifiers
                        || (mods.is_empty() && msg.modifiers == KeyModifiers::SHIFT))
            })
    }
}

/// A component's bindings, for help rendering.
pub trait KeyMap {
    /// Bindings shown in the one-line footer.
    fn short_help(&self) -> Vec<&Binding>;

    /// Bindings grouped into columns for an expanded help view.
    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![self.short_help()]
    }
}

/// Renders `key desc • key desc` for the enabled bindings of `map`.
pub fn short_help_line(map: &dyn KeyMap) -> String {
    map.short_help()
        .into_iter()
        .filter(|b| b.enabled() && !b.help_key().is_empty())
        .map(|b| format!("{} {}", b.help_key(), b.help_desc()))
        .collect::<Vec<_>>()
        .join(" • ")
}
