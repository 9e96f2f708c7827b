//! Keybinding configuration types and parsing.
//!
//! Keybindings are opt-in. When enabled, a bound key press runs an editor
//! action instead of being forwarded to the active mode.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::input::{Key, Modifiers};

/// Editor actions that can be bound to keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Trash,
    CombineFeatures,
    UncombineFeatures,
    /// Switch to the named mode
    ChangeMode(String),
}

/// A single keybinding: a key name with optional modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Parse a keybinding string like "Ctrl+Shift+Z" or "Delete".
    ///
    /// Modifiers may appear in any order and spaces around `+` are ignored.
    /// A trailing `+` names the plus key itself ("Ctrl++").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        let normalized: String = s.split('+').map(str::trim).collect::<Vec<_>>().join("+");

        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut key_parts = Vec::new();

        for part in normalized.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                "alt" => alt = true,
                _ => key_parts.push(part),
            }
        }

        if key_parts.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        // "Ctrl++" splits into ["Ctrl", "", ""]; the empty parts are the plus key.
        let key = if key_parts.iter().all(|part| part.is_empty()) {
            "+".to_string()
        } else {
            normalize_key(&key_parts.join("+"))
        };

        Ok(Self {
            key,
            ctrl,
            shift,
            alt,
        })
    }

    /// The binding a key event would trigger, or `None` for unmapped keys.
    pub fn for_event(key: Key, modifiers: Modifiers) -> Option<Self> {
        let key = match key {
            Key::Unknown => return None,
            Key::Char(c) => c.to_lowercase().collect(),
            named => named.binding_name(),
        };
        Some(Self {
            key,
            ctrl: modifiers.ctrl,
            shift: modifiers.shift,
            alt: modifiers.alt,
        })
    }

    /// Check if this keybinding matches the given key and modifier state.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.key == normalize_key(key) && self.ctrl == ctrl && self.shift == shift && self.alt == alt
    }
}

/// Canonical key name: characters lowercased, named keys and their aliases
/// ("Del", "esc", "Enter") mapped to one spelling.
fn normalize_key(key: &str) -> String {
    match key.parse::<Key>() {
        Ok(Key::Char(c)) => c.to_lowercase().collect(),
        Ok(Key::Unknown) | Err(()) => key.to_lowercase(),
        Ok(named) => named.binding_name(),
    }
}

/// Configuration for all keybindings.
///
/// ```toml
/// [keybindings]
/// enabled = true
/// trash = ["Delete", "Backspace"]
///
/// [keybindings.modes]
/// draw_polygon = ["3"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeybindingsConfig {
    /// Intercept bound keys before they reach the active mode
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_trash")]
    pub trash: Vec<String>,

    #[serde(default)]
    pub combine_features: Vec<String>,

    #[serde(default)]
    pub uncombine_features: Vec<String>,

    /// Mode name to the keys that switch to it
    #[serde(default = "default_modes")]
    pub modes: BTreeMap<String, Vec<String>>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trash: default_trash(),
            combine_features: Vec::new(),
            uncombine_features: Vec::new(),
            modes: default_modes(),
        }
    }
}

impl KeybindingsConfig {
    /// Build a lookup map from keybindings to actions.
    /// Returns an error if any keybinding string is invalid or bound twice.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, Action>, String> {
        let mut map = HashMap::new();

        let mut insert_binding = |binding_str: &str, action: Action| -> Result<(), String> {
            let binding = KeyBinding::parse(binding_str)?;
            if let Some(existing) = map.get(&binding) {
                return Err(format!(
                    "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                    binding_str, existing, action
                ));
            }
            map.insert(binding, action);
            Ok(())
        };

        for binding_str in &self.trash {
            insert_binding(binding_str, Action::Trash)?;
        }

        for binding_str in &self.combine_features {
            insert_binding(binding_str, Action::CombineFeatures)?;
        }

        for binding_str in &self.uncombine_features {
            insert_binding(binding_str, Action::UncombineFeatures)?;
        }

        for (mode, bindings) in &self.modes {
            for binding_str in bindings {
                insert_binding(binding_str, Action::ChangeMode(mode.clone()))?;
            }
        }

        Ok(map)
    }
}

fn default_trash() -> Vec<String> {
    vec!["Backspace".to_string(), "Delete".to_string()]
}

fn default_modes() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([
        ("draw_point".to_string(), vec!["1".to_string()]),
        ("draw_line_string".to_string(), vec!["2".to_string()]),
        ("draw_polygon".to_string(), vec!["3".to_string()]),
    ])
}
