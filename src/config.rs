//! Key-binding configuration.
//!
//! Bindings are read from an optional JSON file; any load or parse
//! failure falls back to the defaults (arrow keys + space) so a broken
//! or missing config never stops the game from starting.

use std::fs;
use std::path::Path;

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

/// Default location of the bindings file, relative to the working
/// directory.
pub const KEYS_FILE: &str = "assets/keys.json";

/// Key names as they appear in the config file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyBindings {
    pub left: String,
    pub right: String,
    pub up: String,
    pub down: String,
    pub fire: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            left: "left".to_string(),
            right: "right".to_string(),
            up: "up".to_string(),
            down: "down".to_string(),
            fire: "space".to_string(),
        }
    }
}

impl KeyBindings {
    /// Load bindings from `path`, defaulting on any error.
    pub fn load(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    /// Resolve the configured names to key codes. A name that fails to
    /// parse falls back to the default for that slot.
    pub fn resolve(&self) -> Bindings {
        Bindings {
            left: parse_key(&self.left).unwrap_or(KeyCode::Left),
            right: parse_key(&self.right).unwrap_or(KeyCode::Right),
            up: parse_key(&self.up).unwrap_or(KeyCode::Up),
            down: parse_key(&self.down).unwrap_or(KeyCode::Down),
            fire: parse_key(&self.fire).unwrap_or(KeyCode::Char(' ')),
        }
    }
}

/// Resolved key codes, ready for per-frame held-state queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bindings {
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
    pub fire: KeyCode,
}

/// Parse a key name: the named arrow/space/enter keys, or any single
/// character.
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let lower = name.trim().to_lowercase();
    match lower.as_str() {
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "space" => Some(KeyCode::Char(' ')),
        "enter" => Some(KeyCode::Enter),
        _ => {
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}
