use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub keybindings: Keybindings,
    pub identity: Identity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    /// Sender address stamped on sent messages
    pub address: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            address: "me@example.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Keybindings {
    pub next_panel: Vec<String>,
    pub prev_panel: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub open: Vec<String>,
    pub close: Vec<String>,
    pub toggle_star: Vec<String>,
    pub archive: Vec<String>,
    pub trash: Vec<String>,
    pub compose: Vec<String>,
    pub reply: Vec<String>,
    pub search: Vec<String>,
    pub toggle_sidebar: Vec<String>,
    pub send_message: Vec<String>,
    pub quit: Vec<String>,
}

fn keys(bindings: &[&str]) -> Vec<String> {
    bindings.iter().map(|b| b.to_string()).collect()
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            next_panel: keys(&["l", "Right", "Tab"]),
            prev_panel: keys(&["h", "Left", "BackTab"]),
            move_up: keys(&["k", "Up"]),
            move_down: keys(&["j", "Down"]),
            open: keys(&["Enter"]),
            close: keys(&["Esc", "x"]),
            toggle_star: keys(&["s"]),
            archive: keys(&["a"]),
            trash: keys(&["d", "Backspace"]),
            compose: keys(&["c", "n"]),
            reply: keys(&["r"]),
            search: keys(&["/"]),
            toggle_sidebar: keys(&["b"]),
            send_message: keys(&["ctrl-s"]),
            quit: keys(&["q"]),
        }
    }
}

pub fn parse_key_string(key_str: &str) -> (KeyCode, KeyModifiers) {
    // " " is a binding of its own, not a separator
    if key_str == " " {
        return (KeyCode::Char(' '), KeyModifiers::empty());
    }

    let mut parts: Vec<&str> = key_str.split('-').collect();
    let mut modifiers = KeyModifiers::empty();

    // "ctrl--" binds ctrl and the minus key
    let base_key_str = if key_str.ends_with("--") {
        parts.truncate(parts.len().saturating_sub(2));
        "-"
    } else {
        parts.pop().unwrap_or("")
    };

    for part in parts {
        match part.to_lowercase().as_str() {
            "ctrl" => modifiers.insert(KeyModifiers::CONTROL),
            "alt" => modifiers.insert(KeyModifiers::ALT),
            "shift" => modifiers.insert(KeyModifiers::SHIFT),
            "cmd" | "command" | "super" => modifiers.insert(KeyModifiers::SUPER),
            "meta" => modifiers.insert(KeyModifiers::META),
            _ => {}
        }
    }

    let mut chars = base_key_str.chars();
    let code = match base_key_str {
        "Backspace" => KeyCode::Backspace,
        "Enter" => KeyCode::Enter,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Tab" => KeyCode::Tab,
        "BackTab" => KeyCode::BackTab,
        "Esc" => KeyCode::Esc,
        "Space" => KeyCode::Char(' '),
        _ => match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => KeyCode::Null,
        },
    };

    (code, modifiers)
}

pub fn matches_key(event: KeyEvent, bindings: &[String]) -> bool {
    bindings.iter().any(|b| {
        let (code, modifiers) = parse_key_string(b);
        event.code == code && event.modifiers.contains(modifiers)
    })
}

impl Config {
    /// Reads `settings.toml` from the working directory, falling back to defaults.
    pub fn load() -> Self {
        let path = Path::new(SETTINGS_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
