//! Optional UI configuration file.

/// Warnings for unknown configuration fields.
pub mod validator;

use crate::select::keys::KeyMap;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "LNKA_CONFIG_PATH";

/// Optional UI configuration, read from `config.toml`
///
/// Every field has a default, so an empty or missing file behaves exactly
/// like the built-in look and key bindings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    /// List behaviour
    #[serde(default)]
    pub ui: UiConfig,

    /// Colours
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Key overrides, action name to key strings
    #[serde(default)]
    pub keys: BTreeMap<String, Vec<String>>,
}

/// `[ui]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct UiConfig {
    /// Rows moved by page up/down; 0 means one screen
    #[serde(default)]
    pub page_size: usize,
    /// Start with the full help expanded
    #[serde(default)]
    pub show_help: bool,
}

/// ANSI 256-colour indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ThemeConfig {
    /// Row under the cursor
    #[serde(default = "default_cursor_color")]
    pub cursor: u8,
    /// Rows that are not linked
    #[serde(default = "default_unlinked_color")]
    pub unlinked: u8,
    /// Highlighted prompt answer
    #[serde(default = "default_prompt_color")]
    pub prompt: u8,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            cursor: default_cursor_color(),
            unlinked: default_unlinked_color(),
            prompt: default_prompt_color(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file yields the defaults; nothing is written to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file is not valid TOML or has fields of the wrong type
    /// - A `[keys]` entry names an unknown action or an unparsable key
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .key_map()
            .with_context(|| format!("Invalid key binding in {}", path.display()))?;

        debug!(path = %path.display(), overrides = config.keys.len(), "Loaded config");
        Ok(config)
    }

    /// Key bindings with the `[keys]` overrides applied
    ///
    /// # Errors
    ///
    /// Returns an error if an override names an unknown action or key
    pub fn key_map(&self) -> Result<KeyMap> {
        KeyMap::with_overrides(&self.keys)
    }

    /// Default config location
    ///
    /// `LNKA_CONFIG_PATH` wins; otherwise `<config dir>/lnka/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("lnka").join("config.toml"))
    }
}

const fn default_cursor_color() -> u8 {
    10
}

const fn default_unlinked_color() -> u8 {
    240
}

const fn default_prompt_color() -> u8 {
    10
}
