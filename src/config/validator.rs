use crate::select::keys::Action;
use anyhow::Result;
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;

/// Warns about configuration fields lnka does not understand
pub struct ConfigValidator {
    /// Fully qualified names of the recognised fields
    known_fields: HashSet<String>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let mut known_fields = HashSet::new();

        // UI fields
        known_fields.insert("ui.page_size".to_string());
        known_fields.insert("ui.show_help".to_string());

        // Theme fields
        known_fields.insert("theme.cursor".to_string());
        known_fields.insert("theme.unlinked".to_string());
        known_fields.insert("theme.prompt".to_string());

        // Key bindings, one per action
        for action in Action::ALL {
            known_fields.insert(format!("keys.{}", action.config_name()));
        }

        Self { known_fields }
    }

    /// Validate a configuration file and print a warning per unknown field
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn validate_config_file(&self, config_path: &Path) -> Result<()> {
        if !config_path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(config_path)?;
        let parsed: toml::Value = toml::from_str(&content)?;
        let unknown = self.unknown_fields(&parsed);

        if !unknown.is_empty() {
            eprintln!("{}", "Configuration warnings:".yellow().bold());
            for field in unknown {
                eprintln!("  Unknown configuration field: {}", field.yellow());
            }
            eprintln!();
        }

        Ok(())
    }

    /// Unknown field paths in a parsed document, sorted by key
    #[must_use]
    pub fn unknown_fields(&self, document: &toml::Value) -> Vec<String> {
        let mut unknown = Vec::new();
        self.check_table(document, "", &mut unknown);
        unknown
    }

    /// Recursively collects fields that are neither known nor a known section
    fn check_table(&self, table: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        let toml::Value::Table(map) = table else {
            return;
        };
        for (key, value) in map {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            if self.known_fields.contains(&full_key) {
                continue;
            }
            let is_section = self
                .known_fields
                .iter()
                .any(|f| f.starts_with(&format!("{full_key}.")));
            match value {
                toml::Value::Table(_) if is_section => {
                    self.check_table(value, &full_key, unknown);
                }
                _ => unknown.push(full_key),
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
