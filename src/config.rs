//! Exclusion configuration
//!
//! Controls which columns and associations are left out of generated
//! documents. Defaults can be overridden programmatically, from a config
//! file (introspec.toml), or from environment variables (INTROSPEC_*).

use std::collections::HashSet;

use config_crate::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Generation-time exclusion settings
///
/// Read-only from the engine's perspective; the builder consults it on every
/// call, so changes between calls are picked up without invalidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Skip columns whose name ends with the `_id` foreign-key convention
    #[serde(default = "default_true")]
    pub exclude_foreign_keys: bool,

    /// Skip associations entirely
    #[serde(default)]
    pub exclude_associations: bool,

    /// Columns excluded by name across all models
    #[serde(default)]
    pub excluded_columns: HashSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_foreign_keys: true,
            exclude_associations: false,
            excluded_columns: HashSet::new(),
        }
    }
}

impl Config {
    /// Restore the default settings
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether a column is excluded, by name or by the foreign-key heuristic
    pub fn excluded_column(&self, name: &str) -> bool {
        self.excluded_columns.contains(name)
            || (self.exclude_foreign_keys && name.ends_with("_id"))
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file, layered over defaults and
    /// under INTROSPEC_* environment variables
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        for location in ["introspec.toml", ".introspec.toml", "config/introspec.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("INTROSPEC")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save the configuration to a TOML file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

fn default_true() -> bool {
    true
}
