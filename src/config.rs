//! Configuration file for checkprofile.
//!
//! The config names the analyzer catalog, where overrides are persisted, and
//! which findings are suppressed.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::settings::FileStore;
use crate::suppress::{Suppression, SuppressionProfile};

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["checkprofile.yaml", ".checkprofile.yaml"];

/// Top-level config definition.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Analyzer catalog path
    #[serde(default)]
    pub analyzer: String,
    /// Settings file holding persisted overrides (default: user config dir)
    #[serde(default)]
    pub settings: Option<PathBuf>,
    /// "pretty" (default) or "json"
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub suppressions: Vec<Suppression>,
}

impl Config {
    /// Parse a config from a YAML file.
    ///
    /// Relative analyzer and settings paths are resolved against the
    /// directory containing the config file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        if !self.analyzer.is_empty() && Path::new(&self.analyzer).is_relative() {
            self.analyzer = base.join(&self.analyzer).to_string_lossy().to_string();
        }
        if let Some(settings) = &self.settings {
            if settings.is_relative() {
                self.settings = Some(base.join(settings));
            }
        }
    }

    /// Returns the output format (defaults to "pretty").
    pub fn get_format(&self) -> &str {
        self.format.as_deref().unwrap_or("pretty")
    }

    /// Settings file path, falling back to the user config directory.
    pub fn settings_path(&self) -> anyhow::Result<PathBuf> {
        match &self.settings {
            Some(p) => Ok(p.clone()),
            None => FileStore::default_path()
                .ok_or_else(|| anyhow::anyhow!("cannot determine a settings directory")),
        }
    }
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.analyzer.trim().is_empty() {
        anyhow::bail!("no analyzer configured");
    }

    if let Some(format) = &config.format {
        if format != "pretty" && format != "json" {
            anyhow::bail!("invalid format {:?}, must be 'pretty' or 'json'", format);
        }
    }

    SuppressionProfile::new(config.suppressions.clone())?;

    Ok(())
}

/// Discover a config file in the current directory.
pub fn discover() -> anyhow::Result<PathBuf> {
    for name in DEFAULT_CONFIG_NAMES {
        let path = PathBuf::from(name);
        if path.exists() {
            return Ok(path);
        }
    }
    anyhow::bail!(
        "no config file found (looked for {})",
        DEFAULT_CONFIG_NAMES.join(", ")
    )
}
