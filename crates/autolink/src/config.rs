use anyhow::{Context, Result};
use autolink_core::ScanSettings;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "autolink.toml";

/// Contents of `autolink.toml`.
///
/// ```toml
/// base_dir = "pages"
/// min_char_count = 0
/// namespace_resolution = true
/// ignore = ["templates/**", "daily/*"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base_dir: Option<String>,
    /// Signed so a negative value reaches `ScanSettings::new` and is reported.
    pub min_char_count: i64,
    pub namespace_resolution: bool,
    /// Glob patterns, relative to the vault root, of files never indexed or
    /// rewritten.
    pub ignore: Vec<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Use `explicit` when given, else `<vault>/autolink.toml` if present,
    /// else defaults.
    pub fn discover(vault: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = vault.join(CONFIG_FILE_NAME);
        if default_path.is_file() {
            tracing::debug!("Using config {}", default_path.display());
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn scan_settings(&self) -> Result<ScanSettings> {
        ScanSettings::new(self.min_char_count, self.namespace_resolution)
            .context("Invalid scan settings")
    }

    pub fn base_dir(&self) -> Option<&str> {
        self.base_dir.as_deref().filter(|b| !b.is_empty())
    }
}
