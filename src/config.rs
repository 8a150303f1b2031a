use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level raplog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RaplogConfig {
    pub sampler: SamplerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Trigger period of the sampling schedule, in milliseconds.
    pub interval_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

const SYSTEM_CONFIG: &str = "/etc/raplog/config.toml";

/// Load the system config file if it exists.
fn load_system() -> Option<toml::Value> {
    let path = Path::new(SYSTEM_CONFIG);
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Load the user config file (~/.config/raplog/config.toml) if it exists.
fn load_user() -> Option<toml::Value> {
    let dir = dirs::config_dir()?;
    let path = dir.join("raplog").join("config.toml");
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge two TOML values. Tables are merged key-by-key;
/// all other types in `overlay` replace `base`.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

impl RaplogConfig {
    /// Load and merge the system and user config files. Missing or
    /// unparseable files fall back to defaults; the user file wins where
    /// both set a key.
    pub fn load() -> Self {
        let mut value = match load_system() {
            Some(v) => v,
            None => toml::Value::Table(toml::map::Map::new()),
        };
        if let Some(user) = load_user() {
            value = merge_values(value, user);
        }
        value.try_into().unwrap_or_default()
    }

    /// Load config from a specific path, ignoring system/user files.
    /// Unlike the merged lookup, an explicit path that cannot be read or
    /// parsed is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}
