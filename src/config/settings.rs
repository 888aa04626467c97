use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::capability::ToolProbe;
use crate::state::{RestoreMode, StoreOptions, DEFAULT_STORAGE_KEY};
use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Key of the persisted slot
    pub storage_key: String,
    /// How persisted snapshots are applied
    pub restore_mode: RestoreMode,
    /// Binary probed for platform authenticator support
    pub probe_tool: String,
    /// Probe deadline (None = wait indefinitely)
    pub probe_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            restore_mode: RestoreMode::Replace,
            probe_tool: ToolProbe::DEFAULT_BINARY.to_string(),
            probe_timeout: Some(Duration::from_millis(2000)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlStorageConfig {
    pub key: Option<String>,
    pub restore: Option<RestoreMode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlProbeConfig {
    pub tool: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub storage: Option<TomlStorageConfig>,
    pub probe: Option<TomlProbeConfig>,
}

impl Config {
    /// Load configuration from the default location, merging with defaults.
    /// Writes the bundled example on first run.
    pub fn load() -> Self {
        let config_file = config_path();

        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        Self::load_from(&config_file)
    }

    /// Load configuration from `path`. A missing or invalid file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Config::default();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No config file, using defaults");
                return config;
            }
        };

        match toml::from_str::<TomlConfig>(&contents) {
            Ok(toml_config) => config.merge(toml_config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Invalid config file, using defaults");
            }
        }

        config
    }

    fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(storage) = toml_config.storage {
            if let Some(key) = storage.key {
                self.storage_key = key;
            }
            if let Some(restore) = storage.restore {
                self.restore_mode = restore;
            }
        }

        if let Some(probe) = toml_config.probe {
            if let Some(tool) = probe.tool {
                self.probe_tool = tool;
            }
            if let Some(timeout_ms) = probe.timeout_ms {
                self.probe_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
            }
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(error = %e, "Failed to create config directory");
                return;
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    /// Store options derived from this configuration
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            storage_key: self.storage_key.clone(),
            restore_mode: self.restore_mode,
            probe_timeout: self.probe_timeout,
        }
    }

    /// Capability probe for the configured tool
    pub fn probe(&self) -> ToolProbe {
        ToolProbe::new(self.probe_tool.clone())
    }
}
