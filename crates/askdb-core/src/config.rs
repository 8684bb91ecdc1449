use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the askdb client.
///
/// Loaded from `~/.askdb/config.toml` by default. Each section corresponds
/// to one concern: where the query service lives and how replies are shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskdbConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for AskdbConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AskdbConfig {
    /// Read and parse a TOML config file.
    ///
    /// Fails if the file is missing or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: AskdbConfig = toml::from_str(&raw)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to the built-in defaults when the
    /// file is absent or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Could not read config at {}: {}. Falling back to defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Write the configuration to `path` as pretty-printed TOML, creating
    /// parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let rendered = toml::to_string_pretty(self)?;
        std::fs::write(path, rendered)?;
        info!("Wrote configuration to {}", path.display());
        Ok(())
    }
}

/// Remote query service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the NL-to-SQL service.
    pub base_url: String,
    /// Total request timeout in seconds. `None` leaves the transport's own
    /// behavior in charge; the chat core never races its own timer.
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Reply rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Maximum table rows printed per reply.
    pub max_table_rows: usize,
    /// Whether intermediate pipeline steps are printed.
    pub show_steps: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_table_rows: 20,
            show_steps: true,
        }
    }
}
