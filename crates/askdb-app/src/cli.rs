//! Command-line argument handling for the askdb binary.
//!
//! Flags override environment variables, which override the configuration
//! file. Each `resolve_*` method applies that priority for one setting.

use std::path::PathBuf;

use clap::Parser;

/// Environment variable naming an alternate configuration file.
pub const CONFIG_ENV: &str = "ASKDB_CONFIG";

/// Environment variable overriding the answering service URL.
pub const BASE_URL_ENV: &str = "ASKDB_BASE_URL";

#[derive(Parser, Debug)]
#[command(name = "askdb", version, about = "Ask questions about your data in plain language")]
pub struct CliArgs {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the answering service, e.g. http://localhost:8001
    #[arg(short = 'u', long)]
    pub base_url: Option<String>,

    /// Ask a single question, print the answer, and exit
    #[arg(short, long)]
    pub question: Option<String>,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path: flag, then `ASKDB_CONFIG`,
    /// then `~/.askdb/config.toml`.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(path) = &self.config {
            return path.clone();
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        default_config_path()
    }

    /// Resolve the service URL: flag, then `ASKDB_BASE_URL`, then the
    /// configured value.
    pub fn resolve_base_url(&self, configured: &str) -> String {
        if let Some(url) = &self.base_url {
            return url.clone();
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                return url;
            }
        }
        configured.to_string()
    }

    /// Resolve the log level filter, if one was given on the command line.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

/// Default configuration location under the user's home directory.
fn default_config_path() -> PathBuf {
    #[cfg(windows)]
    let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
    #[cfg(not(windows))]
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());

    PathBuf::from(home).join(".askdb").join("config.toml")
}
