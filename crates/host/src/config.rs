//! Configuration system for spyglass
//!
//! Reads config from ~/.config/spyglass/config.toml

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http_port: u16,
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 5000,
            bind: "127.0.0.1".to_string(),
        }
    }
}

/// Explorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Write-protected root; also the default listing location.
    pub allowed_dir: Option<String>,
    /// File holding target filename patterns, one per line.
    pub targets_file: PathBuf,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            allowed_dir: None,
            targets_file: PathBuf::from("targets.txt"),
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub explorer: ExplorerConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to
    /// defaults when the file is missing or malformed.
    pub fn load() -> Self {
        Self::load_from_path(&Self::default_config_path()).unwrap_or_default()
    }

    /// Get default config path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spyglass")
            .join("config.toml")
    }

    /// Load from a specific path.
    pub fn load_from_path(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("ignoring malformed config {}: {e}", path.display());
                None
            }
        }
    }

    /// Create default config file if it doesn't exist
    pub fn create_default_if_missing() {
        let path = Self::default_config_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let default_config = r#"# spyglass Configuration

[server]
http_port = 5000
bind = "127.0.0.1"

[explorer]
# allowed_dir = "/srv/evidence"
targets_file = "targets.txt"
"#;
            let _ = std::fs::write(&path, default_config);
        }
    }
}
