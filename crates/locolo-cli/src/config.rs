//! Configuration file support

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for locolo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name the assistant introduces itself with
    pub assistant_name: String,
    /// Color theme ("dark" or "light")
    pub theme: String,
    /// Conversation starters on the welcome screen
    pub suggestions: Vec<String>,
    /// Show message times in row headers
    pub show_timestamps: bool,
    /// Animation tick in milliseconds
    pub tick_rate_ms: u64,
    /// Scripted assistant pacing
    pub assistant: AssistantConfig,
}

/// Pacing of the scripted assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Delay before the first token arrives
    pub first_token_delay_ms: u64,
    /// Delay between streamed tokens
    pub token_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant_name: "Locolo".to_string(),
            theme: "dark".to_string(),
            suggestions: vec![
                "Meeting new people".to_string(),
                "Romantic Jazz Night".to_string(),
                "Techno Rave Party".to_string(),
            ],
            show_timestamps: false,
            tick_rate_ms: 80,
            assistant: AssistantConfig::default(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            first_token_delay_ms: 700,
            token_delay_ms: 45,
        }
    }
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("locolo")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("LOCOLO_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from a file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save config to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Create a default config file if it doesn't exist
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        Config::default().save_to(path)
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# locolo configuration file
# Place at ~/.config/locolo/config.toml (Linux) or set LOCOLO_CONFIG_PATH

# Name used in the welcome greeting
assistant_name = "Locolo"

# Color theme (dark, light)
theme = "dark"

# Conversation starters shown before the first message
suggestions = ["Meeting new people", "Romantic Jazz Night", "Techno Rave Party"]

# Show message times next to the author
show_timestamps = false

# Spinner animation tick
tick_rate_ms = 80

[assistant]
# Time until the first token arrives (the "pending" spinner is shown meanwhile)
first_token_delay_ms = 700
# Time between streamed tokens
token_delay_ms = 45
"#
}
