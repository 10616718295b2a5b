//! Configuration file handling for the hrosc CLI
//!
//! The destination and OSC path live in a TOML file. Missing fields fall back
//! to built-in defaults, and command-line flags override whatever was loaded.

use anyhow::{bail, Context, Result};
use hrosc_core::{OscAddressPattern, DEFAULT_ADDRESS};
use hrosc_transport::Destination;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "192.168.0.239";
pub const DEFAULT_PORT: u16 = 9555;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub destination: DestinationConfig,
    pub osc: OscConfig,
}

/// Where datagrams go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationConfig {
    pub host: String,
    pub port: u16,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// What is sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    /// Address pattern for heart-rate messages
    pub path: String,
    /// Log a hex dump of every datagram at info level
    pub trace: bool,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_ADDRESS.to_string(),
            trace: false,
        }
    }
}

/// Command-line overrides applied on top of the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub trace: bool,
}

impl Config {
    /// Load from an explicit path (which must exist), else the default path
    /// if present, else built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                Self::load_file(path)
            }
            None => Self::load_or_default(default_config_file()),
        }
    }

    /// Load the file if it exists, else built-in defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and parse a TOML file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save to a TOML file, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Write this configuration to a new file; an existing one is kept
    /// unless `force` is set
    pub fn init(&self, path: impl AsRef<Path>, force: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            bail!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        self.validate()?;
        self.save(path)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(host) = overrides.host {
            self.destination.host = host;
        }
        if let Some(port) = overrides.port {
            self.destination.port = port;
        }
        if let Some(path) = overrides.path {
            self.osc.path = path;
        }
        self.osc.trace |= overrides.trace;
        self
    }

    /// Check the OSC path up front so a bad config fails at startup
    pub fn validate(&self) -> Result<()> {
        OscAddressPattern::parse(&self.osc.path)
            .with_context(|| format!("Invalid OSC path in config: {}", self.osc.path))?;
        if self.destination.host.trim().is_empty() {
            bail!("Destination host is empty");
        }
        Ok(())
    }

    pub fn destination(&self) -> Destination {
        Destination::new(self.destination.host.clone(), self.destination.port)
    }
}

/// Get the default config file path
pub fn default_config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hrosc")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.destination.host, "192.168.0.239");
        assert_eq!(config.destination.port, 9555);
        assert_eq!(config.osc.path, "/hrtest");
        assert!(!config.osc.trace);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[destination]\nport = 9000\n").unwrap();
        assert_eq!(config.destination.host, DEFAULT_HOST);
        assert_eq!(config.destination.port, 9000);
        assert_eq!(config.osc.path, DEFAULT_ADDRESS);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.destination.host = "10.1.2.3".to_string();
        config.osc.path = "/avatar/parameters/Heartrate".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Config::load(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[destination]\nport = \"not a number\"\n").unwrap();

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_init_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh").join("hrosc.toml");

        let config = Config::load_or_default(&path).unwrap().apply(Overrides {
            port: Some(9000),
            ..Default::default()
        });
        assert_eq!(config.destination.host, DEFAULT_HOST);

        config.init(&path, false).unwrap();
        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded.destination.port, 9000);

        let err = config.init(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        config.init(&path, true).unwrap();
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().apply(Overrides {
            host: Some("127.0.0.1".to_string()),
            port: None,
            path: Some("/bpm".to_string()),
            trace: true,
        });

        assert_eq!(config.destination(), Destination::new("127.0.0.1", 9555));
        assert_eq!(config.osc.path, "/bpm");
        assert!(config.osc.trace);
    }

    #[test]
    fn test_validate_rejects_bad_path() {
        let config = Config::default().apply(Overrides {
            path: Some("hrtest".to_string()),
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }
}
