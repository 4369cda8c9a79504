//! Configuration file support for the HUD server.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/gymhud/config.toml`.

use crate::session::DEFAULT_REST_SECONDS;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub timer: TimerConfig,
}

/// HTTP listener configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    /// Location of the persisted macro snapshot
    pub fn macro_cache_path(&self) -> PathBuf {
        macro_cache_path(&self.data_dir)
    }
}

/// Device platform identity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_package_name")]
    pub package_name: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
        }
    }
}

/// Rest timer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            rest_seconds: default_rest_seconds(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0:8080".into()
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("gymhud")
}

fn default_package_name() -> String {
    "com.gymhud.app".into()
}

fn default_rest_seconds() -> u32 {
    DEFAULT_REST_SECONDS
}

/// Location of the persisted macro snapshot inside `data_dir`
pub fn macro_cache_path(data_dir: &Path) -> PathBuf {
    data_dir.join("macro-cache.json")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("gymhud").join("config.toml")
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.timer.rest_seconds == 0 {
            return Err(Error::Config("timer.rest_seconds must be at least 1".into()));
        }
        if self.server.bind_address.trim().is_empty() {
            return Err(Error::Config("server.bind_address must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.timer.rest_seconds, 90);
        assert!(config.data.macro_cache_path().ends_with("gymhud/macro-cache.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[timer]
rest_seconds = 120
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.timer.rest_seconds, 120);
        assert_eq!(config.device.package_name, "com.gymhud.app"); // default
    }

    #[test]
    fn test_load_from_rejects_zero_rest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nrest_seconds = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nbind_address = \"127.0.0.1:9000\"\n[data]\ndata_dir = \"/tmp/hud\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.data.data_dir, PathBuf::from("/tmp/hud"));
    }
}
