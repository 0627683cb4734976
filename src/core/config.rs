use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 9990;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DISK_CACHE_SECONDS: u64 = 30;

/// Agent configuration, persisted as YAML in the user's config directory.
///
/// Every section tolerates missing keys so a partial file keeps the
/// defaults for whatever it leaves out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

/// Listener settings. Kept for config-file compatibility with front ends
/// that serve the agent over the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Overrides the detected hostname when non-empty.
    pub hostname: String,
}

/// Feature gates. Destructive power actions are off unless enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub enable_shutdown: bool,
    pub enable_restart: bool,
    pub enable_hibernate: bool,
    pub enable_sleep: bool,
    pub enable_system: bool,
    pub enable_usage: bool,
    pub enable_stats: bool,
    pub enable_media: bool,
    pub enable_processes: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            enable_shutdown: false,
            enable_restart: false,
            enable_hibernate: true,
            enable_sleep: true,
            enable_system: true,
            enable_usage: true,
            enable_stats: true,
            enable_media: true,
            enable_processes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub gpu_enabled: bool,
    pub disk_cache_seconds: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            gpu_enabled: true,
            disk_cache_seconds: DEFAULT_DISK_CACHE_SECONDS,
        }
    }
}

impl StatsConfig {
    /// Disk listing TTL. Zero falls back to the default so a blank entry
    /// never turns the cache off by accident.
    pub fn disk_cache_ttl(&self) -> Duration {
        match self.disk_cache_seconds {
            0 => Duration::from_secs(DEFAULT_DISK_CACHE_SECONDS),
            secs => Duration::from_secs(secs),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if data.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_yaml::to_string(self).with_context(|| "Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Write a default config file if none exists. Returns whether a new
    /// file was created.
    pub fn create_default(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        Config::default().save_to(path)?;
        Ok(true)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("Cntrl").join("config.yaml"))
    }

    /// The hostname override, if one is set.
    pub fn hostname_override(&self) -> Option<&str> {
        let name = self.display.hostname.trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_disable_destructive_power() {
        let config = Config::default();
        assert!(!config.features.enable_shutdown);
        assert!(!config.features.enable_restart);
        assert!(config.features.enable_sleep);
        assert!(config.features.enable_hibernate);
        assert!(config.stats.gpu_enabled);
        assert_eq!(config.server.port, 9990);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.stats.disk_cache_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "features:\n  enable_shutdown: true\nstats:\n  gpu_enabled: false\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert!(config.features.enable_shutdown);
        assert!(!config.features.enable_restart);
        assert!(config.features.enable_media);
        assert!(!config.stats.gpu_enabled);
        assert_eq!(config.stats.disk_cache_seconds, 30);
        assert_eq!(config.server.port, 9990);
    }

    #[test]
    fn test_zero_disk_ttl_uses_default() {
        let stats = StatsConfig {
            gpu_enabled: true,
            disk_cache_seconds: 0,
        };
        assert_eq!(stats.disk_cache_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_hostname_override() {
        let mut config = Config::default();
        assert_eq!(config.hostname_override(), None);

        config.display.hostname = "  ".to_string();
        assert_eq!(config.hostname_override(), None);

        config.display.hostname = "studio-pc".to_string();
        assert_eq!(config.hostname_override(), Some("studio-pc"));
    }
}
