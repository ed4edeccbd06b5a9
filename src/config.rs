use crate::error::{Result, RosterError};
use crate::storage::DEFAULT_ID_LENGTH;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".roster.yml";

/// Shortest id length accepted; shorter ids collide too easily.
pub const MIN_ID_LENGTH: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    4000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Keep documents in process memory
    #[default]
    Memory,
    /// Persist documents as JSON files in the data directory
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_id_length")]
    pub id_length: usize,
}

fn default_path() -> String {
    ".roster".to_string()
}

fn default_id_length() -> usize {
    DEFAULT_ID_LENGTH
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
            id_length: default_id_length(),
        }
    }
}

impl RosterConfig {
    /// Load the config found by searching upward from `start_path`.
    ///
    /// Returns the config and the project root (the directory holding the file).
    pub fn load(start_path: &Path) -> Result<(Self, PathBuf)> {
        let config_path = Self::find_config_file(start_path)?;
        Self::load_file(&config_path)
    }

    /// Like [`RosterConfig::load`], but falls back to the defaults rooted at
    /// `start_path` when no config file exists.
    pub fn load_or_default(start_path: &Path) -> Result<(Self, PathBuf)> {
        match Self::find_config_file(start_path) {
            Ok(config_path) => Self::load_file(&config_path),
            Err(RosterError::Config(_)) => {
                tracing::debug!(
                    start = %start_path.display(),
                    "No config file found, using defaults"
                );
                Ok((Self::default(), start_path.to_path_buf()))
            }
            Err(e) => Err(e),
        }
    }

    pub fn load_file(config_path: &Path) -> Result<(Self, PathBuf)> {
        let content = std::fs::read_to_string(config_path)?;
        let config: RosterConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        let project_root = config_path
            .parent()
            .ok_or_else(|| RosterError::Config("Config file has no parent directory".to_string()))?
            .to_path_buf();
        tracing::debug!(path = %config_path.display(), "Loaded config");
        Ok((config, project_root))
    }

    pub fn find_config_file(start_path: &Path) -> Result<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(config_path);
            }
            if !current.pop() {
                return Err(RosterError::Config(format!(
                    "No {} found in {} or its parents",
                    CONFIG_FILE_NAME,
                    start_path.display()
                )));
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.id_length < MIN_ID_LENGTH {
            return Err(RosterError::Config(format!(
                "storage.id_length must be at least {}",
                MIN_ID_LENGTH
            )));
        }
        if self.storage.path.trim().is_empty() {
            return Err(RosterError::Config(
                "storage.path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn data_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.storage.path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = RosterConfig::default();
        assert_eq!(config.server.addr().to_string(), "127.0.0.1:4000");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.id_length, DEFAULT_ID_LENGTH);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: RosterConfig = serde_yaml::from_str("storage:\n  backend: file\n").unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.path, ".roster");
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_load_searches_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let config = RosterConfig {
            server: ServerSettings {
                port: 8080,
                ..ServerSettings::default()
            },
            ..RosterConfig::default()
        };
        config
            .save(&temp_dir.path().join(CONFIG_FILE_NAME))
            .unwrap();

        let nested = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (loaded, root) = RosterConfig::load(&nested).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(root, temp_dir.path());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let (config, root) = RosterConfig::load_or_default(temp_dir.path()).unwrap();
        assert_eq!(config, RosterConfig::default());
        assert_eq!(root, temp_dir.path());
    }

    #[test]
    fn test_short_id_length_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "storage:\n  id_length: 2\n").unwrap();

        let result = RosterConfig::load_file(&path);
        assert!(matches!(result, Err(RosterError::Config(_))));
    }

    #[test]
    fn test_data_path_is_relative_to_project_root() {
        let config = RosterConfig::default();
        assert_eq!(
            config.data_path(Path::new("/srv/app")),
            PathBuf::from("/srv/app/.roster")
        );
    }
}
