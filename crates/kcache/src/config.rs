//! Configuration management for kcache.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Command line / environment (`--dir`, `KCACHE_DIR`)
//! 2. Config file (`KCACHE_CONFIG`, else `<data_dir>/config.toml`)
//! 3. Default values

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use kcache_core::{CacheConfig, KnowledgeCache};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Paths
    #[serde(default)]
    pub paths: PathsConfig,

    /// Tier limits and thresholds
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Base directory for kcache data
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Learnings directory (default: `<data_dir>/learnings`)
    #[serde(default)]
    pub learnings_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            learnings_dir: None,
        }
    }
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "kcache", "kcache") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".kcache")
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .cache
            .validate()
            .with_context(|| format!("Invalid [cache] section in {}", path.display()))?;
        Ok(config)
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("KCACHE_CONFIG") {
            PathBuf::from(path)
        } else {
            default_data_dir().join("config.toml")
        }
    }

    /// Resolve the learnings directory, preferring an explicit override.
    pub fn learnings_dir(&self, dir_override: Option<PathBuf>) -> PathBuf {
        dir_override
            .or_else(|| self.paths.learnings_dir.clone())
            .unwrap_or_else(|| self.paths.data_dir.join("learnings"))
    }

    /// Open the cache this configuration points at.
    pub fn open_cache(&self, dir_override: Option<PathBuf>) -> Result<KnowledgeCache> {
        let root = self.learnings_dir(dir_override);
        KnowledgeCache::new(&root, self.cache.clone())
            .with_context(|| format!("Failed to open cache at {}", root.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache, CacheConfig::default());
        assert!(config.paths.learnings_dir.is_none());
        assert_eq!(
            config.learnings_dir(None),
            config.paths.data_dir.join("learnings")
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.cache.max_recent, 50);
    }

    #[test]
    fn test_partial_toml() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[paths]
data_dir = "/srv/kcache"

[cache]
max_hot = 5
decay_days = 7
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.paths.data_dir, PathBuf::from("/srv/kcache"));
        assert_eq!(config.cache.max_hot, 5);
        assert_eq!(config.cache.decay_days, 7);
        assert_eq!(config.cache.max_recent, 50);
        assert_eq!(
            config.learnings_dir(None),
            PathBuf::from("/srv/kcache/learnings")
        );
    }

    #[test]
    fn test_invalid_cache_section_is_rejected() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[cache]\nmax_recent = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("max_recent"));
    }

    #[test]
    fn test_learnings_dir_precedence() {
        let mut config = Config::default();
        config.paths.learnings_dir = Some(PathBuf::from("/from/config"));

        assert_eq!(config.learnings_dir(None), PathBuf::from("/from/config"));
        assert_eq!(
            config.learnings_dir(Some(PathBuf::from("/from/flag"))),
            PathBuf::from("/from/flag")
        );
    }

    #[test]
    fn test_open_cache_uses_resolved_dir() {
        let temp = tempdir().expect("Failed to create temp dir");
        let config = Config::default();
        let cache = config.open_cache(Some(temp.path().join("l"))).unwrap();
        assert_eq!(cache.root(), temp.path().join("l"));
    }
}
