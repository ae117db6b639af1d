// =============================================================================
// Config
// =============================================================================
//
// Loaded from `reel-hub.toml` (or `--config`). Every section and key is
// optional:
//
// ```toml
// [server]
// bind = "127.0.0.1:3000"
// cors = true
//
// [[source.mounts]]
// path = "/content/oscars"
// file = "fixtures/oscars.json"
//
// [query]
// limit_mode = "after_sort"                            # or "before_sort"
// container_resource_type = "test/filmEntryContainer"  # "" accepts any container
// ```

use std::path::{Path, PathBuf};

use reel_core::LimitMode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Default, Clone, Debug)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_cors")]
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors: default_cors(),
        }
    }
}

/// Where film records come from. A directory, when set, wins over mounts.
#[derive(Deserialize, Default, Clone, Debug)]
pub struct SourceConfig {
    #[serde(default)]
    pub mounts: Vec<MountConfig>,
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct MountConfig {
    pub path: String,
    pub file: PathBuf,
}

#[derive(Deserialize, Clone, Debug)]
pub struct QueryConfig {
    #[serde(default)]
    pub limit_mode: LimitMode,
    #[serde(default = "default_container_resource_type")]
    pub container_resource_type: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            limit_mode: LimitMode::default(),
            container_resource_type: default_container_resource_type(),
        }
    }
}

impl QueryConfig {
    /// Required container resource type; `None` when the check is disabled.
    pub fn required_resource_type(&self) -> Option<&str> {
        Some(self.container_resource_type.as_str()).filter(|t| !t.is_empty())
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".into()
}
fn default_cors() -> bool {
    true
}
fn default_container_resource_type() -> String {
    "test/filmEntryContainer".into()
}

impl Config {
    /// Load `path`, or return defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert!(config.server.cors);
        assert!(config.source.mounts.is_empty());
        assert_eq!(config.source.directory, None);
        assert_eq!(config.query.limit_mode, LimitMode::AfterSort);
        assert_eq!(
            config.query.required_resource_type(),
            Some("test/filmEntryContainer")
        );
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            [server]
            bind = "0.0.0.0:8080"
            cors = false

            [[source.mounts]]
            path = "/content/oscars"
            file = "fixtures/oscars.json"

            [query]
            limit_mode = "before_sort"
            container_resource_type = ""
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert!(!config.server.cors);
        assert_eq!(
            config.source.mounts,
            vec![MountConfig {
                path: "/content/oscars".into(),
                file: PathBuf::from("fixtures/oscars.json"),
            }]
        );
        assert_eq!(config.query.limit_mode, LimitMode::BeforeSort);
        assert_eq!(config.query.required_resource_type(), None);
    }

    #[test]
    fn test_unknown_limit_mode_is_rejected() {
        assert!(Config::from_toml("[query]\nlimit_mode = \"sometimes\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reel-hub.toml");
        std::fs::write(&path, "[server\nbind = 1").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }
}
