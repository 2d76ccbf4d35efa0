//! Configuration for the lineage engine and CLI.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. `lineage.yaml` (or the file named by `--config`)
//! 2. environment: `LINEAGE_CACHE_FILE`, `LINEAGE_MAX_NODES`
//! 3. command-line flags such as `--cache`
//!
//! ```yaml
//! cache-file: data/lineage_cache.json
//! engine:
//!   max-nodes: 1000
//!   default-depth: 2
//!   query-timeout-ms: 250
//! ```

use crate::engine::{Depth, LineageEngine, MAX_LINEAGE_NODES};
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "lineage.yaml";

/// Cache artifact used when nothing else is configured.
pub const DEFAULT_CACHE_FILE: &str = "data/lineage_cache.json";

/// Environment variable overriding `cache-file`.
pub const ENV_CACHE_FILE: &str = "LINEAGE_CACHE_FILE";

/// Environment variable overriding `engine.max-nodes`.
pub const ENV_MAX_NODES: &str = "LINEAGE_MAX_NODES";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LineageConfig {
    /// Path to the cache artifact (`.json` or `.jsonl`)
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,

    /// Query limits
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Engine section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Node cap per directional query
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,

    /// Depth used when a command does not specify one
    #[serde(default = "default_depth")]
    pub default_depth: u32,

    /// Abort queries running longer than this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_timeout_ms: Option<u64>,
}

fn default_cache_file() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_FILE)
}

fn default_max_nodes() -> usize {
    MAX_LINEAGE_NODES
}

fn default_depth() -> u32 {
    Depth::DEFAULT.get()
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            cache_file: default_cache_file(),
            engine: EngineConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            default_depth: default_depth(),
            query_timeout_ms: None,
        }
    }
}

impl LineageConfig {
    /// Parse and validate YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] for malformed input and
    /// [`ConfigError::InvalidValue`] for out-of-range settings.
    pub fn from_yaml(text: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Ok(Self::from_yaml(&content)?)
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Fails if serialization or the write fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(ConfigError::from)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Apply environment overrides, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `LINEAGE_MAX_NODES` is not a
    /// positive integer.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, ConfigError> {
        if let Some(path) = lookup(ENV_CACHE_FILE).filter(|v| !v.trim().is_empty()) {
            self.cache_file = PathBuf::from(path.trim());
        }
        if let Some(raw) = lookup(ENV_MAX_NODES) {
            self.engine.max_nodes =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_MAX_NODES,
                        message: format!("expected a positive integer, got '{raw}'"),
                    })?;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.engine.max_nodes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.max-nodes",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Configure `engine` with these limits.
    #[must_use]
    pub fn apply<'s>(&self, engine: LineageEngine<'s>) -> LineageEngine<'s> {
        let engine = engine.with_node_limit(self.max_nodes);
        match self.query_timeout_ms {
            Some(ms) => engine.with_timeout(Duration::from_millis(ms)),
            None => engine,
        }
    }

    /// The configured default depth, clamped.
    #[must_use]
    pub fn default_depth(&self) -> Depth {
        Depth::from(self.default_depth)
    }
}
