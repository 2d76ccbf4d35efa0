//! Application context for CLI command execution.
//!
//! Resolves configuration, loads the cache once and hands commands the
//! published snapshot together with the configured engine limits.
//!
//! # Example
//!
//! ```no_run
//! use lineage::app::App;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_options(None, None).await?;
//!     let snapshot = app.snapshot()?;
//!     println!("{} objects", snapshot.store().len());
//!     Ok(())
//! }
//! ```

use crate::config::{LineageConfig, CONFIG_FILE_NAME};
use crate::engine::{Depth, LineageEngine};
use crate::error::Result;
use crate::service::LineageService;
use crate::snapshot::Snapshot;
use std::path::Path;
use std::sync::Arc;

/// Application context for CLI operations.
#[derive(Debug)]
pub struct App {
    service: LineageService,
    config: LineageConfig,
}

impl App {
    /// Build the context from command-line options.
    ///
    /// Configuration is read from `config_path` if given, else from
    /// `lineage.yaml` in the working directory if present, else defaults.
    /// Environment overrides apply next and `cache_path` wins over both.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the configuration file cannot be read or is invalid
    /// - an environment override is invalid
    /// - the cache cannot be loaded
    pub async fn from_options(cache_path: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let config = Self::resolve_config(cache_path, config_path).await?;
        let service = LineageService::open(&config.cache_file).await?;
        Ok(Self { service, config })
    }

    /// Build the context around an existing service.
    #[must_use]
    pub fn with_service(service: LineageService, config: LineageConfig) -> Self {
        Self { service, config }
    }

    async fn resolve_config(
        cache_path: Option<&Path>,
        config_path: Option<&Path>,
    ) -> Result<LineageConfig> {
        let mut config = match config_path {
            Some(path) => LineageConfig::load(path).await?,
            None if Path::new(CONFIG_FILE_NAME).is_file() => {
                LineageConfig::load(Path::new(CONFIG_FILE_NAME)).await?
            }
            None => LineageConfig::default(),
        };

        config = config.with_env_overrides(|key| std::env::var(key).ok())?;

        if let Some(path) = cache_path {
            config.cache_file = path.to_path_buf();
        }

        tracing::debug!(cache = %config.cache_file.display(), "Resolved configuration");
        Ok(config)
    }

    /// The published snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::NotLoaded`] if nothing is published.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.service.snapshot()
    }

    /// Engine over `snapshot` with the configured limits.
    #[must_use]
    pub fn engine<'s>(&self, snapshot: &'s Snapshot) -> LineageEngine<'s> {
        self.config.engine.apply(snapshot.engine())
    }

    /// Depth used when a command does not specify one.
    #[must_use]
    pub fn default_depth(&self) -> Depth {
        self.config.engine.default_depth()
    }

    /// The underlying service.
    #[must_use]
    pub fn service(&self) -> &LineageService {
        &self.service
    }

    /// Effective configuration.
    #[must_use]
    pub fn config(&self) -> &LineageConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const CACHE: &str = r#"{
        "metadata": {"version": "1"},
        "objects": {"S.A": {"id": "S.A", "schema": "S", "name": "A", "type": "TABLE", "owner": "o", "object_id": 1}},
        "dependencies": {"table_level": []}
    }"#;

    #[tokio::test]
    async fn cache_flag_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "cache-file: /nowhere/cache.json\n").unwrap();

        let mut cache = NamedTempFile::with_suffix(".json").unwrap();
        cache.write_all(CACHE.as_bytes()).unwrap();

        let app = App::from_options(Some(cache.path()), Some(&config_path))
            .await
            .unwrap();
        assert_eq!(app.config().cache_file, cache.path());
        assert_eq!(app.snapshot().unwrap().store().len(), 1);
    }

    #[tokio::test]
    async fn missing_cache_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(App::from_options(Some(&missing), None).await.is_err());
    }
}
