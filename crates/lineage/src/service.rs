//! Snapshot publication and hot reload.
//!
//! [`LineageService`] owns the currently published [`Snapshot`] behind an
//! `RwLock<Option<Arc<Snapshot>>>`. Readers clone the `Arc` and drop the lock
//! right away, so queries never contend with each other or with a reload.
//! A reload builds the next generation completely before taking the write
//! lock for the swap. In-flight queries keep the `Arc` they cloned and finish
//! against the old generation, which is freed when the last clone drops.
//!
//! Reloads are serialized by an async mutex. A reload that fails for any
//! reason leaves the published generation untouched.

use crate::error::{Error, Result};
use crate::loader;
use crate::snapshot::Snapshot;
use async_trait::async_trait;
use lineage_cache::{read_artifact, CacheFormat, RawArtifact};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Where cache artifacts come from.
///
/// Implementations must be `Send + Sync` so one service can be shared
/// across tasks.
#[async_trait]
pub trait CacheSource: Send + Sync {
    /// Fetch the current artifact.
    async fn fetch(&self) -> Result<RawArtifact>;

    /// Human-readable origin, used in logs and load metadata.
    fn describe(&self) -> String;
}

/// Artifact read from a local file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CacheSource for FileSource {
    async fn fetch(&self) -> Result<RawArtifact> {
        Ok(read_artifact(&self.path).await?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Artifact held in memory and replaceable at runtime.
#[derive(Debug)]
pub struct MemorySource {
    name: String,
    current: Mutex<RawArtifact>,
}

impl MemorySource {
    /// Source serving `bytes` in `format`.
    pub fn new(name: impl Into<String>, format: CacheFormat, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            current: Mutex::new(RawArtifact::from_bytes(format, bytes.into())),
        }
    }

    /// Serve different content from the next fetch on.
    pub fn replace(&self, format: CacheFormat, bytes: impl Into<Vec<u8>>) {
        *self.current.lock() = RawArtifact::from_bytes(format, bytes.into());
    }
}

#[async_trait]
impl CacheSource for MemorySource {
    async fn fetch(&self) -> Result<RawArtifact> {
        Ok(self.current.lock().clone())
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }
}

#[async_trait]
impl<S: CacheSource + ?Sized> CacheSource for Arc<S> {
    async fn fetch(&self) -> Result<RawArtifact> {
        (**self).fetch().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// What a reload did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A new generation was published.
    Replaced {
        /// Generation number of the new snapshot
        generation: u64,
    },
    /// The artifact matched the published generation; nothing changed.
    Unchanged {
        /// Generation number still being served
        generation: u64,
    },
}

/// Holds the published snapshot and reloads it from a [`CacheSource`].
pub struct LineageService {
    source: Box<dyn CacheSource>,
    active: RwLock<Option<Arc<Snapshot>>>,
    reload_lock: tokio::sync::Mutex<()>,
    generation: AtomicU64,
}

impl std::fmt::Debug for LineageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineageService")
            .field("source", &self.source.describe())
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

impl LineageService {
    /// Service over `source` with nothing published yet.
    pub fn new(source: impl CacheSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            active: RwLock::new(None),
            reload_lock: tokio::sync::Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Load the cache file at `path` and publish it as generation 1.
    ///
    /// # Errors
    ///
    /// Fails if the initial load fails; see [`loader::load_snapshot`].
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let service = Self::new(FileSource::new(path));
        service.reload().await?;
        Ok(service)
    }

    /// The published snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoaded`] before the first successful load.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.active.read().clone().ok_or(Error::NotLoaded)
    }

    /// Generation number of the published snapshot (0 before the first load).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Origin of the artifacts this service loads.
    #[must_use]
    pub fn source(&self) -> String {
        self.source.describe()
    }

    /// Fetch the artifact and publish a new generation from it.
    ///
    /// # Errors
    ///
    /// Returns the fetch or load error; the published snapshot is unchanged.
    pub async fn reload(&self) -> Result<ReloadOutcome> {
        self.refresh(false).await
    }

    /// Like [`LineageService::reload`], but skips the rebuild when the
    /// artifact checksum equals the published generation's.
    ///
    /// # Errors
    ///
    /// Same as [`LineageService::reload`].
    pub async fn reload_if_changed(&self) -> Result<ReloadOutcome> {
        self.refresh(true).await
    }

    async fn refresh(&self, skip_unchanged: bool) -> Result<ReloadOutcome> {
        let _serialized = self.reload_lock.lock().await;
        let origin = self.source.describe();

        let artifact = match self.source.fetch().await {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::warn!(%origin, error = %e, "Cache fetch failed; keeping current generation");
                return Err(e);
            }
        };

        if skip_unchanged {
            let current = self.active.read().clone();
            if let Some(current) = current
                && current.metadata().checksum == artifact.checksum()
            {
                let generation = self.generation();
                tracing::debug!(%origin, generation, "Cache unchanged");
                return Ok(ReloadOutcome::Unchanged { generation });
            }
        }

        match loader::load_snapshot(artifact, origin.clone()).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                let generation = {
                    let mut active = self.active.write();
                    *active = Some(snapshot);
                    self.generation.fetch_add(1, Ordering::AcqRel) + 1
                };
                tracing::info!(%origin, generation, "Published lineage generation");
                Ok(ReloadOutcome::Replaced { generation })
            }
            Err(e) => {
                tracing::warn!(
                    %origin,
                    error = %e,
                    generation = self.generation(),
                    "Rejected lineage cache; keeping current generation"
                );
                Err(e)
            }
        }
    }
}
