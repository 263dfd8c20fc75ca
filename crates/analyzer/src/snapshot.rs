//! Lazily built, cached per-project snapshots of repository state.

use crate::partition::{inject_shared_lockfile, partition_by_project};
use depsnap_core::{STATE_FILENAME, WorkspaceConfig, repo_relative};
use hasher::{FileHashes, RepoHasher};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, warn};

/// Project name -> snapshot, covering every project in the workspace.
pub type SnapshotSet = HashMap<String, Arc<FileHashes>>;

/// Answers "which files does project X currently consist of, and with what
/// content" against the working directory.
///
/// Snapshots are built once, on the first query, and shared by every query
/// after it until [`ChangeAnalyzer::invalidate`] is called. One analyzer is
/// meant to live as long as the command that created it.
pub struct ChangeAnalyzer {
  config: Arc<WorkspaceConfig>,
  hasher: Arc<dyn RepoHasher>,
  cache: RwLock<Option<Arc<SnapshotSet>>>,
  vcs_available: OnceCell<bool>,
}

impl ChangeAnalyzer {
  pub fn new(config: Arc<WorkspaceConfig>, hasher: Arc<dyn RepoHasher>) -> Self {
    Self { config, hasher, cache: RwLock::new(None), vcs_available: OnceCell::new() }
  }

  /// Snapshot for the named project, building the cache on first use.
  ///
  /// Returns `None` only for names absent from the workspace config. Known
  /// projects always get a snapshot; when repository state cannot be read,
  /// the snapshot is empty rather than an error.
  pub async fn project_snapshot(&self, name: &str) -> Option<Arc<FileHashes>> {
    {
      let cache = self.cache.read().await;
      if let Some(snapshots) = cache.as_ref() {
        return snapshots.get(name).cloned();
      }
    }

    let mut cache = self.cache.write().await;
    // another caller may have built while we waited for the write lock
    if cache.is_none() {
      *cache = Some(Arc::new(self.build_snapshots().await));
    }
    cache.as_ref().and_then(|snapshots| snapshots.get(name).cloned())
  }

  /// Drop the cached snapshots; the next query rebuilds from scratch.
  pub async fn invalidate(&self) {
    *self.cache.write().await = None;
  }

  async fn build_snapshots(&self) -> SnapshotSet {
    let empty_set = || -> SnapshotSet {
      self.config.projects.iter().map(|p| (p.name.clone(), Arc::new(FileHashes::new()))).collect()
    };

    // checked once per analyzer; invalidate() does not retry a missing VCS
    let available = *self
      .vcs_available
      .get_or_init(|| async {
        let available = self.hasher.is_available().await;
        if !available {
          warn!(
            "Version control ({}) unavailable. Continuing without change detection.",
            self.hasher.name()
          );
        }
        available
      })
      .await;

    if !available {
      return empty_set();
    }

    let repo_hashes = match self.hasher.hash_repo(&self.config.root, &[STATE_FILENAME]).await {
      Ok(hashes) => hashes,
      Err(e) => {
        warn!("Failed to compute repository file hashes: {}. Continuing without change detection.", e);
        return empty_set();
      }
    };

    let mut partitioned = partition_by_project(&self.config.projects, repo_hashes);

    if let Some(lockfile) = self.config.lockfile_path() {
      match repo_relative(&self.config.root, &lockfile) {
        Some(rel) => inject_shared_lockfile(&mut partitioned, &rel),
        None => debug!("Configured lockfile is outside the repository root; not shared with projects"),
      }
    }

    debug!(
      "Built snapshots for {} projects ({} files unassigned)",
      partitioned.by_project.len(),
      partitioned.unassigned.len()
    );

    partitioned.by_project.into_iter().map(|(name, files)| (name, Arc::new(files))).collect()
  }
}
