use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Repo-relative file path (forward slashes) mapped to its content hash.
pub type FileHashes = HashMap<String, String>;

#[async_trait]
pub trait RepoHasher: Send + Sync {
  fn name(&self) -> &str;

  /// Whether the backing version control tooling is usable at all. Checked
  /// once per analyzer; a `false` here means every snapshot stays empty.
  async fn is_available(&self) -> bool;

  /// Hash every tracked and locally modified file under `root`.
  ///
  /// Keys are repo-relative with forward slashes. Files whose final path
  /// segment appears in `exclude` are left out, and files deleted on disk
  /// must not appear even if still tracked.
  async fn hash_repo(&self, root: &Path, exclude: &[&str]) -> Result<FileHashes, crate::HasherError>;
}

#[derive(Debug, thiserror::Error)]
pub enum HasherError {
  #[error("git executable not found. Ensure 'git' is in your PATH.")]
  GitNotFound,
  #[error("Failed to spawn process: {0}")]
  SpawnFailed(#[from] std::io::Error),
  #[error("Process exited with status {code}: {stderr}")]
  ProcessFailed { code: i32, stderr: String },
  #[error("Unexpected output: {0}")]
  ParseError(String),
}
