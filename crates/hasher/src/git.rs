//! Git-backed repository hashing.
//!
//! Combines the committed tree (`git ls-tree -r HEAD`) with working-directory
//! deltas (`git status --porcelain`) so the result reflects what is on disk,
//! not just what is committed. Uncommitted content is hashed with
//! `git hash-object`, which produces the same blob ids git itself stores.

use crate::provider::{FileHashes, HasherError, RepoHasher};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

pub struct GitHasher {
  git_path: String,
}

impl GitHasher {
  pub fn new() -> Self {
    Self { git_path: "git".to_string() }
  }

  /// Use a specific git executable instead of resolving `git` from PATH.
  pub fn with_git_path(mut self, path: impl Into<String>) -> Self {
    self.git_path = path.into();
    self
  }

  async fn run_git(&self, root: &Path, args: &[&str]) -> Result<Vec<u8>, HasherError> {
    let output = Command::new(&self.git_path)
      .args(args)
      .current_dir(root)
      .stdin(Stdio::null())
      .output()
      .await
      .map_err(spawn_error)?;

    if !output.status.success() {
      return Err(HasherError::ProcessFailed {
        code: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    Ok(output.stdout)
  }

  /// Hash working-directory files in one batch via `git hash-object`.
  /// Output order matches input order.
  async fn hash_objects(&self, root: &Path, paths: &[String]) -> Result<Vec<String>, HasherError> {
    let mut child = Command::new(&self.git_path)
      .args(["hash-object", "--stdin-paths"])
      .current_dir(root)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(spawn_error)?;

    // feed stdin and drain stdout together; writing the whole path list up
    // front blocks once the output pipe fills on large batches
    let stdin = child.stdin.take();
    let input = paths.join("\n");
    let write = async move {
      if let Some(mut stdin) = stdin {
        use tokio::io::AsyncWriteExt;
        stdin.write_all(input.as_bytes()).await?;
      }
      Ok::<_, std::io::Error>(())
    };

    let (written, output) = tokio::join!(write, child.wait_with_output());
    let output = output?;
    if !output.status.success() {
      return Err(HasherError::ProcessFailed {
        code: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }
    written?;

    let hashes: Vec<String> = String::from_utf8_lossy(&output.stdout)
      .lines()
      .map(|line| line.trim().to_string())
      .filter(|line| !line.is_empty())
      .collect();

    if hashes.len() != paths.len() {
      return Err(HasherError::ParseError(format!(
        "hash-object returned {} hashes for {} paths",
        hashes.len(),
        paths.len()
      )));
    }

    Ok(hashes)
  }
}

impl Default for GitHasher {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl RepoHasher for GitHasher {
  fn name(&self) -> &str {
    "git"
  }

  async fn is_available(&self) -> bool {
    Command::new(&self.git_path)
      .arg("--version")
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .status()
      .await
      .map(|status| status.success())
      .unwrap_or(false)
  }

  async fn hash_repo(&self, root: &Path, exclude: &[&str]) -> Result<FileHashes, HasherError> {
    let tree = self.run_git(root, &["ls-tree", "-r", "-z", "HEAD"]).await?;
    let mut hashes = parse_ls_tree(&String::from_utf8_lossy(&tree))?;
    hashes.retain(|path, _| !is_excluded(path, exclude));

    // --untracked-files=all lists the files inside a new directory; the
    // collapsed `?? dir/` form cannot be fed to hash-object
    let status = self.run_git(root, &["status", "--porcelain", "-z", "--untracked-files=all"]).await?;
    let entries = parse_status_porcelain(&String::from_utf8_lossy(&status))?;

    let mut to_hash: Vec<String> = Vec::new();
    for entry in entries {
      match entry {
        StatusEntry::Removed(path) => {
          hashes.remove(&path);
        }
        StatusEntry::Changed(path) => {
          if !is_excluded(&path, exclude) {
            to_hash.push(path);
          }
        }
      }
    }

    if !to_hash.is_empty() {
      let fresh = self.hash_objects(root, &to_hash).await?;
      for (path, hash) in to_hash.into_iter().zip(fresh) {
        hashes.insert(path, hash);
      }
    }

    tracing::debug!("Hashed {} repository files", hashes.len());
    Ok(hashes)
  }
}

fn spawn_error(e: std::io::Error) -> HasherError {
  if e.kind() == std::io::ErrorKind::NotFound {
    HasherError::GitNotFound
  } else {
    HasherError::SpawnFailed(e)
  }
}

/// Whether the final path segment is on the exclude list.
fn is_excluded(path: &str, exclude: &[&str]) -> bool {
  let name = match path.rsplit_once('/') {
    Some((_, name)) => name,
    None => path,
  };
  exclude.contains(&name)
}

/// A working-directory delta relative to the committed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StatusEntry {
  /// File exists on disk with uncommitted content; must be re-hashed.
  Changed(String),
  /// File is deleted (or is the source of a rename); must be dropped.
  Removed(String),
}

/// Parse `git ls-tree -r -z HEAD` output into path -> blob id.
///
/// Entries are `<mode> <type> <object>\t<path>` separated by NUL. Non-blob
/// entries (submodule commits) are skipped.
fn parse_ls_tree(output: &str) -> Result<FileHashes, HasherError> {
  let mut hashes = FileHashes::new();

  for entry in output.split('\0') {
    if entry.is_empty() {
      continue;
    }

    let (meta, path) = entry
      .split_once('\t')
      .ok_or_else(|| HasherError::ParseError(format!("malformed ls-tree entry: {:?}", entry)))?;

    let mut fields = meta.split_whitespace();
    let _mode = fields.next();
    let kind = fields
      .next()
      .ok_or_else(|| HasherError::ParseError(format!("malformed ls-tree entry: {:?}", entry)))?;
    let object = fields
      .next()
      .ok_or_else(|| HasherError::ParseError(format!("malformed ls-tree entry: {:?}", entry)))?;

    if kind == "blob" {
      hashes.insert(path.to_string(), object.to_string());
    }
  }

  Ok(hashes)
}

/// Parse `git status --porcelain -z` output into per-path deltas.
///
/// Entries are `XY <path>` separated by NUL; a rename or copy in X is
/// followed by one extra NUL-terminated field holding the original path.
fn parse_status_porcelain(output: &str) -> Result<Vec<StatusEntry>, HasherError> {
  let mut entries = Vec::new();
  let mut fields = output.split('\0');

  while let Some(field) = fields.next() {
    if field.is_empty() {
      continue;
    }
    if field.len() < 4 || field.as_bytes()[2] != b' ' {
      return Err(HasherError::ParseError(format!("malformed status entry: {:?}", field)));
    }

    let x = field.as_bytes()[0] as char;
    let y = field.as_bytes()[1] as char;
    let path = &field[3..];

    if x == 'R' || x == 'C' {
      let original = fields
        .next()
        .ok_or_else(|| HasherError::ParseError("rename entry without an original path".to_string()))?;
      entries.push(StatusEntry::Removed(original.to_string()));
    }

    if x == 'D' || y == 'D' {
      entries.push(StatusEntry::Removed(path.to_string()));
    } else {
      entries.push(StatusEntry::Changed(path.to_string()));
    }
  }

  Ok(entries)
}
