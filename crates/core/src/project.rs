use crate::config::CONFIG_FILENAME;
use crate::paths::normalize_folder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Find the workspace root by walking up from `start` until a directory
/// containing `depsnap.toml` is found.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
  let mut current = start.to_path_buf();

  loop {
    if current.join(CONFIG_FILENAME).is_file() {
      return Some(current);
    }

    if !current.pop() {
      return None;
    }
  }
}

/// A named project rooted at a folder inside the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
  pub name: String,
  /// Repo-root-relative folder, as written in the config file.
  pub folder: String,
}

impl ProjectDescriptor {
  pub fn new(name: impl Into<String>, folder: impl Into<String>) -> Self {
    Self { name: name.into(), folder: folder.into() }
  }

  /// Folder with separators and leading/trailing noise normalized.
  pub fn normalized_folder(&self) -> String {
    normalize_folder(&self.folder)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn test_find_workspace_root() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("packages/a/src");
    fs::create_dir_all(&nested).unwrap();
    fs::write(temp.path().join(CONFIG_FILENAME), "projects = []\n").unwrap();

    assert_eq!(find_workspace_root(&nested), Some(temp.path().to_path_buf()));
    assert_eq!(find_workspace_root(temp.path()), Some(temp.path().to_path_buf()));
  }

  #[test]
  fn test_find_workspace_root_missing() {
    let temp = TempDir::new().unwrap();
    assert_eq!(find_workspace_root(temp.path()), None);
  }

  #[test]
  fn test_normalized_folder() {
    let project = ProjectDescriptor::new("a", "./packages/a/");
    assert_eq!(project.normalized_folder(), "packages/a");

    let root = ProjectDescriptor::new("repo", ".");
    assert_eq!(root.normalized_folder(), "");
  }
}
