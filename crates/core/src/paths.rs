//! Repo-relative path handling shared by the analyzer and config layers.
//!
//! All snapshot keys and configured folders use forward slashes, regardless
//! of host platform. Containment is decided on whole path segments, so
//! `packages/a-extra` is never mistaken for a child of `packages/a`.

use std::path::Path;

/// Replace backslashes with forward slashes.
pub fn normalize_path(path: &str) -> String {
  path.replace('\\', "/")
}

/// Normalize a configured folder path: forward slashes, no leading `./`,
/// no trailing slash. `"."` and `"./"` normalize to the empty string.
pub fn normalize_folder(folder: &str) -> String {
  let mut out = normalize_path(folder);
  while let Some(stripped) = out.strip_prefix("./") {
    out = stripped.to_string();
  }
  if out == "." {
    out.clear();
  }
  while out.ends_with('/') {
    out.pop();
  }
  out
}

/// Whether `path` lies under `folder` (or equals it), comparing whole
/// path segments.
///
/// An empty folder matches nothing; ownership of root-level files is the
/// caller's policy, not a containment question.
pub fn is_path_under(path: &str, folder: &str) -> bool {
  if folder.is_empty() {
    return false;
  }

  let mut segments = path.split('/');
  for expected in folder.split('/') {
    match segments.next() {
      Some(actual) if actual == expected => {}
      _ => return false,
    }
  }

  true
}

/// Express `target` relative to `root`, with forward slashes.
///
/// Returns `None` when `target` is `root` itself or does not live under it,
/// including paths that escape the root through `..` components.
pub fn repo_relative(root: &Path, target: &Path) -> Option<String> {
  let rel = target.strip_prefix(root).ok()?;

  let mut segments: Vec<&str> = Vec::new();
  for component in rel.components() {
    match component {
      std::path::Component::CurDir => {}
      std::path::Component::Normal(segment) => segments.push(segment.to_str()?),
      _ => return None,
    }
  }

  if segments.is_empty() {
    return None;
  }
  Some(normalize_path(&segments.join("/")))
}
