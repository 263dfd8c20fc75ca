//! Assignment of repository file hashes to the projects that own them.
//!
//! Ownership is first-match-wins in project declaration order, so a file
//! under two overlapping folders belongs to whichever project is declared
//! first. Matching is segment-aware; `packages/a-extra` is not inside
//! `packages/a`.

use depsnap_core::{ProjectDescriptor, is_path_under};
use hasher::FileHashes;
use std::collections::HashMap;

/// Result of splitting a repository-wide hash map across projects.
pub struct PartitionedHashes {
  /// Per-project file hashes. Every configured project has an entry, even
  /// when it owns no files.
  pub by_project: HashMap<String, FileHashes>,
  /// Files no project folder claims.
  pub unassigned: FileHashes,
}

/// Split `repo_hashes` across `projects` by folder containment.
///
/// Projects whose folder is the repository root never match; their files
/// land in the unassigned set along with everything else outside a project
/// folder.
pub fn partition_by_project(projects: &[ProjectDescriptor], repo_hashes: FileHashes) -> PartitionedHashes {
  let folders: Vec<String> = projects.iter().map(|p| p.normalized_folder()).collect();
  let mut assigned: Vec<FileHashes> = vec![FileHashes::new(); projects.len()];
  let mut unassigned = FileHashes::new();

  for (path, hash) in repo_hashes {
    match folders.iter().position(|folder| is_path_under(&path, folder)) {
      Some(i) => {
        assigned[i].insert(path, hash);
      }
      None => {
        unassigned.insert(path, hash);
      }
    }
  }

  let by_project = projects.iter().map(|p| p.name.clone()).zip(assigned).collect();

  PartitionedHashes { by_project, unassigned }
}

/// Copy the lockfile hash from the unassigned set into every project.
///
/// The lockfile pins dependency versions for the whole workspace, so a
/// change to it is a change to every project. No-op when the unassigned set
/// has no entry for `lockfile_rel`.
pub fn inject_shared_lockfile(partitioned: &mut PartitionedHashes, lockfile_rel: &str) {
  let Some(hash) = partitioned.unassigned.get(lockfile_rel) else {
    return;
  };
  let hash = hash.clone();

  for files in partitioned.by_project.values_mut() {
    files.insert(lockfile_rel.to_string(), hash.clone());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_hashes(entries: &[(&str, &str)]) -> FileHashes {
    entries.iter().map(|(path, hash)| (path.to_string(), hash.to_string())).collect()
  }

  #[test]
  fn test_partition_respects_segment_boundaries() {
    let projects =
      vec![ProjectDescriptor::new("a", "packages/a"), ProjectDescriptor::new("b", "packages/b")];
    let hashes = sample_hashes(&[
      ("packages/a/x.ts", "h1"),
      ("packages/a-extra/y.ts", "h2"),
      ("packages/b/z.ts", "h3"),
      ("shrinkwrap.yaml", "h4"),
    ]);

    let result = partition_by_project(&projects, hashes);

    assert_eq!(result.by_project["a"], sample_hashes(&[("packages/a/x.ts", "h1")]));
    assert_eq!(result.by_project["b"], sample_hashes(&[("packages/b/z.ts", "h3")]));
    assert_eq!(
      result.unassigned,
      sample_hashes(&[("packages/a-extra/y.ts", "h2"), ("shrinkwrap.yaml", "h4")])
    );
  }

  #[test]
  fn test_partition_first_match_wins() {
    let projects =
      vec![ProjectDescriptor::new("outer", "packages"), ProjectDescriptor::new("inner", "packages/a")];
    let hashes = sample_hashes(&[("packages/a/x.ts", "h1")]);

    let result = partition_by_project(&projects, hashes);

    assert_eq!(result.by_project["outer"].len(), 1);
    assert!(result.by_project["inner"].is_empty());
  }

  #[test]
  fn test_partition_seeds_every_project() {
    let projects = vec![ProjectDescriptor::new("empty", "packages/empty")];
    let result = partition_by_project(&projects, FileHashes::new());

    assert_eq!(result.by_project.len(), 1);
    assert!(result.by_project["empty"].is_empty());
    assert!(result.unassigned.is_empty());
  }

  #[test]
  fn test_partition_root_project_matches_nothing() {
    let projects = vec![ProjectDescriptor::new("repo", "."), ProjectDescriptor::new("a", "packages/a")];
    let hashes = sample_hashes(&[("README.md", "h1"), ("packages/a/x.ts", "h2")]);

    let result = partition_by_project(&projects, hashes);

    assert!(result.by_project["repo"].is_empty());
    assert_eq!(result.by_project["a"].len(), 1);
    assert_eq!(result.unassigned, sample_hashes(&[("README.md", "h1")]));
  }

  #[test]
  fn test_inject_shared_lockfile() {
    let projects =
      vec![ProjectDescriptor::new("a", "packages/a"), ProjectDescriptor::new("b", "packages/b")];
    let hashes = sample_hashes(&[("packages/a/x.ts", "h1"), ("shrinkwrap.yaml", "h4")]);

    let mut result = partition_by_project(&projects, hashes);
    inject_shared_lockfile(&mut result, "shrinkwrap.yaml");

    assert_eq!(result.by_project["a"]["shrinkwrap.yaml"], "h4");
    assert_eq!(result.by_project["b"]["shrinkwrap.yaml"], "h4");
    // the unassigned set still holds the lockfile; projects get a copy
    assert_eq!(result.unassigned["shrinkwrap.yaml"], "h4");
  }

  #[test]
  fn test_inject_missing_lockfile_is_a_noop() {
    let projects = vec![ProjectDescriptor::new("a", "packages/a")];
    let mut result = partition_by_project(&projects, sample_hashes(&[("packages/a/x.ts", "h1")]));

    inject_shared_lockfile(&mut result, "shrinkwrap.yaml");

    assert!(!result.by_project["a"].contains_key("shrinkwrap.yaml"));
  }
}
