//! Workspace configuration loaded from `depsnap.toml` at the repository root.
//!
//! Discovery walks up from the starting directory until the config file is
//! found, so any subdirectory of the workspace is a valid place to run from.

use crate::error::{Error, Result};
use crate::events::EventHooks;
use crate::project::{ProjectDescriptor, find_workspace_root};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Workspace configuration filename, expected at the repository root.
pub const CONFIG_FILENAME: &str = "depsnap.toml";

/// Bookkeeping file written into project folders by build tooling; always
/// excluded from repository hashing so snapshots never report it.
pub const STATE_FILENAME: &str = "depsnap-state.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
  /// Repository root; the directory the config file was loaded from.
  #[serde(skip)]
  pub root: PathBuf,

  /// Repo-root-relative path of the dependency lockfile shared by all
  /// projects. A change to this file marks every project as changed.
  pub lockfile: Option<String>,

  /// Projects in declaration order; earlier entries win when folders overlap.
  pub projects: Vec<ProjectDescriptor>,

  /// Shell commands per lifecycle event.
  pub hooks: EventHooks,
}

impl WorkspaceConfig {
  /// Load the workspace config by walking up from `start_dir`.
  pub fn load(start_dir: &Path) -> Result<Self> {
    let root = find_workspace_root(start_dir)
      .ok_or_else(|| Error::ConfigNotFound(CONFIG_FILENAME.to_string()))?;
    Self::load_from(&root.join(CONFIG_FILENAME))
  }

  /// Load the config from an explicit file path. The file's parent directory
  /// becomes the workspace root.
  pub fn load_from(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    let mut config: WorkspaceConfig = toml::from_str(&content)?;
    config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<()> {
    let mut seen = HashSet::new();

    for project in &self.projects {
      if project.name.is_empty() {
        return Err(Error::Validation("project with an empty name".to_string()));
      }
      if !seen.insert(project.name.as_str()) {
        return Err(Error::Validation(format!("duplicate project name: {}", project.name)));
      }
    }

    Ok(())
  }

  /// Look up a project by name.
  pub fn project(&self, name: &str) -> Option<&ProjectDescriptor> {
    self.projects.iter().find(|p| p.name == name)
  }

  /// Absolute path of the configured lockfile, if any.
  pub fn lockfile_path(&self) -> Option<PathBuf> {
    self.lockfile.as_ref().map(|rel| self.root.join(rel))
  }

  /// Scratch directory advertised to hook commands via `INIT_CWD`.
  pub fn temp_dir(&self) -> PathBuf {
    self.root.join(".depsnap").join("tmp")
  }
}

/// Starter `depsnap.toml` written by `depsnap init`.
pub fn generate_template() -> String {
  r#"# depsnap workspace configuration
# Place this file at the repository root.

# Repo-root-relative path of the dependency lockfile shared by every project.
# A change to this file marks every project as changed.
# lockfile = "shrinkwrap.yaml"

# Projects in priority order. When folders overlap, the first match owns
# the file.
[[projects]]
name = "app"
folder = "apps/app"

# [[projects]]
# name = "lib-a"
# folder = "libs/a"

# Shell commands run at lifecycle events. A failing command is reported but
# does not stop the commands after it.
[hooks]
before-install = []
after-install = []
before-build = []
after-build = []
"#
  .to_string()
}
