pub mod config;
pub mod error;
pub mod events;
pub mod paths;
pub mod project;

pub use config::{CONFIG_FILENAME, STATE_FILENAME, WorkspaceConfig, generate_template};
pub use error::{Error, Result};
pub use events::{EventHooks, HookEvent};
pub use paths::{is_path_under, normalize_folder, normalize_path, repo_relative};
pub use project::{ProjectDescriptor, find_workspace_root};
