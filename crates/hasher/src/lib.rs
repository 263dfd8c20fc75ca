pub mod git;
pub mod provider;

pub use git::GitHasher;
pub use provider::{FileHashes, HasherError, RepoHasher};
