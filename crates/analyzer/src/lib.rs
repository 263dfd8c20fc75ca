pub mod partition;
pub mod snapshot;

pub use partition::{PartitionedHashes, inject_shared_lockfile, partition_by_project};
pub use snapshot::{ChangeAnalyzer, SnapshotSet};
