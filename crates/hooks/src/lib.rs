pub mod runner;

pub use runner::{HookError, HookRunSummary, HookRunner};
