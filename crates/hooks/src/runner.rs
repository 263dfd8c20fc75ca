//! Sequential execution of configured lifecycle hook commands.
//!
//! Commands run through the platform shell with the caller's working
//! directory. `INIT_CWD` carries the workspace scratch directory so hook
//! scripts have a stable place for intermediate files. A failing command is
//! reported and the rest of the batch still runs.

use depsnap_core::{HookEvent, WorkspaceConfig};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum HookError {
  #[error("Failed to spawn shell: {0}")]
  Spawn(#[from] std::io::Error),
  #[error("Command exited with non-zero status: {0}")]
  CommandFailed(i32),
}

/// Outcome of one hook batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookRunSummary {
  pub executed: usize,
  pub failed: usize,
}

pub struct HookRunner {
  config: Arc<WorkspaceConfig>,
}

impl HookRunner {
  pub fn new(config: Arc<WorkspaceConfig>) -> Self {
    Self { config }
  }

  /// Run every command configured for `event`, in declaration order.
  ///
  /// An event with no commands is a silent no-op. Failures are logged, with
  /// detail behind `debug`, and never abort the remaining commands.
  pub async fn run(&self, event: HookEvent, debug: bool) -> HookRunSummary {
    let commands = self.config.hooks.commands_for(event);
    if commands.is_empty() {
      return HookRunSummary::default();
    }

    info!("Executing {} hook command(s) for {}", commands.len(), event);
    let started = Instant::now();

    let temp_dir = self.config.temp_dir();
    if let Err(e) = tokio::fs::create_dir_all(&temp_dir).await {
      debug!("Could not create hook scratch directory {}: {}", temp_dir.display(), e);
    }

    let mut failed = 0usize;
    for command in commands {
      if let Err(e) = self.run_command(command).await {
        failed += 1;
        warn!("Hook command \"{}\" failed. Re-run with --debug for details.", command);
        if debug {
          warn!("Hook command \"{}\": {}", command, e);
        }
      }
    }

    info!("Hook commands for {} finished in {:.2?}", event, started.elapsed());
    HookRunSummary { executed: commands.len(), failed }
  }

  async fn run_command(&self, command: &str) -> Result<(), HookError> {
    let (shell, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };

    let status = Command::new(shell)
      .arg(flag)
      .arg(command)
      .env("INIT_CWD", self.config.temp_dir())
      .stdin(Stdio::null())
      .status()
      .await?;

    if !status.success() {
      return Err(HookError::CommandFailed(status.code().unwrap_or(-1)));
    }

    Ok(())
  }
}
