use analyzer::ChangeAnalyzer;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use depsnap_core::{CONFIG_FILENAME, HookEvent, WorkspaceConfig, generate_template};
use hasher::GitHasher;
use hooks::HookRunner;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::error;

#[derive(Parser)]
#[command(name = "depsnap")]
#[command(about = "Per-project file snapshots and lifecycle hooks for monorepos")]
struct Cli {
  /// Show detailed error information
  #[arg(long, global = true)]
  debug: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the current file snapshot of a project (default: all projects)
  Snapshot {
    /// Project name
    project: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
    /// Git executable used for hashing (default: git on PATH)
    #[arg(long)]
    git_path: Option<String>,
  },
  /// List the projects configured for this workspace
  Projects {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// Run the hook commands configured for a lifecycle event
  Run {
    /// Event name (before-install, after-install, before-build, after-build)
    event: String,
  },
  /// Create a starter depsnap.toml in the current directory
  Init {
    /// Overwrite an existing config file
    #[arg(long)]
    force: bool,
  },
}

/// Initialize logging for CLI commands (stderr only; stdout carries command output)
fn init_cli_logging(debug: bool) {
  let level = if debug { tracing::Level::DEBUG } else { tracing::Level::INFO };

  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
    .with_writer(std::io::stderr)
    .init();
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_cli_logging(cli.debug);

  match cli.command {
    Commands::Snapshot { project, json, git_path } => cmd_snapshot(project.as_deref(), json, git_path).await,
    Commands::Projects { json } => cmd_projects(json),
    Commands::Run { event } => cmd_run(&event, cli.debug).await,
    Commands::Init { force } => cmd_init(force),
  }
}

/// Load the workspace config by walking up from the current directory
fn load_workspace() -> Result<Arc<WorkspaceConfig>> {
  let cwd = std::env::current_dir().context("Failed to determine current directory")?;
  let config = WorkspaceConfig::load(&cwd).context("Failed to load workspace config")?;
  Ok(Arc::new(config))
}

/// Print file snapshots for one or all projects
async fn cmd_snapshot(project: Option<&str>, json_output: bool, git_path: Option<String>) -> Result<()> {
  let config = load_workspace()?;
  let hasher = match git_path {
    Some(path) => GitHasher::new().with_git_path(path),
    None => GitHasher::new(),
  };
  let analyzer = ChangeAnalyzer::new(config.clone(), Arc::new(hasher));

  let names: Vec<String> = match project {
    Some(name) => {
      if config.project(name).is_none() {
        error!("Unknown project: {}", name);
        std::process::exit(1);
      }
      vec![name.to_string()]
    }
    None => config.projects.iter().map(|p| p.name.clone()).collect(),
  };

  if json_output {
    let mut out = serde_json::Map::new();
    for name in &names {
      if let Some(snapshot) = analyzer.project_snapshot(name).await {
        // sorted keys for stable output
        let files: BTreeMap<&String, &String> = snapshot.iter().collect();
        out.insert(name.clone(), serde_json::to_value(files)?);
      }
    }
    println!("{}", serde_json::to_string_pretty(&serde_json::Value::Object(out))?);
    return Ok(());
  }

  for name in &names {
    let Some(snapshot) = analyzer.project_snapshot(name).await else {
      continue;
    };

    println!("{} ({} files)", name, snapshot.len());
    let mut paths: Vec<&String> = snapshot.keys().collect();
    paths.sort();
    for path in paths {
      println!("  {}  {}", snapshot[path], path);
    }
    println!();
  }

  Ok(())
}

/// List configured projects
fn cmd_projects(json_output: bool) -> Result<()> {
  let config = load_workspace()?;

  if json_output {
    println!("{}", serde_json::to_string_pretty(&config.projects)?);
    return Ok(());
  }

  if config.projects.is_empty() {
    println!("No projects configured in {}", CONFIG_FILENAME);
    return Ok(());
  }

  for project in &config.projects {
    println!("{}  {}", project.name, project.folder);
  }

  Ok(())
}

/// Run hook commands for a lifecycle event
async fn cmd_run(event: &str, debug: bool) -> Result<()> {
  let event: HookEvent = event.parse()?;
  let config = load_workspace()?;
  let runner = HookRunner::new(config);

  let summary = runner.run(event, debug).await;

  if summary.executed == 0 {
    println!("No hook commands configured for {}", event);
    return Ok(());
  }

  if summary.failed > 0 {
    error!("{} of {} hook command(s) failed", summary.failed, summary.executed);
    std::process::exit(1);
  }

  Ok(())
}

/// Write a starter config file
fn cmd_init(force: bool) -> Result<()> {
  let path = std::env::current_dir()
    .context("Failed to determine current directory")?
    .join(CONFIG_FILENAME);

  if path.exists() && !force {
    error!("Config file already exists: {}", path.display());
    println!("Re-run with --force to overwrite it");
    std::process::exit(1);
  }

  std::fs::write(&path, generate_template()).context("Failed to write config file")?;

  println!("Created {}", path.display());
  println!("Edit the file to declare your projects and hooks.");
  Ok(())
}
