use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Lifecycle points at which configured shell commands run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookEvent {
  BeforeInstall,
  AfterInstall,
  BeforeBuild,
  AfterBuild,
}

impl HookEvent {
  pub const ALL: [HookEvent; 4] = [
    HookEvent::BeforeInstall,
    HookEvent::AfterInstall,
    HookEvent::BeforeBuild,
    HookEvent::AfterBuild,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      HookEvent::BeforeInstall => "before-install",
      HookEvent::AfterInstall => "after-install",
      HookEvent::BeforeBuild => "before-build",
      HookEvent::AfterBuild => "after-build",
    }
  }
}

impl std::fmt::Display for HookEvent {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for HookEvent {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "before-install" => Ok(HookEvent::BeforeInstall),
      "after-install" => Ok(HookEvent::AfterInstall),
      "before-build" => Ok(HookEvent::BeforeBuild),
      "after-build" => Ok(HookEvent::AfterBuild),
      other => Err(Error::UnknownEvent(other.to_string())),
    }
  }
}

/// Ordered shell commands per lifecycle event, from the `[hooks]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EventHooks {
  pub before_install: Vec<String>,
  pub after_install: Vec<String>,
  pub before_build: Vec<String>,
  pub after_build: Vec<String>,
}

impl EventHooks {
  pub fn commands_for(&self, event: HookEvent) -> &[String] {
    match event {
      HookEvent::BeforeInstall => &self.before_install,
      HookEvent::AfterInstall => &self.after_install,
      HookEvent::BeforeBuild => &self.before_build,
      HookEvent::AfterBuild => &self.after_build,
    }
  }

  pub fn is_empty(&self) -> bool {
    HookEvent::ALL.iter().all(|event| self.commands_for(*event).is_empty())
  }
}
