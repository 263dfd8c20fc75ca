use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("Config not found: no {0} in this directory or any parent")]
  ConfigNotFound(String),

  #[error("Validation: {0}")]
  Validation(String),

  #[error("Unknown hook event: {0}")]
  UnknownEvent(String),

  #[error("TOML: {0}")]
  Toml(#[from] toml::de::Error),

  #[error("IO: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
