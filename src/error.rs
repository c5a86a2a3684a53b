// ABOUTME: Application-wide error types for greenlight.
// ABOUTME: Wraps module errors and maps them onto response status codes.

use std::path::PathBuf;
use thiserror::Error;

use crate::descriptor::BuildError;
use crate::events::EventError;
use crate::lifecycle::LifecycleError;
use crate::push::RolloutError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("push command is not configured")]
    NoPushCommand,

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Rollout(#[from] RolloutError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Response status for this error.
    ///
    /// Only malformed requests map to 400; every other failure is a 500,
    /// including unknown environments.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Build(e) if e.is_bad_request() => 400,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
