// ABOUTME: The push capability used by the rollout engine.
// ABOUTME: One call per foundation per blue-green step, each returning captured output.

use async_trait::async_trait;
use std::fmt;

use super::PushError;
use crate::descriptor::DeploymentDescriptor;
use crate::types::Foundation;

/// Result of a successful push capability call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReport {
    pub status_code: u16,
    pub output: String,
}

impl PushReport {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            output: output.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PushAction {
    Stage,
    Commit,
    Rollback,
    Start,
    Stop,
}

impl PushAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushAction::Stage => "stage",
            PushAction::Commit => "commit",
            PushAction::Rollback => "rollback",
            PushAction::Start => "start",
            PushAction::Stop => "stop",
        }
    }
}

impl fmt::Display for PushAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uploads and switches application versions on a single foundation.
///
/// `stage` must leave the previous version serving traffic. `commit` cuts
/// traffic over to the staged version and retires the old one. `rollback`
/// removes a staged version and leaves the old one untouched.
#[async_trait]
pub trait Pusher: Send + Sync {
    async fn stage(
        &self,
        foundation: &Foundation,
        deployment: &DeploymentDescriptor,
    ) -> Result<PushReport, PushError>;

    async fn commit(
        &self,
        foundation: &Foundation,
        deployment: &DeploymentDescriptor,
    ) -> Result<PushReport, PushError>;

    async fn rollback(
        &self,
        foundation: &Foundation,
        deployment: &DeploymentDescriptor,
    ) -> Result<PushReport, PushError>;
}
