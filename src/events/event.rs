// ABOUTME: Typed lifecycle events broadcast around a deployment.
// ABOUTME: Each variant carries an immutable descriptor snapshot plus its own payload.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use super::EventKind;
use crate::classify::LogMatchedError;
use crate::descriptor::DeploymentDescriptor;
use crate::response::OutputSink;

/// Emitted before any push; handlers may write to the response.
#[derive(Clone)]
pub struct DeployStart {
    pub deployment: Arc<DeploymentDescriptor>,
    pub response: Arc<dyn OutputSink>,
    pub at: DateTime<Utc>,
}

impl fmt::Debug for DeployStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployStart")
            .field("deployment", &self.deployment)
            .field("at", &self.at)
            .finish_non_exhaustive()
    }
}

/// Emitted after every foundation accepted the new version.
#[derive(Debug, Clone)]
pub struct DeploySuccess {
    pub deployment: Arc<DeploymentDescriptor>,
    pub status_code: u16,
    pub at: DateTime<Utc>,
}

/// Emitted after the rollout failed and was rolled back.
#[derive(Debug, Clone)]
pub struct DeployFailure {
    pub deployment: Arc<DeploymentDescriptor>,
    pub status_code: u16,
    pub error: String,
    pub findings: Vec<LogMatchedError>,
    pub at: DateTime<Utc>,
}

/// Emitted exactly once at the end of every deployment that got past the build.
#[derive(Debug, Clone)]
pub struct DeployFinish {
    pub deployment: Arc<DeploymentDescriptor>,
    pub status_code: u16,
    pub succeeded: bool,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    Start(DeployStart),
    Success(DeploySuccess),
    Failure(DeployFailure),
    Finish(DeployFinish),
}

impl LifecycleEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LifecycleEvent::Start(_) => EventKind::DeployStart,
            LifecycleEvent::Success(_) => EventKind::DeploySuccess,
            LifecycleEvent::Failure(_) => EventKind::DeployFailure,
            LifecycleEvent::Finish(_) => EventKind::DeployFinish,
        }
    }

    pub fn deployment(&self) -> &DeploymentDescriptor {
        match self {
            LifecycleEvent::Start(e) => &e.deployment,
            LifecycleEvent::Success(e) => &e.deployment,
            LifecycleEvent::Failure(e) => &e.deployment,
            LifecycleEvent::Finish(e) => &e.deployment,
        }
    }
}
