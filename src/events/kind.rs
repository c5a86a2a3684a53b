// ABOUTME: The four lifecycle event kinds a deployment emits.
// ABOUTME: Used as the subscription key on the event bus.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    DeployStart,
    DeploySuccess,
    DeployFailure,
    DeployFinish,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::DeployStart,
        EventKind::DeploySuccess,
        EventKind::DeployFailure,
        EventKind::DeployFinish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::DeployStart => "deploy.start",
            EventKind::DeploySuccess => "deploy.success",
            EventKind::DeployFailure => "deploy.failure",
            EventKind::DeployFinish => "deploy.finish",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
