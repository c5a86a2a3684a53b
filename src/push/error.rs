// ABOUTME: Push engine error types with SNAFU pattern.
// ABOUTME: Per-foundation failures keep their captured output for classification.

use snafu::Snafu;

use crate::types::Foundation;

/// Status reported for failures that carry no status of their own.
pub const FAILURE_STATUS: u16 = 500;

/// Failure of one push capability call against one foundation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PushError {
    #[snafu(display("{action} on {foundation} failed with status {status_code}: {message}"))]
    Rejected {
        foundation: Foundation,
        action: &'static str,
        status_code: u16,
        message: String,
        output: String,
    },

    #[snafu(display("{action} on {foundation} was cancelled"))]
    Cancelled {
        foundation: Foundation,
        action: &'static str,
    },

    #[snafu(display("failed to prepare artifact for {foundation}: {source}"))]
    Artifact {
        foundation: Foundation,
        source: std::io::Error,
    },

    #[snafu(display("failed to run push command for {foundation}: {source}"))]
    Spawn {
        foundation: Foundation,
        source: std::io::Error,
    },
}

impl PushError {
    pub fn foundation(&self) -> &Foundation {
        match self {
            PushError::Rejected { foundation, .. }
            | PushError::Cancelled { foundation, .. }
            | PushError::Artifact { foundation, .. }
            | PushError::Spawn { foundation, .. } => foundation,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            PushError::Rejected { status_code, .. } => *status_code,
            _ => FAILURE_STATUS,
        }
    }

    /// Text captured before the failure, empty when nothing ran.
    pub fn output(&self) -> &str {
        match self {
            PushError::Rejected { output, .. } => output,
            _ => "",
        }
    }
}

/// Aggregated failure of a whole rollout.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RolloutError {
    /// Staging failed somewhere; successful foundations were rolled back.
    #[snafu(display("{}", describe_push_failure(failures, *total, rollback_failures)))]
    PushFailed {
        failures: Vec<PushError>,
        total: usize,
        rollback_failures: Vec<PushError>,
    },

    /// Every foundation staged but cut-over failed on some of them.
    #[snafu(display("commit failed: {}", join_errors(failures)))]
    CommitFailed { failures: Vec<PushError> },
}

impl RolloutError {
    /// Rollback failures recorded alongside the push failure.
    pub fn rollback_failures(&self) -> &[PushError] {
        match self {
            RolloutError::PushFailed {
                rollback_failures, ..
            } => rollback_failures,
            RolloutError::CommitFailed { .. } => &[],
        }
    }

    pub fn failures(&self) -> &[PushError] {
        match self {
            RolloutError::PushFailed { failures, .. } | RolloutError::CommitFailed { failures } => {
                failures
            }
        }
    }
}

fn describe_push_failure(failures: &[PushError], total: usize, rollback: &[PushError]) -> String {
    let mut message = format!(
        "push failed on {} of {} foundations: {}",
        failures.len(),
        total,
        join_errors(failures)
    );
    if !rollback.is_empty() {
        message.push_str("; rollback failed: ");
        message.push_str(&join_errors(rollback));
    }
    message
}

fn join_errors(errors: &[PushError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
