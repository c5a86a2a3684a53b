// ABOUTME: Blue-green rollout across every foundation of an environment.
// ABOUTME: Each transition consumes the rollout and returns the next state.

use futures::future::join_all;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::error::FAILURE_STATUS;
use super::state::{Failed, Finished, Pending, Staged};
use super::{PushAction, PushError, PushReport, Pusher, RolloutError};
use crate::descriptor::DeploymentDescriptor;
use crate::diagnostics::Warning;
use crate::types::Foundation;

/// Outcome of one capability call against one foundation.
#[derive(Debug)]
pub struct FoundationPushResult {
    pub foundation: Foundation,
    pub status_code: u16,
    pub output: String,
    pub error: Option<PushError>,
}

impl FoundationPushResult {
    fn from_call(foundation: Foundation, result: Result<PushReport, PushError>) -> Self {
        match result {
            Ok(report) => Self {
                foundation,
                status_code: report.status_code,
                output: report.output,
                error: None,
            },
            Err(error) => Self {
                foundation,
                status_code: error.status_code(),
                output: error.output().to_string(),
                error: Some(error),
            },
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Result type for staging: failures keep the rollout so it can be rolled back.
pub type StageResult = Result<Rollout<Staged>, Rollout<Failed>>;

/// Aggregated result of a rollout.
#[derive(Debug)]
pub struct DeploymentOutcome {
    pub status_code: u16,
    pub error: Option<RolloutError>,
    pub output: String,
    /// Non-fatal problems such as a failed silent deployment.
    pub warnings: Vec<Warning>,
}

impl DeploymentOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// A deployment moving through the blue-green steps.
#[derive(Debug)]
pub struct Rollout<S> {
    deployment: Arc<DeploymentDescriptor>,
    foundations: Vec<Foundation>,
    staged: Vec<FoundationPushResult>,
    output: String,
    status_code: u16,
    error: Option<RolloutError>,
    _state: PhantomData<S>,
}

impl<S> Rollout<S> {
    fn transition<T>(self) -> Rollout<T> {
        Rollout {
            deployment: self.deployment,
            foundations: self.foundations,
            staged: self.staged,
            output: self.output,
            status_code: self.status_code,
            error: self.error,
            _state: PhantomData,
        }
    }

    pub fn deployment(&self) -> &DeploymentDescriptor {
        &self.deployment
    }

    pub fn foundations(&self) -> &[Foundation] {
        &self.foundations
    }

    /// Per-foundation staging results, in foundation order.
    pub fn staged(&self) -> &[FoundationPushResult] {
        &self.staged
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    fn append_output(&mut self, results: &[FoundationPushResult]) {
        for result in results {
            self.output.push_str(&result.output);
            if !result.output.is_empty() && !result.output.ends_with('\n') {
                self.output.push('\n');
            }
        }
    }

    /// Run one action on each foundation concurrently, results in foundation order.
    async fn fan_out(
        &self,
        pusher: &dyn Pusher,
        action: PushAction,
        foundations: &[Foundation],
        cancel: Option<&CancellationToken>,
    ) -> Vec<FoundationPushResult> {
        let deployment = self.deployment.as_ref();
        let calls = foundations.iter().map(|foundation| async move {
            let call = async {
                match action {
                    PushAction::Commit => pusher.commit(foundation, deployment).await,
                    PushAction::Rollback => pusher.rollback(foundation, deployment).await,
                    _ => pusher.stage(foundation, deployment).await,
                }
            };
            let result = match cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(PushError::Cancelled {
                        foundation: foundation.clone(),
                        action: action.as_str(),
                    }),
                    result = call => result,
                },
                None => call.await,
            };
            if let Err(e) = &result {
                tracing::warn!(foundation = %foundation, %action, error = %e, "foundation call failed");
            } else {
                tracing::debug!(foundation = %foundation, %action, "foundation call succeeded");
            }
            FoundationPushResult::from_call(foundation.clone(), result)
        });
        join_all(calls).await
    }
}

impl Rollout<Pending> {
    pub fn new(deployment: Arc<DeploymentDescriptor>, foundations: Vec<Foundation>) -> Self {
        Rollout {
            deployment,
            foundations,
            staged: Vec::new(),
            output: String::new(),
            status_code: 200,
            error: None,
            _state: PhantomData,
        }
    }

    /// Push the new version to green instances on every foundation.
    ///
    /// All foundations are attempted and awaited before deciding. Cancellation
    /// turns every unfinished call into [`PushError::Cancelled`].
    pub async fn stage(mut self, pusher: &dyn Pusher, cancel: &CancellationToken) -> StageResult {
        tracing::info!(foundations = self.foundations.len(), "staging new version");

        let results = self
            .fan_out(pusher, PushAction::Stage, &self.foundations, Some(cancel))
            .await;
        self.append_output(&results);

        let failed = results.iter().find(|r| !r.succeeded());
        self.status_code = match (failed, results.first()) {
            (Some(first_failure), _) => first_failure.status_code,
            (None, Some(first)) => first.status_code,
            (None, None) => 200,
        };
        let all_succeeded = failed.is_none();
        self.staged = results;

        if all_succeeded {
            Ok(self.transition())
        } else {
            Err(self.transition())
        }
    }
}

impl Rollout<Staged> {
    /// Cut traffic over on every foundation.
    ///
    /// Foundations that already switched are not reverted when another fails.
    pub async fn commit(mut self, pusher: &dyn Pusher) -> Rollout<Finished> {
        tracing::info!("committing new version");

        let results = self
            .fan_out(pusher, PushAction::Commit, &self.foundations, None)
            .await;
        self.append_output(&results);

        let failures: Vec<PushError> = results.into_iter().filter_map(|r| r.error).collect();
        if !failures.is_empty() {
            self.status_code = FAILURE_STATUS;
            self.error = Some(RolloutError::CommitFailed { failures });
        }
        self.transition()
    }
}

impl Rollout<Failed> {
    /// Remove the staged version from foundations where staging succeeded.
    pub async fn rollback(mut self, pusher: &dyn Pusher) -> Rollout<Finished> {
        let succeeded: Vec<Foundation> = self
            .staged
            .iter()
            .filter(|r| r.succeeded())
            .map(|r| r.foundation.clone())
            .collect();

        tracing::warn!(
            rolling_back = succeeded.len(),
            "staging failed, rolling back"
        );

        let rollback_failures: Vec<PushError> = if succeeded.is_empty() {
            Vec::new()
        } else {
            let results = self
                .fan_out(pusher, PushAction::Rollback, &succeeded, None)
                .await;
            self.append_output(&results);
            results.into_iter().filter_map(|r| r.error).collect()
        };

        let staged = std::mem::take(&mut self.staged);
        let total = staged.len();
        let failures: Vec<PushError> = staged.into_iter().filter_map(|r| r.error).collect();

        self.error = Some(RolloutError::PushFailed {
            failures,
            total,
            rollback_failures,
        });
        self.transition()
    }
}

impl Rollout<Finished> {
    pub fn into_outcome(self) -> DeploymentOutcome {
        DeploymentOutcome {
            status_code: self.status_code,
            error: self.error,
            output: self.output,
            warnings: Vec::new(),
        }
    }
}
