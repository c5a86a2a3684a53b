// ABOUTME: Drives a blue-green rollout plus the optional silent deployment.
// ABOUTME: The silent push runs alongside the primary one and never affects its status.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::{DeploymentOutcome, PushAction, PushError, Pusher, Rollout};
use crate::descriptor::DeploymentDescriptor;
use crate::diagnostics::Warning;
use crate::types::Foundation;

pub struct PushCoordinator {
    pusher: Arc<dyn Pusher>,
}

impl PushCoordinator {
    pub fn new(pusher: Arc<dyn Pusher>) -> Self {
        Self { pusher }
    }

    /// Push to every foundation, then commit or roll back as a whole.
    ///
    /// Returns once the primary rollout and any silent push have both
    /// completed.
    pub async fn push(
        &self,
        deployment: Arc<DeploymentDescriptor>,
        foundations: &[Foundation],
        cancel: &CancellationToken,
    ) -> DeploymentOutcome {
        let pusher = self.pusher.as_ref();
        let rollout = Rollout::new(Arc::clone(&deployment), foundations.to_vec());

        let primary = async {
            match rollout.stage(pusher, cancel).await {
                Ok(staged) => staged.commit(pusher).await,
                Err(failed) => failed.rollback(pusher).await,
            }
        };
        let silent = async {
            match deployment.silent_target() {
                Some(target) => silent_push(pusher, target, &deployment, cancel).await,
                None => Ok(()),
            }
        };

        let (finished, silent_result) = tokio::join!(primary, silent);
        let mut outcome = finished.into_outcome();

        if let Err(e) = silent_result {
            tracing::warn!(foundation = %e.foundation(), error = %e, "silent deployment failed");
            outcome
                .output
                .push_str(&format!("Silent deployment to {} failed: {e}\n", e.foundation()));
            outcome
                .warnings
                .push(Warning::silent_deploy(format!("silent deployment failed: {e}")));
        }

        tracing::info!(
            status = outcome.status_code,
            succeeded = outcome.succeeded(),
            "rollout finished"
        );
        outcome
    }
}

/// Stage then commit on the silent endpoint. No rollback is attempted.
///
/// Each deployment pushes to the silent endpoint once: exactly one `stage`
/// call, followed by one `commit` only when staging succeeded.
async fn silent_push(
    pusher: &dyn Pusher,
    target: &Foundation,
    deployment: &DeploymentDescriptor,
    cancel: &CancellationToken,
) -> Result<(), PushError> {
    tracing::info!(foundation = %target, "starting silent deployment");

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            return Err(PushError::Cancelled {
                foundation: target.clone(),
                action: PushAction::Stage.as_str(),
            });
        }
        result = pusher.stage(target, deployment) => { result?; }
    }
    pusher.commit(target, deployment).await?;

    tracing::debug!(foundation = %target, "silent deployment succeeded");
    Ok(())
}
