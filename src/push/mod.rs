// ABOUTME: Blue-green push engine across the foundations of an environment.
// ABOUTME: Stages everywhere, then commits or rolls back as a single decision.

mod coordinator;
mod error;
mod process;
mod pusher;
mod rollout;
mod state;

pub use coordinator::PushCoordinator;
pub use error::{FAILURE_STATUS, PushError, RolloutError};
pub use process::{ARTIFACT_PATH_VAR, ProcessPusher, deployment_env};
pub use pusher::{PushAction, PushReport, Pusher};
pub use rollout::{DeploymentOutcome, FoundationPushResult, Rollout, StageResult};
pub use state::{Failed, Finished, Pending, Staged};
