// ABOUTME: Silent deployment trigger read from the process environment.
// ABOUTME: Names the environment that mirrors pushes and the endpoint that receives them.

use crate::types::Foundation;

pub const SILENT_DEPLOY_ENVIRONMENT_VAR: &str = "SILENT_DEPLOY_ENVIRONMENT";
pub const SILENT_DEPLOY_URL_VAR: &str = "SILENT_DEPLOY_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilentDeploy {
    pub environment: String,
    pub target: Foundation,
}

impl SilentDeploy {
    /// Read the trigger at call time; both variables must be set and non-empty.
    pub fn from_env() -> Option<Self> {
        let environment = std::env::var(SILENT_DEPLOY_ENVIRONMENT_VAR).ok()?;
        let url = std::env::var(SILENT_DEPLOY_URL_VAR).ok()?;
        if environment.trim().is_empty() {
            return None;
        }

        match Foundation::new(&url) {
            Ok(target) => Some(SilentDeploy {
                environment: environment.trim().to_string(),
                target,
            }),
            Err(e) => {
                tracing::warn!("ignoring silent deploy endpoint: {}", e);
                None
            }
        }
    }

    /// Silent endpoint for this environment, if it is the trigger.
    pub fn target_for(environment: &str) -> Option<Foundation> {
        Self::from_env()
            .filter(|silent| silent.environment == environment)
            .map(|silent| silent.target)
    }
}
