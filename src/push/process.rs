// ABOUTME: Push capability backed by an external command.
// ABOUTME: Passes the deployment through GREENLIGHT_* environment variables.

use async_trait::async_trait;
use snafu::ResultExt;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::process::Command;

use super::error::{ArtifactSnafu, FAILURE_STATUS, SpawnSnafu};
use super::{PushAction, PushError, PushReport, Pusher};
use crate::config::{Config, PushCommandConfig};
use crate::descriptor::{ContentType, DeploymentDescriptor, TargetMetadata};
use crate::error::{Error, Result};
use crate::lifecycle::{StateContext, StateController};
use crate::types::{Authorization, CfContext, CorrelationId, Foundation};

pub const ARTIFACT_PATH_VAR: &str = "GREENLIGHT_ARTIFACT_PATH";

/// Runs `<command> [args...] <action>` once per foundation call.
#[derive(Debug, Clone)]
pub struct ProcessPusher {
    command: PathBuf,
    args: Vec<String>,
}

impl ProcessPusher {
    pub fn new(config: &PushCommandConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config
            .push
            .as_ref()
            .map(Self::new)
            .ok_or(Error::NoPushCommand)
    }

    async fn run(
        &self,
        action: PushAction,
        foundation: &Foundation,
        env: HashMap<&'static str, String>,
    ) -> std::result::Result<PushReport, PushError> {
        tracing::debug!(
            command = %self.command.display(),
            %action,
            foundation = %foundation,
            "running push command"
        );

        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(action.as_str())
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .context(SpawnSnafu {
                foundation: foundation.clone(),
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            return Ok(PushReport::ok(text));
        }

        let message = match output.status.code() {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        };
        Err(PushError::Rejected {
            foundation: foundation.clone(),
            action: action.as_str(),
            status_code: FAILURE_STATUS,
            message,
            output: text,
        })
    }

    async fn run_deployment(
        &self,
        action: PushAction,
        foundation: &Foundation,
        deployment: &DeploymentDescriptor,
    ) -> std::result::Result<PushReport, PushError> {
        let mut env = deployment_env(foundation, deployment);

        // The archive must outlive the child process.
        let _archive = if action == PushAction::Stage && deployment.content_type() == ContentType::Zip
        {
            let file = write_archive(deployment.body())
                .await
                .context(ArtifactSnafu {
                    foundation: foundation.clone(),
                })?;
            env.insert(ARTIFACT_PATH_VAR, file.path().display().to_string());
            Some(file)
        } else {
            None
        };

        self.run(action, foundation, env).await
    }
}

async fn write_archive(body: &[u8]) -> std::io::Result<NamedTempFile> {
    let file = tempfile::Builder::new()
        .prefix("greenlight-")
        .suffix(".zip")
        .tempfile()?;
    tokio::fs::write(file.path(), body).await?;
    Ok(file)
}

fn base_env(
    foundation: &Foundation,
    correlation_id: &CorrelationId,
    cf: &CfContext,
    auth: &Authorization,
    target: &TargetMetadata,
    data: Option<&serde_json::Map<String, serde_json::Value>>,
) -> HashMap<&'static str, String> {
    let mut env = HashMap::new();
    env.insert("GREENLIGHT_FOUNDATION", foundation.to_string());
    env.insert("GREENLIGHT_CORRELATION_ID", correlation_id.to_string());
    env.insert("GREENLIGHT_ENVIRONMENT", cf.environment.clone());
    env.insert("GREENLIGHT_ORGANIZATION", cf.organization.clone());
    env.insert("GREENLIGHT_SPACE", cf.space.clone());
    env.insert("GREENLIGHT_APPLICATION", cf.application.clone());
    env.insert("GREENLIGHT_USERNAME", auth.username.clone());
    env.insert("GREENLIGHT_PASSWORD", auth.password.clone());
    env.insert("GREENLIGHT_DOMAIN", target.domain.clone());
    env.insert("GREENLIGHT_SKIP_SSL", target.skip_ssl.to_string());
    env.insert(
        "GREENLIGHT_CUSTOM_PARAMS",
        serde_json::Value::Object(target.custom_params.clone()).to_string(),
    );
    if let Some(data) = data {
        env.insert(
            "GREENLIGHT_DATA",
            serde_json::Value::Object(data.clone()).to_string(),
        );
    }
    env
}

/// Environment exported to the push command for one deployment call.
pub fn deployment_env(
    foundation: &Foundation,
    deployment: &DeploymentDescriptor,
) -> HashMap<&'static str, String> {
    let mut env = base_env(
        foundation,
        deployment.correlation_id(),
        deployment.cf_context(),
        deployment.authorization(),
        deployment.target(),
        deployment.data(),
    );
    env.insert(
        "GREENLIGHT_CONTENT_TYPE",
        deployment.content_type().to_string(),
    );
    if let Some(url) = deployment.artifact_url() {
        env.insert("GREENLIGHT_ARTIFACT_URL", url.to_string());
    }
    if let Some(manifest) = deployment.manifest() {
        env.insert("GREENLIGHT_MANIFEST", manifest.to_string());
    }
    env
}

#[async_trait]
impl Pusher for ProcessPusher {
    async fn stage(
        &self,
        foundation: &Foundation,
        deployment: &DeploymentDescriptor,
    ) -> std::result::Result<PushReport, PushError> {
        self.run_deployment(PushAction::Stage, foundation, deployment)
            .await
    }

    async fn commit(
        &self,
        foundation: &Foundation,
        deployment: &DeploymentDescriptor,
    ) -> std::result::Result<PushReport, PushError> {
        self.run_deployment(PushAction::Commit, foundation, deployment)
            .await
    }

    async fn rollback(
        &self,
        foundation: &Foundation,
        deployment: &DeploymentDescriptor,
    ) -> std::result::Result<PushReport, PushError> {
        self.run_deployment(PushAction::Rollback, foundation, deployment)
            .await
    }
}

#[async_trait]
impl StateController for ProcessPusher {
    async fn start(
        &self,
        foundation: &Foundation,
        context: &StateContext,
    ) -> std::result::Result<PushReport, PushError> {
        self.run(PushAction::Start, foundation, state_env(foundation, context))
            .await
    }

    async fn stop(
        &self,
        foundation: &Foundation,
        context: &StateContext,
    ) -> std::result::Result<PushReport, PushError> {
        self.run(PushAction::Stop, foundation, state_env(foundation, context))
            .await
    }
}

fn state_env(foundation: &Foundation, context: &StateContext) -> HashMap<&'static str, String> {
    base_env(
        foundation,
        &context.correlation_id,
        &context.cf_context,
        &context.authorization,
        &context.target,
        context.data.as_ref(),
    )
}
