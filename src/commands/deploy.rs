// ABOUTME: Deploy command implementation.
// ABOUTME: Builds a deploy request from CLI arguments and runs it through the orchestrator.

use greenlight::config::Config;
use greenlight::descriptor::DeployRequest;
use greenlight::error::Result;
use greenlight::events::{EventBus, TracingHandler};
use greenlight::orchestrator::DeploymentOrchestrator;
use greenlight::output::{Output, Report};
use greenlight::push::ProcessPusher;
use greenlight::response::ResponseBuffer;
use greenlight::types::{Authorization, CfContext};
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Artifact source and request metadata for one deploy.
pub struct DeployArgs {
    pub cf_context: CfContext,
    pub artifact_url: Option<String>,
    pub manifest: Option<PathBuf>,
    pub data: Option<Map<String, Value>>,
    pub zip: Option<PathBuf>,
    pub authorization: Option<Authorization>,
    pub correlation_id: Option<String>,
}

impl DeployArgs {
    fn into_request(self) -> Result<DeployRequest> {
        let mut request = DeployRequest::new(self.cf_context);

        request = match self.zip {
            Some(path) => request
                .content_type("application/zip")
                .body(std::fs::read(path)?),
            None => {
                let manifest = self.manifest.map(std::fs::read_to_string).transpose()?;
                let mut body = json!({ "artifact_url": self.artifact_url });
                if let Some(manifest) = manifest {
                    body["manifest"] = Value::String(manifest);
                }
                if let Some(data) = self.data {
                    body["data"] = Value::Object(data);
                }
                request
                    .content_type("application/json")
                    .body(serde_json::to_vec(&body)?)
            }
        };

        if let Some(auth) = self.authorization {
            request = request.authorization(auth);
        }
        if let Some(id) = self.correlation_id {
            request = request.correlation_id(id);
        }
        Ok(request)
    }
}

/// Deploy to every foundation of the target environment.
///
/// Returns whether the response status indicates success.
pub async fn deploy(
    config: Config,
    args: DeployArgs,
    mut output: Output,
    cancel: CancellationToken,
) -> Result<bool> {
    let pusher = Arc::new(ProcessPusher::from_config(&config)?);
    let request = args.into_request()?;

    let mut bus = EventBus::new();
    bus.subscribe_all(Arc::new(TracingHandler));

    let orchestrator = DeploymentOrchestrator::new(Arc::new(config), Arc::new(bus), pusher);
    let sink = Arc::new(ResponseBuffer::new());

    output.start_timer();
    output.progress(&format!(
        "Deploying {} to {}",
        request.cf_context.application, request.cf_context.environment
    ));

    let response = orchestrator.deploy(&request, sink.clone(), &cancel).await;

    let body = sink.contents();
    let correlation_id = response.correlation_id.as_ref().map(|id| id.to_string());
    let mut report = Report::new(response.status_code, &body).with_warnings(&response.warnings);
    report.correlation_id = correlation_id.as_deref();
    report.error = response.error.as_ref().map(ToString::to_string);
    report.findings = response.findings.as_slice();
    output.report(&report);

    Ok(response.status_code < 400)
}
