// ABOUTME: Event subscriber that records lifecycle events as tracing output.
// ABOUTME: Registered by the binary on every event kind.

use async_trait::async_trait;

use super::{EventHandler, HandlerError, LifecycleEvent};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHandler;

#[async_trait]
impl EventHandler for TracingHandler {
    async fn on_event(&self, event: &LifecycleEvent) -> Result<(), HandlerError> {
        let deployment = event.deployment();
        let cf = deployment.cf_context();

        match event {
            LifecycleEvent::Start(_) => tracing::info!(
                event = %event.kind(),
                correlation_id = %deployment.correlation_id(),
                organization = %cf.organization,
                space = %cf.space,
                "deployment started"
            ),
            LifecycleEvent::Success(e) => tracing::info!(
                event = %event.kind(),
                correlation_id = %deployment.correlation_id(),
                status = e.status_code,
                "deployment succeeded"
            ),
            LifecycleEvent::Failure(e) => tracing::warn!(
                event = %event.kind(),
                correlation_id = %deployment.correlation_id(),
                status = e.status_code,
                findings = e.findings.len(),
                error = %e.error,
                "deployment failed"
            ),
            LifecycleEvent::Finish(e) => tracing::info!(
                event = %event.kind(),
                correlation_id = %deployment.correlation_id(),
                status = e.status_code,
                succeeded = e.succeeded,
                "deployment finished"
            ),
        }
        Ok(())
    }
}
