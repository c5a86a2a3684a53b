// ABOUTME: Top-level deployment sequencer.
// ABOUTME: Builds the descriptor, emits lifecycle events around the rollout, classifies failures.

use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::classify::{ErrorFinder, LogMatchedError, format_findings};
use crate::config::Config;
use crate::descriptor::{DeployRequest, DeploymentDescriptor, DescriptorBuilder};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::Error;
use crate::events::{
    DeployFailure, DeployFailureEvent, DeployFinish, DeployFinishedEvent, DeployStart,
    DeployStartedEvent, DeploySuccess, DeploySuccessEvent, EventBus, EventContext, EventError,
    EventKind, LifecycleEvent, NamedEvent,
};
use crate::push::{DeploymentOutcome, PushCoordinator, Pusher};
use crate::response::OutputSink;
use crate::types::{CorrelationId, Foundation};

/// Final result of one deployment request.
#[derive(Debug)]
pub struct DeployResponse {
    pub status_code: u16,
    pub error: Option<Error>,
    /// `None` when the request failed before a descriptor was built.
    pub correlation_id: Option<CorrelationId>,
    pub findings: Vec<LogMatchedError>,
    pub warnings: Vec<Warning>,
}

impl DeployResponse {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    fn rejected(error: Error) -> Self {
        DeployResponse {
            status_code: error.status_code(),
            error: Some(error),
            correlation_id: None,
            findings: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

pub struct DeploymentOrchestrator {
    config: Arc<Config>,
    bus: Arc<EventBus>,
    coordinator: PushCoordinator,
    finder: ErrorFinder,
}

impl DeploymentOrchestrator {
    /// Classifies with the built-in signatures plus the configured matchers.
    pub fn new(config: Arc<Config>, bus: Arc<EventBus>, pusher: Arc<dyn Pusher>) -> Self {
        let finder = ErrorFinder::with_builtins(config.error_matchers.iter().cloned());
        Self {
            config,
            bus,
            coordinator: PushCoordinator::new(pusher),
            finder,
        }
    }

    pub fn with_finder(mut self, finder: ErrorFinder) -> Self {
        self.finder = finder;
        self
    }

    /// Run one deployment end to end.
    ///
    /// Build failures return immediately without emitting events. Once a
    /// descriptor exists, `DeployFinish` fires exactly once. A finish handler
    /// failure fails a successful deploy but never replaces an earlier error.
    pub async fn deploy(
        &self,
        request: &DeployRequest,
        sink: Arc<dyn OutputSink>,
        cancel: &CancellationToken,
    ) -> DeployResponse {
        let deployment = match DescriptorBuilder::new(&self.config).build(request) {
            Ok(deployment) => Arc::new(deployment),
            Err(e) => {
                tracing::error!(error = %e, "invalid deployment request");
                sink.write_line(&e.to_string());
                return DeployResponse::rejected(e.into());
            }
        };

        let span = tracing::info_span!(
            "deploy",
            correlation_id = %deployment.correlation_id(),
            environment = %deployment.cf_context().environment,
            app = %deployment.cf_context().application,
        );

        self.run(deployment, sink, cancel).instrument(span).await
    }

    async fn run(
        &self,
        deployment: Arc<DeploymentDescriptor>,
        sink: Arc<dyn OutputSink>,
        cancel: &CancellationToken,
    ) -> DeployResponse {
        let mut diagnostics = Diagnostics::default();
        let context = EventContext::from(deployment.as_ref());

        write_parameters(sink.as_ref(), &deployment);

        let (status_code, mut error, findings) =
            match self.emit_start(&deployment, &sink, &context).await {
                Err(e) => {
                    tracing::error!(error = %e, "start event failed, nothing pushed");
                    let error = Error::from(e);
                    self.emit_failure(
                        &deployment,
                        &context,
                        500,
                        &error,
                        Vec::new(),
                        &mut diagnostics,
                    )
                    .await;
                    (500, Some(error), Vec::new())
                }
                Ok(()) => {
                    let foundations = self.environment_foundations(&deployment);
                    let outcome = self
                        .coordinator
                        .push(Arc::clone(&deployment), &foundations, cancel)
                        .await;
                    self.conclude(
                        &deployment,
                        &context,
                        outcome,
                        sink.as_ref(),
                        &mut diagnostics,
                    )
                    .await
                }
            };

        let succeeded = error.is_none();
        if let Err(e) = self.emit_finish(&deployment, &context, status_code, succeeded).await {
            // A finish failure only decides the result of an otherwise successful deploy.
            if succeeded {
                tracing::error!(error = %e, "finish event failed");
                error = Some(Error::from(e));
            } else {
                diagnostics.warn(Warning::event_handler(e.to_string()));
            }
        }

        let status_code = if error.is_some() && status_code < 400 {
            500
        } else {
            status_code
        };
        if let Some(e) = &error {
            sink.write_line(&e.to_string());
        }

        DeployResponse {
            status_code,
            error,
            correlation_id: Some(deployment.correlation_id().clone()),
            findings,
            warnings: diagnostics.into_warnings(),
        }
    }

    fn environment_foundations(&self, deployment: &DeploymentDescriptor) -> Vec<Foundation> {
        self.config
            .environment(&deployment.target().environment_name)
            .map(|env| env.foundations().cloned().collect())
            .unwrap_or_default()
    }

    /// Write push output, classify failures, and emit success or failure.
    async fn conclude(
        &self,
        deployment: &Arc<DeploymentDescriptor>,
        context: &EventContext,
        outcome: DeploymentOutcome,
        sink: &dyn OutputSink,
        diagnostics: &mut Diagnostics,
    ) -> (u16, Option<Error>, Vec<LogMatchedError>) {
        diagnostics.absorb(outcome.warnings);
        sink.write(&outcome.output);

        match outcome.error {
            None => {
                self.emit_success(deployment, context, outcome.status_code, diagnostics)
                    .await;
                (outcome.status_code, None, Vec::new())
            }
            Some(rollout_error) => {
                let findings = self.finder.find_errors(&outcome.output);
                if !findings.is_empty() {
                    sink.write(&format_findings(&findings));
                }
                let error = Error::from(rollout_error);
                self.emit_failure(
                    deployment,
                    context,
                    outcome.status_code,
                    &error,
                    findings.clone(),
                    diagnostics,
                )
                .await;
                (outcome.status_code, Some(error), findings)
            }
        }
    }

    async fn emit_start(
        &self,
        deployment: &Arc<DeploymentDescriptor>,
        sink: &Arc<dyn OutputSink>,
        context: &EventContext,
    ) -> Result<(), EventError> {
        let event = LifecycleEvent::Start(DeployStart {
            deployment: Arc::clone(deployment),
            response: Arc::clone(sink),
            at: Utc::now(),
        });
        EventError::from_results(EventKind::DeployStart, self.bus.emit(&event).await)?;

        let named = NamedEvent::Started(DeployStartedEvent {
            context: context.clone(),
            content_type: deployment.content_type(),
            body: deployment.body().clone(),
            response: Arc::clone(sink),
        });
        self.bus.emit_event(&named).await
    }

    async fn emit_success(
        &self,
        deployment: &Arc<DeploymentDescriptor>,
        context: &EventContext,
        status_code: u16,
        diagnostics: &mut Diagnostics,
    ) {
        let event = LifecycleEvent::Success(DeploySuccess {
            deployment: Arc::clone(deployment),
            status_code,
            at: Utc::now(),
        });
        let named = NamedEvent::Succeeded(DeploySuccessEvent {
            context: context.clone(),
            status_code,
        });
        self.emit_best_effort(&event, &named, diagnostics).await;
    }

    async fn emit_failure(
        &self,
        deployment: &Arc<DeploymentDescriptor>,
        context: &EventContext,
        status_code: u16,
        error: &Error,
        findings: Vec<LogMatchedError>,
        diagnostics: &mut Diagnostics,
    ) {
        let event = LifecycleEvent::Failure(DeployFailure {
            deployment: Arc::clone(deployment),
            status_code,
            error: error.to_string(),
            findings: findings.clone(),
            at: Utc::now(),
        });
        let named = NamedEvent::Failed(DeployFailureEvent {
            context: context.clone(),
            status_code,
            error: error.to_string(),
            findings,
        });
        self.emit_best_effort(&event, &named, diagnostics).await;
    }

    /// Handler failures here are logged and recorded, never returned.
    async fn emit_best_effort(
        &self,
        event: &LifecycleEvent,
        named: &NamedEvent,
        diagnostics: &mut Diagnostics,
    ) {
        if let Err(e) = EventError::from_results(event.kind(), self.bus.emit(event).await) {
            diagnostics.warn(Warning::event_handler(e.to_string()));
        }
        if let Err(e) = self.bus.emit_event(named).await {
            diagnostics.warn(Warning::event_handler(e.to_string()));
        }
    }

    async fn emit_finish(
        &self,
        deployment: &Arc<DeploymentDescriptor>,
        context: &EventContext,
        status_code: u16,
        succeeded: bool,
    ) -> Result<(), EventError> {
        let event = LifecycleEvent::Finish(DeployFinish {
            deployment: Arc::clone(deployment),
            status_code,
            succeeded,
            at: Utc::now(),
        });
        let typed = EventError::from_results(EventKind::DeployFinish, self.bus.emit(&event).await);

        let named = NamedEvent::Finished(DeployFinishedEvent {
            context: context.clone(),
            status_code,
            succeeded,
        });
        let named = self.bus.emit_event(&named).await;

        typed.and(named)
    }
}

/// Summary block written at the top of every response. Never includes the password.
fn write_parameters(sink: &dyn OutputSink, deployment: &DeploymentDescriptor) {
    let cf = deployment.cf_context();
    sink.write_line("Deployment Parameters:");
    sink.write_line(&format!("Artifact:       {}", deployment.artifact_summary()));
    sink.write_line(&format!("Username:       {}", deployment.authorization().username));
    sink.write_line(&format!("Environment:    {}", cf.environment));
    sink.write_line(&format!("Org:            {}", cf.organization));
    sink.write_line(&format!("Space:          {}", cf.space));
    sink.write_line(&format!("AppName:        {}", cf.application));
    sink.write_line(&format!("Correlation ID: {}", deployment.correlation_id()));
    sink.write_line("");
}
