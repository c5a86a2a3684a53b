// ABOUTME: Start/stop toggling for applications that are already deployed.
// ABOUTME: Runs outside the push pipeline and emits no lifecycle events.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

use crate::config::Config;
use crate::descriptor::{BuildError, DescriptorBuilder, TargetMetadata};
use crate::push::{PushError, PushReport};
use crate::response::OutputSink;
use crate::types::{Authorization, CfContext, CorrelationId, Foundation};

pub const STATE_STOPPED: &str = "stopped";
pub const STATE_STARTED: &str = "started";

/// The operation a state request selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Start,
    Stop,
}

impl StateChange {
    /// Only the exact values `"stopped"` and `"started"` select an operation.
    pub fn parse(state: &str) -> Option<Self> {
        match state {
            STATE_STOPPED => Some(StateChange::Stop),
            STATE_STARTED => Some(StateChange::Start),
            _ => None,
        }
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateChange::Start => f.write_str("start"),
            StateChange::Stop => f.write_str("stop"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StateBody {
    #[serde(default)]
    state: String,

    #[serde(default)]
    data: Option<Map<String, Value>>,
}

/// Inbound start/stop request.
#[derive(Debug, Clone, Default)]
pub struct StateRequest {
    pub cf_context: CfContext,
    pub authorization: Option<Authorization>,
    pub correlation_id: Option<String>,
    pub body: Bytes,
}

impl StateRequest {
    pub fn new(cf_context: CfContext) -> Self {
        Self {
            cf_context,
            ..Default::default()
        }
    }

    pub fn authorization(mut self, authorization: Authorization) -> Self {
        self.authorization = Some(authorization);
        self
    }

    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Everything a controller needs to start or stop one application.
#[derive(Debug, Clone, PartialEq)]
pub struct StateContext {
    pub correlation_id: CorrelationId,
    pub cf_context: CfContext,
    pub authorization: Authorization,
    pub data: Option<Map<String, Value>>,
    pub target: TargetMetadata,
}

/// Starts and stops deployed applications on one foundation.
#[async_trait]
pub trait StateController: Send + Sync {
    async fn start(
        &self,
        foundation: &Foundation,
        context: &StateContext,
    ) -> Result<PushReport, PushError>;

    async fn stop(
        &self,
        foundation: &Foundation,
        context: &StateContext,
    ) -> Result<PushReport, PushError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("{0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error(transparent)]
    Controller(#[from] PushError),
}

/// Result of a state request.
#[derive(Debug)]
pub struct StateResponse {
    pub status_code: u16,
    /// The operation that ran, `None` for a no-op.
    pub change: Option<StateChange>,
    pub error: Option<LifecycleError>,
}

pub struct StateToggler {
    config: Arc<Config>,
    controller: Arc<dyn StateController>,
}

impl StateToggler {
    pub fn new(config: Arc<Config>, controller: Arc<dyn StateController>) -> Self {
        Self { config, controller }
    }

    /// Apply the requested state on every foundation of the environment.
    ///
    /// Foundations run in configuration order and the first failure stops
    /// the iteration.
    pub async fn toggle(&self, request: &StateRequest, sink: &dyn OutputSink) -> StateResponse {
        let correlation_id = CorrelationId::from_supplied(request.correlation_id.as_deref());
        let span = tracing::info_span!(
            "state",
            correlation_id = %correlation_id,
            environment = %request.cf_context.environment,
            app = %request.cf_context.application,
        );

        match self.run(request, correlation_id, sink).instrument(span).await {
            Ok(change) => StateResponse {
                status_code: 200,
                change,
                error: None,
            },
            Err(e) => {
                tracing::error!(error = %e, "state change failed");
                sink.write_line(&e.to_string());
                StateResponse {
                    status_code: 500,
                    change: None,
                    error: Some(e),
                }
            }
        }
    }

    async fn run(
        &self,
        request: &StateRequest,
        correlation_id: CorrelationId,
        sink: &dyn OutputSink,
    ) -> Result<Option<StateChange>, LifecycleError> {
        let builder = DescriptorBuilder::new(&self.config);
        let environment = builder.environment(&request.cf_context.environment)?;
        let authorization =
            builder.resolve_authorization(environment, request.authorization.as_ref())?;

        let body: StateBody =
            serde_json::from_slice(&request.body).map_err(LifecycleError::MalformedBody)?;

        let Some(change) = StateChange::parse(&body.state) else {
            tracing::debug!(state = %body.state, "state unchanged");
            return Ok(None);
        };

        let context = StateContext {
            correlation_id,
            cf_context: request.cf_context.clone(),
            authorization,
            data: body.data,
            target: TargetMetadata::from(environment),
        };

        for foundation in environment.foundations() {
            tracing::info!(foundation = %foundation, %change, "changing application state");
            let report = match change {
                StateChange::Start => self.controller.start(foundation, &context).await,
                StateChange::Stop => self.controller.stop(foundation, &context).await,
            };
            match report {
                Ok(report) => sink.write(&report.output),
                Err(e) => {
                    sink.write(e.output());
                    return Err(e.into());
                }
            }
        }

        Ok(Some(change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_states_select_an_operation() {
        assert_eq!(StateChange::parse("stopped"), Some(StateChange::Stop));
        assert_eq!(StateChange::parse("started"), Some(StateChange::Start));
        assert_eq!(StateChange::parse("Stopped"), None);
        assert_eq!(StateChange::parse("restarted"), None);
        assert_eq!(StateChange::parse(""), None);
    }
}
