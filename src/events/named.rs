// ABOUTME: Named events with richer payloads for subscribers that need request details.
// ABOUTME: Carry app coordinates, credentials, data map, and for start the body and response.

use bytes::Bytes;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::EventKind;
use crate::classify::LogMatchedError;
use crate::descriptor::{ContentType, DeploymentDescriptor};
use crate::response::OutputSink;
use crate::types::{Authorization, CfContext, CorrelationId};

/// Request details shared by every named event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventContext {
    pub correlation_id: CorrelationId,
    pub cf_context: CfContext,
    pub authorization: Authorization,
    pub data: Option<Map<String, Value>>,
}

impl From<&DeploymentDescriptor> for EventContext {
    fn from(deployment: &DeploymentDescriptor) -> Self {
        EventContext {
            correlation_id: deployment.correlation_id().clone(),
            cf_context: deployment.cf_context().clone(),
            authorization: deployment.authorization().clone(),
            data: deployment.data().cloned(),
        }
    }
}

#[derive(Clone)]
pub struct DeployStartedEvent {
    pub context: EventContext,
    pub content_type: ContentType,
    pub body: Bytes,
    pub response: Arc<dyn OutputSink>,
}

impl fmt::Debug for DeployStartedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployStartedEvent")
            .field("context", &self.context)
            .field("content_type", &self.content_type)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct DeploySuccessEvent {
    pub context: EventContext,
    pub status_code: u16,
}

#[derive(Debug, Clone)]
pub struct DeployFailureEvent {
    pub context: EventContext,
    pub status_code: u16,
    pub error: String,
    pub findings: Vec<LogMatchedError>,
}

#[derive(Debug, Clone)]
pub struct DeployFinishedEvent {
    pub context: EventContext,
    pub status_code: u16,
    pub succeeded: bool,
}

#[derive(Debug, Clone)]
pub enum NamedEvent {
    Started(DeployStartedEvent),
    Succeeded(DeploySuccessEvent),
    Failed(DeployFailureEvent),
    Finished(DeployFinishedEvent),
}

impl NamedEvent {
    pub fn name(&self) -> &'static str {
        match self {
            NamedEvent::Started(_) => "DeployStartedEvent",
            NamedEvent::Succeeded(_) => "DeploySuccessEvent",
            NamedEvent::Failed(_) => "DeployFailureEvent",
            NamedEvent::Finished(_) => "DeployFinishedEvent",
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            NamedEvent::Started(_) => EventKind::DeployStart,
            NamedEvent::Succeeded(_) => EventKind::DeploySuccess,
            NamedEvent::Failed(_) => EventKind::DeployFailure,
            NamedEvent::Finished(_) => EventKind::DeployFinish,
        }
    }

    pub fn context(&self) -> &EventContext {
        match self {
            NamedEvent::Started(e) => &e.context,
            NamedEvent::Succeeded(e) => &e.context,
            NamedEvent::Failed(e) => &e.context,
            NamedEvent::Finished(e) => &e.context,
        }
    }
}
