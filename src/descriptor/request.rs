// ABOUTME: Inbound deployment request as handed over by the transport layer.
// ABOUTME: Coordinates, content type, optional credentials and id, and the raw body.

use bytes::Bytes;
use serde::Deserialize;

use crate::types::{Authorization, CfContext};

/// A deployment request before validation.
#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    pub cf_context: CfContext,
    pub content_type: Option<String>,
    pub authorization: Option<Authorization>,
    pub correlation_id: Option<String>,
    pub body: Bytes,
}

impl DeployRequest {
    pub fn new(cf_context: CfContext) -> Self {
        DeployRequest {
            cf_context,
            ..Default::default()
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
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

/// JSON body of a push request.
#[derive(Debug, Deserialize)]
pub(crate) struct PostBody {
    #[serde(default)]
    pub artifact_url: Option<String>,
    #[serde(default)]
    pub manifest: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
}
