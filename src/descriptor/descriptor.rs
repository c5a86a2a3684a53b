// ABOUTME: Immutable, fully resolved representation of one deployment request.
// ABOUTME: Built once by DescriptorBuilder and shared read-only by every later stage.

use bytes::Bytes;
use serde_json::{Map, Value};

use super::ContentType;
use crate::config::EnvironmentConfig;
use crate::types::{Authorization, CfContext, CorrelationId, Foundation};

/// Target metadata copied from the environment configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetMetadata {
    pub environment_name: String,
    pub domain: String,
    pub skip_ssl: bool,
    pub custom_params: Map<String, Value>,
}

impl From<&EnvironmentConfig> for TargetMetadata {
    fn from(environment: &EnvironmentConfig) -> Self {
        TargetMetadata {
            environment_name: environment.name.clone(),
            domain: environment.domain.clone(),
            skip_ssl: environment.skip_ssl,
            custom_params: environment.custom_params.clone(),
        }
    }
}

/// A validated, authenticated deployment.
///
/// Fields are only settable inside the crate; once built the descriptor is
/// shared behind an `Arc` and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentDescriptor {
    pub(crate) correlation_id: CorrelationId,
    pub(crate) cf_context: CfContext,
    pub(crate) authorization: Authorization,
    pub(crate) content_type: ContentType,
    pub(crate) body: Bytes,
    pub(crate) artifact_url: Option<String>,
    pub(crate) manifest: Option<String>,
    pub(crate) data: Option<Map<String, Value>>,
    pub(crate) target: TargetMetadata,
    pub(crate) silent_target: Option<Foundation>,
}

impl DeploymentDescriptor {
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn cf_context(&self) -> &CfContext {
        &self.cf_context
    }

    pub fn authorization(&self) -> &Authorization {
        &self.authorization
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Raw request body. Shares the request's buffer rather than copying it.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn artifact_url(&self) -> Option<&str> {
        self.artifact_url.as_deref()
    }

    pub fn manifest(&self) -> Option<&str> {
        self.manifest.as_deref()
    }

    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref()
    }

    pub fn target(&self) -> &TargetMetadata {
        &self.target
    }

    /// Endpoint that receives a mirrored push, if this environment triggers one.
    pub fn silent_target(&self) -> Option<&Foundation> {
        self.silent_target.as_ref()
    }

    /// Short human-readable artifact description for logs and responses.
    pub fn artifact_summary(&self) -> String {
        match (self.content_type, &self.artifact_url) {
            (ContentType::Json, Some(url)) => url.clone(),
            (ContentType::Json, None) => "<none>".to_string(),
            (ContentType::Zip, _) => format!("<zip archive, {} bytes>", self.body.len()),
        }
    }
}
