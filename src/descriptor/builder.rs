// ABOUTME: Builds deployment descriptors from inbound requests.
// ABOUTME: Dispatches on content type, resolves environment and credentials, assigns ids.

use super::error::BuildError;
use super::request::PostBody;
use super::silent::SilentDeploy;
use super::{ContentType, DeployRequest, DeploymentDescriptor, TargetMetadata};
use crate::config::{Config, EnvironmentConfig};
use crate::types::{Authorization, CorrelationId};

const ARTIFACT_URL: &str = "artifact_url";

/// Turns a raw request into an immutable descriptor.
pub struct DescriptorBuilder<'a> {
    config: &'a Config,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Validate and resolve `request`.
    ///
    /// Checks run in a fixed order: content type, empty archive body,
    /// environment, credentials, then JSON body. An unknown environment
    /// therefore never reaches the credential check.
    pub fn build(&self, request: &DeployRequest) -> Result<DeploymentDescriptor, BuildError> {
        let raw_content_type = request.content_type.as_deref().unwrap_or_default();
        let content_type = ContentType::parse(raw_content_type)
            .ok_or_else(|| BuildError::InvalidContentType(raw_content_type.to_string()))?;

        if content_type == ContentType::Zip && request.body.is_empty() {
            return Err(BuildError::EmptyBody);
        }

        let environment = self.environment(&request.cf_context.environment)?;
        let authorization = self.resolve_authorization(environment, request.authorization.as_ref())?;

        let (artifact_url, manifest, data) = match content_type {
            ContentType::Json => {
                let body = parse_post_body(&request.body)?;
                (body.artifact_url, body.manifest, body.data)
            }
            ContentType::Zip => (None, None, None),
        };

        let correlation_id = CorrelationId::from_supplied(request.correlation_id.as_deref());

        tracing::debug!(
            correlation_id = %correlation_id,
            environment = %environment.name,
            content_type = %content_type,
            "built deployment descriptor"
        );

        Ok(DeploymentDescriptor {
            correlation_id,
            cf_context: request.cf_context.clone(),
            authorization,
            content_type,
            body: request.body.clone(),
            artifact_url,
            manifest,
            data,
            target: TargetMetadata::from(environment),
            silent_target: SilentDeploy::target_for(&environment.name),
        })
    }

    /// Look up an environment by name.
    pub fn environment(&self, name: &str) -> Result<&'a EnvironmentConfig, BuildError> {
        self.config
            .environment(name)
            .ok_or_else(|| BuildError::EnvironmentNotFound(name.to_string()))
    }

    /// Inline credentials win; otherwise an authenticating environment fails
    /// and any other environment falls back to the configured defaults.
    pub fn resolve_authorization(
        &self,
        environment: &EnvironmentConfig,
        request_auth: Option<&Authorization>,
    ) -> Result<Authorization, BuildError> {
        match request_auth {
            Some(auth) if !auth.is_empty() => Ok(auth.clone()),
            _ if environment.authenticate => Err(BuildError::BasicAuthNotFound),
            _ => Ok(self.config.credentials.clone()),
        }
    }
}

fn parse_post_body(body: &[u8]) -> Result<PostBody, BuildError> {
    let body: PostBody = serde_json::from_slice(body).map_err(BuildError::MalformedBody)?;

    let has_artifact = body
        .artifact_url
        .as_deref()
        .is_some_and(|url| !url.trim().is_empty());
    if !has_artifact {
        return Err(BuildError::MissingProperties(vec![ARTIFACT_URL]));
    }

    Ok(body)
}
