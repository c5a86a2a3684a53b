// ABOUTME: Deployment descriptor construction and validation.
// ABOUTME: Exports the inbound request, descriptor, builder, and build errors.

mod builder;
mod content_type;
#[allow(clippy::module_inception)]
mod descriptor;
mod error;
mod request;
mod silent;

pub use builder::DescriptorBuilder;
pub use content_type::ContentType;
pub use descriptor::{DeploymentDescriptor, TargetMetadata};
pub use error::BuildError;
pub use request::DeployRequest;
pub use silent::{SILENT_DEPLOY_ENVIRONMENT_VAR, SILENT_DEPLOY_URL_VAR, SilentDeploy};
