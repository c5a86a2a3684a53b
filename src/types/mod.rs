// ABOUTME: Validated domain types shared across the deployment pipeline.
// ABOUTME: Identifiers, foundation endpoints, app coordinates, and credentials.

mod context;
mod correlation_id;
mod foundation;

pub use context::{Authorization, CfContext};
pub use correlation_id::CorrelationId;
pub use foundation::{Foundation, FoundationError};
