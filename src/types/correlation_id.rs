// ABOUTME: Correlation identifier threaded through logs and events.
// ABOUTME: Caller-supplied when present, otherwise a fresh random UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque token grouping all activity that belongs to one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Use the supplied identifier when it is present and non-blank,
    /// otherwise generate one.
    pub fn from_supplied(supplied: Option<&str>) -> Self {
        match supplied.map(str::trim) {
            Some(id) if !id.is_empty() => Self(id.to_string()),
            _ => Self::generate(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
