// ABOUTME: Error types for deployment descriptor construction.
// ABOUTME: Covers content type, body validation, environment lookup, and auth failures.

/// Errors that stop a request before any event is emitted or push attempted.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Content type missing or not one of the supported kinds.
    #[error("content type '{0}' not supported")]
    InvalidContentType(String),

    /// Archive request without a body.
    #[error("request body is empty")]
    EmptyBody,

    /// JSON body could not be parsed; the parser message is kept verbatim.
    #[error("{0}")]
    MalformedBody(#[source] serde_json::Error),

    /// Required JSON properties are absent or blank.
    #[error("The following properties are missing: {}", .0.join(", "))]
    MissingProperties(Vec<&'static str>),

    /// Environment name is not in the configuration.
    #[error("environment not found: {0}")]
    EnvironmentNotFound(String),

    /// Environment requires inline credentials and none were sent.
    #[error("basic auth header not found")]
    BasicAuthNotFound,
}

impl BuildError {
    /// Whether the request itself was malformed (as opposed to unresolvable).
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            BuildError::InvalidContentType(_) | BuildError::EmptyBody
        )
    }
}
