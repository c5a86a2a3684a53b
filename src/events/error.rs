// ABOUTME: Error types for event emission.
// ABOUTME: HandlerError is what a subscriber returns; EventError is what the pipeline sees.

use super::EventKind;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a single subscriber.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A subscriber failure, fatal to the pipeline step that emitted the event.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Positional failure from a typed emission.
    #[error("{kind} handler #{index} failed: {source}")]
    Handler {
        kind: EventKind,
        index: usize,
        source: HandlerError,
    },

    /// Failure from a named emission.
    #[error("{name} handler #{index} failed: {source}")]
    Named {
        name: &'static str,
        index: usize,
        source: HandlerError,
    },
}

impl EventError {
    /// First failing slot of a typed emission, if any.
    pub fn from_results(
        kind: EventKind,
        results: Vec<Result<(), HandlerError>>,
    ) -> Result<(), EventError> {
        match results
            .into_iter()
            .enumerate()
            .find_map(|(index, result)| result.err().map(|source| (index, source)))
        {
            Some((index, source)) => Err(EventError::Handler {
                kind,
                index,
                source,
            }),
            None => Ok(()),
        }
    }
}
