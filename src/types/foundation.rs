// ABOUTME: Validated foundation endpoint identifier.
// ABOUTME: A foundation is one remote execution target inside an environment.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FoundationError {
    #[error("foundation endpoint cannot be empty")]
    Empty,

    #[error("foundation endpoint cannot contain whitespace: '{0}'")]
    Whitespace(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Foundation(String);

impl Foundation {
    pub fn new(value: &str) -> Result<Self, FoundationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(FoundationError::Empty);
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(FoundationError::Whitespace(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Foundation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
