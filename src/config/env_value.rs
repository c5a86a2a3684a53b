// ABOUTME: Configuration values that may be read from the process environment.
// ABOUTME: Handles literal values and `{env: VAR, default: ...}` references.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    pub fn from_env(var: impl Into<String>) -> Self {
        EnvValue::FromEnv {
            var: var.into(),
            default: None,
        }
    }

    /// Resolve to a non-empty string.
    ///
    /// On failure returns the name of the variable that could not be read;
    /// empty values count as unset.
    pub fn resolve(&self) -> Result<String, String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) if !val.is_empty() => Ok(val),
                _ => default.clone().ok_or_else(|| var.clone()),
            },
        }
    }
}
