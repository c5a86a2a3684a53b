// ABOUTME: Per-environment deployment target configuration.
// ABOUTME: Ordered foundations plus auth, domain, TLS, and custom parameters.

use nonempty::NonEmpty;
use serde::Deserialize;

use super::deserialize::deserialize_foundations;
use crate::types::Foundation;

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub name: String,

    #[serde(deserialize_with = "deserialize_foundations")]
    pub foundations: NonEmpty<Foundation>,

    #[serde(default)]
    pub authenticate: bool,

    #[serde(default)]
    pub domain: String,

    #[serde(default)]
    pub skip_ssl: bool,

    #[serde(default)]
    pub custom_params: serde_json::Map<String, serde_json::Value>,
}

impl EnvironmentConfig {
    /// Minimal environment with the given foundations and defaults elsewhere.
    pub fn new(name: impl Into<String>, foundations: NonEmpty<Foundation>) -> Self {
        EnvironmentConfig {
            name: name.into(),
            foundations,
            authenticate: false,
            domain: String::new(),
            skip_ssl: false,
            custom_params: serde_json::Map::new(),
        }
    }

    pub fn foundations(&self) -> impl Iterator<Item = &Foundation> {
        self.foundations.iter()
    }
}
