// ABOUTME: Configuration types and parsing for greenlight.yml.
// ABOUTME: Loads environments, default credentials, error matchers, and the push command.

mod deserialize;
mod env_value;
mod environment;
mod init;
mod push;

pub use env_value::EnvValue;
pub use environment::EnvironmentConfig;
pub use init::init_config;
pub use push::PushCommandConfig;

use crate::classify::ErrorMatcher;
use crate::error::{Error, Result};
use crate::types::{Authorization, Foundation};
use deserialize::deserialize_matchers;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "greenlight.yml";
pub const CONFIG_FILENAME_ALT: &str = "greenlight.yaml";
pub const CONFIG_FILENAME_LEGACY: &str = "config.yml";

pub const DEFAULT_USERNAME_VAR: &str = "CF_USERNAME";
pub const DEFAULT_PASSWORD_VAR: &str = "CF_PASSWORD";

/// Raw shape of the configuration file before credentials are resolved.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    username: Option<EnvValue>,

    #[serde(default)]
    password: Option<EnvValue>,

    environments: Vec<EnvironmentConfig>,

    #[serde(default, deserialize_with = "deserialize_matchers")]
    error_matchers: Vec<ErrorMatcher>,

    #[serde(default)]
    push: Option<PushCommandConfig>,
}

/// Process-wide configuration, read-only after startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fallback credentials for environments that do not require inline auth.
    pub credentials: Authorization,
    pub environments: HashMap<String, EnvironmentConfig>,
    /// Matchers appended to the built-in error signatures.
    pub error_matchers: Vec<ErrorMatcher>,
    pub push: Option<PushCommandConfig>,
}

impl Config {
    pub fn new(credentials: Authorization) -> Self {
        Config {
            credentials,
            environments: HashMap::new(),
            error_matchers: Vec::new(),
            push: None,
        }
    }

    /// Add an environment, replacing any existing one with the same name.
    pub fn with_environment(mut self, environment: EnvironmentConfig) -> Self {
        self.environments
            .insert(environment.name.clone(), environment);
        self
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(yaml)?;

        let username = file
            .username
            .unwrap_or_else(|| EnvValue::from_env(DEFAULT_USERNAME_VAR));
        let password = file
            .password
            .unwrap_or_else(|| EnvValue::from_env(DEFAULT_PASSWORD_VAR));

        let credentials = match (username.resolve(), password.resolve()) {
            (Ok(username), Ok(password)) => Authorization::new(username, password),
            (username, password) => {
                let missing = [username.err(), password.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                return Err(Error::MissingEnvVars(missing));
            }
        };

        let mut environments = HashMap::with_capacity(file.environments.len());
        for environment in file.environments {
            let name = environment.name.clone();
            if name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "environment name cannot be empty".to_string(),
                ));
            }
            if environments.insert(name.clone(), environment).is_some() {
                return Err(Error::InvalidConfig(format!(
                    "duplicate environment: {name}"
                )));
            }
        }

        Ok(Config {
            credentials,
            environments,
            error_matchers: file.error_matchers,
            push: file.push,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_LEGACY),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn environment(&self, name: &str) -> Option<&EnvironmentConfig> {
        self.environments.get(name)
    }

    /// Environment names in sorted order, for listings.
    pub fn environment_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.environments.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Starter configuration written by `init`.
    pub fn template() -> Result<Self> {
        let foundation = |url: &str| {
            Foundation::new(url).map_err(|e| Error::InvalidConfig(e.to_string()))
        };
        let foundations = NonEmpty::from((
            foundation("https://api.foundation-1.example.com")?,
            vec![foundation("https://api.foundation-2.example.com")?],
        ));

        let mut preprod = EnvironmentConfig::new("preproduction", foundations);
        preprod.domain = "apps.preproduction.example.com".to_string();
        preprod.skip_ssl = true;

        Ok(Config::new(Authorization::default()).with_environment(preprod))
    }
}
