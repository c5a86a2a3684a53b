// ABOUTME: Command module aggregator for the greenlight CLI.
// ABOUTME: Re-exports command handlers and shared request helpers.

mod deploy;
mod environments;
mod state;

pub use deploy::{DeployArgs, deploy};
pub use environments::environments;
pub use state::state;

use greenlight::config::Config;
use greenlight::error::{Error, Result};
use greenlight::types::Authorization;
use serde_json::{Map, Value};
use std::env;
use std::path::Path;

/// Load an explicit config file, or discover one in the working directory.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover(&env::current_dir()?),
    }
}

/// Parse a `--data` argument, which must be a JSON object.
pub fn parse_data(raw: Option<&str>) -> Result<Option<Map<String, Value>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(Error::InvalidArgument(
            "--data must be a JSON object".to_string(),
        )),
    }
}

pub fn inline_auth(username: Option<String>, password: Option<String>) -> Option<Authorization> {
    match (username, password) {
        (Some(username), Some(password)) => Some(Authorization::new(username, password)),
        _ => None,
    }
}
