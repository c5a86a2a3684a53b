// ABOUTME: Configuration for the external push command.
// ABOUTME: Invoked as `<command> [args...] <action>`.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct PushCommandConfig {
    pub command: PathBuf,

    #[serde(default)]
    pub args: Vec<String>,
}
