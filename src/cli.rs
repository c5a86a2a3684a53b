// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "greenlight")]
#[command(about = "Zero-downtime blue-green deployments across multi-foundation environments")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI (only the response body)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Output a JSON report for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the configuration file (defaults to discovery in the working directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Application coordinates shared by deploy and state.
#[derive(Args, Debug)]
pub struct Target {
    /// Environment name (defined in config)
    pub environment: String,
    /// Organization
    pub org: String,
    /// Space
    pub space: String,
    /// Application name
    pub app: String,
}

/// Inline credentials and tracing options.
#[derive(Args, Debug)]
pub struct RequestOptions {
    /// Username for environments that require authentication
    #[arg(long, requires = "password")]
    pub username: Option<String>,

    /// Password for environments that require authentication
    #[arg(long, requires = "username")]
    pub password: Option<String>,

    /// Correlation id to thread through logs and events (generated if omitted)
    #[arg(long)]
    pub correlation_id: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new greenlight.yml configuration file
    Init {
        /// Overwrite existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Deploy an artifact to every foundation of an environment
    Deploy {
        #[command(flatten)]
        target: Target,

        /// URL of the artifact to push
        #[arg(long, required_unless_present = "zip", conflicts_with = "zip")]
        artifact_url: Option<String>,

        /// Manifest file sent along with the artifact URL
        #[arg(long, conflicts_with = "zip")]
        manifest: Option<PathBuf>,

        /// Extra data as a JSON object
        #[arg(long, conflicts_with = "zip")]
        data: Option<String>,

        /// Push a local zip archive instead of an artifact URL
        #[arg(long)]
        zip: Option<PathBuf>,

        #[command(flatten)]
        options: RequestOptions,
    },

    /// Start or stop an application that is already deployed
    State {
        #[command(flatten)]
        target: Target,

        /// Desired state: "started" or "stopped"
        state: String,

        /// Extra data as a JSON object
        #[arg(long)]
        data: Option<String>,

        #[command(flatten)]
        options: RequestOptions,
    },

    /// List configured environments and their foundations
    Environments,
}
