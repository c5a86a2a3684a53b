// ABOUTME: Entry point for the greenlight CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, RequestOptions, Target};
use greenlight::config;
use greenlight::error::Result;
use greenlight::output::{Output, OutputMode};
use greenlight::types::CfContext;
use std::env;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "GREENLIGHT_LOG";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // GREENLIGHT_LOG wins over the verbose flag
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling deployment");
            on_interrupt.cancel();
        }
    });

    match run(cli, mode, cancel).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            Output::new(mode).error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn cf_context(target: Target) -> CfContext {
    CfContext::new(target.environment, target.org, target.space, target.app)
}

async fn run(cli: Cli, mode: OutputMode, cancel: CancellationToken) -> Result<bool> {
    let output = Output::new(mode);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Init { force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(true)
        }
        Commands::Deploy {
            target,
            artifact_url,
            manifest,
            data,
            zip,
            options:
                RequestOptions {
                    username,
                    password,
                    correlation_id,
                },
        } => {
            let config = commands::load_config(config_path)?;
            let args = commands::DeployArgs {
                cf_context: cf_context(target),
                artifact_url,
                manifest,
                data: commands::parse_data(data.as_deref())?,
                zip,
                authorization: commands::inline_auth(username, password),
                correlation_id,
            };
            commands::deploy(config, args, output, cancel).await
        }
        Commands::State {
            target,
            state,
            data,
            options:
                RequestOptions {
                    username,
                    password,
                    correlation_id,
                },
        } => {
            let config = commands::load_config(config_path)?;
            commands::state(
                config,
                cf_context(target),
                state,
                commands::parse_data(data.as_deref())?,
                commands::inline_auth(username, password),
                correlation_id,
                output,
            )
            .await
        }
        Commands::Environments => {
            let config = commands::load_config(config_path)?;
            commands::environments(&config, &output)?;
            Ok(true)
        }
    }
}
