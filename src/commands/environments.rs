// ABOUTME: Environments command implementation.
// ABOUTME: Lists configured environments with their foundations.

use greenlight::config::Config;
use greenlight::error::Result;
use greenlight::output::{Output, OutputMode};
use serde_json::json;

pub fn environments(config: &Config, output: &Output) -> Result<()> {
    if output.mode() == OutputMode::Json {
        let environments: Vec<_> = config
            .environment_names()
            .into_iter()
            .filter_map(|name| config.environment(name))
            .map(|env| {
                json!({
                    "name": env.name,
                    "authenticate": env.authenticate,
                    "domain": env.domain,
                    "foundations": env.foundations().map(|f| f.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string(&environments)?);
        return Ok(());
    }

    for name in config.environment_names() {
        let Some(env) = config.environment(name) else {
            continue;
        };
        let auth = if env.authenticate { " (authenticated)" } else { "" };
        println!("{}{auth}", env.name);
        for foundation in env.foundations() {
            println!("  {foundation}");
        }
    }
    Ok(())
}
