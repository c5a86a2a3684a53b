// ABOUTME: Config scaffolding for new installations.
// ABOUTME: Creates a greenlight.yml template file.

use std::fmt::Write;
use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, Config, DEFAULT_PASSWORD_VAR, DEFAULT_USERNAME_VAR};

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let yaml = generate_template_yaml(&Config::template()?);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    let mut yaml = format!(
        r#"# Default credentials, used when an environment does not require inline auth
username: {{ env: {DEFAULT_USERNAME_VAR} }}
password: {{ env: {DEFAULT_PASSWORD_VAR} }}

environments:
"#
    );

    for name in config.environment_names() {
        let Some(env) = config.environment(name) else {
            continue;
        };
        let _ = writeln!(yaml, "  - name: {}", env.name);
        let _ = writeln!(yaml, "    domain: {}", env.domain);
        let _ = writeln!(yaml, "    authenticate: {}", env.authenticate);
        let _ = writeln!(yaml, "    skip_ssl: {}", env.skip_ssl);
        let _ = writeln!(yaml, "    foundations:");
        for foundation in env.foundations() {
            let _ = writeln!(yaml, "      - {foundation}");
        }
    }

    yaml.push_str(
        r#"
# Extra log signatures, checked after the built-in ones
# error_matchers:
#   - description: Health check endpoint refused connections
#     pattern: "health check .* connection refused"
#     solution: Make sure the app listens on $PORT.
#     code: health-check

# Command invoked as `<command> [args...] <stage|commit|rollback|start|stop>`
push:
  command: ./bin/cf-push
"#,
    );

    yaml
}
