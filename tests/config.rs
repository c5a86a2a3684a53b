// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, env var credentials, matchers, and file discovery.

use greenlight::config::*;
use greenlight::error::Error;
use std::fs;

const CREDENTIALS: [(&str, Option<&str>); 2] = [
    (DEFAULT_USERNAME_VAR, Some("deployer")),
    (DEFAULT_PASSWORD_VAR, Some("secret")),
];

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
username: admin
password: hunter2
environments:
  - name: prod
    foundations:
      - https://api.f1.example.com
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.credentials.username, "admin");
        assert_eq!(config.credentials.password, "hunter2");
        let env = config.environment("prod").unwrap();
        assert_eq!(env.foundations.len(), 1);
        assert!(!env.authenticate);
        assert!(!env.skip_ssl);
        assert!(env.domain.is_empty());
        assert!(config.push.is_none());
        assert!(config.error_matchers.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
username: admin
password: hunter2

environments:
  - name: preprod
    domain: apps.preprod.example.com
    authenticate: true
    skip_ssl: true
    custom_params:
      buildpack: java
      instances: 2
    foundations:
      - https://api.f1.example.com
      - https://api.f2.example.com
      - https://api.f3.example.com
  - name: prod
    foundations:
      - https://api.prod.example.com

error_matchers:
  - description: Health check refused
    pattern: "health check .* refused"
    solution: Listen on $PORT.
    code: health

push:
  command: ./bin/cf-push
  args: ["--verbose"]
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let env = config.environment("preprod").unwrap();
        let foundations: Vec<&str> = env.foundations().map(|f| f.as_str()).collect();
        assert_eq!(
            foundations,
            vec![
                "https://api.f1.example.com",
                "https://api.f2.example.com",
                "https://api.f3.example.com",
            ]
        );
        assert!(env.authenticate);
        assert!(env.skip_ssl);
        assert_eq!(env.domain, "apps.preprod.example.com");
        assert_eq!(env.custom_params["buildpack"], "java");
        assert_eq!(env.custom_params["instances"], 2);

        assert_eq!(config.environment_names(), vec!["preprod", "prod"]);
        assert_eq!(config.error_matchers.len(), 1);
        assert_eq!(config.error_matchers[0].code(), "health");

        let push = config.push.unwrap();
        assert_eq!(push.command.to_str(), Some("./bin/cf-push"));
        assert_eq!(push.args, vec!["--verbose"]);
    }

    #[test]
    fn unknown_environment_is_none() {
        let yaml = r#"
username: a
password: b
environments:
  - name: prod
    foundations:
      - https://api.example.com
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.environment("staging").is_none());
    }
}

mod credentials {
    use super::*;

    const YAML: &str = r#"
environments:
  - name: prod
    foundations:
      - https://api.example.com
"#;

    #[test]
    fn defaults_read_from_environment() {
        temp_env::with_vars(CREDENTIALS, || {
            let config = Config::from_yaml(YAML).unwrap();
            assert_eq!(config.credentials.username, "deployer");
            assert_eq!(config.credentials.password, "secret");
        });
    }

    #[test]
    fn missing_variables_are_all_reported() {
        temp_env::with_vars_unset([DEFAULT_USERNAME_VAR, DEFAULT_PASSWORD_VAR], || {
            let err = Config::from_yaml(YAML).unwrap_err();
            assert_eq!(
                err.to_string(),
                "missing environment variables: CF_USERNAME, CF_PASSWORD"
            );
        });
    }

    #[test]
    fn explicit_env_reference_with_default() {
        let yaml = r#"
username: { env: GREENLIGHT_TEST_DEPLOY_USER, default: fallback }
password: literal
environments:
  - name: prod
    foundations:
      - https://api.example.com
"#;
        temp_env::with_var_unset("GREENLIGHT_TEST_DEPLOY_USER", || {
            let config = Config::from_yaml(yaml).unwrap();
            assert_eq!(config.credentials.username, "fallback");
        });
    }
}

mod validation {
    use super::*;

    #[test]
    fn duplicate_environment_rejected() {
        let yaml = r#"
username: a
password: b
environments:
  - name: prod
    foundations:
      - https://api.one.example.com
  - name: prod
    foundations:
      - https://api.two.example.com
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("duplicate environment: prod"));
    }

    #[test]
    fn empty_environment_name_rejected() {
        let yaml = r#"
username: a
password: b
environments:
  - name: "  "
    foundations:
      - https://api.example.com
"#;
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_foundation_list_rejected() {
        let yaml = r#"
username: a
password: b
environments:
  - name: prod
    foundations: []
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("at least one foundation is required"));
    }

    #[test]
    fn blank_foundation_rejected() {
        let yaml = r#"
username: a
password: b
environments:
  - name: prod
    foundations: ["  "]
"#;
        assert!(matches!(Config::from_yaml(yaml), Err(Error::Yaml(_))));
    }

    #[test]
    fn invalid_matcher_pattern_rejected() {
        let yaml = r#"
username: a
password: b
environments:
  - name: prod
    foundations:
      - https://api.example.com
error_matchers:
  - description: Broken
    pattern: "(unclosed"
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(
            err.to_string()
                .contains("invalid pattern for error matcher 'Broken'")
        );
    }
}

mod discovery {
    use super::*;

    const YAML: &str = r#"
username: a
password: b
environments:
  - name: prod
    foundations:
      - https://api.example.com
"#;

    #[test]
    fn finds_primary_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), YAML).unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert!(config.environment("prod").is_some());
    }

    #[test]
    fn falls_back_to_alternate_names() {
        for name in [CONFIG_FILENAME_ALT, CONFIG_FILENAME_LEGACY] {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join(name), YAML).unwrap();
            assert!(Config::discover(dir.path()).is_ok(), "{name} not found");
        }
    }

    #[test]
    fn missing_file_reports_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }
}

mod init {
    use super::*;

    #[test]
    fn writes_parseable_template() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), false).unwrap();

        temp_env::with_vars(CREDENTIALS, || {
            let config = Config::discover(dir.path()).unwrap();
            assert_eq!(config.environment_names(), vec!["preproduction"]);
        });
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "existing").unwrap();

        assert!(matches!(
            init_config(dir.path(), false),
            Err(Error::AlreadyExists(_))
        ));
        init_config(dir.path(), true).unwrap();
        let content = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert!(content.contains("environments:"));
    }
}
