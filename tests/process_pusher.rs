// ABOUTME: Integration tests for the command-backed push capability.
// ABOUTME: Runs small shell scripts and checks arguments, environment, and failure mapping.

mod support;

use greenlight::config::PushCommandConfig;
use greenlight::descriptor::{DeployRequest, DeploymentDescriptor, DescriptorBuilder};
use greenlight::lifecycle::{StateContext, StateController};
use greenlight::push::{ProcessPusher, PushError, Pusher};
use greenlight::types::{Authorization, CfContext, CorrelationId};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use support::{foundation, test_config};
use tempfile::TempDir;

const F1: &str = "https://api.f1.example.com";

fn script(dir: &Path, body: &str) -> PushCommandConfig {
    let path = dir.join("push.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    PushCommandConfig {
        command: path,
        args: Vec::new(),
    }
}

fn deployment(content_type: &str, body: &'static [u8]) -> DeploymentDescriptor {
    let config = test_config("E", &[F1]);
    let request = DeployRequest::new(CfContext::new("E", "org", "space", "app"))
        .content_type(content_type)
        .correlation_id("pp-1")
        .body(body);
    DescriptorBuilder::new(&config).build(&request).unwrap()
}

fn json_deployment() -> DeploymentDescriptor {
    deployment(
        "application/json",
        br#"{"artifact_url":"https://artifacts.example.com/app.zip","manifest":"applications: []"}"#,
    )
}

#[tokio::test]
async fn passes_action_after_configured_args() {
    let dir = TempDir::new().unwrap();
    let mut config = script(dir.path(), r#"echo "args: $*""#);
    config.args = vec!["--profile".to_string(), "ci".to_string()];
    let pusher = ProcessPusher::new(&config);

    let report = pusher
        .stage(&foundation(F1), &json_deployment())
        .await
        .unwrap();

    assert_eq!(report.status_code, 200);
    assert_eq!(report.output, "args: --profile ci stage\n");
}

#[tokio::test]
async fn exports_deployment_environment() {
    let dir = TempDir::new().unwrap();
    let config = script(
        dir.path(),
        r#"echo "$GREENLIGHT_FOUNDATION|$GREENLIGHT_CORRELATION_ID|$GREENLIGHT_APPLICATION|$GREENLIGHT_USERNAME|$GREENLIGHT_ARTIFACT_URL|$GREENLIGHT_MANIFEST|$GREENLIGHT_DOMAIN""#,
    );
    let pusher = ProcessPusher::new(&config);

    let report = pusher
        .commit(&foundation(F1), &json_deployment())
        .await
        .unwrap();

    assert_eq!(
        report.output,
        format!(
            "{F1}|pp-1|app|deployer|https://artifacts.example.com/app.zip|applications: []|apps.E.example.com\n"
        )
    );
}

#[tokio::test]
async fn zip_stage_writes_archive_to_temp_file() {
    let dir = TempDir::new().unwrap();
    let config = script(dir.path(), r#"cat "$GREENLIGHT_ARTIFACT_PATH""#);
    let pusher = ProcessPusher::new(&config);
    let deployment = deployment("application/zip", b"PK\x03\x04archive");

    let report = pusher.stage(&foundation(F1), &deployment).await.unwrap();

    assert_eq!(report.output.as_bytes(), b"PK\x03\x04archive");
}

#[tokio::test]
async fn archive_path_only_set_for_stage() {
    let dir = TempDir::new().unwrap();
    let config = script(dir.path(), r#"echo "path=${GREENLIGHT_ARTIFACT_PATH:-none}""#);
    let pusher = ProcessPusher::new(&config);
    let deployment = deployment("application/zip", b"PK\x03\x04archive");

    let report = pusher.rollback(&foundation(F1), &deployment).await.unwrap();

    assert_eq!(report.output, "path=none\n");
}

#[tokio::test]
async fn non_zero_exit_is_rejected_with_output() {
    let dir = TempDir::new().unwrap();
    let config = script(dir.path(), "echo 'Staging error'\necho oops >&2\nexit 7");
    let pusher = ProcessPusher::new(&config);

    let err = pusher
        .stage(&foundation(F1), &json_deployment())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert_eq!(err.output(), "Staging error\noops\n");
    assert_eq!(
        err.to_string(),
        format!("stage on {F1} failed with status 500: exit status 7")
    );
}

#[tokio::test]
async fn missing_command_is_a_spawn_error() {
    let pusher = ProcessPusher::new(&PushCommandConfig {
        command: "/nonexistent/greenlight-push".into(),
        args: Vec::new(),
    });

    let err = pusher
        .stage(&foundation(F1), &json_deployment())
        .await
        .unwrap_err();

    assert!(matches!(err, PushError::Spawn { .. }));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn state_operations_pass_start_and_stop() {
    let dir = TempDir::new().unwrap();
    let config = script(dir.path(), r#"echo "$1 $GREENLIGHT_SPACE $GREENLIGHT_DATA""#);
    let pusher = ProcessPusher::new(&config);
    let context = StateContext {
        correlation_id: CorrelationId::from_supplied(Some("s-1")),
        cf_context: CfContext::new("E", "org", "space", "app"),
        authorization: Authorization::new("deployer", "secret"),
        data: serde_json::json!({"k": 1}).as_object().cloned(),
        target: test_config("E", &[F1]).environment("E").unwrap().into(),
    };

    let started = pusher.start(&foundation(F1), &context).await.unwrap();
    let stopped = pusher.stop(&foundation(F1), &context).await.unwrap();

    assert_eq!(started.output, "start space {\"k\":1}\n");
    assert_eq!(stopped.output, "stop space {\"k\":1}\n");
}
