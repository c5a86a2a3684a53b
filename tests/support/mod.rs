// ABOUTME: Test support utilities.
// ABOUTME: Recording fakes for the push capability, state controller, and event handlers.

use async_trait::async_trait;
use greenlight::classify::LogMatchedError;
use greenlight::config::{Config, EnvironmentConfig};
use greenlight::descriptor::DeploymentDescriptor;
use greenlight::events::{
    EventHandler, HandlerError, LifecycleEvent, NamedEvent, NamedEventHandler,
};
use greenlight::lifecycle::{StateContext, StateController};
use greenlight::push::{PushAction, PushError, PushReport, Pusher};
use greenlight::types::{Authorization, Foundation};
use nonempty::NonEmpty;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Once};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("greenlight=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn foundation(name: &str) -> Foundation {
    Foundation::new(name).unwrap()
}

/// Config with default credentials `deployer`/`secret` and one environment.
#[allow(dead_code)]
pub fn test_config(environment: &str, foundations: &[&str]) -> Config {
    let foundations: Vec<Foundation> = foundations.iter().map(|f| foundation(f)).collect();
    let foundations = NonEmpty::from_vec(foundations).expect("at least one foundation");
    let mut env = EnvironmentConfig::new(environment, foundations);
    env.domain = format!("apps.{environment}.example.com");
    Config::new(Authorization::new("deployer", "secret")).with_environment(env)
}

/// One recorded capability call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub action: PushAction,
    pub foundation: String,
}

/// Pusher that records every call and fails where told to.
#[derive(Default)]
pub struct RecordingPusher {
    calls: Mutex<Vec<Call>>,
    bodies: Mutex<Vec<Vec<u8>>>,
    failures: Mutex<HashMap<(PushAction, String), String>>,
}

#[allow(dead_code)]
impl RecordingPusher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `action` on `foundation` fail with `output` as captured text.
    pub fn fail(&self, action: PushAction, foundation: &str, output: &str) {
        self.failures
            .lock()
            .insert((action, foundation.to_string()), output.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn calls_for(&self, action: PushAction) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.action == action)
            .map(|c| c.foundation.clone())
            .collect()
    }

    pub fn count(&self, action: PushAction, foundation: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.action == action && c.foundation == foundation)
            .count()
    }

    /// Request bodies seen by `stage`, in call order.
    pub fn staged_bodies(&self) -> Vec<Vec<u8>> {
        self.bodies.lock().clone()
    }

    fn record(&self, action: PushAction, foundation: &Foundation) -> Result<PushReport, PushError> {
        self.calls.lock().push(Call {
            action,
            foundation: foundation.to_string(),
        });

        let failure = self
            .failures
            .lock()
            .get(&(action, foundation.to_string()))
            .cloned();
        match failure {
            Some(output) => Err(PushError::Rejected {
                foundation: foundation.clone(),
                action: action.as_str(),
                status_code: 500,
                message: "exit status 1".to_string(),
                output,
            }),
            None => Ok(PushReport::ok(format!("{action} {foundation} ok\n"))),
        }
    }
}

#[async_trait]
impl Pusher for RecordingPusher {
    async fn stage(
        &self,
        foundation: &Foundation,
        deployment: &DeploymentDescriptor,
    ) -> Result<PushReport, PushError> {
        self.bodies.lock().push(deployment.body().to_vec());
        self.record(PushAction::Stage, foundation)
    }

    async fn commit(
        &self,
        foundation: &Foundation,
        _deployment: &DeploymentDescriptor,
    ) -> Result<PushReport, PushError> {
        self.record(PushAction::Commit, foundation)
    }

    async fn rollback(
        &self,
        foundation: &Foundation,
        _deployment: &DeploymentDescriptor,
    ) -> Result<PushReport, PushError> {
        self.record(PushAction::Rollback, foundation)
    }
}

/// Pusher whose stage never completes, for cancellation tests.
#[allow(dead_code)]
#[derive(Default)]
pub struct HangingPusher {
    pub rollbacks: Mutex<Vec<String>>,
}

#[async_trait]
impl Pusher for HangingPusher {
    async fn stage(
        &self,
        _foundation: &Foundation,
        _deployment: &DeploymentDescriptor,
    ) -> Result<PushReport, PushError> {
        std::future::pending().await
    }

    async fn commit(
        &self,
        _foundation: &Foundation,
        _deployment: &DeploymentDescriptor,
    ) -> Result<PushReport, PushError> {
        Ok(PushReport::ok(""))
    }

    async fn rollback(
        &self,
        foundation: &Foundation,
        _deployment: &DeploymentDescriptor,
    ) -> Result<PushReport, PushError> {
        self.rollbacks.lock().push(foundation.to_string());
        Ok(PushReport::ok(""))
    }
}

/// Shared, ordered log of handler invocations.
pub type EventLog = Arc<Mutex<Vec<String>>>;

#[allow(dead_code)]
pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Handler appending `<label>:<event kind or name>` to a shared log.
#[allow(dead_code)]
pub struct RecordingHandler {
    label: String,
    log: EventLog,
    fail: bool,
    pub findings: Mutex<Vec<LogMatchedError>>,
    pub correlation_ids: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingHandler {
    pub fn new(label: &str, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            log: Arc::clone(log),
            fail: false,
            findings: Mutex::new(Vec::new()),
            correlation_ids: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(label: &str, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            log: Arc::clone(log),
            fail: true,
            findings: Mutex::new(Vec::new()),
            correlation_ids: Mutex::new(Vec::new()),
        })
    }

    fn outcome(&self) -> Result<(), HandlerError> {
        if self.fail {
            Err(HandlerError::new(format!("{} refused", self.label)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn on_event(&self, event: &LifecycleEvent) -> Result<(), HandlerError> {
        self.log.lock().push(format!("{}:{}", self.label, event.kind()));
        self.correlation_ids
            .lock()
            .push(event.deployment().correlation_id().to_string());
        match event {
            LifecycleEvent::Start(start) => start.response.write_line("handler wrote this"),
            LifecycleEvent::Failure(failure) => {
                self.findings.lock().extend(failure.findings.iter().cloned())
            }
            _ => {}
        }
        self.outcome()
    }
}

#[async_trait]
impl NamedEventHandler for RecordingHandler {
    async fn on_named_event(&self, event: &NamedEvent) -> Result<(), HandlerError> {
        self.log.lock().push(format!("{}:{}", self.label, event.name()));
        self.correlation_ids
            .lock()
            .push(event.context().correlation_id.to_string());
        self.outcome()
    }
}

/// State controller recording which operation ran with which context.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingController {
    pub calls: Mutex<Vec<(String, String, StateContext)>>,
    pub fail_on: Mutex<Option<String>>,
}

impl RecordingController {
    fn record(
        &self,
        operation: &'static str,
        foundation: &Foundation,
        context: &StateContext,
    ) -> Result<PushReport, PushError> {
        self.calls.lock().push((
            operation.to_string(),
            foundation.to_string(),
            context.clone(),
        ));
        if self.fail_on.lock().as_deref() == Some(foundation.as_str()) {
            return Err(PushError::Rejected {
                foundation: foundation.clone(),
                action: operation,
                status_code: 500,
                message: "exit status 1".to_string(),
                output: format!("{operation} failed on {foundation}\n"),
            });
        }
        Ok(PushReport::ok(format!("{operation} {foundation}\n")))
    }
}

#[async_trait]
impl StateController for RecordingController {
    async fn start(
        &self,
        foundation: &Foundation,
        context: &StateContext,
    ) -> Result<PushReport, PushError> {
        self.record("start", foundation, context)
    }

    async fn stop(
        &self,
        foundation: &Foundation,
        context: &StateContext,
    ) -> Result<PushReport, PushError> {
        self.record("stop", foundation, context)
    }
}
