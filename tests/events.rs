// ABOUTME: Integration tests for the event bus.
// ABOUTME: Checks registration order, positional results, and fail-fast named emission.

mod support;

use chrono::Utc;
use greenlight::config::Config;
use greenlight::descriptor::{DeployRequest, DeploymentDescriptor, DescriptorBuilder};
use greenlight::events::{
    DeployFinish, DeployFinishedEvent, DeployStart, DeployStartedEvent, EventBus, EventContext,
    EventError, EventKind, LifecycleEvent, NamedEvent,
};
use greenlight::response::{OutputSink, ResponseBuffer};
use greenlight::types::CfContext;
use std::sync::Arc;
use support::{RecordingHandler, event_log, test_config};

fn descriptor() -> Arc<DeploymentDescriptor> {
    let config: Config = test_config("prod", &["https://api.f1.example.com"]);
    let request = DeployRequest::new(CfContext::new("prod", "org", "space", "app"))
        .content_type("application/json")
        .correlation_id("evt-1")
        .body(r#"{"artifact_url":"https://a/app.zip"}"#);
    Arc::new(DescriptorBuilder::new(&config).build(&request).unwrap())
}

fn finish_event(deployment: &Arc<DeploymentDescriptor>) -> LifecycleEvent {
    LifecycleEvent::Finish(DeployFinish {
        deployment: Arc::clone(deployment),
        status_code: 200,
        succeeded: true,
        at: Utc::now(),
    })
}

#[tokio::test]
async fn handlers_run_in_registration_order() {
    let log = event_log();
    let mut bus = EventBus::new();
    bus.subscribe(EventKind::DeployFinish, RecordingHandler::new("first", &log));
    bus.subscribe(EventKind::DeployFinish, RecordingHandler::new("second", &log));
    bus.subscribe(EventKind::DeployStart, RecordingHandler::new("other", &log));

    let results = bus.emit(&finish_event(&descriptor())).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(
        *log.lock(),
        vec!["first:deploy.finish", "second:deploy.finish"]
    );
}

#[tokio::test]
async fn typed_emission_reports_each_slot_and_keeps_going() {
    let log = event_log();
    let mut bus = EventBus::new();
    bus.subscribe(EventKind::DeployFinish, RecordingHandler::new("ok", &log));
    bus.subscribe(EventKind::DeployFinish, RecordingHandler::failing("bad", &log));
    bus.subscribe(EventKind::DeployFinish, RecordingHandler::new("after", &log));

    let results = bus.emit(&finish_event(&descriptor())).await;

    assert!(results[0].is_ok());
    assert_eq!(results[1].as_ref().unwrap_err().message(), "bad refused");
    assert!(results[2].is_ok());
    assert_eq!(log.lock().len(), 3);

    let err = EventError::from_results(EventKind::DeployFinish, results).unwrap_err();
    assert!(matches!(err, EventError::Handler { index: 1, .. }));
}

#[tokio::test]
async fn emission_without_subscribers_is_empty() {
    let bus = EventBus::new();
    assert!(bus.emit(&finish_event(&descriptor())).await.is_empty());
    assert_eq!(bus.handler_count(EventKind::DeployFinish), 0);
}

#[tokio::test]
async fn named_emission_stops_at_first_failure() {
    let log = event_log();
    let mut bus = EventBus::new();
    bus.subscribe_named(EventKind::DeployFinish, RecordingHandler::failing("bad", &log));
    bus.subscribe_named(EventKind::DeployFinish, RecordingHandler::new("never", &log));

    let deployment = descriptor();
    let event = NamedEvent::Finished(DeployFinishedEvent {
        context: EventContext::from(deployment.as_ref()),
        status_code: 200,
        succeeded: true,
    });
    let err = bus.emit_event(&event).await.unwrap_err();

    assert!(matches!(
        err,
        EventError::Named { name: "DeployFinishedEvent", index: 0, .. }
    ));
    assert_eq!(*log.lock(), vec!["bad:DeployFinishedEvent"]);
}

#[tokio::test]
async fn start_handlers_can_write_to_the_response() {
    let log = event_log();
    let mut bus = EventBus::new();
    let handler = RecordingHandler::new("writer", &log);
    bus.subscribe(EventKind::DeployStart, handler.clone());
    bus.subscribe_named(EventKind::DeployStart, handler.clone());

    let deployment = descriptor();
    let sink = Arc::new(ResponseBuffer::new());
    let response: Arc<dyn OutputSink> = sink.clone();

    let typed = LifecycleEvent::Start(DeployStart {
        deployment: Arc::clone(&deployment),
        response: Arc::clone(&response),
        at: Utc::now(),
    });
    let named = NamedEvent::Started(DeployStartedEvent {
        context: EventContext::from(deployment.as_ref()),
        content_type: deployment.content_type(),
        body: deployment.body().clone(),
        response,
    });

    assert!(bus.emit(&typed).await.iter().all(Result::is_ok));
    bus.emit_event(&named).await.unwrap();

    assert_eq!(sink.contents(), "handler wrote this\n");
    assert_eq!(*handler.correlation_ids.lock(), vec!["evt-1", "evt-1"]);
    assert_eq!(bus.handler_count(EventKind::DeployStart), 2);
}

#[test]
fn event_context_copies_request_details() {
    let deployment = descriptor();
    let context = EventContext::from(deployment.as_ref());
    assert_eq!(context.correlation_id.as_str(), "evt-1");
    assert_eq!(context.cf_context.application, "app");
    assert_eq!(context.authorization.username, "deployer");
    assert!(context.data.is_none());
}
