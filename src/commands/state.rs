// ABOUTME: State command implementation.
// ABOUTME: Starts or stops an already deployed application on every foundation.

use greenlight::config::Config;
use greenlight::error::Result;
use greenlight::lifecycle::{StateRequest, StateToggler};
use greenlight::output::{Output, Report};
use greenlight::push::ProcessPusher;
use greenlight::response::ResponseBuffer;
use greenlight::types::{Authorization, CfContext};
use serde_json::{Map, Value, json};
use std::sync::Arc;

pub async fn state(
    config: Config,
    cf_context: CfContext,
    desired: String,
    data: Option<Map<String, Value>>,
    authorization: Option<Authorization>,
    correlation_id: Option<String>,
    mut output: Output,
) -> Result<bool> {
    let controller = Arc::new(ProcessPusher::from_config(&config)?);
    let toggler = StateToggler::new(Arc::new(config), controller);

    let mut body = json!({ "state": desired });
    if let Some(data) = data {
        body["data"] = Value::Object(data);
    }

    let mut request = StateRequest::new(cf_context).body(serde_json::to_vec(&body)?);
    if let Some(auth) = authorization {
        request = request.authorization(auth);
    }
    if let Some(id) = correlation_id {
        request = request.correlation_id(id);
    }

    output.start_timer();
    let sink = ResponseBuffer::new();
    let response = toggler.toggle(&request, &sink).await;

    if response.change.is_none() && response.error.is_none() {
        output.progress(&format!("State '{desired}' requires no change"));
    }

    let body = sink.contents();
    let mut report = Report::new(response.status_code, &body);
    report.error = response.error.as_ref().map(ToString::to_string);
    output.report(&report);

    Ok(response.status_code < 400)
}
