#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use makehub_gateway::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("makehub")
}

pub fn read_sse(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join("sse").join(name)).expect("read sse fixture")
}

pub fn read_json(name: &str) -> serde_json::Value {
    let text =
        std::fs::read_to_string(fixtures_dir().join("json").join(name)).expect("read json fixture");
    serde_json::from_str(&text).expect("parse json fixture")
}

pub fn sse_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_raw(body, "text/event-stream")
}

/// Builder pointed at the mock server with a short usage grace period.
pub fn builder_for(server: &MockServer) -> MakehubBuilder {
    MakehubBuilder::new()
        .api_key("KEY")
        .base_url(format!("{}/v1", server.uri()))
        .usage_poll_delay(Duration::from_millis(10))
        .usage_poll_timeout(Duration::from_secs(2))
}

pub fn client_for(server: &MockServer) -> MakehubClient {
    builder_for(server).build().expect("build client")
}

pub async fn mount_chat(server: &MockServer, fixture: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(sse_response(read_sse(fixture)))
        .mount(server)
        .await;
}

/// Drain a stream, keeping every item.
pub async fn drain(mut stream: ChatStream) -> Vec<Result<StreamEvent, LlmError>> {
    use futures_util::StreamExt;
    let mut items = Vec::new();
    while let Some(item) = stream.next().await {
        items.push(item);
    }
    items
}

pub fn usage_events(events: &[StreamEvent]) -> Vec<&UsageEvent> {
    events.iter().filter_map(StreamEvent::as_usage).collect()
}

pub fn text_of(events: &[StreamEvent]) -> String {
    events.iter().filter_map(StreamEvent::as_text).collect()
}
