//! Common Streaming Utilities
//!
//! Server-sent event plumbing on top of eventsource-stream, which handles UTF-8
//! boundaries, line buffering and SSE field parsing.

use eventsource_stream::{EventStreamError, Eventsource};
use futures_util::{Stream, StreamExt};

use crate::error::LlmError;

/// The `data:` payloads of an SSE response, in order.
pub fn sse_data_stream(
    response: reqwest::Response,
) -> impl Stream<Item = Result<String, LlmError>> + Send {
    response
        .bytes_stream()
        .eventsource()
        .map(|event| event.map(|e| e.data).map_err(map_event_stream_error))
}

fn map_event_stream_error(err: EventStreamError<reqwest::Error>) -> LlmError {
    match err {
        EventStreamError::Transport(e) => LlmError::from(e),
        other => LlmError::StreamError(format!("SSE parsing error: {other}")),
    }
}
