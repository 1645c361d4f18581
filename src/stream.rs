//! Streaming response type and collection helper.

use std::pin::Pin;

use futures::Stream;
use futures_util::StreamExt;

use crate::error::LlmError;
use crate::types::{StreamEvent, UsageEvent};

/// Events of one `create_message` call, in arrival order.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;

/// A fully drained [`ChatStream`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub text: String,
    pub usage: Option<UsageEvent>,
}

/// Drain `stream`, concatenating text and keeping the usage event.
///
/// Stops at the first error; text received before it is discarded.
pub async fn collect_stream(mut stream: ChatStream) -> Result<Collected, LlmError> {
    let mut collected = Collected::default();
    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::Text { text } => collected.text.push_str(&text),
            StreamEvent::Usage(usage) => collected.usage = Some(usage),
        }
    }
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage() -> UsageEvent {
        UsageEvent {
            input_tokens: 3,
            output_tokens: 2,
            cache_read_tokens: None,
            cache_write_tokens: None,
            total_cost: 0.1,
        }
    }

    #[tokio::test]
    async fn collects_text_and_usage() {
        let stream: ChatStream = Box::pin(futures::stream::iter(vec![
            Ok(StreamEvent::text("Hel")),
            Ok(StreamEvent::text("lo")),
            Ok(StreamEvent::Usage(usage())),
        ]));
        let collected = collect_stream(stream).await.unwrap();
        assert_eq!(collected.text, "Hello");
        assert_eq!(collected.usage, Some(usage()));
    }

    #[test]
    fn stops_at_first_error() {
        let stream: ChatStream = Box::pin(futures::stream::iter(vec![
            Ok(StreamEvent::text("partial")),
            Err(LlmError::StreamError("cut".into())),
            Ok(StreamEvent::text("never")),
        ]));
        assert!(matches!(
            tokio_test::block_on(collect_stream(stream)),
            Err(LlmError::StreamError(_))
        ));
    }
}
