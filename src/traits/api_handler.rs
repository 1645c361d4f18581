//! Streaming chat capability trait

use crate::stream::ChatStream;
use crate::types::{ChatMessage, ModelDescriptor};

/// A provider adapter the host drives one chat turn at a time.
pub trait ApiHandler: Send + Sync {
    /// Start a chat turn. No I/O happens until the returned stream is polled.
    fn create_message(&self, system_prompt: &str, messages: &[ChatMessage]) -> ChatStream;

    /// The model requests are sent to.
    fn model(&self) -> ModelDescriptor;
}
