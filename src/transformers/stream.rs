//! Stream chunk transformation
//!
//! Turns the gateway's chat-completion chunks into [`StreamEvent`]s. Text is
//! forwarded as soon as it arrives; at most one usage event is produced.

use serde::Deserialize;
use serde_json::Value;

use crate::cost::{MAX_REASONABLE_TOKENS, calculate_cost_for, clamp_tokens, lenient_count};
use crate::error::LlmError;
use crate::generation::GenerationSlot;
use crate::types::{ModelInfo, StreamEvent, UsageEvent};

/// One `data:` payload of the chat-completions stream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Option<Vec<ChunkChoice>>,
    /// Kept loosely typed: malformed counts default to zero instead of failing the chunk.
    #[serde(default)]
    pub usage: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Per-request chunk state.
#[derive(Debug)]
pub struct ChunkProcessor {
    model_info: ModelInfo,
    generation: GenerationSlot,
    did_output_usage: bool,
}

impl ChunkProcessor {
    pub fn new(model_info: ModelInfo, generation: GenerationSlot) -> Self {
        Self {
            model_info,
            generation,
            did_output_usage: false,
        }
    }

    pub fn did_output_usage(&self) -> bool {
        self.did_output_usage
    }

    /// Handle the raw `data:` field of one SSE event.
    ///
    /// `[DONE]` and blank payloads produce nothing. Payloads that are not JSON
    /// fail the stream.
    pub fn process_data(&mut self, data: &str) -> Result<Vec<StreamEvent>, LlmError> {
        let data = data.trim();
        if data.is_empty() || data == "[DONE]" {
            return Ok(Vec::new());
        }
        let chunk: ChatCompletionChunk = serde_json::from_str(data)
            .map_err(|e| LlmError::ParseError(format!("Failed to parse stream chunk: {e}")))?;
        self.process(chunk)
    }

    pub fn process(&mut self, chunk: ChatCompletionChunk) -> Result<Vec<StreamEvent>, LlmError> {
        if let Some(error) = chunk.error {
            return Err(stream_error(&error));
        }

        if let Some(id) = chunk.id.as_deref()
            && self.generation.capture(id)
        {
            tracing::debug!(generation_id = id, "captured MakeHub generation id");
        }

        let Some(choices) = chunk.choices.filter(|c| !c.is_empty()) else {
            return Ok(Vec::new());
        };

        let mut events = Vec::with_capacity(2);

        if let Some(text) = choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
            .filter(|text| !text.is_empty())
        {
            events.push(StreamEvent::Text { text });
        }

        if !self.did_output_usage
            && let Some(usage) = chunk.usage.as_ref().filter(|u| u.is_object())
        {
            events.push(StreamEvent::Usage(self.inline_usage(usage)));
            self.did_output_usage = true;
        }

        Ok(events)
    }

    fn inline_usage(&self, usage: &Value) -> UsageEvent {
        let prompt_tokens = lenient_count(usage.get("prompt_tokens"));
        let completion_tokens = lenient_count(usage.get("completion_tokens"));
        let input_tokens = clamp_tokens(prompt_tokens);
        let output_tokens = clamp_tokens(completion_tokens);

        if prompt_tokens > MAX_REASONABLE_TOKENS || completion_tokens > MAX_REASONABLE_TOKENS {
            tracing::warn!(
                prompt_tokens,
                completion_tokens,
                corrected_prompt_tokens = input_tokens,
                corrected_completion_tokens = output_tokens,
                "MakeHub returned unusually high token counts, applying limits"
            );
        }

        UsageEvent {
            input_tokens,
            output_tokens,
            cache_read_tokens: None,
            cache_write_tokens: None,
            total_cost: calculate_cost_for(input_tokens, output_tokens, &self.model_info),
        }
    }
}

/// Map an `{"error": {...}}` stream payload to an API error.
fn stream_error(error: &Value) -> LlmError {
    let code = error
        .get("code")
        .and_then(Value::as_u64)
        .and_then(|c| u16::try_from(c).ok())
        .unwrap_or(500);
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    LlmError::api_error_with_details(code, message, error.clone())
}
