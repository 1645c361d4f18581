//! Normalized stream events.

use serde::{Deserialize, Serialize};

/// Terminal usage record for one request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageEvent {
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_write_tokens: Option<u64>,
    /// USD.
    pub total_cost: f64,
}

/// Event yielded by [`crate::ChatStream`], in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Text { text: String },
    Usage(UsageEvent),
}

impl StreamEvent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Usage(_) => None,
        }
    }

    pub fn as_usage(&self) -> Option<&UsageEvent> {
        match self {
            Self::Usage(usage) => Some(usage),
            Self::Text { .. } => None,
        }
    }
}
