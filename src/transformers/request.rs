//! Request transformation
//!
//! Converts the caller's chat turn into the gateway's chat-completions body.
//! Two message layouts exist: the standard OpenAI one, and the R1 layout that
//! DeepSeek/Qwen reasoning models expect (no system role, consecutive messages
//! of the same role merged).

use serde::Serialize;

use crate::types::{
    ChatMessage, ContentPart, ImageUrl, MessageContent, ModelDescriptor, Role, WireContent,
    WireMessage, WirePart,
};

/// Temperature sent to models that accept one.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Convert caller messages into wire messages.
pub trait MessageConverter: Send + Sync {
    fn convert(&self, messages: &[ChatMessage]) -> Vec<WireMessage>;
}

/// Standard OpenAI layout: one wire message per input message.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiMessageConverter;

impl MessageConverter for OpenAiMessageConverter {
    fn convert(&self, messages: &[ChatMessage]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|message| {
                let content = match (&message.content, message.role) {
                    (MessageContent::Text(text), _) => WireContent::Text(text.clone()),
                    // Only user turns may carry images.
                    (MessageContent::Parts(parts), Role::User) => {
                        WireContent::Parts(parts.iter().map(to_wire_part).collect())
                    }
                    (MessageContent::Parts(parts), _) => WireContent::Text(join_text(parts)),
                };
                WireMessage {
                    role: message.role,
                    content,
                }
            })
            .collect()
    }
}

/// R1 layout: consecutive messages with the same role are merged into one.
#[derive(Debug, Clone, Copy, Default)]
pub struct R1MessageConverter;

impl MessageConverter for R1MessageConverter {
    fn convert(&self, messages: &[ChatMessage]) -> Vec<WireMessage> {
        let mut merged: Vec<WireMessage> = Vec::with_capacity(messages.len());

        for message in messages {
            let content = match &message.content {
                MessageContent::Text(text) => WireContent::Text(text.clone()),
                MessageContent::Parts(parts) if has_image(parts) => {
                    WireContent::Parts(parts.iter().map(to_wire_part).collect())
                }
                MessageContent::Parts(parts) => WireContent::Text(join_text(parts)),
            };

            match merged.last_mut() {
                Some(last) if last.role == message.role => {
                    let previous = std::mem::replace(&mut last.content, WireContent::Text(String::new()));
                    last.content = merge_content(previous, content);
                }
                _ => merged.push(WireMessage {
                    role: message.role,
                    content,
                }),
            }
        }

        merged
    }
}

fn merge_content(previous: WireContent, next: WireContent) -> WireContent {
    match (previous, next) {
        (WireContent::Text(a), WireContent::Text(b)) => WireContent::Text(format!("{a}\n{b}")),
        (a, b) => {
            let mut parts = into_parts(a);
            parts.extend(into_parts(b));
            WireContent::Parts(parts)
        }
    }
}

fn into_parts(content: WireContent) -> Vec<WirePart> {
    match content {
        WireContent::Text(text) => vec![WirePart::Text { text }],
        WireContent::Parts(parts) => parts,
    }
}

fn has_image(parts: &[ContentPart]) -> bool {
    parts
        .iter()
        .any(|part| matches!(part, ContentPart::Image { .. }))
}

fn join_text(parts: &[ContentPart]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            ContentPart::Text { text } => Some(text.as_str()),
            ContentPart::Image { .. } => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn to_wire_part(part: &ContentPart) -> WirePart {
    match part {
        ContentPart::Text { text } => WirePart::Text { text: text.clone() },
        ContentPart::Image { media_type, data } => WirePart::ImageUrl {
            image_url: ImageUrl {
                url: format!("data:{media_type};base64,{data}"),
            },
        },
    }
}

/// Which message layout a model expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    Standard,
    R1,
}

impl MessageFormat {
    pub fn for_model(model: &ModelDescriptor) -> Self {
        if model.uses_r1_format() {
            Self::R1
        } else {
            Self::Standard
        }
    }

    pub fn converter(self) -> &'static dyn MessageConverter {
        match self {
            Self::Standard => &OpenAiMessageConverter,
            Self::R1 => &R1MessageConverter,
        }
    }

    /// Build the full message list, folding in the system prompt.
    ///
    /// The standard layout keeps it as a leading system message; the R1 layout
    /// sends it as the first user message.
    pub fn build_messages(self, system_prompt: &str, messages: &[ChatMessage]) -> Vec<WireMessage> {
        match self {
            Self::Standard => {
                let mut out = Vec::with_capacity(messages.len() + 1);
                out.push(WireMessage::text(Role::System, system_prompt));
                out.extend(self.converter().convert(messages));
                out
            }
            Self::R1 => {
                let mut input = Vec::with_capacity(messages.len() + 1);
                input.push(ChatMessage::user(system_prompt));
                input.extend_from_slice(messages);
                self.converter().convert(&input)
            }
        }
    }
}

/// Streaming chat-completions request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatCompletionRequest {
    pub fn build(model: &ModelDescriptor, system_prompt: &str, messages: &[ChatMessage]) -> Self {
        let format = MessageFormat::for_model(model);
        Self {
            model: model.id.clone(),
            messages: format.build_messages(system_prompt, messages),
            stream: true,
            temperature: model
                .supports_temperature()
                .then_some(DEFAULT_TEMPERATURE),
        }
    }
}
