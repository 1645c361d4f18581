//! Transformers layer
//!
//! - `request`: caller messages to the chat-completions request body
//! - `stream`: chat-completion chunks to normalized stream events

pub mod request;
pub mod stream;

pub use request::*;
pub use stream::*;
