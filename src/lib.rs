//! # makehub-gateway
//!
//! Streaming chat adapter for the MakeHub inference gateway, an
//! OpenAI-compatible router that picks a backend provider per request based on
//! a price/performance preference.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Lazy streaming**: `create_message` returns a stream; nothing is sent until it is polled.
//! - **Usage accounting**: exactly zero or one usage event per turn, inline or looked up afterwards.
//! - **Cost estimation**: USD cost from the model's per-million token prices.
//! - **Model routing**: DeepSeek/Qwen models get the R1 message layout, `o3-mini` never gets a temperature.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use makehub_gateway::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MakehubBuilder::new()
//!         .api_key("your-api-key")
//!         .perf_ratio(0.5)
//!         .build()?;
//!
//!     let stream = client.create_message(
//!         "You are a helpful assistant.",
//!         &[ChatMessage::user("Hello, world!")],
//!     );
//!     let turn = collect_stream(stream).await?;
//!     println!("{}", turn.text);
//!     if let Some(usage) = turn.usage {
//!         println!("cost: ${:.6}", usage.total_cost);
//!     }
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod cost;
pub mod error;
pub mod generation;
pub mod models;
pub mod retry;
pub mod retry_api;
pub mod stream;
pub mod telemetry;
pub mod traits;
pub mod transformers;
pub mod types;
pub mod utils;

pub use builder::MakehubBuilder;
pub use client::MakehubClient;
pub use config::{HttpConfig, MakehubConfig};
pub use cost::calculate_cost;
pub use error::{ErrorCategory, LlmError};
pub use stream::{ChatStream, Collected, collect_stream};

/// Commonly used items.
pub mod prelude {
    pub use crate::builder::MakehubBuilder;
    pub use crate::client::MakehubClient;
    pub use crate::error::LlmError;
    pub use crate::retry_api::RetryOptions;
    pub use crate::stream::{ChatStream, collect_stream};
    pub use crate::traits::{ApiHandler, ModelListing};
    pub use crate::types::{
        ChatMessage, ContentPart, ModelDescriptor, ModelInfo, StreamEvent, UsageEvent,
    };
}
