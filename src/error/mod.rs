//! Error Handling Module
//!
//! - Core error type (`LlmError`) and its coarse `ErrorCategory`
//! - HTTP status classification for gateway responses
//! - Conversions from transport and serialization errors
//!
//! # Example
//!
//! ```rust,ignore
//! use makehub_gateway::error::{classify_http_error, ErrorCategory};
//!
//! let error = classify_http_error(429, "slow down");
//! assert_eq!(error.category(), ErrorCategory::RateLimit);
//! assert!(error.is_retryable());
//! ```

mod classify;
mod conversions;
pub mod types;

pub use classify::*;
pub use types::*;
