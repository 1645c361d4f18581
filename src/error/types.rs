//! Core error types.

use thiserror::Error;

/// Coarse error category, used for retry decisions and presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Server,
    Network,
    Client,
    Parsing,
    Configuration,
    Unknown,
}

/// Errors surfaced by the gateway adapter.
///
/// Only the streaming call raises these. The out-of-band usage fetch degrades
/// to "no usage" instead.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// HTTP 401 from the gateway.
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// HTTP 429 from the gateway.
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    /// HTTP 5xx from the gateway.
    #[error("Service unavailable (HTTP {code}): {message}")]
    ServiceUnavailable { code: u16, message: String },

    /// DNS resolution or connection establishment failed.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request timed out: {0}")]
    TimeoutError(String),

    /// Any other transport failure, message preserved as reported.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Any other non-success status, body preserved as received.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl LlmError {
    /// Create an API error without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create an API error carrying a structured payload.
    pub fn api_error_with_details(
        code: u16,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// HTTP status associated with this error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthenticationError(_) => Some(401),
            Self::RateLimitError(_) => Some(429),
            Self::ServiceUnavailable { code, .. } | Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthenticationError(_) => ErrorCategory::Authentication,
            Self::RateLimitError(_) => ErrorCategory::RateLimit,
            Self::ServiceUnavailable { .. } => ErrorCategory::Server,
            Self::ConnectionError(_) | Self::TimeoutError(_) | Self::HttpError(_) => {
                ErrorCategory::Network
            }
            Self::ApiError { code, .. } if *code >= 500 => ErrorCategory::Server,
            Self::ApiError { .. } => ErrorCategory::Client,
            Self::StreamError(_) | Self::ParseError(_) | Self::JsonError(_) => {
                ErrorCategory::Parsing
            }
            Self::ConfigurationError(_) => ErrorCategory::Configuration,
            Self::InternalError(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether a retry has a chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit | ErrorCategory::Server | ErrorCategory::Network
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_variants() {
        assert_eq!(LlmError::AuthenticationError("x".into()).status_code(), Some(401));
        assert_eq!(LlmError::RateLimitError("x".into()).status_code(), Some(429));
        assert_eq!(
            LlmError::ServiceUnavailable {
                code: 503,
                message: "down".into()
            }
            .status_code(),
            Some(503)
        );
        assert_eq!(LlmError::api_error(418, "teapot").status_code(), Some(418));
        assert_eq!(LlmError::ConnectionError("x".into()).status_code(), None);
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(LlmError::RateLimitError("x".into()).is_retryable());
        assert!(LlmError::ConnectionError("x".into()).is_retryable());
        assert!(
            LlmError::ServiceUnavailable {
                code: 502,
                message: "bad gateway".into()
            }
            .is_retryable()
        );
        assert!(!LlmError::AuthenticationError("x".into()).is_retryable());
        assert!(!LlmError::api_error(418, "teapot").is_retryable());
        assert!(!LlmError::ParseError("x".into()).is_retryable());
    }
}
