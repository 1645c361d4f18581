//! HTTP Headers Utility
//!
//! Header builder plus the fixed header table MakeHub expects on every call.

use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
};

use crate::error::LlmError;

pub const HTTP_REFERER: &str = "https://cline.bot";
pub const X_TITLE: &str = "Cline";
/// Application label reported in `X-Makehub-Metadata`.
pub const APP_LABEL: &str = "vscode.saoudrizwan.claude-dev";
pub const PRICE_PERFORMANCE_RATIO_HEADER: &str = "X-Price-Performance-Ratio";
pub const DEFAULT_PERF_RATIO: f64 = 0.5;

/// HTTP header builder for API requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Start from an existing header table.
    pub fn from_headers(headers: HeaderMap) -> Self {
        Self { headers }
    }

    pub fn with_bearer_auth(mut self, token: &str) -> Result<Self, LlmError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid API key format: {e}")))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    pub fn with_json_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    pub fn with_event_stream_accept(mut self) -> Self {
        self.headers
            .insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, LlmError> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            LlmError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
        })?;
        self.headers.insert(
            header_name,
            HeaderValue::from_str(value).map_err(|e| {
                LlmError::ConfigurationError(format!("Invalid header value '{value}': {e}"))
            })?,
        );
        Ok(self)
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON value of the `X-Makehub-Metadata` header.
pub fn metadata_label() -> String {
    serde_json::json!({
        "labels": [{ "key": "app", "value": APP_LABEL }]
    })
    .to_string()
}

/// Referer, title and metadata headers sent on every request.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("http-referer"),
        HeaderValue::from_static(HTTP_REFERER),
    );
    headers.insert(
        HeaderName::from_static("x-title"),
        HeaderValue::from_static(X_TITLE),
    );
    if let Ok(value) = HeaderValue::from_str(&metadata_label()) {
        headers.insert(HeaderName::from_static("x-makehub-metadata"), value);
    }
    headers
}

/// Integer percentage for `X-Price-Performance-Ratio`.
///
/// Missing or non-finite ratios fall back to 0.5; the result is clamped to 0..=100.
pub fn price_performance_percent(ratio: Option<f64>) -> u8 {
    let ratio = ratio
        .filter(|r| r.is_finite())
        .unwrap_or(DEFAULT_PERF_RATIO)
        .clamp(0.0, 1.0);
    (ratio * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_builder() {
        let headers = HttpHeaderBuilder::from_headers(default_headers())
            .with_bearer_auth("test-token")
            .unwrap()
            .with_json_content_type()
            .with_event_stream_accept()
            .with_header(PRICE_PERFORMANCE_RATIO_HEADER, "50")
            .unwrap()
            .build();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer test-token");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(ACCEPT).unwrap(), "text/event-stream");
        assert_eq!(headers.get("x-price-performance-ratio").unwrap(), "50");
        assert_eq!(headers.get("x-title").unwrap(), "Cline");
    }

    #[test]
    fn invalid_header_value_is_a_configuration_error() {
        let result = HttpHeaderBuilder::new().with_header("X-Bad", "line\nbreak");
        assert!(matches!(result, Err(LlmError::ConfigurationError(_))));
    }

    #[test]
    fn metadata_header_is_json_label_list() {
        let headers = default_headers();
        let raw = headers.get("x-makehub-metadata").unwrap().to_str().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed["labels"][0]["key"], "app");
        assert_eq!(parsed["labels"][0]["value"], APP_LABEL);
        assert_eq!(headers.get("http-referer").unwrap(), HTTP_REFERER);
    }

    #[test]
    fn ratio_is_rounded_percentage() {
        assert_eq!(price_performance_percent(None), 50);
        assert_eq!(price_performance_percent(Some(0.0)), 0);
        assert_eq!(price_performance_percent(Some(1.0)), 100);
        assert_eq!(price_performance_percent(Some(0.756)), 76);
        assert_eq!(price_performance_percent(Some(0.333)), 33);
        assert_eq!(price_performance_percent(Some(f64::NAN)), 50);
        assert_eq!(price_performance_percent(Some(3.0)), 100);
        assert_eq!(price_performance_percent(Some(-1.0)), 0);
    }
}
