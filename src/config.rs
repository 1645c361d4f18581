//! MakeHub configuration
//!
//! Everything the client needs to talk to the gateway. The API key is held as a
//! [`SecretString`] so it never shows up in `Debug` output or logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::LlmError;
use crate::retry_api::RetryOptions;
use crate::types::{ModelDescriptor, ModelInfo};
use crate::utils::http_headers::price_performance_percent;

pub const DEFAULT_BASE_URL: &str = "https://api.makehub.ai/v1";
pub const API_KEY_ENV: &str = "MAKEHUB_API_KEY";
pub const DEFAULT_USAGE_POLL_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_USAGE_POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings applied when building the `reqwest::Client`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpConfig {
    /// Whole-request timeout. Streaming calls are bounded by it too, so leave
    /// unset for long generations.
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl HttpConfig {
    pub fn build_client(&self) -> Result<reqwest::Client, LlmError> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder
            .build()
            .map_err(|e| LlmError::ConfigurationError(format!("Failed to create HTTP client: {e}")))
    }
}

/// MakeHub client configuration
#[derive(Debug, Clone)]
pub struct MakehubConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model_id: Option<String>,
    pub model_info: Option<ModelInfo>,
    /// Price/performance preference in [0, 1]. `None` means 0.5.
    pub perf_ratio: Option<f64>,
    pub http_config: HttpConfig,
    /// Grace period before the usage lookup.
    pub usage_poll_delay: Duration,
    pub usage_poll_timeout: Duration,
    /// Retry for the streaming handshake. `None` disables it.
    pub retry_options: Option<RetryOptions>,
}

impl Default for MakehubConfig {
    fn default() -> Self {
        Self {
            api_key: SecretString::from(String::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model_id: None,
            model_info: None,
            perf_ratio: None,
            http_config: HttpConfig::default(),
            usage_poll_delay: DEFAULT_USAGE_POLL_DELAY,
            usage_poll_timeout: DEFAULT_USAGE_POLL_TIMEOUT,
            retry_options: None,
        }
    }
}

impl MakehubConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), LlmError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(LlmError::ConfigurationError(format!(
                "MakeHub API key is required (set it on the builder or via {API_KEY_ENV})"
            )));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(LlmError::ConfigurationError(format!(
                "Invalid base URL: {}",
                self.base_url
            )));
        }
        if let Some(ratio) = self.perf_ratio
            && !ratio.is_finite()
        {
            return Err(LlmError::ConfigurationError(
                "Price/performance ratio must be a finite number".to_string(),
            ));
        }
        if self.usage_poll_timeout.is_zero() {
            return Err(LlmError::ConfigurationError(
                "Usage poll timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The model requests are sent to.
    pub fn model(&self) -> ModelDescriptor {
        ModelDescriptor::resolve(self.model_id.as_deref(), self.model_info.as_ref())
    }

    /// Value of the `X-Price-Performance-Ratio` header.
    pub fn perf_ratio_header(&self) -> String {
        price_performance_percent(self.perf_ratio).to_string()
    }

    /// Base URL without a trailing slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        let err = MakehubConfig::default().validate().unwrap_err();
        assert!(matches!(err, LlmError::ConfigurationError(_)));
        assert!(MakehubConfig::new("  ").validate().is_err());
        assert!(MakehubConfig::new("mh-key").validate().is_ok());
    }

    #[test]
    fn usage_lookup_defaults() {
        let config = MakehubConfig::default();
        assert_eq!(config.usage_poll_delay, Duration::from_millis(500));
        assert_eq!(config.usage_poll_timeout, Duration::from_secs(10));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.retry_options.is_none());
    }

    #[test]
    fn base_url_must_be_http() {
        let mut config = MakehubConfig::new("mh-key");
        config.base_url = "api.makehub.ai".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_ratio_is_rejected() {
        let mut config = MakehubConfig::new("mh-key");
        config.perf_ratio = Some(f64::INFINITY);
        assert!(config.validate().is_err());
        config.perf_ratio = Some(0.8);
        assert!(config.validate().is_ok());
        assert_eq!(config.perf_ratio_header(), "80");
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let mut config = MakehubConfig::new("k");
        assert_eq!(
            config.endpoint("chat/completions"),
            "https://api.makehub.ai/v1/chat/completions"
        );
        config.base_url = "http://localhost:8080/v1/".into();
        assert_eq!(config.endpoint("models"), "http://localhost:8080/v1/models");
    }

    #[test]
    fn debug_output_hides_the_key() {
        let config = MakehubConfig::new("super-secret-key");
        assert!(!format!("{config:?}").contains("super-secret-key"));
    }

    #[test]
    fn default_model_is_used_without_full_configuration() {
        let mut config = MakehubConfig::new("k");
        config.model_id = Some("openai/gpt-4o".into());
        assert_eq!(config.model().id, crate::types::DEFAULT_MODEL_ID);
    }
}
