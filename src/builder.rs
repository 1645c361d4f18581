//! Fluent builder for [`MakehubClient`].
//!
//! ```rust,no_run
//! use makehub_gateway::MakehubBuilder;
//!
//! # fn example() -> Result<(), makehub_gateway::LlmError> {
//! let client = MakehubBuilder::new()
//!     .api_key("mh-...")
//!     .perf_ratio(0.7)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::client::MakehubClient;
use crate::config::{API_KEY_ENV, MakehubConfig};
use crate::error::LlmError;
use crate::retry_api::RetryOptions;
use crate::types::ModelInfo;

#[derive(Debug, Clone, Default)]
pub struct MakehubBuilder {
    config: MakehubConfig,
}

impl MakehubBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.config.api_key = SecretString::from(api_key.into());
        self
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Model id. Only takes effect together with [`Self::model_info`].
    pub fn model<S: Into<String>>(mut self, model_id: S) -> Self {
        self.config.model_id = Some(model_id.into());
        self
    }

    pub fn model_info(mut self, info: ModelInfo) -> Self {
        self.config.model_info = Some(info);
        self
    }

    pub fn perf_ratio(mut self, ratio: f64) -> Self {
        self.config.perf_ratio = Some(ratio);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.http_config.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_config.connect_timeout = Some(timeout);
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.http_config.user_agent = Some(user_agent.into());
        self
    }

    pub fn usage_poll_delay(mut self, delay: Duration) -> Self {
        self.config.usage_poll_delay = delay;
        self
    }

    pub fn usage_poll_timeout(mut self, timeout: Duration) -> Self {
        self.config.usage_poll_timeout = timeout;
        self
    }

    /// Retry the streaming handshake with the given options.
    pub fn with_retry(mut self, options: RetryOptions) -> Self {
        self.config.retry_options = Some(options);
        self
    }

    pub fn build(self) -> Result<MakehubClient, LlmError> {
        let http_client = self.config.http_config.build_client()?;
        self.build_with_client(http_client)
    }

    pub fn build_with_client(self, http_client: reqwest::Client) -> Result<MakehubClient, LlmError> {
        let mut config = self.config;
        if config.api_key.expose_secret().is_empty()
            && let Ok(key) = std::env::var(API_KEY_ENV)
        {
            config.api_key = SecretString::from(key);
        }

        config.validate()?;
        Ok(MakehubClient::new(config, http_client))
    }
}
