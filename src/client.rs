//! MakeHub Client Implementation
//!
//! Streams chat completions from the MakeHub gateway and reports usage and
//! cost for each turn.

use std::sync::Arc;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::Stream;
use futures_util::StreamExt;
use reqwest::header::HeaderMap;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::MakehubConfig;
use crate::error::{LlmError, classify_http_error};
use crate::generation::{GenerationSlot, usage_from_lookup};
use crate::models::{MakehubModel, ModelListResponse};
use crate::retry_api::maybe_retry;
use crate::stream::ChatStream;
use crate::traits::{ApiHandler, ModelListing};
use crate::transformers::{ChatCompletionRequest, ChunkProcessor};
use crate::types::{ChatMessage, ModelDescriptor, ModelInfo, StreamEvent, UsageEvent};
use crate::utils::http_headers::{HttpHeaderBuilder, PRICE_PERFORMANCE_RATIO_HEADER, default_headers};
use crate::utils::streaming::sse_data_stream;

/// MakeHub gateway client
///
/// Cheap to clone; clones share the HTTP connection pool and the generation
/// slot. The slot holds one generation id at a time, so run concurrent turns
/// on separate clients (see [`GenerationSlot`]).
#[derive(Clone)]
pub struct MakehubClient {
    config: Arc<MakehubConfig>,
    http_client: reqwest::Client,
    generation: GenerationSlot,
}

impl std::fmt::Debug for MakehubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MakehubClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.model().id)
            .field("perf_ratio", &self.config.perf_ratio)
            .field("has_retry", &self.config.retry_options.is_some())
            .finish()
    }
}

impl MakehubClient {
    pub fn new(config: MakehubConfig, http_client: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            http_client,
            generation: GenerationSlot::new(),
        }
    }

    pub fn config(&self) -> &MakehubConfig {
        &self.config
    }

    pub fn model(&self) -> ModelDescriptor {
        self.config.model()
    }

    /// Generation id captured by the most recent turn, if any.
    pub fn last_generation_id(&self) -> Option<String> {
        self.generation.get()
    }

    fn headers(&self, streaming: bool) -> Result<HeaderMap, LlmError> {
        let builder = HttpHeaderBuilder::from_headers(default_headers())
            .with_bearer_auth(self.config.api_key.expose_secret())?;
        if !streaming {
            return Ok(builder.build());
        }
        Ok(builder
            .with_json_content_type()
            .with_event_stream_accept()
            .with_header(PRICE_PERFORMANCE_RATIO_HEADER, &self.config.perf_ratio_header())?
            .build())
    }

    /// Stream one chat turn.
    ///
    /// Yields text as it arrives, then at most one usage event: the inline one
    /// if the gateway sent it, otherwise the result of
    /// [`Self::fetch_generation_usage`]. Any failure ends the stream.
    pub fn create_message(&self, system_prompt: &str, messages: &[ChatMessage]) -> ChatStream {
        Box::pin(turn_stream(
            self.clone(),
            system_prompt.to_string(),
            messages.to_vec(),
        ))
    }

    async fn open_stream(&self, request: &ChatCompletionRequest) -> Result<reqwest::Response, LlmError> {
        let url = self.config.endpoint("chat/completions");
        let headers = self.headers(true)?;
        let (url, headers) = (&url, &headers);

        let send = move || async move {
            let response = self
                .http_client
                .post(url)
                .headers(headers.clone())
                .json(request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(classify_http_error(status.as_u16(), &body));
            }
            Ok(response)
        };

        maybe_retry(send, self.config.retry_options.clone()).await
    }

    /// Look up usage for the last captured generation.
    ///
    /// Waits the configured grace period, then queries `/completions?id=`
    /// once. Never fails: any problem is logged and yields `None`.
    pub async fn fetch_generation_usage(&self) -> Option<UsageEvent> {
        self.lookup_usage(&self.model().info).await
    }

    async fn lookup_usage(&self, model_info: &ModelInfo) -> Option<UsageEvent> {
        let generation_id = self.generation.get()?;

        tokio::time::sleep(self.config.usage_poll_delay).await;

        let lookup = tokio::time::timeout(
            self.config.usage_poll_timeout,
            self.request_generation(&generation_id),
        )
        .await;

        let payload = match lookup {
            Ok(Ok(payload)) => payload,
            Ok(Err(error)) => {
                tracing::warn!(%generation_id, %error, "failed to fetch MakeHub generation usage");
                return None;
            }
            Err(_) => {
                tracing::warn!(
                    %generation_id,
                    timeout = ?self.config.usage_poll_timeout,
                    "timed out fetching MakeHub generation usage"
                );
                return None;
            }
        };

        let usage = usage_from_lookup(&payload, model_info);
        if usage.is_none() {
            tracing::warn!(%generation_id, "MakeHub generation lookup returned no usage");
        }
        usage
    }

    async fn request_generation(&self, generation_id: &str) -> Result<Value, LlmError> {
        let response = self
            .http_client
            .get(self.config.endpoint("completions"))
            .query(&[("id", generation_id)])
            .headers(self.headers(false)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_error(status.as_u16(), &body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn turn_stream(
    client: MakehubClient,
    system_prompt: String,
    messages: Vec<ChatMessage>,
) -> impl Stream<Item = Result<StreamEvent, LlmError>> + Send {
    try_stream! {
        client.generation.reset();
        let model = client.model();
        let span = tracing::debug_span!(
            "makehub.create_message",
            request_id = %Uuid::new_v4(),
            model = %model.id
        );

        let request = ChatCompletionRequest::build(&model, &system_prompt, &messages);
        tracing::debug!(
            parent: &span,
            messages = request.messages.len(),
            temperature = ?request.temperature,
            "sending MakeHub chat request"
        );

        let response = client
            .open_stream(&request)
            .instrument(span.clone())
            .await
            .inspect_err(|e| log_failure(&span, e))?;

        let mut processor = ChunkProcessor::new(model.info.clone(), client.generation.clone());
        let mut data_stream = Box::pin(sse_data_stream(response));

        while let Some(data) = data_stream.next().instrument(span.clone()).await {
            let data = data.inspect_err(|e| log_failure(&span, e))?;
            let events = span
                .in_scope(|| processor.process_data(&data))
                .inspect_err(|e| log_failure(&span, e))?;
            for event in events {
                yield event;
            }
        }

        if !processor.did_output_usage() {
            let usage = client
                .lookup_usage(&model.info)
                .instrument(span.clone())
                .await;
            if let Some(usage) = usage {
                yield StreamEvent::Usage(usage);
            }
        }

        tracing::debug!(parent: &span, "MakeHub stream finished");
    }
}

fn log_failure(span: &tracing::Span, error: &LlmError) {
    tracing::error!(
        parent: span,
        status = ?error.status_code(),
        category = ?error.category(),
        %error,
        "MakeHub request failed"
    );
}

impl ApiHandler for MakehubClient {
    fn create_message(&self, system_prompt: &str, messages: &[ChatMessage]) -> ChatStream {
        MakehubClient::create_message(self, system_prompt, messages)
    }

    fn model(&self) -> ModelDescriptor {
        MakehubClient::model(self)
    }
}

#[async_trait]
impl ModelListing for MakehubClient {
    async fn list_models(&self) -> Result<Vec<MakehubModel>, LlmError> {
        let response = self
            .http_client
            .get(self.config.endpoint("models"))
            .headers(self.headers(false)?)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(classify_http_error(status.as_u16(), &body));
        }

        let listing: ModelListResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::ParseError(format!("Invalid MakeHub model list: {e}")))?;
        Ok(listing.into_models())
    }
}
