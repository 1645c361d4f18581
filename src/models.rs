//! Models advertised by the gateway's `/models` endpoint.

use serde::{Deserialize, Serialize};

use crate::types::ModelInfo;

/// One entry of the MakeHub model list.
///
/// Prices are USD per million tokens, as published by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakehubModel {
    pub context: u32,
    pub model_id: String,
    pub model_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub organisation: String,
    pub price_per_input_token: f64,
    pub price_per_output_token: f64,
    pub provider_name: String,
    #[serde(default)]
    pub quantisation: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub supports_images: Option<bool>,
    #[serde(default)]
    pub supports_prompt_cache: Option<bool>,
    #[serde(default)]
    pub cache_writes_price: Option<f64>,
    #[serde(default)]
    pub cache_reads_price: Option<f64>,
    #[serde(default)]
    pub assistant_ready: bool,
    #[serde(default)]
    pub thinking_config: Option<ThinkingConfig>,
    #[serde(default)]
    pub tiers: Vec<PricingTier>,
    #[serde(default)]
    pub capabilities: Option<ModelCapabilities>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThinkingConfig {
    #[serde(default)]
    pub max_budget: Option<u32>,
    #[serde(default)]
    pub output_price: Option<f64>,
}

/// Context-window dependent pricing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingTier {
    pub context_window: u32,
    #[serde(default)]
    pub input_price: Option<f64>,
    #[serde(default)]
    pub output_price: Option<f64>,
    #[serde(default)]
    pub cache_writes_price: Option<f64>,
    #[serde(default)]
    pub cache_reads_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    #[serde(default)]
    pub image_input: Option<bool>,
    #[serde(default)]
    pub tool_calling: Option<bool>,
    #[serde(default)]
    pub json_mode: Option<bool>,
}

/// `/models` responses come either as a bare array or wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ModelListResponse {
    Bare(Vec<MakehubModel>),
    Wrapped { data: Vec<MakehubModel> },
}

impl ModelListResponse {
    pub(crate) fn into_models(self) -> Vec<MakehubModel> {
        match self {
            Self::Bare(models) | Self::Wrapped { data: models } => models,
        }
    }
}

impl MakehubModel {
    /// Identifier to send as `model` in chat requests.
    pub fn id(&self) -> &str {
        &self.model_id
    }

    pub fn supports_images(&self) -> bool {
        self.supports_images
            .or_else(|| self.capabilities.as_ref().and_then(|c| c.image_input))
            .unwrap_or(false)
    }

    pub fn to_model_info(&self) -> ModelInfo {
        let description = match self.display_name.as_deref() {
            Some(name) => format!("{name} by {} via {}", self.organisation, self.provider_name),
            None => format!("{} via {}", self.model_name, self.provider_name),
        };

        ModelInfo {
            max_tokens: self.max_tokens,
            context_window: Some(self.context),
            supports_images: self.supports_images(),
            supports_prompt_cache: self.supports_prompt_cache.unwrap_or(false),
            input_price: Some(self.price_per_input_token),
            output_price: Some(self.price_per_output_token),
            cache_writes_price: self.cache_writes_price,
            cache_reads_price: self.cache_reads_price,
            description: Some(description),
        }
    }
}
