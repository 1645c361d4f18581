//! Model descriptors and resolution.

use serde::{Deserialize, Serialize};

/// Model used when configuration does not supply both an id and an info record.
pub const DEFAULT_MODEL_ID: &str = "anthropic/claude-4-sonnet";

/// Pricing and capability record for one model.
///
/// Prices are USD per million tokens. They are optional because hosts store
/// these records and older entries may lack them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
    #[serde(default)]
    pub supports_images: bool,
    #[serde(default)]
    pub supports_prompt_cache: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_writes_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_reads_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ModelInfo {
    /// Built-in pricing for [`DEFAULT_MODEL_ID`].
    pub fn default_model() -> Self {
        Self {
            max_tokens: Some(8192),
            context_window: Some(200_000),
            supports_images: true,
            supports_prompt_cache: false,
            input_price: Some(3.0),
            output_price: Some(15.0),
            cache_writes_price: None,
            cache_reads_price: None,
            description: Some(
                "Anthropic's Claude Sonnet 4 routed through MakeHub's price/performance selection."
                    .to_string(),
            ),
        }
    }

    pub fn with_prices(mut self, input_price: f64, output_price: f64) -> Self {
        self.input_price = Some(input_price);
        self.output_price = Some(output_price);
        self
    }
}

/// A resolved model: identifier plus info record.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    pub id: String,
    pub info: ModelInfo,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>, info: ModelInfo) -> Self {
        Self {
            id: id.into(),
            info,
        }
    }

    /// Use the configured pair verbatim when both halves are present, else the default.
    pub fn resolve(model_id: Option<&str>, model_info: Option<&ModelInfo>) -> Self {
        match (model_id, model_info) {
            (Some(id), Some(info)) if !id.is_empty() => Self::new(id, info.clone()),
            _ => Self::default(),
        }
    }

    /// Lower-cased id, used by the family checks below.
    fn id_lower(&self) -> String {
        self.id.to_lowercase()
    }

    /// `o3-mini` variants reject the temperature parameter.
    pub fn supports_temperature(&self) -> bool {
        supports_temperature(&self.id)
    }

    /// DeepSeek and Qwen families expect the R1 message layout.
    pub fn uses_r1_format(&self) -> bool {
        let id = self.id_lower();
        R1_FAMILY_MARKERS.iter().any(|marker| id.contains(marker))
    }
}

impl Default for ModelDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_ID, ModelInfo::default_model())
    }
}

const R1_FAMILY_MARKERS: [&str; 3] = ["deepseek", "qwen", "qwq"];

/// Whether the model accepts a `temperature` field.
pub fn supports_temperature(model_id: &str) -> bool {
    !model_id.to_lowercase().contains("o3-mini")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_uses_configured_pair_verbatim() {
        let info = ModelInfo::default().with_prices(1.0, 2.0);
        let model = ModelDescriptor::resolve(Some("openai/gpt-4o"), Some(&info));
        assert_eq!(model.id, "openai/gpt-4o");
        assert_eq!(model.info, info);
    }

    #[test]
    fn resolve_falls_back_when_either_half_is_missing() {
        let info = ModelInfo::default().with_prices(1.0, 2.0);
        assert_eq!(
            ModelDescriptor::resolve(Some("openai/gpt-4o"), None),
            ModelDescriptor::default()
        );
        assert_eq!(
            ModelDescriptor::resolve(None, Some(&info)),
            ModelDescriptor::default()
        );
        assert_eq!(ModelDescriptor::default().id, DEFAULT_MODEL_ID);
    }

    #[test]
    fn r1_family_detection_is_case_insensitive() {
        for id in [
            "deepseek/deepseek-r1",
            "DeepSeek-V3",
            "qwen/qwen-2.5-72b",
            "Qwen/QwQ-32B",
            "alibaba/qwq-32b-preview",
        ] {
            assert!(
                ModelDescriptor::new(id, ModelInfo::default()).uses_r1_format(),
                "{id} should use the R1 layout"
            );
        }
        for id in ["anthropic/claude-4-sonnet", "openai/gpt-4o", "meta/llama-3.3-70b"] {
            assert!(!ModelDescriptor::new(id, ModelInfo::default()).uses_r1_format());
        }
    }

    #[test]
    fn o3_mini_rejects_temperature() {
        assert!(!supports_temperature("openai/o3-mini"));
        assert!(!supports_temperature("openai/O3-MINI-high"));
        assert!(supports_temperature("openai/o3"));
        assert!(supports_temperature("anthropic/claude-4-sonnet"));
    }

    #[test]
    fn model_info_deserializes_from_camel_case_record() {
        let info: ModelInfo = serde_json::from_str(
            r#"{"maxTokens":4096,"contextWindow":64000,"supportsImages":false,"inputPrice":0.55,"outputPrice":2.19}"#,
        )
        .unwrap();
        assert_eq!(info.max_tokens, Some(4096));
        assert_eq!(info.input_price, Some(0.55));
        assert_eq!(info.output_price, Some(2.19));
        assert!(!info.supports_prompt_cache);
    }
}
