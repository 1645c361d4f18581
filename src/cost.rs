//! Token accounting and cost estimation.

use crate::types::ModelInfo;

/// Ceiling applied to gateway-reported token counts in a single request.
pub const MAX_REASONABLE_TOKENS: u64 = 100_000;

/// Costs above this many USD are logged for inspection.
const HIGH_COST_THRESHOLD: f64 = 10.0;

/// Estimate the cost of a request in USD.
///
/// Prices in `model_info` are per million tokens. Returns 0 when either price
/// is missing or not finite, or when a token count is negative.
pub fn calculate_cost(input_tokens: i64, output_tokens: i64, model_info: &ModelInfo) -> f64 {
    let (Some(input_price), Some(output_price)) = (
        model_info.input_price.filter(|p| p.is_finite()),
        model_info.output_price.filter(|p| p.is_finite()),
    ) else {
        tracing::warn!(?model_info, "MakeHub: invalid model pricing information");
        return 0.0;
    };

    if input_tokens < 0 || output_tokens < 0 {
        tracing::warn!(input_tokens, output_tokens, "MakeHub: invalid token counts");
        return 0.0;
    }

    let input_cost = (input_tokens as f64 / 1_000_000.0) * input_price;
    let output_cost = (output_tokens as f64 / 1_000_000.0) * output_price;
    let total_cost = input_cost + output_cost;

    if total_cost > HIGH_COST_THRESHOLD {
        tracing::debug!(
            input_tokens,
            output_tokens,
            input_price,
            output_price,
            input_cost,
            output_cost,
            total_cost,
            "MakeHub high cost calculation"
        );
    }

    total_cost.max(0.0)
}

/// Cost for unsigned counts, as carried by usage events.
pub fn calculate_cost_for(input_tokens: u64, output_tokens: u64, model_info: &ModelInfo) -> f64 {
    calculate_cost(
        i64::try_from(input_tokens).unwrap_or(i64::MAX),
        i64::try_from(output_tokens).unwrap_or(i64::MAX),
        model_info,
    )
}

/// Cap a reported token count at [`MAX_REASONABLE_TOKENS`].
pub fn clamp_tokens(tokens: u64) -> u64 {
    tokens.min(MAX_REASONABLE_TOKENS)
}

/// Read a token count from loosely typed JSON.
///
/// Missing, null, negative or non-numeric values count as zero.
pub fn lenient_count(value: Option<&serde_json::Value>) -> u64 {
    match value {
        Some(v) => v
            .as_u64()
            .or_else(|| {
                v.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        None => 0,
    }
}
