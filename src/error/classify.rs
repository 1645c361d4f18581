//! HTTP status classification for gateway responses.

use super::types::LlmError;

/// Longest body excerpt carried in classified error messages.
const BODY_SAMPLE_LEN: usize = 200;

/// Classify a non-success gateway response.
///
/// 401, 429 and 5xx get dedicated variants. Every other status becomes an
/// `ApiError` that keeps the original status and body untouched.
pub fn classify_http_error(status: u16, body_text: &str) -> LlmError {
    let body_sample = body_text.chars().take(BODY_SAMPLE_LEN).collect::<String>();

    match status {
        401 => LlmError::AuthenticationError(format!(
            "Invalid MakeHub API key. Please check your API key and try again. body_sample={body_sample}"
        )),
        429 => LlmError::RateLimitError(format!(
            "Rate limit exceeded. Please wait a moment and try again. body_sample={body_sample}"
        )),
        s if s >= 500 => LlmError::ServiceUnavailable {
            code: s,
            message: format!(
                "MakeHub service is temporarily unavailable. Please try again later. body_sample={body_sample}"
            ),
        },
        _ => {
            let details = match serde_json::from_str::<serde_json::Value>(body_text) {
                Ok(json) => serde_json::json!({ "status": status, "response": json }),
                Err(_) => serde_json::json!({ "status": status, "raw": body_text }),
            };
            LlmError::api_error_with_details(status, body_text, details)
        }
    }
}
