//! Generation handles and out-of-band usage statistics.
//!
//! The gateway tags each completion with an id. When a stream finishes without
//! inline usage, the adapter looks the generation up afterwards to recover
//! token counts and the billed cost.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::cost::{calculate_cost_for, lenient_count};
use crate::types::{ModelInfo, UsageEvent};

/// Single-slot holder for the most recent generation id.
///
/// Shared between a client and the streams it creates. The slot is cleared at
/// the start of every request and written once per request, so two requests
/// running at the same time on one client overwrite each other (last writer
/// wins). Use one client per concurrent request.
#[derive(Debug, Clone, Default)]
pub struct GenerationSlot {
    inner: Arc<Mutex<Option<String>>>,
}

impl GenerationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_slot<R>(&self, f: impl FnOnce(&mut Option<String>) -> R) -> R {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    pub fn reset(&self) {
        self.with_slot(|slot| *slot = None);
    }

    /// Store `id` unless a handle was already captured. Returns true when stored.
    pub fn capture(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.with_slot(|slot| {
            if slot.is_none() {
                *slot = Some(id.to_string());
                true
            } else {
                false
            }
        })
    }

    pub fn get(&self) -> Option<String> {
        self.with_slot(|slot| slot.clone())
    }
}

/// Build a usage event from a completions-lookup payload.
///
/// Returns `None` when the payload has no `usage` object. Missing counts are
/// zero; the reported `total_cost` wins unless it is absent or zero, in which
/// case the cost is estimated from `model_info`.
pub fn usage_from_lookup(payload: &Value, model_info: &ModelInfo) -> Option<UsageEvent> {
    let usage = payload.get("usage").filter(|u| u.is_object())?;

    let input_tokens = lenient_count(usage.get("prompt_tokens"));
    let output_tokens = lenient_count(usage.get("completion_tokens"));
    let total_cost = usage
        .get("total_cost")
        .and_then(Value::as_f64)
        .filter(|cost| cost.is_finite() && *cost != 0.0)
        .unwrap_or_else(|| calculate_cost_for(input_tokens, output_tokens, model_info));

    Some(UsageEvent {
        input_tokens,
        output_tokens,
        cache_read_tokens: Some(lenient_count(usage.get("cache_reads"))),
        cache_write_tokens: Some(lenient_count(usage.get("cache_writes"))),
        total_cost,
    })
}
