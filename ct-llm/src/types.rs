use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};

/// A single chat-completion exchange: system/user prompt pair plus sampling
/// controls.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub stop: Option<String>,
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            user_prompt: String::new(),
            temperature: 1.0,
            stop: None,
        }
    }
}

impl CompletionRequest {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.user_prompt.is_empty() {
            return Err(ClientError::InvalidArgument(
                "prompt must be a non-empty string".to_string(),
            ));
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 || self.temperature > 1.0 {
            return Err(ClientError::InvalidArgument(format!(
                "temperature must be within (0, 1], got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Outcome of one completion: the generated text plus usage metrics.
/// Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResult {
    pub text: String,
    pub total_tokens: u32,
    pub processing_time_ms: u64,
}

/// Normalized billing usage for one calendar month. `month` is 1-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthUsage {
    pub usage_usd: f64,
    pub year: i32,
    pub month: u32,
}
