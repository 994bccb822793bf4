//! Token usage reporting.

use serde::{Deserialize, Serialize};

/// Token usage for a single structured output request.
///
/// Derived strictly from the provider's own token accounting. A counter
/// the provider omits is reported as 0, never estimated locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Tokens in the prompt, as reported by the provider.
    pub prompt_tokens: u64,
    /// Tokens in the completion, as reported by the provider.
    pub completion_tokens: u64,
}

impl UsageStats {
    /// Create usage from known counters.
    #[must_use]
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    /// Create usage from provider counters that may be absent.
    ///
    /// Missing counters map to 0.
    #[must_use]
    pub fn from_counters(prompt_tokens: Option<u64>, completion_tokens: Option<u64>) -> Self {
        Self {
            prompt_tokens: prompt_tokens.unwrap_or(0),
            completion_tokens: completion_tokens.unwrap_or(0),
        }
    }

    /// Total tokens across prompt and completion.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    /// Whether the provider reported no usage at all.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.prompt_tokens == 0 && self.completion_tokens == 0
    }
}
