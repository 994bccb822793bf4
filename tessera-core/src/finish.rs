//! Normalized finish reasons.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why generation stopped, normalized across providers.
///
/// Each provider adapter maps its own reason codes onto this enum via an
/// explicit table; codes with no mapping become [`FinishReason::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of response.
    Stop,
    /// Maximum token count reached.
    Length,
    /// Content was filtered by the provider.
    ContentFilter,
    /// The model invoked a tool.
    ToolCall,
    /// The provider reported a reason this engine does not recognize,
    /// or no reason at all.
    #[default]
    Unknown,
}

impl FinishReason {
    /// Whether the response ran to a natural stop.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Stop)
    }

    /// Whether the response was cut off by the token limit.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Length)
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::ContentFilter => "content_filter",
            Self::ToolCall => "tool_call",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
