//! Opaque wire-level request and response shapes.
//!
//! These are the only types that cross the transport boundary. The body
//! of a request is provider-specific JSON assembled by an adapter; the
//! body of a response is kept as raw text so decoding failures can be
//! classified by the adapter rather than the transport.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// A fully-assembled outbound provider request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderWireRequest {
    /// Endpoint path, relative to the transport's base URL.
    pub endpoint: String,
    /// Provider-specific JSON body.
    pub body: JsonValue,
}

impl ProviderWireRequest {
    /// Create a wire request.
    pub fn new(endpoint: impl Into<String>, body: JsonValue) -> Self {
        Self {
            endpoint: endpoint.into(),
            body,
        }
    }
}

/// A raw provider response, as returned by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderWireResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ProviderWireResponse {
    /// Create a wire response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Create a 200 response from a JSON body, for tests and mocks.
    pub fn ok_json(body: &JsonValue) -> Self {
        Self::new(200, body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_json() {
        let response = ProviderWireResponse::ok_json(&serde_json::json!({"id": "r1"}));
        assert_eq!(response.status, 200);
        assert!(response.body.contains("\"id\""));
    }
}
