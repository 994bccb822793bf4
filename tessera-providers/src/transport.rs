//! The transport boundary.
//!
//! The engine's sole suspension point is the network round-trip behind
//! the [`Transport`] trait. Connection pooling, auth headers, retries,
//! and timeout policy are the transport's responsibility; the engine
//! sees either a raw payload or a [`TransportError`], propagated
//! unchanged.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use tessera_core::TransportError;

use crate::wire::{ProviderWireRequest, ProviderWireResponse};

/// Executes a wire request against a provider.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the request, returning the raw response or a
    /// transport-level error.
    async fn execute(
        &self,
        request: &ProviderWireRequest,
    ) -> Result<ProviderWireResponse, TransportError>;
}

/// HTTP transport backed by reqwest.
///
/// Posts each wire request's body to the base URL joined with the
/// request's endpoint. Carries an optional bearer token and extra
/// headers; it deliberately implements no retry or backoff.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
    headers: Vec<(String, String)>,
}

impl HttpTransport {
    /// Create a transport for the given base URL with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::ClientBuilder::new()
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.into(),
            bearer_token: None,
            headers: Vec::new(),
        }
    }

    /// Attach a bearer token sent as `Authorization: Bearer …`.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Attach an extra header to every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Use a caller-configured client instead of the default.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: &ProviderWireRequest,
    ) -> Result<ProviderWireResponse, TransportError> {
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            request.endpoint
        );
        tracing::debug!(url = %url, "posting provider request");

        let mut builder = self.client.post(&url).json(&request.body);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Connection(e.to_string())
            }
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(TransportError::Status {
                status,
                message: body,
            });
        }
        Ok(ProviderWireResponse::new(status, body))
    }
}

/// Scripted transport for tests.
///
/// Returns queued responses in order and records every request it sees.
///
/// # Example
///
/// ```rust
/// use tessera_providers::{MockTransport, ProviderWireRequest, Transport};
///
/// # tokio_test::block_on(async {
/// let transport = MockTransport::new()
///     .with_json_response(200, &serde_json::json!({"id": "r1"}));
/// let request = ProviderWireRequest::new("/chat/completions", serde_json::json!({}));
/// let response = transport.execute(&request).await.unwrap();
/// assert_eq!(response.status, 200);
/// assert_eq!(transport.recorded_requests().len(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<ProviderWireResponse, TransportError>>>,
    requests: Mutex<Vec<ProviderWireRequest>>,
}

impl MockTransport {
    /// Create an empty mock transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    #[must_use]
    pub fn with_response(self, response: ProviderWireResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Queue a JSON response with the given status.
    #[must_use]
    pub fn with_json_response(self, status: u16, body: &JsonValue) -> Self {
        self.with_response(ProviderWireResponse::new(status, body.to_string()))
    }

    /// Queue a transport error.
    #[must_use]
    pub fn with_error(self, error: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Requests executed so far, in order.
    #[must_use]
    pub fn recorded_requests(&self) -> Vec<ProviderWireRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(
        &self,
        request: &ProviderWireRequest,
    ) -> Result<ProviderWireResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Connection(
                    "mock transport has no scripted response left".to_string(),
                ))
            })
    }
}
