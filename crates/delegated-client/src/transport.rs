//! HTTP transport abstraction
//!
//! The client builds fully-formed requests and hands them to a `Transport`.
//! `HttpTransport` sends them with reqwest; tests substitute a stub that
//! records requests and replays canned responses.
//!
//! Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility (`Arc<dyn Transport>`).

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::{Error, Result};

/// A request ready to send.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    /// Serialized payload; empty when the caller sent no body
    pub body: Vec<u8>,
}

/// Status and parsed JSON body of a response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

/// Performs one HTTP exchange.
///
/// Implementations fail with `Error::Transport` when no JSON body could be
/// obtained (connection errors, timeouts, non-JSON bodies). Non-2xx statuses
/// with a JSON body are returned as responses, not errors.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: TransportRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse>> + Send + '_>>;
}

/// reqwest-backed transport.
///
/// Timeouts and connection pooling come from the wrapped `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a transport whose requests fail after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("building HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        request: TransportRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse>> + Send + '_>> {
        Box::pin(async move {
            let response = self
                .client
                .request(request.method, &request.url)
                .headers(request.headers)
                .body(request.body)
                .send()
                .await
                .map_err(|e| Error::Transport(format!("request to {} failed: {e}", request.url)))?;

            let status = response.status().as_u16();
            let body = response.json::<Value>().await.map_err(|e| {
                Error::Transport(format!("malformed response body (status {status}): {e}"))
            })?;

            Ok(TransportResponse { status, body })
        })
    }
}
