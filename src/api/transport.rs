//! # Transport Layer
//!
//! The [`Transport`] trait is the seam between the typed client and the wire.
//! [`HttpTransport`] talks to a live base URL with reqwest; the canned
//! transport in [`crate::api::canned`] answers from memory. Both hand back an
//! [`ApiResponse`] for every HTTP status; only transport-level failures
//! (connection refused, timeout) surface as errors.

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Method;
use serde_json::Value;

use super::response::ApiResponse;

/// Errors that can occur while probing an API.
#[derive(Debug)]
pub enum ClientError {
    /// Client misconfigured (bad URL, missing setting). Not retryable.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned a non-success status.
    Api { status: u16, message: String },
    /// Response payload did not match the expected shape.
    Parse(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Config(msg) => write!(f, "config error: {msg}"),
            ClientError::Network(msg) => write!(f, "network error: {msg}"),
            ClientError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ClientError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

/// Executes a single request against the API surface.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError>;
}

/// Live transport over reqwest.
///
/// Adds `Authorization: Bearer <key>` when a key is configured and a
/// per-request `X-Request-Id` header for log correlation. Elapsed time is
/// measured wall-clock from send to fully-read body.
pub struct HttpTransport {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Joins the base URL with an absolute endpoint path.
    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint_url(path);
        let url = reqwest::Url::parse(&url)
            .map_err(|e| ClientError::Config(format!("invalid URL {url}: {e}")))?;
        let request_id = uuid::Uuid::new_v4().to_string();
        info!("{} {} (request_id={})", method, url, request_id);

        let mut builder = self
            .client
            .request(method, url)
            .header("X-Request-Id", &request_id);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let elapsed = started.elapsed();

        debug!(
            "HTTP {} in {} ms ({} bytes)",
            status,
            elapsed.as_millis(),
            text.len()
        );
        if status >= 400 {
            warn!("API error response: {} - {}", status, text);
        }

        // Non-JSON bodies are preserved verbatim as a JSON string so error
        // text from proxies and gateways is still inspectable.
        let payload = if text.trim().is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse::new(status, payload, elapsed))
    }
}
