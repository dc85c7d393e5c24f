//! # Probe Client
//!
//! Thin typed surface over a [`Transport`]. One method per endpoint, each
//! returning the deserialized payload together with the status and elapsed
//! time of the call. Deliberately minimal: no retries, no backoff, no
//! connection management. The raw `get`/`post` passthroughs exist for
//! asserting on error payloads that the typed methods would reject.

use std::sync::Arc;

use log::debug;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::response::ApiResponse;
use super::transport::{ClientError, Transport};
use super::types::{
    ApiErrorBody, Classification, GenerateRequest, Generation, GenerationInfo, ModelInfo,
    Prediction, Sentiment, ServiceStatus,
};

/// A deserialized payload together with the status and timing of the call
/// that produced it.
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub status: u16,
    pub elapsed: std::time::Duration,
}

pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// GET /status
    pub async fn status(&self) -> Result<Timed<ServiceStatus>, ClientError> {
        self.fetch(Method::GET, "/status", None).await
    }

    /// GET /generate - structure probe for the generation surface.
    pub async fn generation_info(&self) -> Result<Timed<GenerationInfo>, ClientError> {
        self.fetch(Method::GET, "/generate", None).await
    }

    /// GET /predict
    pub async fn predict(&self) -> Result<Timed<Prediction>, ClientError> {
        self.fetch(Method::GET, "/predict", None).await
    }

    /// GET /models/{name}
    pub async fn model(&self, name: &str) -> Result<Timed<ModelInfo>, ClientError> {
        let path = format!("/models/{name}");
        self.fetch(Method::GET, &path, None).await
    }

    /// POST /generate
    pub async fn generate(&self, req: &GenerateRequest) -> Result<Timed<Generation>, ClientError> {
        let body = serde_json::to_value(req).map_err(|e| ClientError::Parse(e.to_string()))?;
        self.fetch(Method::POST, "/generate", Some(body)).await
    }

    /// POST /sentiment
    pub async fn sentiment(&self, text: &str) -> Result<Timed<Sentiment>, ClientError> {
        self.fetch(Method::POST, "/sentiment", Some(json!({ "text": text })))
            .await
    }

    /// POST /classify
    pub async fn classify(&self, input: &str) -> Result<Timed<Classification>, ClientError> {
        self.fetch(Method::POST, "/classify", Some(json!({ "text": input })))
            .await
    }

    /// Raw GET: the response comes back untyped and untouched, whatever the
    /// status, so callers can assert on error payloads directly.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.transport.execute(Method::GET, path, None).await
    }

    /// Raw POST, same contract as [`ApiClient::get`].
    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, ClientError> {
        self.transport.execute(Method::POST, path, Some(body)).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Timed<T>, ClientError> {
        let response = self.transport.execute(method, path, body.as_ref()).await?;

        if !response.is_success() {
            return Err(ClientError::Api {
                status: response.status(),
                message: error_message(&response),
            });
        }

        debug!("{} -> HTTP {}", path, response.status());
        let value = serde_json::from_value(response.json().clone())
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(Timed {
            value,
            status: response.status(),
            elapsed: response.elapsed(),
        })
    }
}

/// Pulls the `error` field out of an error payload, falling back to the
/// serialized body when the shape is unexpected.
fn error_message(response: &ApiResponse) -> String {
    serde_json::from_value::<ApiErrorBody>(response.json().clone())
        .map(|body| body.error)
        .unwrap_or_else(|_| response.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::canned::CannedTransport;
    use crate::test_support;

    #[tokio::test]
    async fn test_status_deserializes_canned_payload() {
        let client = test_support::canned_client(
            CannedTransport::new().on(
                Method::GET,
                "/status",
                ApiResponse::canned(test_support::canned_status(), 200),
            ),
        );

        let probe = client.status().await.unwrap();
        assert_eq!(probe.status, 200);
        assert!(probe.value.is_ok());
        assert_eq!(probe.value.model, "gpt-4");
    }

    #[tokio::test]
    async fn test_missing_model_maps_to_api_error() {
        let client = test_support::canned_client(
            CannedTransport::new().on(
                Method::GET,
                "/models/invalid-model",
                ApiResponse::canned(json!({"error": "Model not found"}), 404),
            ),
        );

        let result = client.model("invalid-model").await;
        match result {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Model not found");
            }
            other => panic!("expected Api error, got {:?}", other.map(|t| t.status)),
        }
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_a_parse_error() {
        let client = test_support::canned_client(
            CannedTransport::new().on(
                Method::GET,
                "/status",
                ApiResponse::canned(json!({"up": true}), 200),
            ),
        );

        let result = client.status().await;
        assert!(matches!(result, Err(ClientError::Parse(_))));
    }

    #[tokio::test]
    async fn test_raw_get_hands_back_error_responses_untouched() {
        let payload = json!({"error": "Rate limit exceeded"});
        let client = test_support::canned_client(
            CannedTransport::new().on(
                Method::GET,
                "/generate",
                ApiResponse::canned(payload.clone(), 429),
            ),
        );

        let response = client.get("/generate").await.unwrap();
        assert_eq!(response.status(), 429);
        assert_eq!(response.json(), &payload);
    }

    #[test]
    fn test_error_message_falls_back_to_body_text() {
        let response = ApiResponse::canned(json!({"detail": "boom"}), 500);
        assert_eq!(error_message(&response), r#"{"detail":"boom"}"#);
    }
}
