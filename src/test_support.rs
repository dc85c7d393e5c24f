//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use reqwest::Method;
use serde_json::{Value, json};

use crate::api::{ApiClient, ApiResponse, CannedTransport};

pub fn canned_status() -> Value {
    json!({"status": "ok", "model": "gpt-4"})
}

pub fn canned_generation_info() -> Value {
    json!({
        "model": "gpt-4",
        "response": "This is a test response",
        "tokens_used": 50,
        "confidence": 0.95
    })
}

pub fn canned_generation(prompt: &str) -> Value {
    json!({
        "prompt": prompt,
        "generated_text": "Machine learning is a subset of AI...",
        "model": "gpt-4",
        "temperature": 0.7,
        "max_tokens": 100,
        "tokens_used": 50
    })
}

pub fn canned_sentiment(text: &str) -> Value {
    json!({
        "text": text,
        "sentiment": "positive",
        "confidence": 0.98,
        "scores": {"positive": 0.98, "negative": 0.02, "neutral": 0.0}
    })
}

pub fn canned_classification() -> Value {
    json!({"prediction": "positive", "confidence": 0.87})
}

/// A transport with every endpoint canned to a healthy response.
pub fn healthy_transport(prompt: &str, sample_text: &str) -> CannedTransport {
    CannedTransport::new()
        .on(
            Method::GET,
            "/status",
            ApiResponse::canned(canned_status(), 200),
        )
        .on(
            Method::GET,
            "/generate",
            ApiResponse::canned(canned_generation_info(), 200),
        )
        .on(
            Method::GET,
            "/predict",
            ApiResponse::canned(json!({"result": "success"}), 200),
        )
        .on(
            Method::GET,
            "/models/gpt-4",
            ApiResponse::canned(json!({"model": "gpt-4"}), 200),
        )
        .on(
            Method::POST,
            "/generate",
            ApiResponse::canned(canned_generation(prompt), 201),
        )
        .on(
            Method::POST,
            "/sentiment",
            ApiResponse::canned(canned_sentiment(sample_text), 200),
        )
        .on(
            Method::POST,
            "/classify",
            ApiResponse::canned(canned_classification(), 200),
        )
}

/// Wraps a canned transport in a client for tests that don't need the network.
pub fn canned_client(transport: CannedTransport) -> ApiClient {
    ApiClient::new(Arc::new(transport))
}
