//! # API Response
//!
//! A single response shape serves both transports: live HTTP calls carry a
//! measured elapsed time, canned responses carry a simulated one. The payload
//! is kept as raw JSON so callers can assert on it directly or deserialize
//! into the typed payloads in [`crate::api::types`].

use std::time::Duration;

use serde_json::Value;

/// Simulated elapsed time for canned responses that don't override it.
pub const DEFAULT_CANNED_ELAPSED: Duration = Duration::from_millis(500);

/// An HTTP response reduced to what the checks care about: a JSON payload,
/// a status code, and how long the call took.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: u16,
    payload: Value,
    elapsed: Duration,
}

impl ApiResponse {
    pub fn new(status: u16, payload: Value, elapsed: Duration) -> Self {
        Self {
            status,
            payload,
            elapsed,
        }
    }

    /// Builds an in-memory stand-in response carrying the given payload and
    /// status, with the default simulated elapsed time.
    pub fn canned(payload: Value, status: u16) -> Self {
        Self::new(status, payload, DEFAULT_CANNED_ELAPSED)
    }

    /// Overrides the simulated elapsed time (for latency scenarios).
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the payload exactly as supplied at construction.
    pub fn json(&self) -> &Value {
        &self.payload
    }

    /// Returns the payload serialized as a JSON string.
    pub fn text(&self) -> String {
        self.payload.to_string()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
