//! Typed payloads for the inference API surface.
//!
//! Deserialization is the structure check: a payload missing a required
//! field, or carrying the wrong JSON type, fails to parse and surfaces as a
//! `ClientError::Parse`. The handful of semantic predicates that can't be
//! expressed through types (confidence ranges, token budgets, score
//! coherence) live here as methods.

use serde::{Deserialize, Serialize};

/// Health payload from `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub model: String,
}

impl ServiceStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Structure probe payload from `GET /generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInfo {
    pub model: String,
    pub response: String,
    pub tokens_used: u32,
    pub confidence: f64,
}

/// Payload from `GET /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub result: String,
}

/// Payload from `GET /models/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model: String,
}

/// Request body for `POST /generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Response body for `POST /generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub prompt: String,
    pub generated_text: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Not every deployment reports usage; absent counts as within budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

impl Generation {
    /// True when the reported token usage respects the requested cap.
    pub fn within_token_budget(&self) -> bool {
        self.tokens_used.is_none_or(|used| used <= self.max_tokens)
    }
}

/// Per-label scores in a sentiment response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentScores {
    /// Label with the highest score. Ties resolve in the order
    /// positive, negative, neutral.
    pub fn dominant(&self) -> &'static str {
        let mut label = "positive";
        let mut best = self.positive;
        if self.negative > best {
            label = "negative";
            best = self.negative;
        }
        if self.neutral > best {
            label = "neutral";
        }
        label
    }
}

/// Response body for `POST /sentiment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub text: String,
    pub sentiment: String,
    pub confidence: f64,
    pub scores: SentimentScores,
}

impl Sentiment {
    /// True when the labeled sentiment matches the dominant score and the
    /// confidence is in range.
    pub fn is_coherent(&self) -> bool {
        self.sentiment == self.scores.dominant() && valid_confidence(self.confidence)
    }
}

/// Response body for `POST /classify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub prediction: String,
    pub confidence: f64,
}

/// Error body returned with 4xx statuses: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Confidence scores are probabilities; anything outside [0, 1] is bogus.
pub fn valid_confidence(confidence: f64) -> bool {
    (0.0..=1.0).contains(&confidence)
}
