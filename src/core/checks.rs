//! # Check Runner
//!
//! Runs the endpoint checks against an [`ApiClient`] and aggregates the
//! outcomes into a report. Checks are independent: a failure in one never
//! stops the rest, so a single run paints the whole picture of the API.

use std::time::Duration;

use chrono::Utc;
use log::{info, warn};

use crate::EndpointKind;
use crate::api::client::{ApiClient, Timed};
use crate::api::transport::ClientError;
use crate::api::types::{GenerateRequest, valid_confidence};
use crate::core::config::{
    DEFAULT_MAX_TOKENS, DEFAULT_PROMPT, DEFAULT_SAMPLE_TEXT, DEFAULT_SLA_MS, DEFAULT_TEMPERATURE,
    ResolvedConfig,
};

// ============================================================================
// Settings
// ============================================================================

/// Everything the runner needs, detached from where it was configured.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub sla: Duration,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub sample_text: String,
    pub classify_input: String,
    pub models: Vec<String>,
}

impl CheckSettings {
    pub fn from_config(resolved: &ResolvedConfig) -> Self {
        Self {
            sla: Duration::from_millis(resolved.sla_ms),
            prompt: resolved.prompt.clone(),
            temperature: resolved.temperature,
            max_tokens: resolved.max_tokens,
            sample_text: resolved.sample_text.clone(),
            classify_input: resolved.classify_input.clone(),
            models: resolved.models.iter().map(|m| m.name.clone()).collect(),
        }
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            sla: Duration::from_millis(DEFAULT_SLA_MS),
            prompt: DEFAULT_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            sample_text: DEFAULT_SAMPLE_TEXT.to_string(),
            classify_input: DEFAULT_SAMPLE_TEXT.to_string(),
            models: Vec::new(),
        }
    }
}

// ============================================================================
// Outcomes & Report
// ============================================================================

#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub status: Option<u16>,
    pub elapsed: Duration,
    pub detail: String,
}

impl CheckOutcome {
    fn pass<T>(name: &str, probe: &Timed<T>, detail: String) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            status: Some(probe.status),
            elapsed: probe.elapsed,
            detail,
        }
    }

    fn fail<T>(name: &str, probe: &Timed<T>, detail: String) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            status: Some(probe.status),
            elapsed: probe.elapsed,
            detail,
        }
    }

    fn from_error(name: &str, error: &ClientError) -> Self {
        let status = match error {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        };
        Self {
            name: name.to_string(),
            passed: false,
            status,
            elapsed: Duration::ZERO,
            detail: error.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CheckReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl CheckReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Plain-text rendering: one verdict line per check plus a summary.
    pub fn render(&self) -> String {
        let mut out = format!("mirage check report ({})\n", Utc::now().to_rfc3339());
        for outcome in &self.outcomes {
            let verdict = if outcome.passed { "PASS" } else { "FAIL" };
            match outcome.status {
                Some(status) => out.push_str(&format!(
                    "{verdict} {}: {} (HTTP {status}, {} ms)\n",
                    outcome.name,
                    outcome.detail,
                    outcome.elapsed.as_millis()
                )),
                None => out.push_str(&format!(
                    "{verdict} {}: {}\n",
                    outcome.name, outcome.detail
                )),
            }
        }
        out.push_str(&format!(
            "{}/{} checks passed\n",
            self.passed_count(),
            self.total()
        ));
        out
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Runs every check (or just the ones for `only`) and collects the outcomes.
pub async fn run_checks(
    client: &ApiClient,
    settings: &CheckSettings,
    only: Option<EndpointKind>,
) -> CheckReport {
    let wanted = |kind: EndpointKind| only.is_none() || only == Some(kind);
    let mut outcomes = Vec::new();

    if wanted(EndpointKind::Status) {
        outcomes.push(connectivity(client).await);
    }
    if wanted(EndpointKind::Generate) {
        outcomes.push(generation_structure(client).await);
    }
    if wanted(EndpointKind::Predict) {
        outcomes.push(latency(client, settings.sla).await);
    }
    if wanted(EndpointKind::Models) {
        for model in &settings.models {
            outcomes.push(model_available(client, model).await);
        }
    }
    if wanted(EndpointKind::Generate) {
        outcomes.push(text_generation(client, settings).await);
    }
    if wanted(EndpointKind::Sentiment) {
        outcomes.push(sentiment(client, &settings.sample_text).await);
    }
    if wanted(EndpointKind::Classify) {
        outcomes.push(classification(client, &settings.classify_input).await);
    }

    for outcome in &outcomes {
        if outcome.passed {
            info!("check passed: {} ({})", outcome.name, outcome.detail);
        } else {
            warn!("check failed: {} ({})", outcome.name, outcome.detail);
        }
    }

    CheckReport { outcomes }
}

/// GET /status answers 200 with status "ok".
async fn connectivity(client: &ApiClient) -> CheckOutcome {
    const NAME: &str = "connectivity";
    match client.status().await {
        Ok(probe) if probe.value.is_ok() => CheckOutcome::pass(
            NAME,
            &probe,
            format!("service is up on model {}", probe.value.model),
        ),
        Ok(probe) => CheckOutcome::fail(
            NAME,
            &probe,
            format!("unexpected service status \"{}\"", probe.value.status),
        ),
        Err(e) => CheckOutcome::from_error(NAME, &e),
    }
}

/// GET /generate carries every required field with sane types. Field
/// presence and types are enforced by deserialization; only the confidence
/// range needs an explicit look.
async fn generation_structure(client: &ApiClient) -> CheckOutcome {
    const NAME: &str = "generation structure";
    match client.generation_info().await {
        Ok(probe) if valid_confidence(probe.value.confidence) => CheckOutcome::pass(
            NAME,
            &probe,
            format!(
                "model {} reports {} tokens at confidence {:.2}",
                probe.value.model, probe.value.tokens_used, probe.value.confidence
            ),
        ),
        Ok(probe) => CheckOutcome::fail(
            NAME,
            &probe,
            format!("confidence {} outside [0, 1]", probe.value.confidence),
        ),
        Err(e) => CheckOutcome::from_error(NAME, &e),
    }
}

/// GET /predict answers within the latency budget.
async fn latency(client: &ApiClient, sla: Duration) -> CheckOutcome {
    const NAME: &str = "latency";
    match client.predict().await {
        Ok(probe) if probe.elapsed <= sla => CheckOutcome::pass(
            NAME,
            &probe,
            format!(
                "responded in {} ms (budget {} ms)",
                probe.elapsed.as_millis(),
                sla.as_millis()
            ),
        ),
        Ok(probe) => CheckOutcome::fail(
            NAME,
            &probe,
            format!(
                "responded in {} ms, over the {} ms budget",
                probe.elapsed.as_millis(),
                sla.as_millis()
            ),
        ),
        Err(e) => CheckOutcome::from_error(NAME, &e),
    }
}

/// GET /models/{name} answers 200 and echoes the model name.
async fn model_available(client: &ApiClient, name: &str) -> CheckOutcome {
    let check_name = format!("model {name}");
    match client.model(name).await {
        Ok(probe) if probe.value.model == name => {
            CheckOutcome::pass(&check_name, &probe, "available".to_string())
        }
        Ok(probe) => CheckOutcome::fail(
            &check_name,
            &probe,
            format!("service reported model \"{}\" instead", probe.value.model),
        ),
        Err(e) => CheckOutcome::from_error(&check_name, &e),
    }
}

/// POST /generate produces non-empty text within the token budget.
async fn text_generation(client: &ApiClient, settings: &CheckSettings) -> CheckOutcome {
    const NAME: &str = "text generation";
    let request = GenerateRequest {
        prompt: settings.prompt.clone(),
        temperature: Some(settings.temperature),
        max_tokens: Some(settings.max_tokens),
    };
    match client.generate(&request).await {
        Ok(probe) => {
            if probe.value.generated_text.is_empty() {
                CheckOutcome::fail(NAME, &probe, "generated text is empty".to_string())
            } else if !probe.value.within_token_budget() {
                CheckOutcome::fail(
                    NAME,
                    &probe,
                    format!(
                        "used {:?} tokens against a cap of {}",
                        probe.value.tokens_used, probe.value.max_tokens
                    ),
                )
            } else {
                CheckOutcome::pass(
                    NAME,
                    &probe,
                    format!(
                        "{} generated {} chars",
                        probe.value.model,
                        probe.value.generated_text.len()
                    ),
                )
            }
        }
        Err(e) => CheckOutcome::from_error(NAME, &e),
    }
}

/// POST /sentiment labels agree with the dominant score.
async fn sentiment(client: &ApiClient, text: &str) -> CheckOutcome {
    const NAME: &str = "sentiment";
    match client.sentiment(text).await {
        Ok(probe) if probe.value.is_coherent() => CheckOutcome::pass(
            NAME,
            &probe,
            format!(
                "labeled \"{}\" at confidence {:.2}",
                probe.value.sentiment, probe.value.confidence
            ),
        ),
        Ok(probe) => CheckOutcome::fail(
            NAME,
            &probe,
            format!(
                "label \"{}\" disagrees with scores (dominant: \"{}\")",
                probe.value.sentiment,
                probe.value.scores.dominant()
            ),
        ),
        Err(e) => CheckOutcome::from_error(NAME, &e),
    }
}

/// POST /classify confidence is a probability.
async fn classification(client: &ApiClient, input: &str) -> CheckOutcome {
    const NAME: &str = "classification";
    match client.classify(input).await {
        Ok(probe) if valid_confidence(probe.value.confidence) => CheckOutcome::pass(
            NAME,
            &probe,
            format!(
                "predicted \"{}\" at confidence {:.2}",
                probe.value.prediction, probe.value.confidence
            ),
        ),
        Ok(probe) => CheckOutcome::fail(
            NAME,
            &probe,
            format!("confidence {} outside [0, 1]", probe.value.confidence),
        ),
        Err(e) => CheckOutcome::from_error(NAME, &e),
    }
}
