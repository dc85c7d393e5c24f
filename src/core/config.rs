//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults -> config file -> env vars -> CLI flags.
//!
//! Config lives at `~/.mirage/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MirageConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub checks: ChecksConfig,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChecksConfig {
    pub sla_ms: Option<u64>,
    pub prompt: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub sample_text: Option<String>,
    pub classify_input: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelEntry {
    pub name: String,
    pub description: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";
pub const DEFAULT_SLA_MS: u64 = 2000;
pub const DEFAULT_PROMPT: &str = "What is machine learning?";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 100;
pub const DEFAULT_SAMPLE_TEXT: &str = "This product is amazing!";

/// Models probed by the availability check when none are configured.
const DEFAULT_MODELS: &[&str] = &["gpt-4", "gpt-3.5-turbo"];

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub sla_ms: u64,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub sample_text: String,
    pub classify_input: String,
    pub models: Vec<ModelEntry>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.mirage/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".mirage").join("config.toml"))
}

/// Load config from `~/.mirage/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MirageConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<MirageConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(MirageConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(MirageConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit path (the `--config` flag). The file must
/// exist; no default is generated here.
pub fn load_config_from(path: &Path) -> Result<MirageConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: MirageConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Mirage Configuration
# All settings are optional - defaults are used for anything not specified.
# Override hierarchy: defaults -> this file -> env vars -> CLI flags.

# [api]
# base_url = "http://localhost:8080/v1"  # Or set MIRAGE_BASE_URL env var
# api_key = "sk-..."                     # Or set MIRAGE_API_KEY env var

# [checks]
# sla_ms = 2000                          # Latency budget for /predict
# prompt = "What is machine learning?"
# temperature = 0.7
# max_tokens = 100
# sample_text = "This product is amazing!"
# classify_input = "This product is amazing!"

# [[models]]
# name = "gpt-4"
# description = "Primary generation model"

# [[models]]
# name = "gpt-3.5-turbo"
# description = "Fallback model"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults -> config file -> env
/// vars -> CLI.
///
/// `cli_base_url` comes from the `--base-url` flag (None = not specified).
pub fn resolve(config: &MirageConfig, cli_base_url: Option<&str>) -> ResolvedConfig {
    // Base URL: CLI -> env -> config -> default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("MIRAGE_BASE_URL").ok())
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // API key: env -> config (no default; unauthenticated probing is valid)
    let api_key = std::env::var("MIRAGE_API_KEY")
        .ok()
        .or_else(|| config.api.api_key.clone());

    let sample_text = config
        .checks
        .sample_text
        .clone()
        .unwrap_or_else(|| DEFAULT_SAMPLE_TEXT.to_string());

    // Classify input falls back to the sentiment sample text
    let classify_input = config
        .checks
        .classify_input
        .clone()
        .unwrap_or_else(|| sample_text.clone());

    let models = if config.models.is_empty() {
        DEFAULT_MODELS
            .iter()
            .map(|name| ModelEntry {
                name: name.to_string(),
                description: None,
            })
            .collect()
    } else {
        config.models.clone()
    };

    ResolvedConfig {
        base_url,
        api_key,
        sla_ms: config.checks.sla_ms.unwrap_or(DEFAULT_SLA_MS),
        prompt: config
            .checks
            .prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
        temperature: config.checks.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: config.checks.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        sample_text,
        classify_input,
        models,
    }
}
