//! Mirage library exports for testing

use clap::ValueEnum;

pub mod api;
pub mod core;

#[cfg(test)]
pub mod test_support;

/// Selects a single API surface when running checks with `--only`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EndpointKind {
    Status,
    Generate,
    Predict,
    Models,
    Sentiment,
    Classify,
}
