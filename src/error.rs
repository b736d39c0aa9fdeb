use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single live rate fetch. Every variant is recovered by the
/// converter with the fallback table.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("Request error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: {status} for base currency: {base}")]
    Status { status: StatusCode, base: String },
    #[error("Failed to parse JSON response for {base}: {reason}")]
    Parse { base: String, reason: String },
    #[error("API Error: {0}")]
    Provider(String),
    #[error("Invalid provider URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failure of a conversion, reported to clients as a failed result body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Could not find conversion rate")]
    RateNotFound,
}
