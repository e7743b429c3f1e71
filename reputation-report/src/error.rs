//! Error taxonomy for report runs.
//!
//! Validation problems surface as [`PlanError`] before any task runs.
//! Gateway failures ([`GatewayError`]) never escape the executor: analysis
//! failures become sentinel results and backlink failures become `None`.
//! Anything that aborts a run is a [`RunError`], and an aborted run yields
//! no report.

use std::time::Duration;
use thiserror::Error;

/// Brief or engine selection rejected before planning
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid brief: {0}")]
    InvalidBrief(String),
}

/// Failure of a single external gateway call
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode provider response: {0}")]
    Decode(String),

    #[error("Gateway call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Gateway not configured: {0}")]
    NotConfigured(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// Terminal failure of a whole run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Run cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure while exporting or handing off a finished report
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialize(e.to_string())
    }
}

impl From<serde_yaml::Error> for ExportError {
    fn from(e: serde_yaml::Error) -> Self {
        ExportError::Serialize(e.to_string())
    }
}
