//! Runtime configuration for report runs.
//!
//! Secrets come from the environment (`.env` is loaded by the binary);
//! everything else can be overridden on the command line.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::gateway::openai::{DEFAULT_ENDPOINT, DEFAULT_MODEL};

/// Serialization format of the saved report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Chat completions endpoint used by the analysis gateway
    pub analysis_endpoint: String,
    pub analysis_model: String,
    pub openai_api_key: Option<String>,
    /// Backlink enrichment is skipped when unset
    pub semrush_api_key: Option<String>,
    /// Upper bound for every gateway call; unbounded when `None`
    pub call_timeout: Option<Duration>,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Also write a Markdown rendering next to the report
    pub markdown: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            analysis_endpoint: DEFAULT_ENDPOINT.to_string(),
            analysis_model: DEFAULT_MODEL.to_string(),
            openai_api_key: None,
            semrush_api_key: None,
            call_timeout: None,
            output_dir: PathBuf::from("./REPORTS"),
            format: OutputFormat::Json,
            markdown: false,
        }
    }
}

impl ReportConfig {
    /// Defaults overlaid with `OPENAI_API_KEY`, `OPENAI_ENDPOINT`,
    /// `OPENAI_MODEL` and `SEMRUSH_API_KEY`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (blank values are ignored)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            analysis_endpoint: var("OPENAI_ENDPOINT").unwrap_or(defaults.analysis_endpoint),
            analysis_model: var("OPENAI_MODEL").unwrap_or(defaults.analysis_model),
            openai_api_key: var("OPENAI_API_KEY"),
            semrush_api_key: var("SEMRUSH_API_KEY"),
            ..defaults
        }
    }

    pub fn backlinks_enabled(&self) -> bool {
        self.semrush_api_key.is_some()
    }
}
