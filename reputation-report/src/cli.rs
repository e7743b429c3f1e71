//! CLI argument definitions for the reputation report workflow.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::{
    config::{OutputFormat, ReportConfig},
    engines::EngineSelection,
    workflow::WorkflowConfig,
};

/// Multi-engine reputation report generator
///
/// Runs one query per engine, target, and analysis type against an
/// AI analysis provider, enriches the result with backlink metrics, and
/// writes a single nested report.
#[derive(Parser, Debug, Clone)]
#[command(name = "reputation-report")]
#[command(about = "Multi-engine reputation report generator")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a report from a brief file
    Run(RunArgs),
    /// List available engines
    Engines,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to the research brief (YAML or JSON)
    #[arg(long, value_name = "PATH")]
    pub brief: PathBuf,

    /// Comma-separated engine ids, in execution order
    #[arg(long, value_name = "IDS", default_value = "chatgpt")]
    pub engines: String,

    /// Directory for the saved report
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report file format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Also write a Markdown rendering of the report
    #[arg(long)]
    pub markdown: bool,

    /// Abandon any single gateway call after this many seconds
    #[arg(long, value_name = "SECS")]
    pub call_timeout_secs: Option<u64>,

    /// Skip backlink enrichment even when SEMRUSH_API_KEY is set
    #[arg(long)]
    pub no_backlinks: bool,
}

impl RunArgs {
    /// Validate arguments before any file or network access
    pub fn validate(&self) -> Result<()> {
        let engines = EngineSelection::parse(&self.engines)?;
        if engines.is_empty() {
            anyhow::bail!("--engines must name at least one engine");
        }
        if self.call_timeout_secs == Some(0) {
            anyhow::bail!("--call-timeout-secs must be greater than zero");
        }
        Ok(())
    }

    /// Overlay these arguments on `base`
    pub fn into_config(self, base: ReportConfig) -> WorkflowConfig {
        let mut report = base;
        if let Some(dir) = self.output_dir {
            report.output_dir = dir;
        }
        report.format = self.format;
        report.markdown = self.markdown;
        if let Some(secs) = self.call_timeout_secs {
            report.call_timeout = Some(Duration::from_secs(secs));
        }
        if self.no_backlinks {
            report.semrush_api_key = None;
        }

        WorkflowConfig {
            brief_path: self.brief,
            engines: self.engines,
            report,
        }
    }
}

impl From<RunArgs> for WorkflowConfig {
    fn from(args: RunArgs) -> Self {
        args.into_config(ReportConfig::from_env())
    }
}
