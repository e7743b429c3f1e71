//! Workflow orchestration for reputation report runs
//!
//! [`generate_report`] is the typed core: plan, execute, enrich, fold.
//! [`run_reputation_workflow`] wraps it for the CLI: it loads the brief,
//! builds the gateways from configuration, wires Ctrl-C to cancellation,
//! and saves the report.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use reputation_report_sdk::{
    log_file_saved, log_info, log_progress, log_report_saved, log_run_complete, log_run_failed,
    log_run_start, log_warning, ProgressState, RunHandle,
};

use crate::{
    aggregator::ResultAggregator,
    config::ReportConfig,
    engines::EngineSelection,
    error::RunError,
    executor::{Executor, ProgressObserver},
    export::{FileExporter, ReportExporter},
    gateway::{BacklinkGateway, OpenAiAnalysisGateway, SemrushBacklinkGateway},
    planner,
    types::{Report, ResearchBrief},
};

/// Configuration for one CLI run
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Brief file (YAML or JSON)
    pub brief_path: PathBuf,
    /// Comma-separated engine ids
    pub engines: String,
    pub report: ReportConfig,
}

/// Cancels a run's token on Ctrl-C while the run is in flight
struct InterruptListener {
    handle: JoinHandle<()>,
}

impl InterruptListener {
    fn spawn(cancel: CancellationToken) -> Self {
        let handle = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, cancelling run");
                cancel.cancel();
            }
        });
        Self { handle }
    }

    /// Stop listening; returns the aborted task
    fn stop(self) -> JoinHandle<()> {
        self.handle.abort();
        self.handle
    }
}

/// Produce a report for `brief` using `executor`.
///
/// Fails before any gateway call when the brief or engine selection is
/// invalid. Any error leaves no report behind.
pub async fn generate_report(
    brief: &ResearchBrief,
    engines: &EngineSelection,
    executor: &Executor<'_>,
    observer: &mut dyn ProgressObserver,
) -> Result<Report, RunError> {
    let handle = RunHandle::new();
    let plan = planner::plan(brief, engines)?;

    tracing::info!(
        run_id = %handle.id,
        company = %brief.company(),
        engines = engines.len(),
        total = plan.total,
        "Starting report run"
    );
    log_run_start!(handle.id, brief.company(), plan.total);

    let result = async {
        let outcomes = executor.run(&plan, observer).await?;
        let backlinks = executor.fetch_backlinks(brief).await?;
        ResultAggregator::new(handle.id).fold(brief, outcomes, &backlinks)
    }
    .await;

    match &result {
        Ok(report) => {
            let failed = report.failed_count();
            tracing::info!(run_id = %handle.id, failed, "Report run completed");
            log_run_complete!(handle.id, failed);
        }
        Err(e) => {
            tracing::error!(run_id = %handle.id, error = %e, "Report run aborted");
            log_run_failed!(handle.id, e);
        }
    }

    result
}

/// Read a brief from a YAML or JSON file
pub async fn load_brief(path: &Path) -> Result<ResearchBrief> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read brief file: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse brief from: {}", path.display()))
}

/// Run the complete workflow and return the report with the files written
pub async fn run_reputation_workflow(config: WorkflowConfig) -> Result<(Report, Vec<PathBuf>)> {
    let engines = EngineSelection::parse(&config.engines)?;
    let brief = load_brief(&config.brief_path).await?;

    let analysis = OpenAiAnalysisGateway::from_config(&config.report);
    let backlinks: Option<SemrushBacklinkGateway> = config
        .report
        .semrush_api_key
        .as_ref()
        .map(SemrushBacklinkGateway::new);
    if backlinks.is_none() {
        log_warning!("SEMRUSH_API_KEY not set, backlink enrichment disabled");
    }

    let mut executor = Executor::new(&analysis).with_call_timeout(config.report.call_timeout);
    if let Some(gateway) = &backlinks {
        executor = executor.with_backlinks(gateway as &dyn BacklinkGateway);
    }

    let interrupt = InterruptListener::spawn(executor.cancellation_token());

    log_info!(
        "Researching {} across {} engine(s)",
        brief.company(),
        engines.len()
    );
    let mut observer = |state: &ProgressState| {
        if !state.is_idle() {
            log_progress!(state.current, state.total, state.message);
        }
    };

    let report = generate_report(&brief, &engines, &executor, &mut observer).await;
    interrupt.stop();
    let report = report.context("Report run failed")?;

    let exporter = FileExporter::new(&config.report.output_dir, config.report.format)
        .with_markdown(config.report.markdown);
    let paths = exporter
        .export(&report)
        .await
        .with_context(|| {
            format!(
                "Failed to save report to {}",
                config.report.output_dir.display()
            )
        })?;

    for path in &paths {
        log_file_saved!(path.display());
        log_report_saved!(path.display());
    }

    if report.failed_count() > 0 {
        log_warning!(
            "{} of {} analyses failed",
            report.failed_count(),
            report.result_count()
        );
    }

    Ok((report, paths))
}
