//! Sequential execution of a task plan.
//!
//! Tasks run strictly one at a time in plan order. Before task `i`
//! (1-indexed) the observer receives `{i, total, description}`; the
//! observer sees the idle state when a run starts and when it ends.
//!
//! A failing analysis call is replaced by [`AnalysisResult::failed`] and the
//! run continues. A failing backlink call yields no profile. Only
//! cancellation or an inconsistent plan aborts the run.

use indexmap::IndexMap;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use reputation_report_sdk::{
    log_backlinks, log_task_complete, log_task_failed, log_task_start, ProgressState,
};

use crate::{
    domain::domain_from_website,
    error::{GatewayError, RunError},
    gateway::{AnalysisGateway, AnalysisRequest, BacklinkGateway, BacklinkRequest},
    planner::TaskPlan,
    types::{AnalysisResult, AnalysisTask, BacklinkProfile, ResearchBrief},
};

/// A planned task paired with the result it produced
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub task: AnalysisTask,
    pub result: AnalysisResult,
}

/// Receives progress updates from the executor
pub trait ProgressObserver {
    fn on_progress(&mut self, state: &ProgressState);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&ProgressState),
{
    fn on_progress(&mut self, state: &ProgressState) {
        self(state)
    }
}

/// Backlink lookups of one run, keyed by normalized domain.
///
/// A `None` entry records a lookup that found nothing or failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacklinkSet {
    by_domain: IndexMap<String, Option<BacklinkProfile>>,
}

impl BacklinkSet {
    pub fn insert(&mut self, domain: impl Into<String>, profile: Option<BacklinkProfile>) {
        self.by_domain.insert(domain.into(), profile);
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.by_domain.contains_key(domain)
    }

    pub fn for_domain(&self, domain: &str) -> Option<&BacklinkProfile> {
        self.by_domain.get(domain)?.as_ref()
    }

    /// Profile for a website value, normalized the same way lookups are
    pub fn for_website(&self, website: Option<&str>) -> Option<&BacklinkProfile> {
        let domain = domain_from_website(website?)?;
        self.for_domain(&domain)
    }

    /// Number of domains looked up
    pub fn len(&self) -> usize {
        self.by_domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_domain.is_empty()
    }
}

pub struct Executor<'a> {
    analysis: &'a dyn AnalysisGateway,
    backlinks: Option<&'a dyn BacklinkGateway>,
    call_timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl<'a> Executor<'a> {
    pub fn new(analysis: &'a dyn AnalysisGateway) -> Self {
        Self {
            analysis,
            backlinks: None,
            call_timeout: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_backlinks(mut self, backlinks: &'a dyn BacklinkGateway) -> Self {
        self.backlinks = Some(backlinks);
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Option<Duration>) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels this executor's runs
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute every task of `plan` in order
    pub async fn run(
        &self,
        plan: &TaskPlan,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Vec<TaskOutcome>, RunError> {
        if plan.tasks.len() != plan.total {
            return Err(RunError::Internal(format!(
                "plan holds {} tasks but reports {}",
                plan.tasks.len(),
                plan.total
            )));
        }

        observer.on_progress(&ProgressState::idle());
        let result = self.run_tasks(plan, observer).await;
        observer.on_progress(&ProgressState::idle());
        result
    }

    async fn run_tasks(
        &self,
        plan: &TaskPlan,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Vec<TaskOutcome>, RunError> {
        let total = plan.total;
        let mut outcomes = Vec::with_capacity(total);

        for (idx, task) in plan.tasks.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(RunError::Cancelled);
            }

            let current = idx + 1;
            let progress = ProgressState::new(current, total, task.describe());
            log_task_start!(progress);
            observer.on_progress(&progress);

            let request = AnalysisRequest::from(task);
            let result = match self.guard(self.analysis.analyze(&request)).await? {
                Ok(result) => {
                    log_task_complete!(current);
                    result
                }
                Err(e) => {
                    tracing::warn!(
                        task = current,
                        engine = %task.engine_id,
                        analysis_type = %task.analysis_type,
                        error = %e,
                        "Analysis failed, recording sentinel result"
                    );
                    log_task_failed!(current, e);
                    AnalysisResult::failed(e.to_string())
                }
            };

            outcomes.push(TaskOutcome {
                task: task.clone(),
                result,
            });
        }

        Ok(outcomes)
    }

    /// Look up backlinks for the company website and each named competitor's
    /// website. Each distinct domain is requested at most once.
    pub async fn fetch_backlinks(&self, brief: &ResearchBrief) -> Result<BacklinkSet, RunError> {
        let mut set = BacklinkSet::default();
        let Some(gateway) = self.backlinks else {
            return Ok(set);
        };

        let websites = std::iter::once(brief.website.as_deref()).chain(
            brief
                .named_competitors()
                .map(|(_, competitor)| competitor.website.as_deref()),
        );

        for website in websites.flatten() {
            let Some(domain) = domain_from_website(website) else {
                continue;
            };
            if set.contains(&domain) {
                continue;
            }
            if self.cancel.is_cancelled() {
                return Err(RunError::Cancelled);
            }

            let request = BacklinkRequest::new(domain.clone());
            let profile = match self.guard(gateway.backlinks(&request)).await? {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::warn!(domain = %domain, error = %e, "Backlink lookup failed");
                    None
                }
            };
            log_backlinks!(domain, profile.is_some());
            set.insert(domain, profile);
        }

        Ok(set)
    }

    /// Bound a gateway call by the configured timeout and race it against
    /// cancellation. The outer error is cancellation, the inner one the call.
    async fn guard<T, F>(&self, call: F) -> Result<Result<T, GatewayError>, RunError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        let bounded = async {
            match self.call_timeout {
                Some(limit) => tokio::time::timeout(limit, call)
                    .await
                    .unwrap_or_else(|_| Err(GatewayError::Timeout(limit))),
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RunError::Cancelled),
            result = bounded => Ok(result),
        }
    }
}
