//! Common test utilities for reputation report tests

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use reputation_report::{
    error::GatewayError,
    gateway::{AnalysisGateway, AnalysisRequest, BacklinkGateway, BacklinkRequest},
    types::{
        AnalysisResult, BacklinkProfile, BacklinkTotals, Competitor, Leader, PodcastOpportunity,
        PressOpportunity, ResearchBrief, Sentiment,
    },
    EngineSelection,
};
use reputation_report_sdk::ProgressState;

/// Acme with one leader and no competitors
pub fn acme_brief() -> ResearchBrief {
    ResearchBrief {
        company_name: "Acme".to_string(),
        leaders: vec![Leader {
            name: "Jane".to_string(),
            title: "CEO".to_string(),
        }],
        ..Default::default()
    }
}

/// Acme with a website, two leaders and two competitors
pub fn full_brief() -> ResearchBrief {
    ResearchBrief {
        company_name: "Acme".to_string(),
        website: Some("https://www.acme.com".to_string()),
        industry: Some("robotics".to_string()),
        keywords: Some("automation, warehouses".to_string()),
        leaders: vec![
            Leader {
                name: "Jane Doe".to_string(),
                title: "CEO".to_string(),
            },
            Leader {
                name: "Raj Patel".to_string(),
                title: "CTO".to_string(),
            },
        ],
        competitors: vec![
            Competitor {
                name: "Globex".to_string(),
                website: Some("globex.com".to_string()),
                leader: Some("Hank Scorpio".to_string()),
            },
            Competitor {
                name: "Initech".to_string(),
                website: Some("http://initech.io/about".to_string()),
                leader: None,
            },
        ],
    }
}

pub fn engines(list: &str) -> EngineSelection {
    EngineSelection::parse(list).unwrap()
}

/// A successful result with the given score and sentiment
pub fn success(summary: &str, score: f64, sentiment: Sentiment) -> AnalysisResult {
    AnalysisResult {
        summary: summary.to_string(),
        entity_found: true,
        confidence_score: Some(score),
        sentiment_score: None,
        sentiment,
        sources: Vec::new(),
        backlinks: Vec::new(),
        press_opportunities: vec![PressOpportunity {
            outlet: "TechCrunch".to_string(),
            angle: Some("Founder story".to_string()),
            url: None,
        }],
        podcast_opportunities: vec![PodcastOpportunity {
            show: "Robots Weekly".to_string(),
            host: Some("Sam".to_string()),
            rationale: None,
        }],
        recommendations: String::new(),
        error: false,
        error_message: None,
    }
}

pub fn profile(authority: u32, backlinks: u64) -> BacklinkProfile {
    BacklinkProfile {
        authority_score: Some(authority),
        totals: BacklinkTotals {
            backlinks,
            referring_domains: backlinks / 10,
            follow_links: backlinks / 2,
            nofollow_links: backlinks / 2,
        },
        top_backlinks: Vec::new(),
    }
}

/// How the scripted gateway behaves on a given call (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Script {
    Succeed,
    Fail,
    Hang,
    CancelThenHang,
}

/// Analysis gateway that records every request and follows a script
pub struct ScriptedAnalysis {
    pub calls: Mutex<Vec<AnalysisRequest>>,
    script: Box<dyn Fn(usize) -> Script + Send + Sync>,
    cancel: Option<CancellationToken>,
}

impl ScriptedAnalysis {
    pub fn succeeding() -> Self {
        Self::with_script(|_| Script::Succeed)
    }

    /// Fails only the given call
    pub fn failing_on(call: usize) -> Self {
        Self::with_script(move |n| if n == call { Script::Fail } else { Script::Succeed })
    }

    pub fn with_script(script: impl Fn(usize) -> Script + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Box::new(script),
            cancel: None,
        }
    }

    pub fn cancelling(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.query.clone())
            .collect()
    }
}

#[async_trait]
impl AnalysisGateway for ScriptedAnalysis {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, GatewayError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len()
        };

        match (self.script)(call) {
            Script::Succeed => Ok(success(
                &format!("{} via {}", request.analysis_type, request.engine_name),
                7.0,
                Sentiment::Positive,
            )),
            Script::Fail => Err(GatewayError::Provider("scripted failure".to_string())),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(GatewayError::Provider("should have timed out".to_string()))
            }
            Script::CancelThenHang => {
                if let Some(cancel) = &self.cancel {
                    cancel.cancel();
                }
                std::future::pending().await
            }
        }
    }
}

/// Backlink gateway keyed by domain; unknown domains fail
pub struct ScriptedBacklinks {
    pub domains: Mutex<Vec<String>>,
    known: Vec<(String, Option<BacklinkProfile>)>,
}

impl ScriptedBacklinks {
    pub fn new(known: Vec<(&str, Option<BacklinkProfile>)>) -> Self {
        Self {
            domains: Mutex::new(Vec::new()),
            known: known
                .into_iter()
                .map(|(d, p)| (d.to_string(), p))
                .collect(),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.domains.lock().unwrap().clone()
    }
}

#[async_trait]
impl BacklinkGateway for ScriptedBacklinks {
    async fn backlinks(
        &self,
        request: &BacklinkRequest,
    ) -> Result<Option<BacklinkProfile>, GatewayError> {
        self.domains.lock().unwrap().push(request.domain.clone());
        self.known
            .iter()
            .find(|(d, _)| *d == request.domain)
            .map(|(_, p)| p.clone())
            .ok_or_else(|| GatewayError::Status {
                status: 500,
                body: "upstream error".to_string(),
            })
    }
}

/// Observer that keeps every progress update
#[derive(Default)]
pub struct Recorder {
    pub states: Vec<ProgressState>,
}

impl Recorder {
    pub fn observe(&mut self) -> impl FnMut(&ProgressState) + '_ {
        move |state: &ProgressState| self.states.push(state.clone())
    }

    pub fn currents(&self) -> Vec<usize> {
        self.states.iter().map(|s| s.current).collect()
    }
}

/// Observer that discards progress
pub fn ignore(_: &ProgressState) {}
