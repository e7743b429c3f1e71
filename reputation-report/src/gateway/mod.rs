//! External collaborators the executor calls.
//!
//! - [`AnalysisGateway`] answers one rendered query for one engine
//! - [`BacklinkGateway`] returns authority metrics for a domain
//!
//! Implementations report failures as [`GatewayError`]; recovering from
//! them is the executor's job.

pub mod decode;
pub mod openai;
pub mod semrush;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::GatewayError,
    types::{AnalysisResult, AnalysisTask, AnalysisType, BacklinkProfile},
};

pub use openai::OpenAiAnalysisGateway;
pub use semrush::SemrushBacklinkGateway;

/// Input of one analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub query: String,
    pub engine_name: String,
    pub analysis_type: AnalysisType,
}

impl From<&AnalysisTask> for AnalysisRequest {
    fn from(task: &AnalysisTask) -> Self {
        Self {
            query: task.query.clone(),
            engine_name: task.engine_name().to_string(),
            analysis_type: task.analysis_type,
        }
    }
}

/// Which links a backlink lookup covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BacklinkScope {
    #[default]
    All,
}

/// Input of one backlink call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklinkRequest {
    pub domain: String,
    pub scope: BacklinkScope,
}

impl BacklinkRequest {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            scope: BacklinkScope::All,
        }
    }
}

#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, GatewayError>;
}

#[async_trait]
pub trait BacklinkGateway: Send + Sync {
    /// `Ok(None)` means the provider has no data for the domain
    async fn backlinks(
        &self,
        request: &BacklinkRequest,
    ) -> Result<Option<BacklinkProfile>, GatewayError>;
}
