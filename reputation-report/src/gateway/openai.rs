//! Analysis gateway backed by an OpenAI-compatible chat completions API.
//!
//! The model is asked to answer the way the named engine would, and to
//! reply with a single JSON object that [`decode_analysis`] accepts.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::{decode::decode_analysis, AnalysisGateway, AnalysisRequest};
use crate::{
    config::ReportConfig,
    error::GatewayError,
    types::{AnalysisResult, AnalysisType},
};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub struct OpenAiAnalysisGateway {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl OpenAiAnalysisGateway {
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            tracing::warn!("Analysis gateway created without API key");
        }
        Self {
            client: Client::new(),
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.openai_api_key.clone())
            .with_endpoint(config.analysis_endpoint.clone())
            .with_model(config.analysis_model.clone())
    }

    /// Use a custom endpoint (proxies, Azure, local servers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn request_body(&self, request: &AnalysisRequest) -> serde_json::Value {
        json!({
            "model": self.model,
            "temperature": 0.3,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system_prompt(request) },
                { "role": "user", "content": request.query },
            ]
        })
    }
}

#[async_trait]
impl AnalysisGateway for OpenAiAnalysisGateway {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;

        tracing::debug!(
            engine = %request.engine_name,
            analysis_type = %request.analysis_type,
            "Sending analysis request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| GatewayError::Decode("response has no message content".to_string()))?;

        decode_analysis(content)
    }
}

/// System prompt for one simulated engine and analysis type
pub fn system_prompt(request: &AnalysisRequest) -> String {
    format!(
        "You are simulating the answer engine {engine}. Answer the user's question the way \
{engine} would, based on what is publicly known. {focus}\n\n\
Reply with a single JSON object and nothing else, using these fields:\n\
- summary (string, required)\n\
- entityFound (boolean): whether {engine} recognizes the entity\n\
- confidenceScore (number 0-10): how confidently {engine} can describe it\n\
- sentimentScore (number 0-10): 0 very negative, 10 very positive\n\
- sentiment (\"positive\" | \"neutral\" | \"negative\")\n\
- sources (array of {{title, url}})\n\
- backlinks (array of {{url, context}})\n\
- pressOpportunities (array of {{outlet, angle, url}})\n\
- podcastOpportunities (array of {{show, host, rationale}})\n\
- recommendations (string)\n\
Use empty arrays when you have nothing for a list.",
        engine = request.engine_name,
        focus = focus(request.analysis_type),
    )
}

fn focus(analysis_type: AnalysisType) -> &'static str {
    match analysis_type {
        AnalysisType::Entity => {
            "Focus on how the company is described, cited, and perceived."
        }
        AnalysisType::Leadership => {
            "Focus on the person's professional reputation and visibility."
        }
        AnalysisType::Press => {
            "Focus on concrete media outlets and story angles; fill pressOpportunities."
        }
        AnalysisType::Social => {
            "Focus on social media discussion and its tone; set sentiment carefully."
        }
        AnalysisType::Podcast => {
            "Focus on podcasts that fit the company's leaders; fill podcastOpportunities."
        }
        AnalysisType::Competitor => {
            "Focus on the competitor's reputation and positioning relative to the company."
        }
    }
}
