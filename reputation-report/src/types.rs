//! Data structures for reputation report runs
//!
//! Inputs ([`ResearchBrief`]), units of work ([`AnalysisTask`]), gateway
//! outputs ([`AnalysisResult`], [`BacklinkProfile`]) and the final nested
//! [`Report`]. Field names serialize in camelCase, which is the shape
//! rendering and export collaborators consume.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::engines::{EngineId, EngineRegistry};

// ============================================================================
// Research Brief
// ============================================================================

/// A company leader to research
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leader {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub title: String,
}

/// A competitor to compare against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Name of the competitor's leader, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<String>,
}

/// Operator input describing what to research
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchBrief {
    #[serde(default)]
    pub company_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Free-form keyword hints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    #[serde(default)]
    pub leaders: Vec<Leader>,

    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

/// Trimmed value of an optional text field, `None` when blank
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ResearchBrief {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            ..Default::default()
        }
    }

    pub fn company(&self) -> &str {
        self.company_name.trim()
    }

    /// Leaders with a non-blank name, paired with their position in the brief
    pub fn named_leaders(&self) -> impl Iterator<Item = (usize, &Leader)> {
        self.leaders
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.name.trim().is_empty())
    }

    /// Competitors with a non-blank name, paired with their position in the brief
    pub fn named_competitors(&self) -> impl Iterator<Item = (usize, &Competitor)> {
        self.competitors
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.name.trim().is_empty())
    }
}

// ============================================================================
// Analysis Tasks
// ============================================================================

/// Kind of entity a task analyzes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Company,
    Leader,
    Competitor,
}

/// Which question a task asks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Entity,
    Leadership,
    Press,
    Social,
    Podcast,
    Competitor,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Entity => "entity",
            AnalysisType::Leadership => "leadership",
            AnalysisType::Press => "press",
            AnalysisType::Social => "social",
            AnalysisType::Podcast => "podcast",
            AnalysisType::Competitor => "competitor",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entity a task is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TargetRef {
    Company { name: String },
    /// `index` is the leader's position in the brief
    Leader { index: usize, name: String },
    /// `index` is the competitor's position in the brief
    Competitor { index: usize, name: String },
}

impl TargetRef {
    pub fn kind(&self) -> TargetKind {
        match self {
            TargetRef::Company { .. } => TargetKind::Company,
            TargetRef::Leader { .. } => TargetKind::Leader,
            TargetRef::Competitor { .. } => TargetKind::Competitor,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TargetRef::Company { name }
            | TargetRef::Leader { name, .. }
            | TargetRef::Competitor { name, .. } => name,
        }
    }
}

/// One rendered query against one engine for one target.
///
/// Built by the planner and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisTask {
    pub target: TargetRef,
    pub engine_id: EngineId,
    pub analysis_type: AnalysisType,
    pub query: String,
}

impl AnalysisTask {
    pub fn target_kind(&self) -> TargetKind {
        self.target.kind()
    }

    pub fn engine_name(&self) -> &str {
        EngineRegistry::display_name(&self.engine_id)
    }

    /// Human-readable progress line for this task
    pub fn describe(&self) -> String {
        let name = self.target.name();
        let engine = self.engine_name();
        match self.analysis_type {
            AnalysisType::Entity => format!("Analyzing {} on {}", name, engine),
            AnalysisType::Leadership => format!("Analyzing {}'s reputation on {}", name, engine),
            AnalysisType::Press => {
                format!("Finding press opportunities for {} on {}", name, engine)
            }
            AnalysisType::Social => format!("Checking social sentiment for {} on {}", name, engine),
            AnalysisType::Podcast => {
                format!("Finding podcast opportunities for {} on {}", name, engine)
            }
            AnalysisType::Competitor => format!("Analyzing competitor {} on {}", name, engine),
        }
    }
}

// ============================================================================
// Analysis Results
// ============================================================================

/// Overall tone reported for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    #[default]
    Unknown,
}

impl Sentiment {
    /// Case-insensitive parse; anything unrecognized is `Unknown`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "neutral" => Sentiment::Neutral,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Unknown => "unknown",
        }
    }
}

impl From<String> for Sentiment {
    fn from(value: String) -> Self {
        Sentiment::parse(&value)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source an engine cited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A page an engine reports as linking to or mentioning the entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklinkMention {
    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// A suggested media outlet or story angle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressOpportunity {
    #[serde(default)]
    pub outlet: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A suggested podcast appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastOpportunity {
    #[serde(default)]
    pub show: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Outcome of one analysis task.
///
/// Produced exactly once per task. Failed tasks get [`AnalysisResult::failed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub summary: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_found: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sentiment: Sentiment,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<Source>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub backlinks: Vec<BacklinkMention>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub press_opportunities: Vec<PressOpportunity>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub podcast_opportunities: Vec<PodcastOpportunity>,

    #[serde(default, deserialize_with = "string_or_list")]
    pub recommendations: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub error: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AnalysisResult {
    /// Sentinel recorded in place of a failed task
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            summary: String::new(),
            entity_found: false,
            confidence_score: Some(0.0),
            sentiment_score: Some(0.0),
            sentiment: Sentiment::Unknown,
            sources: Vec::new(),
            backlinks: Vec::new(),
            press_opportunities: Vec::new(),
            podcast_opportunities: Vec::new(),
            recommendations: "Analysis failed".to_string(),
            error: true,
            error_message: Some(message.into()),
        }
    }

    /// Confidence score, or sentiment score when confidence is absent
    pub fn score(&self) -> Option<f64> {
        self.confidence_score.or(self.sentiment_score)
    }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `recommendations` as either a string or a list of strings
fn string_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) => s,
        StringOrList::Many(items) => items.join("\n"),
        StringOrList::Nothing(()) => String::new(),
    })
}

// ============================================================================
// Backlink Profiles
// ============================================================================

/// Link totals for a domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklinkTotals {
    pub backlinks: u64,
    pub referring_domains: u64,
    pub follow_links: u64,
    pub nofollow_links: u64,
}

/// One linking page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBacklink {
    pub source_url: String,
    pub authority_score: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

/// Authority metrics for a domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklinkProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority_score: Option<u32>,

    pub totals: BacklinkTotals,

    /// Highest-authority linking pages first
    #[serde(default)]
    pub top_backlinks: Vec<TopBacklink>,
}

// ============================================================================
// Report
// ============================================================================

/// Results keyed by engine, in engine-selection order
pub type EngineResults = IndexMap<EngineId, AnalysisResult>;

/// Results for one leader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderReport {
    pub name: String,
    pub title: String,
    pub by_engine: EngineResults,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub press_opportunities: EngineResults,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub social_sentiment: EngineResults,
}

/// Results for one competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorReport {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    pub by_engine: EngineResults,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backlink_profile: Option<BacklinkProfile>,
}

/// Podcast suggestions from one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastFinding {
    pub engine_id: EngineId,
    pub result: AnalysisResult,
}

/// Final aggregate of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub company_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    pub company: EngineResults,

    #[serde(default)]
    pub leadership: Vec<LeaderReport>,

    #[serde(default)]
    pub competitors: Vec<CompetitorReport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backlink_profile: Option<BacklinkProfile>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub podcast_opportunities: Vec<PodcastFinding>,
}

impl Report {
    /// All analysis results held by the report, in report order
    pub fn results(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.company
            .values()
            .chain(self.leadership.iter().flat_map(|l| {
                l.by_engine
                    .values()
                    .chain(l.press_opportunities.values())
                    .chain(l.social_sentiment.values())
            }))
            .chain(self.podcast_opportunities.iter().map(|p| &p.result))
            .chain(self.competitors.iter().flat_map(|c| c.by_engine.values()))
    }

    /// Number of analysis results; equals the number of executed tasks
    pub fn result_count(&self) -> usize {
        self.results().count()
    }

    pub fn failed_count(&self) -> usize {
        self.results().filter(|r| r.error).count()
    }
}
