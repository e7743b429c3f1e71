//! Handing finished reports to export collaborators.
//!
//! The [`Report`] is the whole contract: exporters and delivery transports
//! read it as-is and must treat every optional section as possibly absent.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{
    aggregator::{average_score, majority_sentiment},
    config::OutputFormat,
    engines::EngineRegistry,
    error::ExportError,
    types::{AnalysisResult, BacklinkProfile, EngineResults, Report},
};

/// Writes a report somewhere and returns the paths it produced
#[async_trait]
pub trait ReportExporter: Send + Sync {
    async fn export(&self, report: &Report) -> Result<Vec<PathBuf>, ExportError>;
}

/// Exports a report to files in a directory
#[derive(Debug, Clone)]
pub struct FileExporter {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Also write `<stem>.md`
    pub markdown: bool,
}

impl FileExporter {
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
            markdown: false,
        }
    }

    pub fn with_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }
}

#[async_trait]
impl ReportExporter for FileExporter {
    async fn export(&self, report: &Report) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(&self.output_dir).await?;

        let stem = file_stem(report);
        let mut written = Vec::new();

        let path = self
            .output_dir
            .join(format!("{}.{}", stem, self.format.extension()));
        let body = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)?,
            OutputFormat::Yaml => serde_yaml::to_string(report)?,
        };
        fs::write(&path, body).await?;
        written.push(path);

        if self.markdown {
            let path = self.output_dir.join(format!("{}.md", stem));
            fs::write(&path, render_markdown(report)).await?;
            written.push(path);
        }

        Ok(written)
    }
}

/// `reputation_report_<company-slug>_<YYYYmmdd_HHMMSS>`
pub fn file_stem(report: &Report) -> String {
    format!(
        "reputation_report_{}_{}",
        slug(&report.company_name),
        report.generated_at.format("%Y%m%d_%H%M%S")
    )
}

fn slug(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    let out = out.trim_end_matches('-').to_string();
    if out.is_empty() {
        "company".to_string()
    } else {
        out
    }
}

/// Load a report previously written by [`FileExporter`]
pub async fn load_report(path: &Path) -> Result<Report, ExportError> {
    let content = fs::read_to_string(path).await?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        _ => Ok(serde_json::from_str(&content)?),
    }
}

// ============================================================================
// Markdown rendering
// ============================================================================

/// Human-readable summary of a report
pub fn render_markdown(report: &Report) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Reputation Report: {}\n\n", report.company_name));
    md.push_str(&format!(
        "Generated: {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    if let Some(website) = &report.website {
        md.push_str(&format!("Website: {}\n", website));
    }
    if let Some(industry) = &report.industry {
        md.push_str(&format!("Industry: {}\n", industry));
    }
    md.push('\n');

    md.push_str("## Company\n");
    render_engine_table(&mut md, &report.company);
    if let Some(profile) = &report.backlink_profile {
        render_backlinks(&mut md, profile);
    }

    if !report.leadership.is_empty() {
        md.push_str("## Leadership\n");
        for leader in &report.leadership {
            if leader.title.is_empty() {
                md.push_str(&format!("### {}\n", leader.name));
            } else {
                md.push_str(&format!("### {} ({})\n", leader.name, leader.title));
            }
            render_engine_table(&mut md, &leader.by_engine);

            let press: Vec<String> = leader
                .press_opportunities
                .values()
                .flat_map(|r| r.press_opportunities.iter())
                .map(|p| match &p.angle {
                    Some(angle) => format!("{}: {}", p.outlet, angle),
                    None => p.outlet.clone(),
                })
                .collect();
            if !press.is_empty() {
                md.push_str("Press opportunities:\n");
                for item in press {
                    md.push_str(&format!("- {}\n", item));
                }
                md.push('\n');
            }

            if !leader.social_sentiment.is_empty() {
                md.push_str(&format!(
                    "Social sentiment: {}\n\n",
                    majority_sentiment(&leader.social_sentiment)
                ));
            }
        }
    }

    let podcasts: Vec<String> = report
        .podcast_opportunities
        .iter()
        .flat_map(|p| p.result.podcast_opportunities.iter())
        .map(|p| match &p.host {
            Some(host) => format!("{} (host: {})", p.show, host),
            None => p.show.clone(),
        })
        .collect();
    if !podcasts.is_empty() {
        md.push_str("## Podcast Opportunities\n");
        for item in podcasts {
            md.push_str(&format!("- {}\n", item));
        }
        md.push('\n');
    }

    if !report.competitors.is_empty() {
        md.push_str("## Competitors\n");
        for competitor in &report.competitors {
            match &competitor.website {
                Some(website) => {
                    md.push_str(&format!("### {} ({})\n", competitor.name, website));
                }
                None => md.push_str(&format!("### {}\n", competitor.name)),
            }
            render_engine_table(&mut md, &competitor.by_engine);
            if let Some(profile) = &competitor.backlink_profile {
                render_backlinks(&mut md, profile);
            }
        }
    }

    md
}

fn render_engine_table(md: &mut String, by_engine: &EngineResults) {
    if by_engine.is_empty() {
        md.push_str("_No results._\n\n");
        return;
    }

    md.push_str(&format!(
        "Average score: {:.1} / 10, majority sentiment: {}\n\n",
        average_score(by_engine),
        majority_sentiment(by_engine)
    ));
    md.push_str("| Engine | Score | Sentiment | Summary |\n");
    md.push_str("| --- | --- | --- | --- |\n");
    for (engine_id, result) in by_engine {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            EngineRegistry::display_name(engine_id),
            score_cell(result),
            result.sentiment,
            summary_cell(result)
        ));
    }
    md.push('\n');
}

fn score_cell(result: &AnalysisResult) -> String {
    match result.score() {
        Some(score) if !result.error => format!("{:.1}", score),
        _ => "-".to_string(),
    }
}

fn summary_cell(result: &AnalysisResult) -> String {
    if result.error {
        let reason = result.error_message.as_deref().unwrap_or("unknown error");
        return format!("**Error:** {}", reason.replace('|', "/"));
    }
    result.summary.replace('\n', " ").replace('|', "/")
}

fn render_backlinks(md: &mut String, profile: &BacklinkProfile) {
    md.push_str("Backlinks:\n");
    if let Some(score) = profile.authority_score {
        md.push_str(&format!("- Authority score: {}\n", score));
    }
    md.push_str(&format!(
        "- {} backlinks from {} referring domains ({} follow, {} nofollow)\n",
        profile.totals.backlinks,
        profile.totals.referring_domains,
        profile.totals.follow_links,
        profile.totals.nofollow_links
    ));
    for link in profile.top_backlinks.iter().take(5) {
        md.push_str(&format!("  - [{}] {}\n", link.authority_score, link.source_url));
    }
    md.push('\n');
}

// ============================================================================
// Delivery
// ============================================================================

/// Request to deliver a report to a person
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub recipient_name: String,
    pub recipient_company: String,
    pub recipient_email: String,
    pub report: Report,
}

impl DeliveryRequest {
    /// Check recipient fields before handing the request to a transport
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.recipient_name.trim().is_empty() {
            return Err(ExportError::InvalidRecipient("name is required".to_string()));
        }
        if self.recipient_company.trim().is_empty() {
            return Err(ExportError::InvalidRecipient(
                "company is required".to_string(),
            ));
        }
        if !is_email_shaped(self.recipient_email.trim()) {
            return Err(ExportError::InvalidRecipient(format!(
                "'{}' is not an email address",
                self.recipient_email
            )));
        }
        Ok(())
    }
}

fn is_email_shaped(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Transport that lays out and sends a report (email, webhook, ...)
#[async_trait]
pub trait ReportDelivery: Send + Sync {
    async fn deliver(&self, request: &DeliveryRequest) -> Result<(), ExportError>;
}
