//! Backlink gateway backed by the Semrush backlinks API.
//!
//! Semrush answers with semicolon-separated tables: a header row followed
//! by data rows. `ERROR 50 :: NOTHING FOUND` means the domain is unknown.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;

use super::{BacklinkGateway, BacklinkRequest, BacklinkScope};
use crate::{
    error::GatewayError,
    types::{BacklinkProfile, BacklinkTotals, TopBacklink},
};

pub const DEFAULT_BASE_URL: &str = "https://api.semrush.com/analytics/v1/";
const TOP_BACKLINKS_LIMIT: usize = 10;

pub struct SemrushBacklinkGateway {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SemrushBacklinkGateway {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_table(
        &self,
        report_type: &str,
        request: &BacklinkRequest,
        columns: &str,
        extra: &[(&str, String)],
    ) -> Result<Option<Vec<HashMap<String, String>>>, GatewayError> {
        let target_type = match request.scope {
            BacklinkScope::All => "root_domain",
        };
        let mut query: Vec<(&str, String)> = vec![
            ("key", self.api_key.clone()),
            ("type", report_type.to_string()),
            ("target", request.domain.clone()),
            ("target_type", target_type.to_string()),
            ("export_columns", columns.to_string()),
        ];
        query.extend(extra.iter().cloned());

        let response = self.client.get(&self.base_url).query(&query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_table(&body)
    }
}

#[async_trait]
impl BacklinkGateway for SemrushBacklinkGateway {
    async fn backlinks(
        &self,
        request: &BacklinkRequest,
    ) -> Result<Option<BacklinkProfile>, GatewayError> {
        let overview = self
            .fetch_table(
                "backlinks_overview",
                request,
                "ascore,total,domains_num,follows_num,nofollows_num",
                &[],
            )
            .await?;

        let Some(row) = overview.and_then(|rows| rows.into_iter().next()) else {
            return Ok(None);
        };

        let mut profile = profile_from_overview(&row);

        match self
            .fetch_table(
                "backlinks",
                request,
                "page_ascore,source_url,anchor",
                &[
                    ("display_limit", TOP_BACKLINKS_LIMIT.to_string()),
                    ("display_sort", "page_ascore_desc".to_string()),
                ],
            )
            .await
        {
            Ok(rows) => profile.top_backlinks = top_backlinks(rows.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(domain = %request.domain, error = %e, "Top backlinks unavailable");
            }
        }

        Ok(Some(profile))
    }
}

/// Parse a semicolon-separated Semrush table.
///
/// Returns `Ok(None)` for the "nothing found" error and for tables without
/// data rows.
pub fn parse_table(text: &str) -> Result<Option<Vec<HashMap<String, String>>>, GatewayError> {
    let text = text.trim();
    if text.starts_with("ERROR") {
        if text.contains("NOTHING FOUND") {
            return Ok(None);
        }
        return Err(GatewayError::Provider(text.to_string()));
    }

    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else {
        return Ok(None);
    };
    let columns: Vec<String> = header.split(';').map(|c| c.trim().to_string()).collect();

    let rows: Vec<HashMap<String, String>> = lines
        .map(|line| {
            columns
                .iter()
                .cloned()
                .zip(line.split(';').map(|v| v.trim().to_string()))
                .collect()
        })
        .collect();

    if rows.is_empty() {
        Ok(None)
    } else {
        Ok(Some(rows))
    }
}

fn number(row: &HashMap<String, String>, column: &str) -> Option<u64> {
    row.get(column)?.parse().ok()
}

fn profile_from_overview(row: &HashMap<String, String>) -> BacklinkProfile {
    BacklinkProfile {
        authority_score: number(row, "ascore").map(|v| v as u32),
        totals: BacklinkTotals {
            backlinks: number(row, "total").unwrap_or(0),
            referring_domains: number(row, "domains_num").unwrap_or(0),
            follow_links: number(row, "follows_num").unwrap_or(0),
            nofollow_links: number(row, "nofollows_num").unwrap_or(0),
        },
        top_backlinks: Vec::new(),
    }
}

fn top_backlinks(rows: Vec<HashMap<String, String>>) -> Vec<TopBacklink> {
    let mut links: Vec<TopBacklink> = rows
        .into_iter()
        .filter_map(|row| {
            let source_url = row.get("source_url")?.clone();
            if source_url.is_empty() {
                return None;
            }
            Some(TopBacklink {
                authority_score: number(&row, "page_ascore").unwrap_or(0) as u32,
                anchor: row.get("anchor").filter(|a| !a.is_empty()).cloned(),
                source_url,
            })
        })
        .collect();
    links.sort_by(|a, b| b.authority_score.cmp(&a.authority_score));
    links.truncate(TOP_BACKLINKS_LIMIT);
    links
}
