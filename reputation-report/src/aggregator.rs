//! Folding task outcomes into the nested [`Report`], plus the derived
//! metrics renderers compute from it.

use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    error::RunError,
    executor::{BacklinkSet, TaskOutcome},
    types::{
        present, AnalysisType, CompetitorReport, EngineResults, LeaderReport, PodcastFinding,
        Report, ResearchBrief, Sentiment, TargetRef,
    },
};

pub struct ResultAggregator {
    run_id: Uuid,
}

impl ResultAggregator {
    pub fn new(run_id: Uuid) -> Self {
        Self { run_id }
    }

    /// Build the report for `brief` from every outcome of the run.
    ///
    /// Leadership and competitor sections list the brief's named entries in
    /// brief order. An outcome that cannot be routed is a defect and fails
    /// the whole fold.
    pub fn fold(
        &self,
        brief: &ResearchBrief,
        outcomes: Vec<TaskOutcome>,
        backlinks: &BacklinkSet,
    ) -> Result<Report, RunError> {
        let mut leadership: Vec<LeaderReport> = Vec::new();
        let mut leader_slots: HashMap<usize, usize> = HashMap::new();
        for (index, leader) in brief.named_leaders() {
            leader_slots.insert(index, leadership.len());
            leadership.push(LeaderReport {
                name: leader.name.trim().to_string(),
                title: leader.title.trim().to_string(),
                by_engine: EngineResults::new(),
                press_opportunities: EngineResults::new(),
                social_sentiment: EngineResults::new(),
            });
        }

        let mut competitors: Vec<CompetitorReport> = Vec::new();
        let mut competitor_slots: HashMap<usize, usize> = HashMap::new();
        for (index, competitor) in brief.named_competitors() {
            competitor_slots.insert(index, competitors.len());
            competitors.push(CompetitorReport {
                name: competitor.name.trim().to_string(),
                website: present(&competitor.website).map(str::to_string),
                by_engine: EngineResults::new(),
                backlink_profile: backlinks
                    .for_website(competitor.website.as_deref())
                    .cloned(),
            });
        }

        let mut company = EngineResults::new();
        let mut podcast_opportunities = Vec::new();

        for TaskOutcome { task, result } in outcomes {
            let engine_id = task.engine_id.clone();
            match (&task.target, task.analysis_type) {
                (TargetRef::Company { .. }, AnalysisType::Entity) => {
                    company.insert(engine_id, result);
                }
                (TargetRef::Company { .. }, AnalysisType::Podcast) => {
                    podcast_opportunities.push(PodcastFinding { engine_id, result });
                }
                (TargetRef::Leader { index, .. }, analysis_type) => {
                    let slot = leader_slots
                        .get(index)
                        .and_then(|slot| leadership.get_mut(*slot))
                        .ok_or_else(|| unroutable(&task.target, analysis_type))?;
                    let map = match analysis_type {
                        AnalysisType::Leadership => &mut slot.by_engine,
                        AnalysisType::Press => &mut slot.press_opportunities,
                        AnalysisType::Social => &mut slot.social_sentiment,
                        other => return Err(unroutable(&task.target, other)),
                    };
                    map.insert(engine_id, result);
                }
                (TargetRef::Competitor { index, .. }, AnalysisType::Competitor) => {
                    let slot = competitor_slots
                        .get(index)
                        .and_then(|slot| competitors.get_mut(*slot))
                        .ok_or_else(|| unroutable(&task.target, AnalysisType::Competitor))?;
                    slot.by_engine.insert(engine_id, result);
                }
                (target, analysis_type) => return Err(unroutable(target, analysis_type)),
            }
        }

        Ok(Report {
            run_id: self.run_id,
            generated_at: Utc::now(),
            company_name: brief.company().to_string(),
            website: present(&brief.website).map(str::to_string),
            industry: present(&brief.industry).map(str::to_string),
            company,
            leadership,
            competitors,
            backlink_profile: backlinks.for_website(brief.website.as_deref()).cloned(),
            podcast_opportunities,
        })
    }
}

fn unroutable(target: &TargetRef, analysis_type: AnalysisType) -> RunError {
    RunError::Internal(format!(
        "no report slot for {} task on {:?} '{}'",
        analysis_type,
        target.kind(),
        target.name()
    ))
}

/// Mean score over entries with a positive score, rounded to one decimal.
///
/// Uses the confidence score, or the sentiment score when confidence is
/// absent. Error entries and zero scores are skipped; returns `0.0` when
/// nothing qualifies.
pub fn average_score(by_engine: &EngineResults) -> f64 {
    let scores: Vec<f64> = by_engine
        .values()
        .filter(|r| !r.error)
        .filter_map(|r| r.score())
        .filter(|s| *s > 0.0)
        .collect();

    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Most frequent sentiment across entries.
///
/// Ties go to the sentiment seen first in map order. Error entries and
/// unknown sentiments are not counted; returns [`Sentiment::Unknown`] when
/// nothing is left.
pub fn majority_sentiment(by_engine: &EngineResults) -> Sentiment {
    let mut counts: Vec<(Sentiment, usize)> = Vec::new();
    for result in by_engine.values().filter(|r| !r.error) {
        if result.sentiment == Sentiment::Unknown {
            continue;
        }
        match counts.iter_mut().find(|(s, _)| *s == result.sentiment) {
            Some((_, count)) => *count += 1,
            None => counts.push((result.sentiment, 1)),
        }
    }

    let mut best: Option<(Sentiment, usize)> = None;
    for (sentiment, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((sentiment, count));
        }
    }
    best.map(|(s, _)| s).unwrap_or(Sentiment::Unknown)
}
