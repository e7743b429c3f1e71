//! Task planning: turns a brief and an engine selection into the ordered
//! list of analysis tasks for a run.
//!
//! ## Ordering
//!
//! 1. One company `entity` task per engine.
//! 2. For each named leader, for each engine: `leadership`, `press`, `social`.
//! 3. One company `podcast` task per engine.
//! 4. For each named competitor, for each engine: one `competitor` task.
//!
//! Progress numbering depends on this order, so it must stay fixed.

use serde::{Deserialize, Serialize};

use crate::{
    engines::{Engine, EngineSelection},
    error::PlanError,
    types::{present, AnalysisTask, AnalysisType, Competitor, Leader, ResearchBrief, TargetRef},
};

/// Ordered tasks for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPlan {
    pub tasks: Vec<AnalysisTask>,
    pub total: usize,
}

impl TaskPlan {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Number of tasks a run will execute
pub fn expected_total(engines: usize, leaders: usize, competitors: usize) -> usize {
    engines * (1 + 3 * leaders + competitors) + engines
}

/// Reject briefs that cannot be planned
pub fn validate(brief: &ResearchBrief, engines: &EngineSelection) -> Result<(), PlanError> {
    if brief.company().is_empty() {
        return Err(PlanError::InvalidBrief("company name is required".to_string()));
    }
    if engines.is_empty() {
        return Err(PlanError::InvalidBrief(
            "at least one engine must be selected".to_string(),
        ));
    }
    Ok(())
}

/// Enumerate every analysis task for `brief` across `engines`
pub fn plan(brief: &ResearchBrief, engines: &EngineSelection) -> Result<TaskPlan, PlanError> {
    validate(brief, engines)?;

    let company = brief.company();
    let mut tasks = Vec::new();

    let company_ref = || TargetRef::Company {
        name: company.to_string(),
    };

    for engine in engines.iter() {
        tasks.push(task(engine, company_ref(), AnalysisType::Entity, entity_query(brief)));
    }

    for (index, leader) in brief.named_leaders() {
        let target = TargetRef::Leader {
            index,
            name: leader.name.trim().to_string(),
        };
        for engine in engines.iter() {
            tasks.push(task(
                engine,
                target.clone(),
                AnalysisType::Leadership,
                leadership_query(brief, leader),
            ));
            tasks.push(task(
                engine,
                target.clone(),
                AnalysisType::Press,
                press_query(brief, leader),
            ));
            tasks.push(task(
                engine,
                target.clone(),
                AnalysisType::Social,
                social_query(brief, leader),
            ));
        }
    }

    for engine in engines.iter() {
        tasks.push(task(engine, company_ref(), AnalysisType::Podcast, podcast_query(brief)));
    }

    for (index, competitor) in brief.named_competitors() {
        let target = TargetRef::Competitor {
            index,
            name: competitor.name.trim().to_string(),
        };
        for engine in engines.iter() {
            tasks.push(task(
                engine,
                target.clone(),
                AnalysisType::Competitor,
                competitor_query(brief, competitor),
            ));
        }
    }

    let total = expected_total(
        engines.len(),
        brief.named_leaders().count(),
        brief.named_competitors().count(),
    );
    debug_assert_eq!(total, tasks.len());

    Ok(TaskPlan { tasks, total })
}

fn task(
    engine: &Engine,
    target: TargetRef,
    analysis_type: AnalysisType,
    query: String,
) -> AnalysisTask {
    AnalysisTask {
        target,
        engine_id: engine.engine_id(),
        analysis_type,
        query,
    }
}

// ============================================================================
// Query templates
// ============================================================================

/// `prefix + value + suffix` when the value is present, otherwise nothing
fn clause(prefix: &str, value: Option<&str>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{}{}{}", prefix, v, suffix),
        None => String::new(),
    }
}

fn title_of(leader: &Leader) -> Option<&str> {
    Some(leader.title.trim()).filter(|t| !t.is_empty())
}

fn entity_query(brief: &ResearchBrief) -> String {
    format!(
        "What is {}{}{}? Describe its reputation, products, and how it is perceived online.{}",
        brief.company(),
        clause(" in the ", present(&brief.industry), " industry"),
        clause(" (", present(&brief.website), ")"),
        clause(" Pay attention to: ", present(&brief.keywords), "."),
    )
}

fn leadership_query(brief: &ResearchBrief, leader: &Leader) -> String {
    format!(
        "Who is {}{} at {}? Summarize their professional reputation and public profile.",
        leader.name.trim(),
        clause(", ", title_of(leader), ""),
        brief.company(),
    )
}

fn press_query(brief: &ResearchBrief, leader: &Leader) -> String {
    format!(
        "What press and media opportunities exist for {}{} of {}{}? List outlets and story angles.",
        leader.name.trim(),
        clause(", ", title_of(leader), ""),
        brief.company(),
        clause(" in the ", present(&brief.industry), " industry"),
    )
}

fn social_query(brief: &ResearchBrief, leader: &Leader) -> String {
    format!(
        "What is the social media sentiment around {}{} of {}? Summarize public discussion and tone.",
        leader.name.trim(),
        clause(", ", title_of(leader), ""),
        brief.company(),
    )
}

fn podcast_query(brief: &ResearchBrief) -> String {
    format!(
        "Which podcasts would be a good fit for leaders of {}{}?{}",
        brief.company(),
        clause(" in the ", present(&brief.industry), " industry"),
        clause(" Relevant topics: ", present(&brief.keywords), "."),
    )
}

fn competitor_query(brief: &ResearchBrief, competitor: &Competitor) -> String {
    format!(
        "How does {}{}{} compare to {}{}? Summarize its reputation and market positioning.",
        competitor.name.trim(),
        clause(" (", present(&competitor.website), ")"),
        clause(", led by ", present(&competitor.leader), ","),
        brief.company(),
        clause(" in the ", present(&brief.industry), " industry"),
    )
}
