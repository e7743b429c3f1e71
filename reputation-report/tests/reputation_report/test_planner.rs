//! Task planning tests

use super::common::*;
use reputation_report::{
    error::PlanError,
    planner::{self, expected_total},
    types::{AnalysisType, Competitor, Leader, ResearchBrief, TargetKind, TargetRef},
};

#[test]
fn test_acme_two_engines_one_leader() {
    let plan = planner::plan(&acme_brief(), &engines("chatgpt,gemini")).unwrap();

    assert_eq!(plan.total, 10);
    assert_eq!(plan.len(), 10);

    let order: Vec<(&str, AnalysisType)> = plan
        .tasks
        .iter()
        .map(|t| (t.engine_id.as_str(), t.analysis_type))
        .collect();
    assert_eq!(
        order,
        vec![
            ("chatgpt", AnalysisType::Entity),
            ("gemini", AnalysisType::Entity),
            ("chatgpt", AnalysisType::Leadership),
            ("chatgpt", AnalysisType::Press),
            ("chatgpt", AnalysisType::Social),
            ("gemini", AnalysisType::Leadership),
            ("gemini", AnalysisType::Press),
            ("gemini", AnalysisType::Social),
            ("chatgpt", AnalysisType::Podcast),
            ("gemini", AnalysisType::Podcast),
        ]
    );

    assert_eq!(plan.tasks[0].target_kind(), TargetKind::Company);
    assert_eq!(
        plan.tasks[2].target,
        TargetRef::Leader {
            index: 0,
            name: "Jane".to_string()
        }
    );
    assert_eq!(plan.tasks[8].target_kind(), TargetKind::Company);
}

#[test]
fn test_total_matches_formula() {
    let brief = full_brief();
    for list in ["chatgpt", "chatgpt,gemini", "chatgpt,gemini,perplexity,claude,copilot"] {
        let selection = engines(list);
        let plan = planner::plan(&brief, &selection).unwrap();
        assert_eq!(plan.total, expected_total(selection.len(), 2, 2));
        assert_eq!(plan.tasks.len(), plan.total);
    }
}

#[test]
fn test_company_only_brief() {
    let plan = planner::plan(&ResearchBrief::new("Acme"), &engines("perplexity")).unwrap();
    let types: Vec<AnalysisType> = plan.tasks.iter().map(|t| t.analysis_type).collect();
    assert_eq!(types, vec![AnalysisType::Entity, AnalysisType::Podcast]);
}

#[test]
fn test_planning_is_idempotent() {
    let brief = full_brief();
    let selection = engines("gemini,chatgpt");
    let first = planner::plan(&brief, &selection).unwrap();
    let second = planner::plan(&brief, &selection).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_blank_names_are_skipped() {
    let brief = ResearchBrief {
        company_name: "Acme".to_string(),
        leaders: vec![
            Leader {
                name: "".to_string(),
                title: "CFO".to_string(),
            },
            Leader {
                name: "Jane".to_string(),
                title: "".to_string(),
            },
        ],
        competitors: vec![Competitor {
            name: "   ".to_string(),
            website: Some("ghost.com".to_string()),
            leader: None,
        }],
        ..Default::default()
    };
    let plan = planner::plan(&brief, &engines("chatgpt")).unwrap();

    assert_eq!(plan.total, expected_total(1, 1, 0));
    assert!(plan
        .tasks
        .iter()
        .all(|t| t.target_kind() != TargetKind::Competitor));
    // Leader index refers to the position in the brief
    assert!(plan.tasks.iter().any(|t| t.target
        == TargetRef::Leader {
            index: 1,
            name: "Jane".to_string()
        }));
}

#[test]
fn test_competitor_order_follows_brief() {
    let plan = planner::plan(&full_brief(), &engines("chatgpt,gemini")).unwrap();
    let competitors: Vec<(&str, &str)> = plan
        .tasks
        .iter()
        .filter(|t| t.analysis_type == AnalysisType::Competitor)
        .map(|t| (t.target.name(), t.engine_id.as_str()))
        .collect();
    assert_eq!(
        competitors,
        vec![
            ("Globex", "chatgpt"),
            ("Globex", "gemini"),
            ("Initech", "chatgpt"),
            ("Initech", "gemini"),
        ]
    );
}

#[test]
fn test_queries_carry_brief_context() {
    let plan = planner::plan(&full_brief(), &engines("chatgpt")).unwrap();

    let entity = &plan.tasks[0].query;
    assert!(entity.contains("Acme"));
    assert!(entity.contains("robotics"));
    assert!(entity.contains("automation, warehouses"));

    let leadership = &plan.tasks[1].query;
    assert!(leadership.contains("Jane Doe"));
    assert!(leadership.contains("CEO"));

    let competitor = plan
        .tasks
        .iter()
        .find(|t| t.analysis_type == AnalysisType::Competitor)
        .unwrap();
    assert!(competitor.query.contains("Globex"));
    assert!(competitor.query.contains("Hank Scorpio"));
}

#[test]
fn test_empty_engine_selection_is_rejected() {
    let err = planner::plan(&acme_brief(), &engines("")).unwrap_err();
    assert!(matches!(err, PlanError::InvalidBrief(_)));
}

#[test]
fn test_blank_company_is_rejected() {
    let err = planner::plan(&ResearchBrief::new("  "), &engines("chatgpt")).unwrap_err();
    assert_eq!(
        err,
        PlanError::InvalidBrief("company name is required".to_string())
    );
}

#[test]
fn test_engine_order_and_dedupe() {
    let selection = engines("Gemini, chatgpt,gemini");
    let ids: Vec<&str> = selection.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["gemini", "chatgpt"]);

    assert!(reputation_report::EngineSelection::parse("chatgpt,altavista").is_err());
}
