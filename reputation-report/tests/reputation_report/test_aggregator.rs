//! Aggregation tests: routing outcomes into the nested report

use uuid::Uuid;

use super::common::*;
use reputation_report::{
    aggregator::{average_score, majority_sentiment, ResultAggregator},
    error::RunError,
    executor::{BacklinkSet, TaskOutcome},
    planner,
    types::{AnalysisResult, AnalysisType, Sentiment, TargetRef},
    EngineId, Executor,
};

async fn outcomes_for(
    brief: &reputation_report::ResearchBrief,
    list: &str,
    gateway: &ScriptedAnalysis,
) -> Vec<TaskOutcome> {
    let plan = planner::plan(brief, &engines(list)).unwrap();
    Executor::new(gateway).run(&plan, &mut ignore).await.unwrap()
}

#[tokio::test]
async fn test_acme_report_shape() {
    let brief = acme_brief();
    let gateway = ScriptedAnalysis::succeeding();
    let outcomes = outcomes_for(&brief, "chatgpt,gemini", &gateway).await;

    let run_id = Uuid::new_v4();
    let report = ResultAggregator::new(run_id)
        .fold(&brief, outcomes, &BacklinkSet::default())
        .unwrap();

    assert_eq!(report.run_id, run_id);
    assert_eq!(report.company_name, "Acme");
    let company: Vec<&str> = report.company.keys().map(|k| k.as_str()).collect();
    assert_eq!(company, vec!["chatgpt", "gemini"]);

    assert_eq!(report.leadership.len(), 1);
    let jane = &report.leadership[0];
    assert_eq!(jane.name, "Jane");
    assert_eq!(jane.title, "CEO");
    assert_eq!(jane.by_engine.len(), 2);
    assert_eq!(jane.press_opportunities.len(), 2);
    assert_eq!(jane.social_sentiment.len(), 2);

    assert_eq!(report.podcast_opportunities.len(), 2);
    assert_eq!(report.podcast_opportunities[0].engine_id.as_str(), "chatgpt");
    assert!(report.competitors.is_empty());
    assert!(report.backlink_profile.is_none());

    assert_eq!(report.result_count(), 10);
    assert_eq!(report.failed_count(), 0);
}

#[tokio::test]
async fn test_one_failure_among_results() {
    let brief = acme_brief();
    let gateway = ScriptedAnalysis::failing_on(5);
    let outcomes = outcomes_for(&brief, "chatgpt,gemini", &gateway).await;

    let report = ResultAggregator::new(Uuid::new_v4())
        .fold(&brief, outcomes, &BacklinkSet::default())
        .unwrap();

    assert_eq!(report.result_count(), 10);
    assert_eq!(report.failed_count(), 1);
    // Call 5 is Jane's social sentiment on ChatGPT
    let social = &report.leadership[0].social_sentiment;
    assert!(social.get(&EngineId::from("chatgpt")).unwrap().error);
    assert!(!social.get(&EngineId::from("gemini")).unwrap().error);
}

#[tokio::test]
async fn test_competitors_get_backlink_profiles() {
    let brief = full_brief();
    let gateway = ScriptedAnalysis::succeeding();
    let outcomes = outcomes_for(&brief, "chatgpt", &gateway).await;

    let mut backlinks = BacklinkSet::default();
    backlinks.insert("acme.com", Some(profile(60, 5000)));
    backlinks.insert("globex.com", Some(profile(45, 800)));
    backlinks.insert("initech.io", None);

    let report = ResultAggregator::new(Uuid::new_v4())
        .fold(&brief, outcomes, &backlinks)
        .unwrap();

    assert_eq!(
        report.backlink_profile.as_ref().and_then(|p| p.authority_score),
        Some(60)
    );
    let names: Vec<&str> = report.competitors.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Globex", "Initech"]);
    assert_eq!(
        report.competitors[0]
            .backlink_profile
            .as_ref()
            .map(|p| p.totals.backlinks),
        Some(800)
    );
    assert!(report.competitors[1].backlink_profile.is_none());
    assert_eq!(report.competitors[1].by_engine.len(), 1);
    assert_eq!(report.result_count(), planner::expected_total(1, 2, 2));
}

#[tokio::test]
async fn test_unroutable_outcome_is_internal_error() {
    let brief = acme_brief();
    let gateway = ScriptedAnalysis::succeeding();
    let mut outcomes = outcomes_for(&brief, "chatgpt", &gateway).await;

    outcomes[0].task.target = TargetRef::Leader {
        index: 7,
        name: "Ghost".to_string(),
    };
    outcomes[0].task.analysis_type = AnalysisType::Leadership;

    let err = ResultAggregator::new(Uuid::new_v4())
        .fold(&brief, outcomes, &BacklinkSet::default())
        .unwrap_err();
    assert!(matches!(err, RunError::Internal(_)));
}

#[tokio::test]
async fn test_derived_metrics_over_report() {
    let brief = acme_brief();
    let gateway = ScriptedAnalysis::failing_on(2);
    let outcomes = outcomes_for(&brief, "chatgpt,gemini", &gateway).await;

    let report = ResultAggregator::new(Uuid::new_v4())
        .fold(&brief, outcomes, &BacklinkSet::default())
        .unwrap();

    // Gemini entity failed; ChatGPT scored 7.0 and was positive
    assert_eq!(average_score(&report.company), 7.0);
    assert_eq!(majority_sentiment(&report.company), Sentiment::Positive);
}

#[test]
fn test_failed_sentinel_shape() {
    let sentinel = AnalysisResult::failed("boom");
    assert!(sentinel.error);
    assert_eq!(sentinel.error_message.as_deref(), Some("boom"));
    assert_eq!(sentinel.sentiment, Sentiment::Unknown);
    assert_eq!(sentinel.sentiment_score, Some(0.0));
}
