//! End-to-end workflow tests

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::common::*;
use reputation_report::{
    config::{OutputFormat, ReportConfig},
    error::{PlanError, RunError},
    export::load_report,
    generate_report,
    types::ResearchBrief,
    workflow::load_brief,
    run_reputation_workflow, EngineSelection, Executor, WorkflowConfig,
};

const ACME_YAML: &str = r#"
companyName: Acme
website: https://www.acme.com
industry: robotics
leaders:
  - name: Jane Doe
    title: CEO
  - name: ""
    title: Vacant
competitors:
  - name: Globex
    website: globex.com
"#;

#[tokio::test]
async fn test_generate_report_end_to_end() {
    let brief = full_brief();
    let selection = engines("chatgpt,gemini");
    let analysis = ScriptedAnalysis::failing_on(1);
    let backlinks = ScriptedBacklinks::new(vec![
        ("acme.com", Some(profile(60, 5000))),
        ("globex.com", Some(profile(30, 200))),
    ]);
    let executor = Executor::new(&analysis).with_backlinks(&backlinks);

    let mut recorder = Recorder::default();
    let report = generate_report(&brief, &selection, &executor, &mut recorder.observe())
        .await
        .unwrap();

    let total = analysis.call_count();
    assert_eq!(total, 2 * (1 + 3 * 2 + 2) + 2);
    assert_eq!(report.result_count(), total);
    assert_eq!(report.failed_count(), 1);
    assert!(report.company.get_index(0).unwrap().1.error);

    assert_eq!(report.leadership.len(), 2);
    assert_eq!(report.competitors.len(), 2);
    assert!(report.backlink_profile.is_some());
    assert!(report.competitors[0].backlink_profile.is_some());
    assert!(report.competitors[1].backlink_profile.is_none());

    assert!(recorder.states.last().unwrap().is_idle());
    assert_eq!(recorder.states.len(), total + 2);
}

#[tokio::test]
async fn test_invalid_brief_never_calls_gateway() {
    let analysis = ScriptedAnalysis::succeeding();
    let executor = Executor::new(&analysis);
    let mut recorder = Recorder::default();

    let err = generate_report(
        &acme_brief(),
        &EngineSelection::default(),
        &executor,
        &mut recorder.observe(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RunError::Plan(PlanError::InvalidBrief(_))));
    assert_eq!(analysis.call_count(), 0);
    assert!(recorder.states.is_empty());
}

#[tokio::test]
async fn test_cancelled_run_yields_no_report() {
    let cancel = CancellationToken::new();
    let analysis = ScriptedAnalysis::with_script(|n| {
        if n == 2 {
            Script::CancelThenHang
        } else {
            Script::Succeed
        }
    })
    .cancelling(cancel.clone());
    let executor = Executor::new(&analysis).with_cancellation(cancel);

    let result = generate_report(&acme_brief(), &engines("chatgpt"), &executor, &mut ignore).await;
    assert!(matches!(result, Err(RunError::Cancelled)));
}

#[tokio::test]
async fn test_load_brief_from_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("acme.yaml");
    std::fs::write(&path, ACME_YAML).unwrap();

    let brief: ResearchBrief = load_brief(&path).await.unwrap();
    assert_eq!(brief.company(), "Acme");
    assert_eq!(brief.leaders.len(), 2);
    assert_eq!(brief.named_leaders().count(), 1);
    assert_eq!(brief.competitors[0].website.as_deref(), Some("globex.com"));
    assert!(brief.keywords.is_none());
}

#[tokio::test]
async fn test_load_brief_accepts_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("acme.json");
    std::fs::write(&path, r#"{"companyName": "Acme", "leaders": [{"name": "Jane"}]}"#).unwrap();

    let brief = load_brief(&path).await.unwrap();
    assert_eq!(brief.company(), "Acme");
    assert_eq!(brief.leaders[0].title, "");
}

#[tokio::test]
async fn test_load_brief_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(load_brief(&dir.path().join("missing.yaml")).await.is_err());
}

#[tokio::test]
async fn test_workflow_without_api_key_still_saves_report() {
    let dir = TempDir::new().unwrap();
    let brief_path = dir.path().join("acme.yaml");
    std::fs::write(&brief_path, ACME_YAML).unwrap();
    let output_dir = dir.path().join("REPORTS");

    let config = WorkflowConfig {
        brief_path,
        engines: "chatgpt".to_string(),
        report: ReportConfig {
            output_dir: output_dir.clone(),
            format: OutputFormat::Yaml,
            markdown: true,
            ..ReportConfig::default()
        },
    };

    let (report, paths) = run_reputation_workflow(config).await.unwrap();

    // Every analysis fails with a missing key, but the run completes
    assert_eq!(report.result_count(), 1 + 3 + 1 + 1);
    assert_eq!(report.failed_count(), report.result_count());

    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| p.starts_with(&output_dir)));
    assert_eq!(paths[0].extension().unwrap(), "yaml");
    assert_eq!(paths[1].extension().unwrap(), "md");

    let loaded = load_report(&paths[0]).await.unwrap();
    assert_eq!(loaded.run_id, report.run_id);
    assert_eq!(loaded.failed_count(), report.failed_count());
}

#[tokio::test]
async fn test_workflow_rejects_unknown_engine() {
    let config = WorkflowConfig {
        brief_path: "does-not-matter.yaml".into(),
        engines: "chatgpt,lycos".to_string(),
        report: ReportConfig::default(),
    };
    let err = run_reputation_workflow(config).await.unwrap_err();
    assert!(err.to_string().contains("lycos"));
}
