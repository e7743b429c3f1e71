/*
  REPUTATION REPORT

    brief.yaml ──> plan (engines x targets x analysis types)
                     │
                     ├─> run each task against the analysis provider
                     ├─> look up backlinks for company and competitor sites
                     └─> fold into one nested report
                           │
                           └─> ./REPORTS/reputation_report_<company>_<timestamp>.json

EXAMPLE COMMANDS:

  # List engines
  cargo run -- engines

  # Full report on three engines, with Markdown
  cargo run -- run --brief acme.yaml --engines chatgpt,gemini,perplexity --markdown

  # YAML output, 60s per call, no backlink lookups
  cargo run -- run --brief acme.yaml --format yaml --call-timeout-secs 60 --no-backlinks
*/

use clap::Parser;
use reputation_report::{
    cli::{Args, Command},
    EngineRegistry, WorkflowConfig,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Engines => {
            for engine in EngineRegistry::all() {
                println!("{:<12} {}", engine.id, engine.name);
            }
            Ok(())
        }
        Command::Run(run) => {
            run.validate()?;
            let config: WorkflowConfig = run.into();
            reputation_report::run_reputation_workflow(config).await?;
            Ok(())
        }
    }
}
