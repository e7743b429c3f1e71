//! Multi-engine reputation report generation.
//!
//! A [`ResearchBrief`] is expanded into one [`AnalysisTask`] per engine,
//! target and analysis type ([`planner`]), the tasks run sequentially
//! against an [`AnalysisGateway`] ([`executor`]), and the outcomes fold
//! into a nested [`Report`] ([`aggregator`]) for exporters to consume
//! ([`export`]).

// Core pipeline
pub mod aggregator;
pub mod executor;
pub mod planner;
pub mod workflow;

// Data model
pub mod engines;
pub mod error;
pub mod types;

// External providers
pub mod domain;
pub mod gateway;

// Configuration and output
pub mod cli;
pub mod config;
pub mod export;

pub use engines::{EngineId, EngineRegistry, EngineSelection};
pub use error::{ExportError, GatewayError, PlanError, RunError};
pub use executor::{Executor, ProgressObserver, TaskOutcome};
pub use gateway::{AnalysisGateway, BacklinkGateway};
pub use types::{AnalysisResult, AnalysisTask, Report, ResearchBrief};
pub use workflow::{generate_report, run_reputation_workflow, WorkflowConfig};
