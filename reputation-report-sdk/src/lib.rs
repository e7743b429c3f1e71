use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Progress of a single report run, as observed by a host UI.
///
/// `current` never decreases within a run. Outside a run the state is
/// [`ProgressState::idle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressState {
    /// The `{0, 0, ""}` state held before and after every run
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.current == 0 && self.total == 0 && self.message.is_empty()
    }

    /// Completion percentage in `0..=100`; zero when idle
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.current.min(self.total) * 100) / self.total) as u8
    }
}

/// Handle identifying one report run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunHandle {
    pub id: Uuid,
}

impl RunHandle {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }
}

impl Default for RunHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Structured events emitted during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunLog {
    /// Run planned and about to execute
    RunStarted {
        run_id: String,
        company: String,
        total_tasks: usize,
    },
    /// Run finished and produced a report
    RunCompleted {
        run_id: String,
        failed_tasks: usize,
    },
    /// Run aborted without a report
    RunFailed {
        run_id: String,
        error: String,
    },
    /// Task dispatched to the analysis gateway
    TaskStarted {
        current: usize,
        total: usize,
        message: String,
    },
    /// Task produced a gateway result
    TaskCompleted {
        current: usize,
    },
    /// Task was replaced by a sentinel result
    TaskFailed {
        current: usize,
        error: String,
    },
    /// Backlink lookup finished for one domain
    BacklinksFetched {
        domain: String,
        found: bool,
    },
    /// Report written to disk
    ReportSaved {
        path: String,
    },
}

impl RunLog {
    /// Emit this event to stderr for host parsing
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            use std::io::Write;
            eprintln!("__RR_EVENT__:{}", json);
            let _ = std::io::stderr().flush();
        }
    }

    /// Parse an emitted stderr line back into an event
    pub fn parse_line(line: &str) -> Option<Self> {
        let json = line.trim().strip_prefix("__RR_EVENT__:")?;
        serde_json::from_str(json).ok()
    }
}

/// Helper macros for run events
#[macro_export]
macro_rules! log_run_start {
    ($run_id:expr, $company:expr, $total:expr) => {
        $crate::RunLog::RunStarted {
            run_id: $run_id.to_string(),
            company: $company.to_string(),
            total_tasks: $total,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_run_complete {
    ($run_id:expr, $failed:expr) => {
        $crate::RunLog::RunCompleted {
            run_id: $run_id.to_string(),
            failed_tasks: $failed,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_run_failed {
    ($run_id:expr, $error:expr) => {
        $crate::RunLog::RunFailed {
            run_id: $run_id.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_task_start {
    ($progress:expr) => {
        $crate::RunLog::TaskStarted {
            current: $progress.current,
            total: $progress.total,
            message: $progress.message.clone(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_task_complete {
    ($current:expr) => {
        $crate::RunLog::TaskCompleted { current: $current }.emit();
    };
}

#[macro_export]
macro_rules! log_task_failed {
    ($current:expr, $error:expr) => {
        $crate::RunLog::TaskFailed {
            current: $current,
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_backlinks {
    ($domain:expr, $found:expr) => {
        $crate::RunLog::BacklinksFetched {
            domain: $domain.to_string(),
            found: $found,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_report_saved {
    ($path:expr) => {
        $crate::RunLog::ReportSaved {
            path: $path.to_string(),
        }
        .emit();
    };
}

// ============================================================================
// Console Logging Macros
// ============================================================================

/// Logs progress of a run.
///
/// # Example
/// ```
/// use reputation_report_sdk::log_progress;
/// log_progress!(3, 10, "Analyzing Acme on ChatGPT");
/// ```
///
/// Outputs:
/// ```text
/// [3/10] Analyzing Acme on ChatGPT
/// ```
#[macro_export]
macro_rules! log_progress {
    ($current:expr, $total:expr, $message:expr) => {
        println!("\x1b[36m[{}/{}] {}\x1b[0m", $current, $total, $message);
    };
}

/// Logs an informational message.
///
/// # Example
/// ```
/// use reputation_report_sdk::log_info;
/// log_info!("Planned {} tasks", 10);
/// ```
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        println!("\x1b[36mℹ {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[36mℹ {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs a warning message.
///
/// # Example
/// ```
/// use reputation_report_sdk::log_warning;
/// log_warning!("Backlink enrichment disabled");
/// ```
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs that a file has been saved.
///
/// # Example
/// ```
/// use reputation_report_sdk::log_file_saved;
/// log_file_saved!("./reports/acme.json");
/// ```
#[macro_export]
macro_rules! log_file_saved {
    ($path:expr) => {
        println!("\x1b[32m✓ Saved: {}\x1b[0m", $path);
    };
}
