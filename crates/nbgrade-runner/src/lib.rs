//! nbgrade-runner — Case executors.
//!
//! [`SubprocessExecutor`] writes each case body to a scratch directory and
//! hands it to an interpreter process; the case passes when the process exits
//! successfully. [`mock::ScriptedExecutor`] replays recorded outcomes.

pub mod mock;
pub mod process;
pub mod scratch;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

use nbgrade_core::{CaseExecutor, CaseOutcome, TestCase};

use crate::process::ProcessOutput;
use crate::scratch::ScratchDir;

/// Executes case bodies with an external interpreter.
///
/// Each case runs as `program args... <body file>` in its own scratch
/// directory, bounded by a timeout. A non-zero exit, a timeout, or a failure
/// to start the interpreter all count as a failed case.
///
/// The executor drives its own single-threaded tokio runtime, so it must not
/// be called from inside another async runtime.
pub struct SubprocessExecutor {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    scratch_root: Option<PathBuf>,
    runtime: Runtime,
}

impl SubprocessExecutor {
    pub fn new(program: impl Into<String>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build executor runtime")?;
        Ok(Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(30),
            scratch_root: None,
            runtime,
        })
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    pub fn with_scratch_root(mut self, root: PathBuf) -> Self {
        self.scratch_root = Some(root);
        self
    }

    async fn run_case(&self, case: &TestCase) -> Result<ProcessOutput> {
        let scratch = ScratchDir::new(self.scratch_root.as_deref(), self.timeout)?;
        let body_file = scratch.write_body(case.body())?;
        process::run_body(&self.program, &self.args, &body_file, &scratch).await
    }
}

impl CaseExecutor for SubprocessExecutor {
    fn execute(&self, case: &TestCase) -> CaseOutcome {
        let output = match self.runtime.block_on(self.run_case(case)) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("{}: could not execute: {e:#}", case.name());
                return CaseOutcome::fail(with_note(format!("{e:#}"), case.failure_message()));
            }
        };
        tracing::debug!(
            "{}: {} ran for {}ms",
            case.name(),
            self.program,
            output.duration_ms
        );

        match output.success {
            Some(true) => CaseOutcome::pass(with_note(output.combined(), case.success_message())),
            Some(false) => CaseOutcome::fail(with_note(output.combined(), case.failure_message())),
            None => {
                tracing::warn!(
                    "{}: timed out after {}s",
                    case.name(),
                    self.timeout.as_secs_f64()
                );
                CaseOutcome::fail(with_note(
                    format!("timed out after {}s", self.timeout.as_secs_f64()),
                    case.failure_message(),
                ))
            }
        }
    }
}

/// Append the case's own success/failure note to the captured output.
fn with_note(output: String, note: Option<&str>) -> String {
    match note {
        Some(note) if output.is_empty() => note.to_string(),
        Some(note) => format!("{output}\n{note}"),
        None => output,
    }
}
