//! Running one case body through an interpreter process.

use std::process::Stdio;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::process::Command;

use crate::scratch::ScratchDir;

/// Captured result of one interpreter invocation.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// `None` when the process was killed by the timeout.
    pub success: Option<bool>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ProcessOutput {
    /// stdout followed by stderr, trimmed, with empty streams left out.
    pub fn combined(&self) -> String {
        [self.stdout.trim(), self.stderr.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Run `program args... <body_file>` inside `scratch`.
pub async fn run_body(
    program: &str,
    args: &[String],
    body_file: &std::path::Path,
    scratch: &ScratchDir,
) -> Result<ProcessOutput> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args)
        .arg(body_file)
        .current_dir(scratch.work_dir())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;

    let output = match tokio::time::timeout(scratch.timeout(), child.wait_with_output()).await {
        Ok(output) => output.with_context(|| format!("failed to run {program}"))?,
        Err(_) => {
            return Ok(ProcessOutput {
                success: None,
                stdout: String::new(),
                stderr: String::new(),
                duration_ms: start.elapsed().as_millis() as u64,
            })
        }
    };

    Ok(ProcessOutput {
        success: Some(output.status.success()),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
