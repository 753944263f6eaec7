//! The `nbgrade grade` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use nbgrade_core::{CaseExecutor, TestFile, TestFormat};
use nbgrade_report::summary::score_line;
use nbgrade_report::{summary, QuestionReport};
use nbgrade_runner::mock::ScriptedExecutor;
use nbgrade_runner::SubprocessExecutor;

use crate::config::load_config_from;

/// Options for one `grade` invocation.
pub struct GradeArgs {
    pub notebook: PathBuf,
    pub question: String,
    pub format: String,
    pub interpreter: Option<String>,
    pub timeout: Option<u64>,
    pub outcomes: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub public_only: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(args: GradeArgs) -> Result<()> {
    let mut config = load_config_from(args.config.as_deref())?;
    if let Some(interpreter) = args.interpreter {
        config.interpreter = interpreter;
    }
    if let Some(timeout) = args.timeout {
        anyhow::ensure!(timeout >= 1, "timeout must be at least 1 second");
        config.timeout_secs = timeout;
    }

    let format = match args.format.as_str() {
        "auto" => None,
        other => Some(
            other
                .parse::<TestFormat>()
                .map_err(|e: String| anyhow::anyhow!("{}", e))?,
        ),
    };

    let ctx = config.spec_context()?;
    let mut file = TestFile::from_file(&args.notebook, &args.question, format, &ctx)?;

    let executor: Box<dyn CaseExecutor> = match &args.outcomes {
        Some(path) => Box::new(ScriptedExecutor::from_json_file(path)?),
        None => {
            let mut exec = SubprocessExecutor::new(config.interpreter.clone())?
                .with_args(config.interpreter_args.clone())
                .with_timeout(Duration::from_secs(config.timeout_secs));
            if let Some(dir) = &config.scratch_dir {
                exec = exec.with_scratch_root(dir.clone());
            }
            Box::new(exec)
        }
    };

    eprintln!(
        "Grading {} from {} ({} cases)",
        file.name(),
        args.notebook.display(),
        file.test_cases().len()
    );
    file.run(executor.as_ref())?;

    let report = QuestionReport::from_test_file(&file)?;
    println!("{}", summary(&report, args.public_only));
    println!("{}", score_line(&report));

    if let Some(output) = &args.output {
        report.save_json(output)?;
        eprintln!("Report written to {}", output.display());
    }

    Ok(())
}
