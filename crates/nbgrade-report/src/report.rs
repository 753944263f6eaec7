//! JSON report for one graded question.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nbgrade_core::{TestFile, TestFormat};

/// Snapshot of a test file after its run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionReport {
    /// Question / test file name.
    pub name: String,
    /// Notebook the spec was read from.
    pub path: String,
    pub format: TestFormat,
    pub created_at: DateTime<Utc>,
    /// Points available.
    pub value: f64,
    /// Points earned.
    pub grade: f64,
    /// `grade / value`.
    pub fraction: f64,
    pub all_or_nothing: bool,
    pub passed_all: bool,
    /// One entry per case, in case order.
    pub cases: Vec<CaseReport>,
}

/// One case's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    pub name: String,
    pub hidden: bool,
    pub passed: bool,
    pub message: String,
}

impl QuestionReport {
    /// Build a report from a test file that has been run.
    pub fn from_test_file(file: &TestFile) -> nbgrade_core::Result<Self> {
        let cases = file
            .results()?
            .map(|(case, result)| CaseReport {
                name: case.name().to_string(),
                hidden: case.is_hidden(),
                passed: result.passed,
                message: result.message.clone(),
            })
            .collect();

        Ok(Self {
            name: file.name().to_string(),
            path: file.path().display().to_string(),
            format: file.format(),
            created_at: Utc::now(),
            value: file.value(),
            grade: file.grade()?,
            fraction: file.fraction()?,
            all_or_nothing: file.all_or_nothing(),
            passed_all: file.passed_all()?,
            cases,
        })
    }

    /// Cases a student is allowed to see.
    pub fn public_cases(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.hidden)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuestionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbgrade_core::{ok, CaseOutcome, TestCase};
    use serde_json::json;

    fn graded(passing: &'static [&'static str], all_or_nothing: bool) -> TestFile {
        let spec = json!({
            "name": "q1",
            "points": 4,
            "all_or_nothing": all_or_nothing,
            "cases": [
                {"name": "q1 - 1", "code": "a"},
                {"name": "q1 - 2", "code": "b"},
                {"name": "q1 - 3", "code": "c", "hidden": true}
            ]
        });
        let mut file = ok::from_spec(&spec, Path::new("hw01.ipynb")).unwrap();
        file.run(&|case: &TestCase| {
            if passing.iter().any(|p| *p == case.name()) {
                CaseOutcome::pass("")
            } else {
                CaseOutcome::fail(format!("{} failed", case.name()))
            }
        })
        .unwrap();
        file
    }

    #[test]
    fn report_mirrors_test_file() {
        let file = graded(&["q1 - 1", "q1 - 3"], false);
        let report = QuestionReport::from_test_file(&file).unwrap();
        assert_eq!(report.name, "q1");
        assert_eq!(report.path, "hw01.ipynb");
        assert_eq!(report.format, TestFormat::Ok);
        assert_eq!(report.value, 4.0);
        assert!(!report.passed_all);
        assert_eq!(report.cases.len(), 3);
        assert_eq!(report.cases[1].message, "q1 - 2 failed");
        assert!(report.cases[2].hidden);
        assert_eq!(report.public_cases().count(), 2);
        assert!((report.grade - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn unrun_file_has_no_report() {
        let spec = json!({"cases": [{"name": "c"}]});
        let file = ok::from_spec(&spec, Path::new("hw.ipynb")).unwrap();
        let err = QuestionReport::from_test_file(&file).unwrap_err();
        assert!(err.is_lifecycle());
    }

    #[test]
    fn save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("q1.json");
        let report = QuestionReport::from_test_file(&graded(&["q1 - 1", "q1 - 2", "q1 - 3"], true)).unwrap();
        report.save_json(&path).unwrap();

        let loaded = QuestionReport::load_json(&path).unwrap();
        assert_eq!(loaded.name, "q1");
        assert_eq!(loaded.grade, 4.0);
        assert!(loaded.passed_all);
        assert_eq!(loaded.cases, report.cases);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["format"], "ok");
    }
}
