//! Scripted executor for tests and dry runs.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::Deserialize;

use nbgrade_core::{CaseExecutor, CaseOutcome, TestCase};

/// Returns pre-recorded outcomes keyed by case name, without running anything.
pub struct ScriptedExecutor {
    /// Map of case name → outcome.
    outcomes: HashMap<String, CaseOutcome>,
    /// Outcome for cases with no entry.
    default_outcome: CaseOutcome,
    call_count: AtomicU32,
    /// Case names in the order they were executed.
    seen: Mutex<Vec<String>>,
}

/// An outcomes-file entry: either a bare bool or a full outcome.
#[derive(Deserialize)]
#[serde(untagged)]
enum OutcomeEntry {
    Passed(bool),
    Full(CaseOutcome),
}

impl ScriptedExecutor {
    pub fn new(outcomes: HashMap<String, CaseOutcome>) -> Self {
        Self {
            outcomes,
            default_outcome: CaseOutcome::fail("no scripted outcome"),
            call_count: AtomicU32::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Pass exactly the named cases; fail everything else.
    pub fn passing(names: &[&str]) -> Self {
        let outcomes = names
            .iter()
            .map(|n| (n.to_string(), CaseOutcome::pass("")))
            .collect();
        Self::new(outcomes)
    }

    pub fn with_default(mut self, outcome: CaseOutcome) -> Self {
        self.default_outcome = outcome;
        self
    }

    /// Parse a JSON object of `case name → true | false | {"passed", "message"}`.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: HashMap<String, OutcomeEntry> =
            serde_json::from_str(content).context("outcomes must be a JSON object")?;
        let outcomes = entries
            .into_iter()
            .map(|(name, entry)| {
                let outcome = match entry {
                    OutcomeEntry::Passed(true) => CaseOutcome::pass(""),
                    OutcomeEntry::Passed(false) => CaseOutcome::fail(""),
                    OutcomeEntry::Full(o) => o,
                };
                (name, outcome)
            })
            .collect();
        Ok(Self::new(outcomes))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read outcomes file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("failed to parse outcomes file: {}", path.display()))
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Names of the cases executed so far, in order.
    pub fn seen(&self) -> Vec<String> {
        self.seen
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl CaseExecutor for ScriptedExecutor {
    fn execute(&self, case: &TestCase) -> CaseOutcome {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(case.name().to_string());
        }
        self.outcomes
            .get(case.name())
            .cloned()
            .unwrap_or_else(|| self.default_outcome.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbgrade_core::ok;
    use serde_json::json;

    fn file() -> nbgrade_core::TestFile {
        let spec = json!({"all_or_nothing": false, "cases": [{"name": "c1"}, {"name": "c2"}, {"name": "c3"}]});
        ok::from_spec(&spec, Path::new("hw.ipynb")).unwrap()
    }

    #[test]
    fn passing_list_drives_grade() {
        let exec = ScriptedExecutor::passing(&["c1", "c3"]);
        let mut f = file();
        f.run(&exec).unwrap();
        assert_eq!(exec.call_count(), 3);
        assert_eq!(exec.seen(), vec!["c1", "c2", "c3"]);
        assert_eq!(f.passed_count().unwrap(), 2);
        assert_eq!(
            f.test_case_results().unwrap()[1].message,
            "no scripted outcome"
        );
    }

    #[test]
    fn parses_outcomes_json() {
        let exec = ScriptedExecutor::from_json_str(
            r#"{"c1": true, "c2": {"passed": false, "message": "expected 4, got 5"}}"#,
        )
        .unwrap()
        .with_default(CaseOutcome::pass("default"));
        let mut f = file();
        f.run(&exec).unwrap();
        let results = f.test_case_results().unwrap();
        assert!(results[0].passed);
        assert!(!results[1].passed);
        assert_eq!(results[1].message, "expected 4, got 5");
        assert_eq!(results[2].message, "default");
    }

    #[test]
    fn rejects_non_object_outcomes() {
        assert!(ScriptedExecutor::from_json_str("[true, false]").is_err());
    }
}
