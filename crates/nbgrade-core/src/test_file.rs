//! The test file: one question's ordered test cases plus its grading state.
//!
//! Both spec formats produce the same [`TestFile`]; the format only decides
//! which parser builds it. A test file is run exactly once and is read-only
//! afterwards.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{GradeError, Result};
use crate::exception::{self, OpaqueBlobDecoder};
use crate::grading::GradingPolicy;
use crate::metadata::{load_document, MetadataExtractor};
use crate::model::{TestCase, TestCaseResult, TestFormat};
use crate::ok;
use crate::traits::{BlobDecoder, CaseExecutor, CheckRecord};

/// Everything needed to turn a notebook's metadata into test files.
pub struct SpecContext {
    pub extractor: MetadataExtractor,
    pub decoder: Box<dyn BlobDecoder>,
}

impl Default for SpecContext {
    fn default() -> Self {
        Self {
            extractor: MetadataExtractor::default(),
            decoder: Box::new(OpaqueBlobDecoder),
        }
    }
}

impl SpecContext {
    pub fn new(extractor: MetadataExtractor, decoder: Box<dyn BlobDecoder>) -> Self {
        Self { extractor, decoder }
    }

    /// Build a test file for `test_name` from an already parsed notebook.
    pub fn test_file(
        &self,
        document: &Value,
        path: &Path,
        test_name: &str,
        format: Option<TestFormat>,
    ) -> Result<TestFile> {
        let raw = self.extractor.extract(document, path, test_name)?;
        let format = match format {
            Some(f) => f,
            None => TestFormat::detect(raw).ok_or_else(|| {
                GradeError::malformed(
                    path,
                    format!("test {test_name} is neither a string nor a mapping"),
                )
            })?,
        };
        match format {
            TestFormat::Exception => {
                exception::from_raw_spec_named(raw, path, test_name, self.decoder.as_ref())
            }
            TestFormat::Ok => ok::from_spec_named(raw, path, test_name),
        }
    }
}

/// A single question's test file.
#[derive(Debug, Clone)]
pub struct TestFile {
    name: String,
    path: PathBuf,
    format: TestFormat,
    test_cases: Vec<TestCase>,
    policy: GradingPolicy,
    results: Option<Vec<TestCaseResult>>,
}

impl TestFile {
    /// Validate parsed check records and build an ungraded test file.
    pub(crate) fn assemble(
        name: String,
        path: &Path,
        format: TestFormat,
        records: Vec<CheckRecord>,
        points: Option<f64>,
        all_or_nothing: Option<bool>,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(GradeError::malformed(
                path,
                format!("test {name} defines no cases"),
            ));
        }
        let value = match points {
            Some(p) if !(p.is_finite() && p > 0.0) => {
                return Err(GradeError::malformed(
                    path,
                    format!("point value must be positive, found {p}"),
                ))
            }
            Some(p) => p,
            None => 1.0,
        };

        let mut seen = HashSet::new();
        let mut test_cases = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let case_name = record
                .name
                .unwrap_or_else(|| format!("{name} - {}", i + 1));
            if !seen.insert(case_name.clone()) {
                return Err(GradeError::malformed(
                    path,
                    format!("duplicate case name: {case_name}"),
                ));
            }
            test_cases.push(
                TestCase::new(case_name, record.body)
                    .hidden(record.hidden)
                    .messages(record.success_message, record.failure_message),
            );
        }

        Ok(Self {
            name,
            path: path.to_path_buf(),
            format,
            test_cases,
            policy: GradingPolicy {
                value,
                all_or_nothing: all_or_nothing.unwrap_or(true),
            },
            results: None,
        })
    }

    /// Load `test_name` from the notebook at `path`.
    ///
    /// `format` of `None` picks the format from the shape of the entry.
    pub fn from_file(
        path: impl AsRef<Path>,
        test_name: &str,
        format: Option<TestFormat>,
        ctx: &SpecContext,
    ) -> Result<Self> {
        let path = path.as_ref();
        let document = load_document(path)?;
        ctx.test_file(&document, path, test_name, format)
    }

    /// Load an exception-format test from notebook metadata with default settings.
    pub fn exception_from_file(path: impl AsRef<Path>, test_name: &str) -> Result<Self> {
        Self::from_file(
            path,
            test_name,
            Some(TestFormat::Exception),
            &SpecContext::default(),
        )
    }

    /// Load an OK-format test from notebook metadata with default settings.
    pub fn ok_from_file(path: impl AsRef<Path>, test_name: &str) -> Result<Self> {
        Self::from_file(path, test_name, Some(TestFormat::Ok), &SpecContext::default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the spec came from. Never re-read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> TestFormat {
        self.format
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    /// Total points available.
    pub fn value(&self) -> f64 {
        self.policy.value
    }

    pub fn all_or_nothing(&self) -> bool {
        self.policy.all_or_nothing
    }

    pub fn is_run(&self) -> bool {
        self.results.is_some()
    }

    /// Run every case, in order, through `executor`.
    ///
    /// A failing case never stops the run; every case's message is kept.
    pub fn run<E: CaseExecutor + ?Sized>(&mut self, executor: &E) -> Result<()> {
        if self.results.is_some() {
            return Err(GradeError::AlreadyRun {
                name: self.name.clone(),
            });
        }

        let results: Vec<TestCaseResult> = self
            .test_cases
            .iter()
            .enumerate()
            .map(|(case_index, case)| {
                let outcome = executor.execute(case);
                tracing::debug!(
                    "{} :: {} {}",
                    self.name,
                    case.name(),
                    if outcome.passed { "passed" } else { "failed" }
                );
                TestCaseResult {
                    case_index,
                    passed: outcome.passed,
                    message: outcome.message,
                }
            })
            .collect();

        let passed = results.iter().filter(|r| r.passed).count();
        tracing::info!(
            "ran {}: {passed}/{} case(s) passed",
            self.name,
            results.len()
        );
        self.results = Some(results);
        Ok(())
    }

    /// Per-case results, in case order.
    pub fn test_case_results(&self) -> Result<&[TestCaseResult]> {
        self.results
            .as_deref()
            .ok_or_else(|| GradeError::NotGraded {
                name: self.name.clone(),
            })
    }

    /// Each case paired with its result.
    pub fn results(&self) -> Result<impl Iterator<Item = (&TestCase, &TestCaseResult)>> {
        let results = self.test_case_results()?;
        Ok(results
            .iter()
            .map(move |r| (&self.test_cases[r.case_index], r)))
    }

    /// Whether every case passed.
    pub fn passed_all(&self) -> Result<bool> {
        Ok(self.test_case_results()?.iter().all(|r| r.passed))
    }

    pub fn passed_count(&self) -> Result<usize> {
        Ok(self.test_case_results()?.iter().filter(|r| r.passed).count())
    }

    /// Points earned.
    pub fn grade(&self) -> Result<f64> {
        let passed = self.passed_count()?;
        Ok(self.policy.score(passed, self.test_cases.len()))
    }

    /// Points available, regardless of results.
    pub fn possible(&self) -> f64 {
        self.policy.value
    }

    /// Points earned as a fraction of the points available.
    pub fn fraction(&self) -> Result<f64> {
        let passed = self.passed_count()?;
        Ok(self.policy.fraction(passed, self.test_cases.len()))
    }
}
