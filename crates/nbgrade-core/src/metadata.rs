//! Notebook metadata access.
//!
//! Test specs live under `metadata.<namespace>.tests.<question>` of the
//! notebook JSON. The namespace key is configuration handed to
//! [`MetadataExtractor`], not a process-wide constant.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{GradeError, Result};

/// Namespace key written by the usual notebook grading tool.
pub const DEFAULT_NAMESPACE_KEY: &str = "otter";

/// Read a notebook from disk and parse it as JSON.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| GradeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&content, path)
}

/// Parse notebook JSON that has already been read (`path` is for errors only).
pub fn parse_document(content: &str, path: &Path) -> Result<Value> {
    serde_json::from_str(content).map_err(|source| GradeError::DocumentParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Locates test specs inside a notebook's metadata tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataExtractor {
    namespace_key: String,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE_KEY)
    }
}

impl MetadataExtractor {
    pub fn new(namespace_key: impl Into<String>) -> Self {
        Self {
            namespace_key: namespace_key.into(),
        }
    }

    pub fn namespace_key(&self) -> &str {
        &self.namespace_key
    }

    /// Return the raw spec stored for `question`.
    ///
    /// `path` names the notebook in errors.
    pub fn extract<'a>(
        &self,
        document: &'a Value,
        path: &Path,
        question: &str,
    ) -> Result<&'a Value> {
        let tests = self.tests(document, path).map_err(|e| match e {
            GradeError::MetadataNotFound { missing } => GradeError::SpecNotFound {
                question: question.to_string(),
                missing,
            },
            other => other,
        })?;
        tests.get(question).ok_or_else(|| GradeError::SpecNotFound {
            question: question.to_string(),
            missing: format!("{}.tests.{question}", self.namespace_key),
        })
    }

    /// Question names in the `tests` mapping, in document order.
    pub fn questions<'a>(&self, document: &'a Value, path: &Path) -> Result<Vec<&'a str>> {
        let tests = self.tests(document, path)?;
        Ok(tests.keys().map(String::as_str).collect())
    }

    fn tests<'a>(&self, document: &'a Value, path: &Path) -> Result<&'a Map<String, Value>> {
        let missing = |missing: String| GradeError::MetadataNotFound { missing };
        let tests_key = format!("{}.tests", self.namespace_key);

        let metadata = document
            .get("metadata")
            .ok_or_else(|| missing("metadata".into()))?;
        let namespace = metadata
            .get(&self.namespace_key)
            .ok_or_else(|| missing(self.namespace_key.clone()))?;
        let tests = namespace
            .get("tests")
            .filter(|v| !v.is_null())
            .ok_or_else(|| missing(tests_key.clone()))?;
        tests.as_object().ok_or_else(|| {
            GradeError::malformed(
                path,
                format!("`{tests_key}` must be a mapping of question names to specs"),
            )
        })
    }
}
