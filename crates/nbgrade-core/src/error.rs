//! Grading error types.
//!
//! Every failure the test-file layer can report is a variant here, so callers
//! can match on the kind of failure instead of inspecting message strings.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, parsing, running, or scoring a test file.
#[derive(Debug, Error)]
pub enum GradeError {
    /// The notebook could not be read from disk.
    #[error("failed to read notebook {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The notebook is not well-formed JSON.
    #[error("failed to parse notebook {}: {source}", path.display())]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The metadata has no test spec for the requested question.
    #[error("test {question} not found: notebook metadata has no `{missing}`")]
    SpecNotFound { question: String, missing: String },

    /// The metadata has no `tests` mapping to list questions from.
    #[error("notebook metadata has no `{missing}`")]
    MetadataNotFound { missing: String },

    /// A test spec is present but violates its format's rules.
    #[error("malformed test spec in {}: {reason}", path.display())]
    MalformedTest { path: PathBuf, reason: String },

    /// `grade` was requested before the test file was run.
    #[error("test file {name} has not been run yet")]
    NotGraded { name: String },

    /// `run` was called on a test file that already has results.
    #[error("test file {name} has already been run")]
    AlreadyRun { name: String },
}

impl GradeError {
    pub(crate) fn malformed(path: &std::path::Path, reason: impl Into<String>) -> Self {
        GradeError::MalformedTest {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for lifecycle misuse (grading before running, running twice).
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            GradeError::NotGraded { .. } | GradeError::AlreadyRun { .. }
        )
    }
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, GradeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_not_found_names_question() {
        let err = GradeError::SpecNotFound {
            question: "q7".into(),
            missing: "tests.q7".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("q7"), "got: {msg}");
        assert!(!err.is_lifecycle());
    }

    #[test]
    fn lifecycle_errors_are_classified() {
        assert!(GradeError::NotGraded { name: "q1".into() }.is_lifecycle());
        assert!(GradeError::AlreadyRun { name: "q1".into() }.is_lifecycle());
    }
}
