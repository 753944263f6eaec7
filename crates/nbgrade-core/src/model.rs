//! Core data model types for nbgrade.
//!
//! A [`TestCase`] is one check parsed out of a test spec, and a
//! [`TestCaseResult`] is what running it produced.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The executable part of a test case.
///
/// The core never interprets a body; its meaning belongs to whichever
/// [`CaseExecutor`](crate::traits::CaseExecutor) runs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseBody {
    /// Source text, e.g. the `code` field of an OK-format case.
    Source(String),
    /// Serialized, already-compiled check decoded from an exception-format blob.
    Compiled(Vec<u8>),
}

impl CaseBody {
    /// Raw bytes of the body, whichever form it takes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            CaseBody::Source(s) => s.as_bytes(),
            CaseBody::Compiled(b) => b,
        }
    }
}

/// A single check within a test file.
///
/// Test cases are created while a spec is parsed and are immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    name: String,
    body: CaseBody,
    hidden: bool,
    success_message: Option<String>,
    failure_message: Option<String>,
}

impl TestCase {
    pub(crate) fn new(name: String, body: CaseBody) -> Self {
        Self {
            name,
            body,
            hidden: false,
            success_message: None,
            failure_message: None,
        }
    }

    pub(crate) fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub(crate) fn messages(mut self, success: Option<String>, failure: Option<String>) -> Self {
        self.success_message = success;
        self.failure_message = failure;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &CaseBody {
        &self.body
    }

    /// Whether this case is withheld from students.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.failure_message.as_deref()
    }
}

/// What an executor reports after running one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub passed: bool,
    /// Diagnostic output (captured stdout/stderr, assertion text, ...).
    #[serde(default)]
    pub message: String,
}

impl CaseOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// The recorded result of one test case.
///
/// `case_index` points back into the owning test file's case list; the result
/// never owns its case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub case_index: usize,
    pub passed: bool,
    pub message: String,
}

/// Which spec format a test file was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFormat {
    /// A base-64 serialized check unit; failures are signaled by errors.
    Exception,
    /// A structured OK-format mapping of named sub-checks.
    Ok,
}

impl TestFormat {
    /// Pick the format a raw metadata entry is written in: strings are
    /// exception blobs and mappings are OK specs.
    pub fn detect(raw: &serde_json::Value) -> Option<Self> {
        match raw {
            serde_json::Value::String(_) => Some(TestFormat::Exception),
            serde_json::Value::Object(_) => Some(TestFormat::Ok),
            _ => None,
        }
    }
}

impl fmt::Display for TestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestFormat::Exception => write!(f, "exception"),
            TestFormat::Ok => write!(f, "ok"),
        }
    }
}

impl std::str::FromStr for TestFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exception" | "exc" => Ok(TestFormat::Exception),
            "ok" => Ok(TestFormat::Ok),
            other => Err(format!("unknown test format: {other}")),
        }
    }
}
