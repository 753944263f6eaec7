//! Capability traits injected into the test-file layer.
//!
//! Executing a case and decoding a serialized check blob both depend on a
//! concrete runtime, so the core only defines the seams. `nbgrade-runner`
//! provides executors; [`crate::exception`] provides the stock decoders.

use crate::model::{CaseBody, CaseOutcome, TestCase};

// ---------------------------------------------------------------------------
// Case executor
// ---------------------------------------------------------------------------

/// Runs one test case and reports whether it passed.
///
/// Implementations must not fail outright: an error while running a body is a
/// failed case, reported through [`CaseOutcome::fail`].
pub trait CaseExecutor {
    fn execute(&self, case: &TestCase) -> CaseOutcome;
}

impl<F> CaseExecutor for F
where
    F: Fn(&TestCase) -> CaseOutcome,
{
    fn execute(&self, case: &TestCase) -> CaseOutcome {
        self(case)
    }
}

// ---------------------------------------------------------------------------
// Blob decoder
// ---------------------------------------------------------------------------

/// Turns the decoded bytes of an exception-format blob into check records.
pub trait BlobDecoder: Send + Sync {
    /// Short identifier used in logs and config (`"opaque"`, `"json"`).
    fn name(&self) -> &str;

    fn decode(&self, payload: &[u8]) -> anyhow::Result<DecodedBlob>;
}

/// The checks a blob contains, in the order the blob lists them.
#[derive(Debug, Clone, Default)]
pub struct DecodedBlob {
    pub records: Vec<CheckRecord>,
    /// Point value carried by the blob, if any.
    pub points: Option<f64>,
    /// Grading policy carried by the blob, if any.
    pub all_or_nothing: Option<bool>,
}

/// One executable check reported by a [`BlobDecoder`].
#[derive(Debug, Clone)]
pub struct CheckRecord {
    /// Case name; unnamed records get a positional name.
    pub name: Option<String>,
    pub body: CaseBody,
    pub hidden: bool,
    pub success_message: Option<String>,
    pub failure_message: Option<String>,
}

impl CheckRecord {
    pub fn new(body: CaseBody) -> Self {
        Self {
            name: None,
            body,
            hidden: false,
            success_message: None,
            failure_message: None,
        }
    }
}
