//! nbgrade-core — Notebook metadata test files and grading.
//!
//! Parses the grading specs stored in a notebook's metadata (exception-format
//! blobs and OK-format mappings) into [`TestFile`]s, runs their cases through
//! an injected [`CaseExecutor`], and scores them all-or-nothing or with
//! partial credit.

pub mod error;
pub mod exception;
pub mod grading;
pub mod metadata;
pub mod model;
pub mod ok;
pub mod test_file;
pub mod traits;

pub use error::{GradeError, Result};
pub use grading::GradingPolicy;
pub use metadata::{MetadataExtractor, DEFAULT_NAMESPACE_KEY};
pub use model::{CaseBody, CaseOutcome, TestCase, TestCaseResult, TestFormat};
pub use test_file::{SpecContext, TestFile};
pub use traits::{BlobDecoder, CaseExecutor, CheckRecord, DecodedBlob};
