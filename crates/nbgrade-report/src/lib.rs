//! nbgrade-report — Reports for a single graded question.
//!
//! A [`QuestionReport`] snapshots one run test file for JSON output, and
//! [`summary`] renders the text a student sees, with hidden cases withheld
//! when asked.

pub mod report;
pub mod summary;

pub use report::{CaseReport, QuestionReport};
pub use summary::summary;
