//! Grading engine.
//!
//! Turns per-case pass/fail counts into a point value under either the
//! all-or-nothing or the proportional partial-credit policy.

use serde::{Deserialize, Serialize};

/// Point value and policy used to score a test file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradingPolicy {
    /// Total points available.
    pub value: f64,
    /// Award `value` only when every case passes.
    pub all_or_nothing: bool,
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            value: 1.0,
            all_or_nothing: true,
        }
    }
}

impl GradingPolicy {
    /// Points earned when `passed` of `total` cases passed.
    ///
    /// A full pass earns exactly `value` and no passes earn exactly zero
    /// under either policy. Partial credit in between is `value * k / n`,
    /// clamped to `[0, value]`.
    pub fn score(&self, passed: usize, total: usize) -> f64 {
        if total == 0 || passed == 0 {
            return 0.0;
        }
        if passed >= total {
            return self.value;
        }
        if self.all_or_nothing {
            return 0.0;
        }
        ((self.value * passed as f64) / total as f64).clamp(0.0, self.value)
    }

    /// Score as a fraction of the available points, in `[0, 1]`.
    pub fn fraction(&self, passed: usize, total: usize) -> f64 {
        if total == 0 || passed == 0 {
            return 0.0;
        }
        if passed >= total {
            return 1.0;
        }
        if self.all_or_nothing {
            0.0
        } else {
            passed as f64 / total as f64
        }
    }
}
