//! Student-facing text summary of a graded question.

use crate::report::QuestionReport;

/// Render the results of one question.
///
/// With `public_only`, hidden cases are left out entirely: their messages are
/// never shown and their failures are not mentioned.
///
/// ```text
/// q1 results:
///     q1 - 2 result:
///         Trying:
///             square(3)
///         Expecting:
///             9
/// ```
pub fn summary(report: &QuestionReport, public_only: bool) -> String {
    let visible: Vec<_> = if public_only {
        report.public_cases().collect()
    } else {
        report.cases.iter().collect()
    };

    let failed: Vec<_> = visible.iter().filter(|c| !c.passed).collect();
    if failed.is_empty() {
        let scope = if public_only && visible.len() < report.cases.len() {
            "All public test cases passed!"
        } else {
            "All test cases passed!"
        };
        return format!("{} results: {scope}", report.name);
    }

    let mut out = format!("{} results:", report.name);
    for case in failed {
        out.push_str(&format!("\n    {} result:", case.name));
        for line in case.message.lines() {
            if line.trim().is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!("\n        {line}"));
            }
        }
    }
    out
}

/// One-line score, e.g. `q1: 1.5 / 3 (50.0%)`.
pub fn score_line(report: &QuestionReport) -> String {
    format!(
        "{}: {} / {} ({:.1}%)",
        report.name,
        report.grade,
        report.value,
        report.fraction * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CaseReport;
    use nbgrade_core::TestFormat;

    fn report(cases: Vec<(&str, bool, bool, &str)>) -> QuestionReport {
        let cases: Vec<CaseReport> = cases
            .into_iter()
            .map(|(name, hidden, passed, message)| CaseReport {
                name: name.into(),
                hidden,
                passed,
                message: message.into(),
            })
            .collect();
        let passed = cases.iter().filter(|c| c.passed).count();
        QuestionReport {
            name: "q1".into(),
            path: "hw.ipynb".into(),
            format: TestFormat::Ok,
            created_at: chrono::Utc::now(),
            value: 3.0,
            grade: 3.0 * passed as f64 / cases.len() as f64,
            fraction: passed as f64 / cases.len() as f64,
            all_or_nothing: false,
            passed_all: passed == cases.len(),
            cases,
        }
    }

    #[test]
    fn all_passed() {
        let r = report(vec![("a", false, true, ""), ("b", true, true, "")]);
        assert_eq!(summary(&r, false), "q1 results: All test cases passed!");
        assert_eq!(summary(&r, true), "q1 results: All public test cases passed!");
    }

    #[test]
    fn failures_are_indented() {
        let r = report(vec![
            ("q1 - 1", false, true, "fine"),
            ("q1 - 2", false, false, "Expected:\n    9\nGot:\n    8"),
        ]);
        let text = summary(&r, false);
        assert_eq!(
            text,
            "q1 results:\n    q1 - 2 result:\n        Expected:\n            9\n        Got:\n            8"
        );
        assert!(!text.contains("fine"));
    }

    #[test]
    fn public_only_hides_hidden_failures() {
        let r = report(vec![
            ("visible", false, true, ""),
            ("secret", true, false, "the hidden answer is 42"),
        ]);
        let public = summary(&r, true);
        assert!(!public.contains("42"), "got: {public}");
        assert!(public.contains("All public test cases passed!"));

        let full = summary(&r, false);
        assert!(full.contains("the hidden answer is 42"));
    }

    #[test]
    fn score_line_format() {
        let r = report(vec![("a", false, true, ""), ("b", false, false, "")]);
        assert_eq!(score_line(&r), "q1: 1.5 / 3 (50.0%)");
    }
}
