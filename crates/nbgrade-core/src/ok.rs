//! OK-format test spec parser.
//!
//! An OK spec is a mapping that lists its sub-checks explicitly:
//!
//! ```json
//! {
//!     "name": "q1",
//!     "points": 2,
//!     "all_or_nothing": false,
//!     "cases": [
//!         {"name": "q1 - 1", "code": ">>> square(2)\n4", "hidden": false},
//!         {"name": "q1 - 2", "code": ">>> square(-3)\n9", "hidden": true}
//!     ]
//! }
//! ```
//!
//! Cases may also sit inside `suites[].cases`, and `cases` may be a mapping
//! keyed by case name. Sub-checks are always kept in declared order.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{GradeError, Result};
use crate::model::{CaseBody, TestFormat};
use crate::test_file::TestFile;
use crate::traits::CheckRecord;

/// Fields read from the top level of an OK spec.
#[derive(Debug)]
pub(crate) struct OkSpec {
    pub name: Option<String>,
    pub points: Option<f64>,
    pub all_or_nothing: Option<bool>,
    pub records: Vec<CheckRecord>,
}

/// Parse an OK-format spec into an ungraded test file.
///
/// The file is named by the spec's `name` field, or by the stem of `path`
/// when the spec has none.
pub fn from_spec(raw: &Value, path: &Path) -> Result<TestFile> {
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    from_spec_named(raw, path, &fallback)
}

pub(crate) fn from_spec_named(raw: &Value, path: &Path, fallback_name: &str) -> Result<TestFile> {
    let spec = read_spec(raw, path)?;
    let name = spec.name.unwrap_or_else(|| fallback_name.to_string());
    tracing::debug!(
        "parsed OK spec {name} from {}: {} case(s)",
        path.display(),
        spec.records.len()
    );
    TestFile::assemble(
        name,
        path,
        TestFormat::Ok,
        spec.records,
        spec.points,
        spec.all_or_nothing,
    )
}

/// Read the structure of an OK spec without building a test file.
pub(crate) fn read_spec(raw: &Value, path: &Path) -> Result<OkSpec> {
    let obj = raw.as_object().ok_or_else(|| {
        GradeError::malformed(
            path,
            format!("OK spec must be a mapping, found {}", kind(raw)),
        )
    })?;

    let name = opt_str(obj, "name", path, "spec")?;
    let points = read_points(obj, path)?;
    let all_or_nothing = opt_bool(obj, "all_or_nothing", path, "spec")?;

    let cases = obj.get("cases").filter(|v| !v.is_null());
    let suites = obj.get("suites").filter(|v| !v.is_null());
    if cases.is_none() && suites.is_none() {
        return Err(GradeError::malformed(
            path,
            "OK spec has neither `cases` nor `suites`",
        ));
    }

    let mut records = Vec::new();
    if let Some(cases) = cases {
        read_cases(cases, path, &mut records)?;
    }
    if let Some(suites) = suites {
        let suites = suites
            .as_array()
            .ok_or_else(|| GradeError::malformed(path, "`suites` must be a list"))?;
        for (i, suite) in suites.iter().enumerate() {
            let suite = suite.as_object().ok_or_else(|| {
                GradeError::malformed(path, format!("suite {} must be a mapping", i + 1))
            })?;
            let ctx = format!("suite {}", i + 1);
            if opt_bool(suite, "scored", path, &ctx)? == Some(false) {
                tracing::debug!("skipping unscored {ctx} in {}", path.display());
                continue;
            }
            let cases = suite
                .get("cases")
                .ok_or_else(|| GradeError::malformed(path, format!("{ctx} has no `cases`")))?;
            read_cases(cases, path, &mut records)?;
        }
    }

    Ok(OkSpec {
        name,
        points,
        all_or_nothing,
        records,
    })
}

fn read_cases(cases: &Value, path: &Path, out: &mut Vec<CheckRecord>) -> Result<()> {
    match cases {
        Value::Array(items) => {
            for item in items {
                let position = out.len() + 1;
                out.push(read_case(item, None, path, position)?);
            }
        }
        Value::Object(entries) => {
            for (key, item) in entries {
                let position = out.len() + 1;
                out.push(read_case(item, Some(key.as_str()), path, position)?);
            }
        }
        other => {
            return Err(GradeError::malformed(
                path,
                format!("`cases` must be a list or mapping, found {}", kind(other)),
            ))
        }
    }
    Ok(())
}

fn read_case(
    value: &Value,
    key: Option<&str>,
    path: &Path,
    position: usize,
) -> Result<CheckRecord> {
    let ctx = format!("case {position}");
    let obj = value.as_object().ok_or_else(|| {
        GradeError::malformed(path, format!("{ctx} must be a mapping, found {}", kind(value)))
    })?;

    let name = opt_str(obj, "name", path, &ctx)?.or_else(|| key.map(str::to_string));
    let code = opt_str(obj, "code", path, &ctx)?;
    if name.is_none() && code.is_none() {
        return Err(GradeError::malformed(
            path,
            format!("{ctx} is missing required field `name` or `code`"),
        ));
    }

    Ok(CheckRecord {
        name,
        body: CaseBody::Source(code.unwrap_or_default()),
        hidden: opt_bool(obj, "hidden", path, &ctx)?.unwrap_or(false),
        success_message: opt_str(obj, "success_message", path, &ctx)?,
        failure_message: opt_str(obj, "failure_message", path, &ctx)?,
    })
}

/// `points` wins over `value` when both are given.
fn read_points(obj: &Map<String, Value>, path: &Path) -> Result<Option<f64>> {
    let Some((key, raw)) = ["points", "value"]
        .into_iter()
        .find_map(|k| obj.get(k).filter(|v| !v.is_null()).map(|v| (k, v)))
    else {
        return Ok(None);
    };

    match raw.as_f64() {
        Some(p) if p.is_finite() && p > 0.0 => Ok(Some(p)),
        _ => Err(GradeError::malformed(
            path,
            format!("`{key}` must be a positive number, found {raw}"),
        )),
    }
}

fn opt_str(obj: &Map<String, Value>, key: &str, path: &Path, ctx: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(GradeError::malformed(
            path,
            format!("{ctx}: `{key}` must be a string, found {}", kind(other)),
        )),
    }
}

fn opt_bool(obj: &Map<String, Value>, key: &str, path: &Path, ctx: &str) -> Result<Option<bool>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(GradeError::malformed(
            path,
            format!("{ctx}: `{key}` must be a boolean, found {}", kind(other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
