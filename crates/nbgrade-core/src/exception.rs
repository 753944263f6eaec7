//! Exception-format test spec parser.
//!
//! The metadata entry is a base-64 string holding one serialized check unit.
//! What the unit contains is only known to the runtime that produced it, so
//! splitting it into cases is delegated to a [`BlobDecoder`].

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::Value;

use crate::error::{GradeError, Result};
use crate::model::{CaseBody, TestFormat};
use crate::ok;
use crate::test_file::TestFile;
use crate::traits::{BlobDecoder, CheckRecord, DecodedBlob};

/// Parse an exception-format spec into an ungraded test file.
///
/// The file is named after the stem of `path`.
pub fn from_raw_spec(raw: &Value, path: &Path, decoder: &dyn BlobDecoder) -> Result<TestFile> {
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    from_raw_spec_named(raw, path, &fallback, decoder)
}

pub(crate) fn from_raw_spec_named(
    raw: &Value,
    path: &Path,
    name: &str,
    decoder: &dyn BlobDecoder,
) -> Result<TestFile> {
    let encoded = raw.as_str().ok_or_else(|| {
        GradeError::malformed(path, "exception-format spec must be a base-64 string")
    })?;
    let payload = decode_base64(encoded, path)?;

    let blob = decoder.decode(&payload).map_err(|e| {
        GradeError::malformed(
            path,
            format!("{} decoder rejected payload: {e:#}", decoder.name()),
        )
    })?;
    tracing::debug!(
        "decoded {} byte payload for {name} with {} decoder: {} case(s)",
        payload.len(),
        decoder.name(),
        blob.records.len()
    );

    TestFile::assemble(
        name.to_string(),
        path,
        TestFormat::Exception,
        blob.records,
        blob.points,
        blob.all_or_nothing,
    )
}

fn decode_base64(encoded: &str, path: &Path) -> Result<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(GradeError::malformed(path, "exception-format spec is empty"));
    }
    BASE64
        .decode(compact.as_bytes())
        .map_err(|e| GradeError::malformed(path, format!("invalid base-64 payload: {e}")))
}

// ---------------------------------------------------------------------------
// Stock decoders
// ---------------------------------------------------------------------------

/// Treats the whole payload as a single compiled check.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueBlobDecoder;

impl BlobDecoder for OpaqueBlobDecoder {
    fn name(&self) -> &str {
        "opaque"
    }

    fn decode(&self, payload: &[u8]) -> anyhow::Result<DecodedBlob> {
        Ok(DecodedBlob {
            records: vec![CheckRecord::new(CaseBody::Compiled(payload.to_vec()))],
            points: None,
            all_or_nothing: None,
        })
    }
}

/// Reads the payload as a UTF-8 JSON document laid out like an OK spec.
///
/// This lets a tool serialize several named checks into one blob while still
/// storing it in the exception-format slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBlobDecoder;

impl BlobDecoder for JsonBlobDecoder {
    fn name(&self) -> &str {
        "json"
    }

    fn decode(&self, payload: &[u8]) -> anyhow::Result<DecodedBlob> {
        let value: Value = serde_json::from_slice(payload)?;
        let spec = ok::read_spec(&value, Path::new("<blob>"))?;
        Ok(DecodedBlob {
            records: spec.records,
            points: spec.points,
            all_or_nothing: spec.all_or_nothing,
        })
    }
}

/// Look up a stock decoder by the name used in configuration.
pub fn decoder_by_name(name: &str) -> Option<Box<dyn BlobDecoder>> {
    match name {
        "opaque" => Some(Box::new(OpaqueBlobDecoder)),
        "json" => Some(Box::new(JsonBlobDecoder)),
        _ => None,
    }
}
