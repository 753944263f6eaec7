//! `nbgrade.toml` configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use nbgrade_core::exception::decoder_by_name;
use nbgrade_core::{MetadataExtractor, SpecContext, DEFAULT_NAMESPACE_KEY};

/// Top-level nbgrade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NbgradeConfig {
    /// Metadata key the grading tool stores its tests under.
    #[serde(default = "default_namespace_key")]
    pub namespace_key: String,
    /// Program each case body is handed to.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Arguments placed before the body file.
    #[serde(default)]
    pub interpreter_args: Vec<String>,
    /// Per-case timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// How exception-format blobs are split into cases: `opaque` or `json`.
    #[serde(default = "default_decoder")]
    pub decoder: String,
    /// Where per-case scratch directories are created (system temp if unset).
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

fn default_namespace_key() -> String {
    DEFAULT_NAMESPACE_KEY.to_string()
}
fn default_interpreter() -> String {
    "python3".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_decoder() -> String {
    "opaque".to_string()
}

impl Default for NbgradeConfig {
    fn default() -> Self {
        Self {
            namespace_key: default_namespace_key(),
            interpreter: default_interpreter(),
            interpreter_args: Vec::new(),
            timeout_secs: default_timeout(),
            decoder: default_decoder(),
            scratch_dir: None,
        }
    }
}

impl NbgradeConfig {
    /// Extractor and decoder described by this config.
    pub fn spec_context(&self) -> Result<SpecContext> {
        let decoder = decoder_by_name(&self.decoder).with_context(|| {
            format!(
                "unknown decoder '{}' (expected 'opaque' or 'json')",
                self.decoder
            )
        })?;
        Ok(SpecContext::new(
            MetadataExtractor::new(self.namespace_key.clone()),
            decoder,
        ))
    }
}

/// Load config from an explicit path, or from `nbgrade.toml` in the current
/// directory, falling back to defaults.
///
/// `NBGRADE_INTERPRETER` overrides the configured interpreter.
pub fn load_config_from(path: Option<&Path>) -> Result<NbgradeConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => Some(PathBuf::from("nbgrade.toml")).filter(|p| p.exists()),
    };

    let mut config = match config_path {
        Some(p) => {
            let content = std::fs::read_to_string(&p)
                .with_context(|| format!("failed to read config: {}", p.display()))?;
            parse_config(&content).with_context(|| format!("failed to parse config: {}", p.display()))?
        }
        None => NbgradeConfig::default(),
    };

    if let Ok(interpreter) = std::env::var("NBGRADE_INTERPRETER") {
        if !interpreter.is_empty() {
            tracing::debug!("interpreter overridden from environment: {interpreter}");
            config.interpreter = interpreter;
        }
    }

    Ok(config)
}

pub fn parse_config(content: &str) -> Result<NbgradeConfig> {
    let config: NbgradeConfig = toml::from_str(content)?;
    anyhow::ensure!(config.timeout_secs > 0, "timeout_secs must be at least 1");
    anyhow::ensure!(
        !config.namespace_key.is_empty(),
        "namespace_key must not be empty"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.namespace_key, "otter");
        assert_eq!(config.interpreter, "python3");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.decoder, "opaque");
        assert!(config.scratch_dir.is_none());
    }

    #[test]
    fn parses_all_fields() {
        let config = parse_config(
            r#"
namespace_key = "grader"
interpreter = "sh"
interpreter_args = ["-e"]
timeout_secs = 5
decoder = "json"
scratch_dir = "/tmp/nbgrade"
"#,
        )
        .unwrap();
        assert_eq!(config.namespace_key, "grader");
        assert_eq!(config.interpreter_args, vec!["-e"]);
        assert_eq!(config.scratch_dir, Some(PathBuf::from("/tmp/nbgrade")));
        let ctx = config.spec_context().unwrap();
        assert_eq!(ctx.extractor.namespace_key(), "grader");
        assert_eq!(ctx.decoder.name(), "json");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse_config("timeout_secs = 0").is_err());
        assert!(parse_config("namespace_key = \"\"").is_err());

        let config = parse_config("decoder = \"pickle\"").unwrap();
        assert!(config.spec_context().is_err());
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/nbgrade.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
