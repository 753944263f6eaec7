//! Scratch directory a single case body runs in.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tempfile::TempDir;

use nbgrade_core::CaseBody;

/// A throwaway working directory holding one case body.
///
/// On drop, the temporary directory is automatically cleaned up.
pub struct ScratchDir {
    work_dir: TempDir,
    timeout: Duration,
}

impl ScratchDir {
    /// Create a fresh scratch directory, optionally under `parent`.
    pub fn new(parent: Option<&Path>, timeout: Duration) -> Result<Self> {
        let work_dir = match parent {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
                TempDir::new_in(dir)
            }
            None => TempDir::new(),
        }
        .context("failed to create temp directory")?;

        Ok(Self { work_dir, timeout })
    }

    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Write a case body to disk and return its path.
    ///
    /// Source bodies are written as `case.src`, compiled ones as `case.bin`.
    pub fn write_body(&self, body: &CaseBody) -> Result<PathBuf> {
        let filename = match body {
            CaseBody::Source(_) => "case.src",
            CaseBody::Compiled(_) => "case.bin",
        };
        let path = self.work_dir.path().join(filename);
        std::fs::write(&path, body.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_source_and_compiled_bodies() {
        let scratch = ScratchDir::new(None, Duration::from_secs(5)).unwrap();
        let src = scratch
            .write_body(&CaseBody::Source("assert 1 == 1".into()))
            .unwrap();
        assert!(src.ends_with("case.src"));
        assert_eq!(std::fs::read_to_string(&src).unwrap(), "assert 1 == 1");

        let bin = scratch
            .write_body(&CaseBody::Compiled(vec![0, 159, 146]))
            .unwrap();
        assert!(bin.ends_with("case.bin"));
        assert_eq!(std::fs::read(&bin).unwrap(), vec![0, 159, 146]);
    }

    #[test]
    fn removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let path = {
            let scratch = ScratchDir::new(Some(parent.path()), Duration::from_secs(1)).unwrap();
            assert!(scratch.work_dir().starts_with(parent.path()));
            scratch.work_dir().to_path_buf()
        };
        assert!(!path.exists());
    }
}
