use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::RadarResult;

/// Diagnostic sink for intermediate artifacts (overlay PNGs, the base canvas, the final GIF).
///
/// Nothing in a build depends on staging succeeding.
pub trait StagingSink {
    /// Persist `bytes` under `label` (a plain file name such as `base_image.png`).
    fn stage(&mut self, label: &str, bytes: &[u8]) -> RadarResult<()>;
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStaging;

impl StagingSink for NullStaging {
    fn stage(&mut self, _label: &str, _bytes: &[u8]) -> RadarResult<()> {
        Ok(())
    }
}

/// Writes each artifact as a file inside one directory.
#[derive(Clone, Debug)]
pub struct DirStagingSink {
    dir: PathBuf,
}

impl DirStagingSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StagingSink for DirStagingSink {
    fn stage(&mut self, label: &str, bytes: &[u8]) -> RadarResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create staging dir '{}'", self.dir.display()))?;
        let path = self.dir.join(label);
        std::fs::write(&path, bytes)
            .with_context(|| format!("write staged file '{}'", path.display()))?;
        Ok(())
    }
}

/// Stage an artifact, logging and swallowing any failure.
pub(crate) fn stage_best_effort(sink: &mut dyn StagingSink, label: &str, bytes: &[u8]) {
    match sink.stage(label, bytes) {
        Ok(()) => tracing::debug!(label, bytes = bytes.len(), "staged intermediate"),
        Err(e) => tracing::warn!(label, error = %e, "failed to stage intermediate"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/staging.rs"]
mod tests;
