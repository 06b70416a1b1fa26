use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::RunnerError;
use crate::model::Pipeline;

/// Owns the transient per-pipeline staging area used to capture each
/// pipeline's aggregate stdout in isolation, so concurrent pipelines never
/// interleave on the parent's own stdout (spec.md §4.2's rationale).
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Create the staging directory and assign + create every pipeline's
    /// staging file. Fails with [`RunnerError::StagingUnavailable`] if the
    /// directory already exists or cannot be created — the supervisor must
    /// abort before spawning anything in that case (spec.md §4.2).
    pub fn prepare(dir: PathBuf, ext: &str, pipelines: &mut [Pipeline]) -> Result<Self, RunnerError> {
        if dir.exists() {
            return Err(RunnerError::StagingUnavailable(format!(
                "{} already exists",
                dir.display()
            )));
        }

        create_staging_dir(&dir).map_err(|e| {
            RunnerError::StagingUnavailable(format!("failed to create {}: {e}", dir.display()))
        })?;

        for pipeline in pipelines.iter_mut() {
            let path = dir.join(format!("{}{ext}", pipeline.name));
            File::create(&path).map_err(|e| {
                RunnerError::StagingUnavailable(format!(
                    "failed to create staging file {}: {e}",
                    path.display()
                ))
            })?;
            pipeline.staging = path;
        }

        tracing::debug!(dir = %dir.display(), count = pipelines.len(), "staging area prepared");

        Ok(StagingArea { dir })
    }

    /// Remove one pipeline's staging file after its report has been emitted.
    pub fn remove_file(&self, path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove staging file");
        }
    }

    /// Remove the staging directory itself, after every pipeline has been
    /// reaped and its file removed (spec.md §3 invariant 4).
    pub fn cleanup(self) {
        if let Err(e) = std::fs::remove_dir(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "failed to remove staging directory");
        }
    }

    /// Best-effort removal used from the Ctrl-C handler, which only has a
    /// path, not a live `StagingArea` (it runs outside the normal control
    /// flow). Removes files and the directory itself, ignoring errors.
    pub fn force_cleanup(dir: &Path) {
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let _ = std::fs::remove_file(entry.path());
            }
        }
        let _ = std::fs::remove_dir(dir);
    }
}

#[cfg(unix)]
fn create_staging_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new().mode(0o755).create(dir)
}

#[cfg(not(unix))]
fn create_staging_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir(dir)
}
