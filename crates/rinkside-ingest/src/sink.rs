//! Output artifact sink
//!
//! The pipeline's only side-effect surface: `persist` writes one named
//! artifact, `notify_failure` reports a failed run. Everything else in
//! the pipeline is pure with respect to the filesystem.

use rinkside_common::Result;
use std::path::PathBuf;
use tracing::{debug, error};

/// Collaborator interface for run outputs
pub trait OutputSink {
    /// Write (overwriting) one named artifact
    fn persist(&self, name: &str, content: &str) -> Result<()>;

    /// Report a failed run to whoever watches
    fn notify_failure(&self, message: &str);
}

/// Writes artifacts into a fixed directory, creating it on demand
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl OutputSink for DirSink {
    fn persist(&self, name: &str, content: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "artifact written");
        Ok(())
    }

    fn notify_failure(&self, message: &str) {
        error!(message = %message, "pipeline run failed");
    }
}
