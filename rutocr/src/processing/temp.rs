use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;

/// Request-scoped temp file holding the downloaded image.
///
/// The path is reserved by [`TempArtifact::allocate`] and the file only
/// exists after [`TempArtifact::persist`]. Exactly one removal is attempted:
/// by [`TempArtifact::release`] on the normal path, or by `Drop` if the owning
/// task is cancelled or unwinds first. Removal failures are never returned to
/// the caller.
#[derive(Debug)]
pub struct TempArtifact {
    path: PathBuf,
    created_at: DateTime<Utc>,
    persisted: bool,
    released: bool,
    debug: bool,
}

impl TempArtifact {
    /// Reserve a unique path inside `dir`, creating the directory if needed.
    pub async fn allocate(dir: &Path, debug: bool) -> Result<Self> {
        tokio::fs::create_dir_all(dir).await?;

        Ok(Self {
            path: dir.join(format!("{}.img", Uuid::new_v4())),
            created_at: Utc::now(),
            persisted: false,
            released: false,
            debug,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub async fn persist(&mut self, bytes: &[u8]) -> Result<()> {
        // Flag first: a partial write still leaves a file behind.
        self.persisted = true;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    /// Delete the file. Attempted whether or not `persist` ran; a file that
    /// was never written shows up as `NotFound` and is ignored.
    pub async fn release(mut self) {
        self.released = true;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::trace!(
                path = %self.path.display(),
                age_ms = (Utc::now() - self.created_at).num_milliseconds(),
                "Temp artifact removed"
            ),
            Err(e) => self.warn_cleanup_failed(&e),
        }
    }

    fn warn_cleanup_failed(&self, err: &std::io::Error) {
        if self.debug && err.kind() != ErrorKind::NotFound {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "Could not remove temp artifact"
            );
        }
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = std::fs::remove_file(&self.path) {
            self.warn_cleanup_failed(&e);
        }
    }
}
