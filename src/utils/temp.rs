//! Transient PDF files.
//!
//! A [`TempPdf`] owns one uniquely named file for the length of a single
//! extraction. The file is removed exactly once, when the guard is dropped,
//! on every exit path.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tempfile::TempPath;

/// Disambiguates files created within the same microsecond
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Scoped temporary PDF file, deleted on drop
#[derive(Debug)]
pub struct TempPdf {
    path: PathBuf,
    guard: Option<TempPath>,
}

impl TempPdf {
    /// Create an empty, uniquely named `.pdf` file in `dir`.
    ///
    /// Returns the guard plus an open write handle to the file.
    pub fn create_in(dir: &Path) -> std::io::Result<(Self, File)> {
        let prefix = format!(
            "arxiv_temp_{}_{}_",
            chrono::Utc::now().timestamp_micros(),
            SEQUENCE.fetch_add(1, Ordering::Relaxed)
        );

        let (file, guard) = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".pdf")
            .tempfile_in(dir)?
            .into_parts();

        let path = guard.to_path_buf();
        tracing::debug!("Created temporary PDF {}", path.display());

        Ok((
            Self {
                path,
                guard: Some(guard),
            },
            file,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempPdf {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.take() {
            // Cleanup failures are reported but never replace the extraction outcome
            match guard.close() {
                Ok(()) => tracing::debug!("Removed temporary PDF {}", self.path.display()),
                Err(e) => tracing::warn!(
                    "Failed to remove temporary PDF {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }
    }
}
