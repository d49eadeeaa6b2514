//! Saving test reports to disk as plain-text files

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::ReportError;
use crate::report::TestReport;

/// Writes reports into a directory as `vision_test_{unix_secs}.txt`
#[derive(Debug, Clone)]
pub struct ReportSaver {
    dir: PathBuf,
    saved_count: usize,
}

impl ReportSaver {
    /// Create a saver, creating `dir` if needed
    ///
    /// # Arguments
    /// * `dir` - Directory reports are written into
    ///
    /// # Returns
    /// A saver with no reports saved yet
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self, ReportError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;

        info!("Saving reports to {}", dir.display());

        Ok(Self {
            dir,
            saved_count: 0,
        })
    }

    /// Save a report and return its path
    ///
    /// Several reports saved within the same second get a `_N` suffix.
    ///
    /// # Arguments
    /// * `report` - Finished test report, written in its download format
    ///
    /// # Returns
    /// Path of the newly written file; existing files are never overwritten
    pub async fn save(&mut self, report: &TestReport) -> Result<PathBuf, ReportError> {
        let stem = format!("vision_test_{}", report.timestamp.timestamp());

        let mut file_path = self.dir.join(format!("{}.txt", stem));
        let mut n = 1;
        while fs::try_exists(&file_path).await? {
            file_path = self.dir.join(format!("{}_{}.txt", stem, n));
            n += 1;
        }

        let contents = report.to_download_text();
        fs::write(&file_path, &contents).await?;
        self.saved_count += 1;

        debug!(
            "Saved report: {} ({} bytes)",
            file_path.display(),
            contents.len()
        );

        Ok(file_path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn saved_count(&self) -> usize {
        self.saved_count
    }
}
