//! Writes the rendered report to the data directory.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::config::DoctorConfig;
use crate::error::Result;

/// Creates `target_dir` if needed and overwrites `file_name` inside it with
/// `text` plus a trailing newline. Returns the absolute path written.
pub async fn persist(text: &str, target_dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(target_dir).await?;

    let path = fs::canonicalize(target_dir).await?.join(file_name);
    fs::write(&path, format!("{}\n", text)).await?;

    info!("Report written to {}", path.display());
    Ok(path)
}

#[derive(Debug, Clone)]
pub struct ReportSink {
    directory: PathBuf,
    file_name: String,
}

impl ReportSink {
    pub fn new(directory: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
        }
    }

    pub fn from_config(config: &DoctorConfig) -> Self {
        Self::new(config.data_directory(), &config.paths.report_file)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Creates the data directory without writing anything.
    pub async fn ensure_directory(&self) -> Result<&Path> {
        fs::create_dir_all(&self.directory).await?;
        Ok(&self.directory)
    }

    pub async fn persist(&self, text: &str) -> Result<PathBuf> {
        persist(text, &self.directory, &self.file_name).await
    }
}
