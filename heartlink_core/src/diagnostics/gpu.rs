//! GPU availability probe.
//!
//! The backend is chosen at probe time: the NVIDIA kernel driver interface
//! when it is present, otherwise the vendor listing tool. A failed driver
//! query is reported as is; it does not fall through to the tool.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;

use super::probes::{single_line, Probe};
use super::status::CheckRecord;
use crate::command::CommandRunner;
use crate::config::DoctorConfig;

const INSTALL_HINT: &str =
    "no GPU driver or nvidia-smi found, install the NVIDIA driver and CUDA runtime if GPU acceleration is needed";

#[derive(Error, Debug)]
pub enum GpuQueryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("device information at {0} has no Model entry")]
    MissingModel(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuBackend {
    /// Kernel driver interface rooted at the given directory.
    NativeLibrary(PathBuf),
    /// Vendor listing tool, e.g. `nvidia-smi`.
    CommandLineTool(String),
    Unavailable,
}

impl GpuBackend {
    pub fn select(driver_root: &Path, gpu_tool: &str) -> Self {
        if driver_root.join("version").is_file() {
            GpuBackend::NativeLibrary(driver_root.to_path_buf())
        } else if !gpu_tool.trim().is_empty() {
            GpuBackend::CommandLineTool(gpu_tool.to_string())
        } else {
            GpuBackend::Unavailable
        }
    }
}

/// Model name of the first device, `None` when the driver lists no devices.
pub async fn query_driver(driver_root: &Path) -> Result<Option<String>, GpuQueryError> {
    let gpus_dir = driver_root.join("gpus");

    let mut entries = match fs::read_dir(&gpus_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(GpuQueryError::Io { path: gpus_dir, source }),
    };

    let mut devices = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => devices.push(entry.path()),
            Ok(None) => break,
            Err(source) => return Err(GpuQueryError::Io { path: gpus_dir, source }),
        }
    }
    devices.sort();

    let Some(first) = devices.first() else {
        return Ok(None);
    };

    let info_path = first.join("information");
    let info = fs::read_to_string(&info_path)
        .await
        .map_err(|source| GpuQueryError::Io {
            path: info_path.clone(),
            source,
        })?;

    info.lines()
        .find_map(|line| line.trim().strip_prefix("Model:"))
        .map(|model| Some(model.trim().to_string()))
        .ok_or(GpuQueryError::MissingModel(info_path))
}

pub struct GpuProbe {
    driver_root: PathBuf,
    gpu_tool: String,
    timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl GpuProbe {
    pub fn new(
        driver_root: impl Into<PathBuf>,
        gpu_tool: impl Into<String>,
        timeout: Duration,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            driver_root: driver_root.into(),
            gpu_tool: gpu_tool.into(),
            timeout,
            runner,
        }
    }

    pub fn from_config(config: &DoctorConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(
            &config.gpu.driver_root,
            &config.commands.gpu_tool,
            config.command_timeout(),
            runner,
        )
    }

    pub fn backend(&self) -> GpuBackend {
        GpuBackend::select(&self.driver_root, &self.gpu_tool)
    }

    async fn check_native(&self, driver_root: &Path) -> CheckRecord {
        match query_driver(driver_root).await {
            Ok(Some(model)) => CheckRecord::ok(self.name(), format!("GPU detected: {}", model)),
            Ok(None) => CheckRecord::warn(
                self.name(),
                "GPU driver present but no compatible device found, check the driver or CUDA version",
            ),
            Err(e) => CheckRecord::warn(
                self.name(),
                format!("GPU driver present but device query failed: {}", e),
            ),
        }
    }

    async fn check_tool(&self, tool: &str) -> CheckRecord {
        let outcome = self
            .runner
            .run(&crate::command::argv([tool]), self.timeout)
            .await;

        if outcome.succeeded {
            CheckRecord::ok(
                self.name(),
                format!("{} output: {}", tool, single_line(&outcome.output)),
            )
        } else {
            CheckRecord::warn(self.name(), INSTALL_HINT)
        }
    }
}

#[async_trait]
impl Probe for GpuProbe {
    fn name(&self) -> &str {
        "gpu"
    }

    async fn check(&self) -> CheckRecord {
        let backend = self.backend();
        tracing::debug!("GPU backend selected: {:?}", backend);

        match backend {
            GpuBackend::NativeLibrary(root) => self.check_native(&root).await,
            GpuBackend::CommandLineTool(tool) => self.check_tool(&tool).await,
            GpuBackend::Unavailable => CheckRecord::warn(self.name(), INSTALL_HINT),
        }
    }
}
