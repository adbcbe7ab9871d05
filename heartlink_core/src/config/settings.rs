use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorConfig {
    pub paths: PathConfig,
    pub commands: CommandConfig,
    pub gpu: GpuConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Anchor every relative path below is resolved against.
    pub project_root: PathBuf,
    pub secrets_file: PathBuf,
    pub data_dir: PathBuf,
    pub report_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    pub timeout_seconds: u64,
    /// Interpreter whose `-m pip --version` is probed.
    pub python: String,
    /// Vendor GPU listing tool; empty disables the command-line fallback.
    pub gpu_tool: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuConfig {
    pub driver_root: PathBuf,
}

impl Default for DoctorConfig {
    fn default() -> Self {
        Self {
            paths: PathConfig::default(),
            commands: CommandConfig::default(),
            gpu: GpuConfig::default(),
        }
    }
}

/// Workspace root this binary was built from; the fixed anchor for `.env`
/// and the data directory unless overridden.
pub fn default_project_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap_or(manifest_dir).to_path_buf()
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            project_root: default_project_root(),
            secrets_file: PathBuf::from(".env"),
            data_dir: PathBuf::from("data"),
            report_file: "env_report.txt".to_string(),
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 5,
            python: "python3".to_string(),
            gpu_tool: "nvidia-smi".to_string(),
        }
    }
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            driver_root: PathBuf::from("/proc/driver/nvidia"),
        }
    }
}

impl DoctorConfig {
    /// Layers defaults, `heartlink.toml` at the project root, an optional
    /// explicit file and `HEARTLINK_*` environment variables, in that order.
    pub fn load(extra_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&DoctorConfig::default())?);

        let project_file = default_project_root().join("heartlink.toml");
        if project_file.is_file() {
            builder = builder.add_source(File::from(project_file.as_path()));
        }

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("HEARTLINK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut doctor_config: DoctorConfig = config.try_deserialize()?;

        doctor_config.validate()?;
        doctor_config.resolve_project_root()?;

        tracing::debug!("Project root resolved to {}", doctor_config.paths.project_root.display());

        Ok(doctor_config)
    }

    /// Defaults anchored at an explicit project root.
    pub fn for_project_root(project_root: impl Into<PathBuf>) -> Self {
        let mut config = DoctorConfig::default();
        config.paths.project_root = project_root.into();
        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.commands.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "Command timeout must be greater than 0".to_string(),
            )
            .into());
        }

        if self.commands.python.trim().is_empty() {
            return Err(ConfigError::Message(
                "Python interpreter cannot be empty".to_string(),
            )
            .into());
        }

        if self.paths.report_file.trim().is_empty() {
            return Err(ConfigError::Message(
                "Report file name cannot be empty".to_string(),
            )
            .into());
        }

        if Path::new(&self.paths.report_file).components().count() != 1 {
            return Err(ConfigError::Message(
                "Report file name must not contain path separators".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Relative overrides are taken relative to the current directory.
    fn resolve_project_root(&mut self) -> Result<()> {
        if self.paths.project_root.is_relative() {
            let cwd = std::env::current_dir()?;
            self.paths.project_root = cwd.join(&self.paths.project_root);
        }
        Ok(())
    }

    pub fn secrets_file_path(&self) -> PathBuf {
        self.paths.project_root.join(&self.paths.secrets_file)
    }

    pub fn data_directory(&self) -> PathBuf {
        self.paths.project_root.join(&self.paths.data_dir)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.commands.timeout_seconds)
    }
}
