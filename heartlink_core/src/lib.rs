//! Core library for the HeartLink environment doctor: probes, the diagnostic
//! engine, report rendering and persistence.

pub mod command;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod report;

pub use command::{CommandOutcome, CommandRunner, SystemCommandRunner};
pub use config::DoctorConfig;
pub use diagnostics::{
    run_diagnostics, CheckRecord, DiagnosticEngine, DiagnosticReport, GpuBackend, Probe,
    StatusKind,
};
pub use error::{DoctorError, Result};
pub use report::{format_colored, format_plain_text, format_uncolored, persist, ReportSink};

use std::path::PathBuf;
use tracing::info;

/// Ensures the data directory exists, then runs the engine. Saving is left to
/// [`save_report`] so callers can show the report before touching the disk.
pub async fn run_environment_check(
    config: &DoctorConfig,
    engine: &DiagnosticEngine,
) -> Result<DiagnosticReport> {
    ReportSink::from_config(config).ensure_directory().await?;

    let report = engine.run().await;
    info!("Environment check finished with status {}", report.overall_status());

    Ok(report)
}

/// Renders the plain-text report and overwrites the configured report file.
pub async fn save_report(config: &DoctorConfig, report: &DiagnosticReport) -> Result<PathBuf> {
    let text = format_plain_text(report);
    ReportSink::from_config(config).persist(&text).await
}
