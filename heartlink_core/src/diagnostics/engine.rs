//! Runs the fixed probe battery and rolls the results up into a report.

use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::gpu::GpuProbe;
use super::probes::{CommandProbe, Probe, RuntimeProbe, SystemProbe};
use super::secrets::SecretsFileProbe;
use super::status::{CheckRecord, DiagnosticReport, ReportBuilder, StatusKind};
use crate::command::{CommandRunner, SystemCommandRunner};
use crate::config::DoctorConfig;

pub struct DiagnosticEngine {
    probes: Vec<Box<dyn Probe>>,
}

impl DiagnosticEngine {
    /// Empty engine; probes run in the order they are added.
    pub fn empty() -> Self {
        Self { probes: Vec::new() }
    }

    pub fn add_probe<T: Probe + 'static>(mut self, probe: T) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    /// The fixed battery: system, runtime, node, npm, pip, gpu, secrets_file.
    pub fn new(config: &DoctorConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let timeout = config.command_timeout();

        Self::empty()
            .add_probe(SystemProbe)
            .add_probe(RuntimeProbe)
            .add_probe(CommandProbe::node(timeout, runner.clone()))
            .add_probe(CommandProbe::npm(timeout, runner.clone()))
            .add_probe(CommandProbe::pip(&config.commands.python, timeout, runner.clone()))
            .add_probe(GpuProbe::from_config(config, runner))
            .add_probe(SecretsFileProbe::new(config.secrets_file_path()))
    }

    pub fn from_config(config: &DoctorConfig) -> Self {
        Self::new(config, Arc::new(SystemCommandRunner::new()))
    }

    pub fn probe_names(&self) -> Vec<&str> {
        self.probes.iter().map(|probe| probe.name()).collect()
    }

    pub async fn run(&self) -> DiagnosticReport {
        debug!("Running environment diagnostics for {} probes", self.probes.len());

        let mut builder = ReportBuilder::new();

        for probe in &self.probes {
            let start = Instant::now();
            let record = run_isolated(probe.as_ref()).await;
            let elapsed = start.elapsed();

            // Outcomes belong to the report; the log only traces progress.
            match record.status() {
                StatusKind::Ok => {
                    debug!("Probe '{}' passed in {:?}", record.name(), elapsed);
                }
                StatusKind::Warn => {
                    info!("Probe '{}' warned in {:?}: {}", record.name(), elapsed, record.detail());
                }
                StatusKind::Fail => {
                    info!("Probe '{}' failed in {:?}: {}", record.name(), elapsed, record.detail());
                }
            }

            builder.add(record);
        }

        let report = builder.finish();
        info!("Diagnostics completed - Overall status: {}", report.overall_status());
        report
    }
}

/// Runs one probe, turning a panic into the probe's failure record so a
/// single faulty probe never aborts the whole run.
async fn run_isolated(probe: &dyn Probe) -> CheckRecord {
    match AssertUnwindSafe(probe.check()).catch_unwind().await {
        Ok(record) => record,
        Err(payload) => CheckRecord::new(
            probe.name(),
            probe.failure_status(),
            format!("probe panicked: {}", panic_message(payload.as_ref())),
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs the fixed battery with real processes.
pub async fn run_diagnostics(config: &DoctorConfig) -> DiagnosticReport {
    DiagnosticEngine::from_config(config).run().await
}
