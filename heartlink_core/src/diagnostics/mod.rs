pub mod engine;
pub mod gpu;
pub mod probes;
pub mod secrets;
pub mod status;


pub use engine::{run_diagnostics, DiagnosticEngine};
pub use gpu::{GpuBackend, GpuProbe};
pub use probes::{CommandProbe, Probe, RuntimeProbe, SystemProbe};
pub use secrets::SecretsFileProbe;
pub use status::{CheckRecord, DiagnosticReport, ReportBuilder, StatusKind, SUMMARY_NAME};
