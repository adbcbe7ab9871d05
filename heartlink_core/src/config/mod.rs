pub mod settings;

pub use settings::{CommandConfig, DoctorConfig, GpuConfig, PathConfig};
