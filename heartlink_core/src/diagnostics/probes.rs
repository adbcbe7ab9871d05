//! The probe abstraction and the host-fact probes of the fixed battery.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use sysinfo::System;

use super::status::{CheckRecord, StatusKind};
use crate::command::CommandRunner;

#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &str;

    /// Severity recorded when the probe cannot confirm its dependency,
    /// including when the probe itself panics.
    fn failure_status(&self) -> StatusKind {
        StatusKind::Warn
    }

    async fn check(&self) -> CheckRecord;
}

/// Replaces line breaks with spaces so a detail fits on one report line.
pub fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Operating system name, version and architecture.
pub struct SystemProbe;

impl SystemProbe {
    pub fn platform_string() -> String {
        let os = System::long_os_version()
            .or_else(System::name)
            .unwrap_or_else(|| std::env::consts::OS.to_string());

        let mut parts = vec![os];
        if let Some(kernel) = System::kernel_version() {
            parts.push(format!("kernel {}", kernel));
        }
        parts.push(std::env::consts::ARCH.to_string());

        parts.join(" ")
    }
}

#[async_trait]
impl Probe for SystemProbe {
    fn name(&self) -> &str {
        "system"
    }

    async fn check(&self) -> CheckRecord {
        CheckRecord::ok(self.name(), single_line(&Self::platform_string()))
    }
}

/// Toolchain this binary was built with.
pub struct RuntimeProbe;

impl RuntimeProbe {
    pub fn version_string() -> String {
        format!(
            "{} ({})",
            env!("HEARTLINK_RUSTC_VERSION"),
            env!("HEARTLINK_BUILD_TARGET")
        )
    }
}

#[async_trait]
impl Probe for RuntimeProbe {
    fn name(&self) -> &str {
        "runtime"
    }

    async fn check(&self) -> CheckRecord {
        CheckRecord::ok(self.name(), single_line(&Self::version_string()))
    }
}

/// Runs a version command; success reports its output, anything else
/// reports `failure_status` with a fixed recommendation.
pub struct CommandProbe {
    name: String,
    argv: Vec<String>,
    failure_status: StatusKind,
    recommendation: String,
    timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl CommandProbe {
    pub fn new(
        name: impl Into<String>,
        argv: Vec<String>,
        recommendation: impl Into<String>,
        timeout: Duration,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            name: name.into(),
            argv,
            failure_status: StatusKind::Warn,
            recommendation: recommendation.into(),
            timeout,
            runner,
        }
    }

    pub fn with_failure_status(mut self, status: StatusKind) -> Self {
        self.failure_status = status;
        self
    }

    pub fn node(timeout: Duration, runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(
            "node",
            crate::command::argv(["node", "--version"]),
            "Node.js not found, install the LTS release to build the frontend",
            timeout,
            runner,
        )
    }

    pub fn npm(timeout: Duration, runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(
            "npm",
            crate::command::argv(["npm", "--version"]),
            "npm not found, install it together with Node.js",
            timeout,
            runner,
        )
    }

    /// A missing pip means the interpreter install itself is broken, so
    /// this is the one probe that fails rather than warns.
    pub fn pip(python: &str, timeout: Duration, runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(
            "pip",
            crate::command::argv([python, "-m", "pip", "--version"]),
            "pip not found, repair the Python installation with the official installer",
            timeout,
            runner,
        )
        .with_failure_status(StatusKind::Fail)
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

#[async_trait]
impl Probe for CommandProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn failure_status(&self) -> StatusKind {
        self.failure_status
    }

    async fn check(&self) -> CheckRecord {
        let outcome = self.runner.run(&self.argv, self.timeout).await;

        if outcome.succeeded {
            CheckRecord::ok(&self.name, single_line(&outcome.output))
        } else {
            tracing::debug!("Probe '{}' command failed: {}", self.name, outcome.output);
            CheckRecord::new(&self.name, self.failure_status, &self.recommendation)
        }
    }
}
