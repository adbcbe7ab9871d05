//! Status model shared by every probe: the severity scale, the per-probe
//! record and the ordered report with its rollup.

use serde::Serialize;
use tracing::warn;

pub const SUMMARY_NAME: &str = "summary";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusKind {
    Ok,
    Warn,
    Fail,
}

impl StatusKind {
    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Ok => "OK",
            StatusKind::Warn => "WARN",
            StatusKind::Fail => "FAIL",
        }
    }

    /// Canned summary sentence for a rolled-up status.
    pub fn summary_message(self) -> &'static str {
        match self {
            StatusKind::Ok => "all checks passed, environment ready",
            StatusKind::Warn => "some checks produced warnings, review recommendations",
            StatusKind::Fail => "at least one check failed, resolve critical issues first",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRecord {
    name: String,
    status: StatusKind,
    detail: String,
}

impl CheckRecord {
    pub fn new(name: impl Into<String>, status: StatusKind, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
        }
    }

    pub fn ok(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, StatusKind::Ok, detail)
    }

    pub fn warn(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, StatusKind::Warn, detail)
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, StatusKind::Fail, detail)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> StatusKind {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Worst status among `statuses`, `Ok` when empty.
pub fn highest_severity<I>(statuses: I) -> StatusKind
where
    I: IntoIterator<Item = StatusKind>,
{
    statuses.into_iter().max().unwrap_or(StatusKind::Ok)
}

/// Collects probe records in execution order. Records are write-once: a
/// second record under an existing name is dropped.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    checks: Vec<CheckRecord>,
    overall_status: Option<StatusKind>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: CheckRecord) -> &mut Self {
        if record.name == SUMMARY_NAME || self.checks.iter().any(|c| c.name == record.name) {
            warn!("Ignoring duplicate record for '{}'", record.name);
            return self;
        }

        self.overall_status = Some(match self.overall_status {
            Some(current) => current.max(record.status),
            None => record.status,
        });
        self.checks.push(record);
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Seals the report, appending the `summary` record.
    pub fn finish(self) -> DiagnosticReport {
        let overall = self.overall_status.unwrap_or(StatusKind::Ok);
        debug_assert_eq!(overall, highest_severity(self.checks.iter().map(|c| c.status)));

        DiagnosticReport {
            checks: self.checks,
            summary: CheckRecord::new(SUMMARY_NAME, overall, overall.summary_message()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    checks: Vec<CheckRecord>,
    summary: CheckRecord,
}

impl DiagnosticReport {
    pub fn checks(&self) -> &[CheckRecord] {
        &self.checks
    }

    pub fn summary(&self) -> &CheckRecord {
        &self.summary
    }

    pub fn overall_status(&self) -> StatusKind {
        self.summary.status
    }

    /// Every record in report order, `summary` last.
    pub fn iter(&self) -> impl Iterator<Item = &CheckRecord> {
        self.checks.iter().chain(std::iter::once(&self.summary))
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(CheckRecord::name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&CheckRecord> {
        self.iter().find(|record| record.name == name)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> IntoIterator for &'a DiagnosticReport {
    type Item = &'a CheckRecord;
    type IntoIter = std::iter::Chain<std::slice::Iter<'a, CheckRecord>, std::iter::Once<&'a CheckRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.checks.iter().chain(std::iter::once(&self.summary))
    }
}
