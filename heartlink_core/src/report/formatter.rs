//! Plain-text and terminal renderings of a diagnostic report.

use chrono::{DateTime, Local};
use owo_colors::OwoColorize;

use crate::diagnostics::{CheckRecord, DiagnosticReport, StatusKind};

pub const REPORT_TITLE: &str = "HeartLink Environment Report";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR_WIDTH: usize = 40;
const NAME_WIDTH: usize = 10;

pub fn format_plain_text(report: &DiagnosticReport) -> String {
    format_plain_text_at(report, Local::now())
}

pub fn format_plain_text_at(report: &DiagnosticReport, generated_at: DateTime<Local>) -> String {
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        format!("Generated at: {}", generated_at.format(TIMESTAMP_FORMAT)),
        "-".repeat(SEPARATOR_WIDTH),
    ];

    lines.extend(
        report
            .iter()
            .map(|record| format!("{}: [{}] {}", record.name(), record.status(), record.detail())),
    );

    lines.join("\n")
}

fn display_line(record: &CheckRecord) -> String {
    format!(
        "{:<width$} [{}] {}",
        record.name(),
        record.status(),
        record.detail(),
        width = NAME_WIDTH
    )
}

/// One line per record, wrapped in the status colour.
pub fn format_colored(report: &DiagnosticReport) -> Vec<String> {
    report
        .iter()
        .map(|record| {
            let line = display_line(record);
            match record.status() {
                StatusKind::Ok => line.bright_green().to_string(),
                StatusKind::Warn => line.bright_yellow().to_string(),
                StatusKind::Fail => line.bright_red().to_string(),
            }
        })
        .collect()
}

pub fn format_uncolored(report: &DiagnosticReport) -> Vec<String> {
    report.iter().map(display_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ReportBuilder;
    use chrono::TimeZone;

    fn sample_report() -> DiagnosticReport {
        let mut builder = ReportBuilder::new();
        builder
            .add(CheckRecord::ok("node", "v20.11.0"))
            .add(CheckRecord::warn("gpu", "no GPU found"))
            .add(CheckRecord::fail("pip", "pip not found"));
        builder.finish()
    }

    #[test]
    fn test_plain_text_layout() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let text = format_plain_text_at(&sample_report(), at);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "HeartLink Environment Report");
        assert_eq!(lines[1], "Generated at: 2024-03-09 14:05:07");
        assert_eq!(lines[2], "-".repeat(40));
        assert_eq!(lines[3], "node: [OK] v20.11.0");
        assert_eq!(lines[4], "gpu: [WARN] no GPU found");
        assert_eq!(lines[5], "pip: [FAIL] pip not found");
        assert_eq!(
            lines[6],
            "summary: [FAIL] at least one check failed, resolve critical issues first"
        );
        assert_eq!(lines.len(), 7);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_colored_lines_follow_status() {
        let lines = format_colored(&sample_report());
        assert_eq!(lines.len(), 4);

        assert!(lines[0].starts_with("\u{1b}[92m"));
        assert!(lines[1].starts_with("\u{1b}[93m"));
        assert!(lines[2].starts_with("\u{1b}[91m"));
        assert!(lines[3].starts_with("\u{1b}[91m"));
        assert!(lines.iter().all(|line| line.ends_with("\u{1b}[39m")));
        assert!(lines[0].contains("node       [OK] v20.11.0"));
    }

    #[test]
    fn test_uncolored_lines_pad_names() {
        let lines = format_uncolored(&sample_report());
        assert_eq!(lines[1], "gpu        [WARN] no GPU found");
        assert_eq!(
            lines[3],
            "summary    [FAIL] at least one check failed, resolve critical issues first"
        );
    }
}
