//! Main entry point for the HeartLink environment doctor

mod cli;
mod menu;

use anyhow::{Context, Result};
use clap::Parser;
use heartlink_core::{
    format_colored, format_uncolored, run_environment_check, save_report, DiagnosticEngine,
    DoctorConfig,
};
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use menu::MenuChoice;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = DoctorConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(root) = &cli.project_root {
        config.paths.project_root = std::env::current_dir()
            .context("Failed to resolve current directory")?
            .join(root);
    }

    info!("Project root: {}", config.paths.project_root.display());

    let engine = DiagnosticEngine::from_config(&config);

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    if cli.auto_check {
        check_once(&cli, &config, &engine, &mut stdout, &mut stderr).await
    } else {
        interactive_menu(&cli, &config, &engine, &mut stdout, &mut stderr).await
    }
}

/// Shows the report first and saves it afterwards, so a failed write still
/// leaves the results on screen. In JSON mode `out` carries only the JSON
/// document and the saved path goes to `err`.
async fn check_once<O: Write, E: Write>(
    cli: &Cli,
    config: &DoctorConfig,
    engine: &DiagnosticEngine,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    let report = run_environment_check(config, engine)
        .await
        .context("Failed to prepare the data directory")?;

    if cli.json {
        writeln!(out, "{}", report.to_json()?)?;
    } else {
        let lines = if cli.no_color {
            format_uncolored(&report)
        } else {
            format_colored(&report)
        };
        for line in lines {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()?;

    let saved_to = save_report(config, &report)
        .await
        .context("Environment check could not save its report")?;

    if cli.json {
        writeln!(err, "Report saved to: {}", saved_to.display())?;
    } else {
        writeln!(out, "Report saved to: {}", saved_to.display())?;
    }

    Ok(())
}

async fn interactive_menu<O: Write, E: Write>(
    cli: &Cli,
    config: &DoctorConfig,
    engine: &DiagnosticEngine,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    loop {
        let choice = {
            let mut stdin = io::stdin().lock();
            menu::prompt(&mut stdin, out)?
        };

        match choice {
            MenuChoice::Check => check_once(cli, config, engine, out, err).await?,
            MenuChoice::Exit => {
                writeln!(out, "Thanks for using HeartLink, see you next time!")?;
                return Ok(());
            }
            MenuChoice::Invalid => writeln!(out, "Invalid option, please enter 1 or 2.")?,
        }
    }
}

fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let default_level = if verbose { "debug" } else { "warn" };

            format!(
                "{}={},heartlink_core={}",
                env!("CARGO_CRATE_NAME").replace('-', "_"),
                default_level,
                default_level
            ).into()
        });

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartlink_core::diagnostics::SecretsFileProbe;
    use tempfile::TempDir;

    fn project_with_key() -> (TempDir, DoctorConfig, DiagnosticEngine) {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join(".env"), "OPENAI_API_KEY=abc123\n").unwrap();

        let config = DoctorConfig::for_project_root(root.path());
        let engine = DiagnosticEngine::empty()
            .add_probe(SecretsFileProbe::new(config.secrets_file_path()));
        (root, config, engine)
    }

    #[tokio::test]
    async fn test_json_mode_keeps_stdout_parseable() {
        let (root, config, engine) = project_with_key();
        let cli = Cli::parse_from(["heartlink", "--auto-check", "--json"]);
        let mut out = Vec::new();
        let mut err = Vec::new();

        check_once(&cli, &config, &engine, &mut out, &mut err).await.unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["checks"][0]["name"], "secrets_file");
        assert_eq!(value["summary"]["status"], "OK");

        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("Report saved to: "));
        assert!(err.trim_end().ends_with("env_report.txt"));
        assert!(root.path().join("data").join("env_report.txt").is_file());
    }

    #[tokio::test]
    async fn test_text_mode_prints_saved_path_after_report() {
        let (_root, config, engine) = project_with_key();
        let cli = Cli::parse_from(["heartlink", "--auto-check", "--no-color"]);
        let mut out = Vec::new();
        let mut err = Vec::new();

        check_once(&cli, &config, &engine, &mut out, &mut err).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("secrets_file [OK]"));
        assert!(lines[1].starts_with("summary"));
        assert!(lines[2].starts_with("Report saved to: "));
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn test_report_is_shown_even_when_saving_fails() {
        let (root, config, engine) = project_with_key();
        std::fs::create_dir_all(root.path().join("data").join("env_report.txt")).unwrap();
        let cli = Cli::parse_from(["heartlink", "--auto-check", "--no-color"]);
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = check_once(&cli, &config, &engine, &mut out, &mut err).await;

        let error = result.unwrap_err();
        assert!(error.to_string().contains("could not save its report"));

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("secrets_file [OK] OPENAI_API_KEY is set"));
        assert!(out.contains("summary"));
        assert!(!out.contains("Report saved to"));
    }
}
