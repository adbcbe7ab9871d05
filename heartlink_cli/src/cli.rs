//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// HeartLink environment doctor
#[derive(Parser, Debug)]
#[command(name = "heartlink")]
#[command(about = "HeartLink - environment check for the HeartLink backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Skip the menu and run the environment check once
    #[arg(long)]
    pub auto_check: bool,

    /// Print the report as JSON instead of colored lines
    #[arg(long)]
    pub json: bool,

    /// Disable ANSI colors in terminal output
    #[arg(long)]
    pub no_color: bool,

    /// Extra configuration file layered over heartlink.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root holding .env and the data directory
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_auto_check_flags() {
        let cli = Cli::parse_from(["heartlink", "--auto-check", "--json", "--project-root", "/srv/app"]);
        assert!(cli.auto_check);
        assert!(cli.json);
        assert!(!cli.no_color);
        assert_eq!(cli.project_root, Some(PathBuf::from("/srv/app")));
    }

    #[test]
    fn test_defaults_to_menu() {
        let cli = Cli::parse_from(["heartlink"]);
        assert!(!cli.auto_check);
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }
}
