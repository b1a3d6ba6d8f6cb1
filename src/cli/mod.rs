//! Command-line parsing for the CUPS lookup client.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the lookup/normalization code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sips", version, about = "CUPS supply-point lookup (SIPS)")]
pub struct Cli {
    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up one CUPS and print the normalized result.
    Lookup(LookupArgs),
    /// Normalize a saved service response (JSON file) without any network access.
    Render(RenderArgs),
    /// Launch the interactive TUI.
    Tui(TuiArgs),
}

/// Connection settings shared by every subcommand. Flags override `.env`.
#[derive(Debug, Args, Clone, Default)]
pub struct ServiceArgs {
    /// Base URL of the lookup service (overrides SIPS_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides SIPS_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct LookupArgs {
    /// CUPS to look up (case-insensitive).
    pub cups: String,

    /// Print the normalized model as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Also write the normalized model to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Service response saved as JSON.
    #[arg(long, short = 'f', value_name = "JSON")]
    pub file: PathBuf,

    /// Print the normalized model as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone, Default)]
pub struct TuiArgs {
    /// Run this lookup right after start-up.
    #[arg(long)]
    pub cups: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_parses_with_global_flags() {
        let cli = Cli::parse_from([
            "sips",
            "lookup",
            "ES0021000000123456XY01",
            "--json",
            "--api-url",
            "http://localhost:9000",
        ]);
        assert_eq!(cli.service.api_url.as_deref(), Some("http://localhost:9000"));
        match cli.command {
            Command::Lookup(args) => {
                assert_eq!(args.cups, "ES0021000000123456XY01");
                assert!(args.json);
                assert!(args.export.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn tui_accepts_initial_cups() {
        let cli = Cli::parse_from(["sips", "tui", "--cups", "es0021000000123456xy01"]);
        match cli.command {
            Command::Tui(args) => assert_eq!(args.cups.as_deref(), Some("es0021000000123456xy01")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
