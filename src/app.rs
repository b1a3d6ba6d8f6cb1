//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and loads configuration
//! - sets up logging for the chosen front-end
//! - runs lookups through the coordinator
//! - prints reports and writes optional exports

use clap::Parser;

use crate::cli::{Command, LookupArgs, RenderArgs, TuiArgs};
use crate::config::Config;
use crate::data::SipsClient;
use crate::domain::DisplayModel;
use crate::error::AppError;
use crate::logging::LogTarget;

pub mod charts;
pub mod coordinator;

use coordinator::Coordinator;

/// Entry point for the `sips` binary.
pub fn run() -> Result<(), AppError> {
    // `sips` opens the TUI and `sips ES00...` runs a lookup. Clap requires a
    // subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let config = Config::from_env()?
        .with_overrides(cli.service.api_url.as_deref(), cli.service.timeout)?;

    // The TUI owns the terminal, so its logs go to a file.
    let target = match cli.command {
        Command::Tui(_) => LogTarget::File,
        Command::Lookup(_) | Command::Render(_) => LogTarget::Stderr,
    };
    crate::logging::init(&config, target)?;

    match cli.command {
        Command::Lookup(args) => handle_lookup(&config, args),
        Command::Render(args) => handle_render(args),
        Command::Tui(args) => handle_tui(&config, args),
    }
}

fn handle_lookup(config: &Config, args: LookupArgs) -> Result<(), AppError> {
    let client = SipsClient::new(config)?;
    let mut coordinator = Coordinator::new();
    let model = coordinator.lookup(&args.cups, &client)?;

    print_model(model, args.json)?;

    if let Some(path) = &args.export {
        crate::io::write_model_json(path, model)?;
    }
    Ok(())
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let response = crate::io::read_response_json(&args.file)?;
    let model = crate::normalize::normalize_response(response);
    print_model(&model, args.json)
}

fn handle_tui(config: &Config, args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(config, args)
}

fn print_model(model: &DisplayModel, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", crate::io::model_to_json(model)?);
    } else {
        print!("{}", crate::report::format_report(model));
    }
    Ok(())
}

/// Flags that consume the following token as their value.
const VALUE_FLAGS: [&str; 3] = ["--api-url", "--timeout", "--cups"];

/// Rewrite argv so `sips` defaults to `sips tui` and a bare CUPS means `lookup`.
///
/// Rules:
/// - `sips`                              -> `sips tui`
/// - `sips --cups ES00...`               -> `sips tui --cups ES00...`
/// - `sips ES00...`                      -> `sips lookup ES00...`
/// - `sips --api-url URL ES00...`        -> `sips --api-url URL lookup ES00...`
/// - `sips --help/--version/-h`          -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    match first_positional(&argv) {
        Some(i) if matches!(argv[i].as_str(), "lookup" | "render" | "tui" | "help") => {}
        Some(i) => argv.insert(i, "lookup".to_string()),
        // Only flags: treat them as "tui flags".
        None => argv.insert(1, "tui".to_string()),
    }
    argv
}

/// Index of the first token that is neither a flag nor a flag's value.
fn first_positional(argv: &[String]) -> Option<usize> {
    let mut i = 1;
    while i < argv.len() {
        let arg = argv[i].as_str();
        if VALUE_FLAGS.contains(&arg) {
            i += 2;
        } else if arg.starts_with('-') {
            i += 1;
        } else {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_binary_opens_the_tui() {
        assert_eq!(rewrite_args(argv(&["sips"])), argv(&["sips", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["sips", "--cups", "ES0021000000123456XY01"])),
            argv(&["sips", "tui", "--cups", "ES0021000000123456XY01"])
        );
    }

    #[test]
    fn bare_cups_means_lookup() {
        assert_eq!(
            rewrite_args(argv(&["sips", "es0021000000123456xy01", "--json"])),
            argv(&["sips", "lookup", "es0021000000123456xy01", "--json"])
        );
    }

    #[test]
    fn subcommands_and_help_are_left_alone() {
        for args in [
            argv(&["sips", "render", "-f", "x.json"]),
            argv(&["sips", "lookup", "ES0021000000123456XY01"]),
            argv(&["sips", "--help"]),
            argv(&["sips", "-V"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn global_flags_before_a_bare_cups_still_mean_lookup() {
        let args = argv(&["sips", "--api-url", "http://x", "ES0021000000123456XY01"]);
        assert_eq!(
            rewrite_args(args),
            argv(&["sips", "--api-url", "http://x", "lookup", "ES0021000000123456XY01"])
        );

        let cli = crate::cli::Cli::parse_from(rewrite_args(argv(&[
            "sips",
            "--timeout",
            "5",
            "--api-url=http://x",
            "ES0021000000123456XY01",
            "--json",
        ])));
        assert_eq!(cli.service.api_url.as_deref(), Some("http://x"));
        assert_eq!(cli.service.timeout, Some(5));
        match cli.command {
            Command::Lookup(args) => {
                assert_eq!(args.cups, "ES0021000000123456XY01");
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_before_a_subcommand_are_left_alone() {
        let args = argv(&["sips", "--api-url", "http://x", "render", "-f", "x.json"]);
        assert_eq!(rewrite_args(args.clone()), args);
    }

    #[test]
    fn rewritten_args_parse() {
        let args = rewrite_args(argv(&["sips", "ES0021000000123456XY01"]));
        let cli = crate::cli::Cli::parse_from(args);
        assert!(matches!(cli.command, Command::Lookup(_)));
    }
}
