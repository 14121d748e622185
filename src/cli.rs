//! # Command-Line Surface
//!
//! The external collaborator of spec §6: manual, prefix-matching argument
//! parsing in the same style the reference VM's own `main.rs` uses for its
//! `-h`/`--help`/`-v`/`--version` flags — no argument-parsing crate is
//! introduced where hand-rolled matching already covers the surface.

use std::fs;
use std::path::PathBuf;

use crate::error::{ExitCode, InterpError};

/// Human-facing runtime version string (the interpreter binary, not the
/// language version — IPPcode22 has no version of its own).
const VERSION: &str = "0.1.0";

/// Parsed command-line configuration.
#[derive(Debug, Default)]
pub struct Cli {
    pub source: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub help: bool,
}

/// Usage text shown for `--help`/`-h`.
pub fn usage() -> String {
    format!(
        r#"ippcode22 v{VERSION}

An interpreter for the IPPcode22 structured assembly-like instruction
language.

Usage:
    ippcode22 [--source=FILE] [--input=FILE]

Options:
    --source=FILE
        Read the XML program from FILE. If omitted, the program is read
        from standard input.
    --input=FILE
        Pre-read input lines for READ instructions from FILE. If omitted,
        READ falls back to standard input.
    -h, --help
        Show this help message and exit.

At least one of --source or --input must be given; the other stream is
then read from standard input."#
    )
}

/// Parse process arguments into a [`Cli`].
///
/// `--help`/`-h` takes precedence over everything else, matching the
/// reference implementation's `main`: it is checked first and short-circuits
/// immediately, even if other options are also present or malformed.
pub fn parse(args: &[String]) -> Result<Cli, InterpError> {
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(Cli {
            help: true,
            ..Cli::default()
        });
    }

    let mut cli = Cli::default();
    for a in args {
        if let Some(path) = a.strip_prefix("--source=") {
            cli.source = Some(PathBuf::from(path));
        } else if let Some(path) = a.strip_prefix("--input=") {
            cli.input = Some(PathBuf::from(path));
        } else {
            return Err(ExitCode::Cli.at(format!("unrecognized option: {}", a)));
        }
    }

    if cli.source.is_none() && cli.input.is_none() {
        return Err(ExitCode::Cli.at("at least one of --source or --input must be specified"));
    }

    Ok(cli)
}

/// Read `--input`'s file into a line buffer, trailing newlines stripped
/// (spec §6 "Input line format"). Absent here, not presence-checked: the
/// caller decides whether to fall back to standard input.
pub fn read_input_lines(path: &std::path::Path) -> Result<Vec<String>, InterpError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ExitCode::InputFile.at(format!("cannot read input file: {}", e)))?;
    Ok(contents.lines().map(|l| l.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn help_overrides_everything() {
        let cli = parse(&args(&["--bogus", "--help"])).unwrap();
        assert!(cli.help);
    }

    #[test]
    fn requires_source_or_input() {
        let err = parse(&args(&[])).unwrap_err();
        assert_eq!(err.kind(), ExitCode::Cli);
    }

    #[test]
    fn unrecognized_flag_is_cli_error() {
        let err = parse(&args(&["--bogus"])).unwrap_err();
        assert_eq!(err.kind(), ExitCode::Cli);
    }

    #[test]
    fn parses_source_and_input_paths() {
        let cli = parse(&args(&["--source=prog.xml", "--input=data.txt"])).unwrap();
        assert_eq!(cli.source, Some(PathBuf::from("prog.xml")));
        assert_eq!(cli.input, Some(PathBuf::from("data.txt")));
        assert!(!cli.help);
    }
}
