//! IPPcode22 interpreter entry point.
//!
//! Wires the external collaborators (`cli`, the stdin/file source for the
//! XML document) to the library's [`ippcode22::run_source`]. Internal
//! diagnostics about *this process* (which phase ran, how many
//! instructions loaded) go through `log`, gated behind `RUST_LOG`; the
//! interpreted program's own `WRITE`/`DPRINT`/`BREAK` output is untouched
//! by that and goes straight to stdout/stderr, since it is part of the
//! language contract rather than a log line (spec §10.2).

use std::env;
use std::process::ExitCode;

use ippcode22::error::InterpError;
use ippcode22::{cli, run_source, xml};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    match try_main(&args) {
        Ok(code) => exit_code(code),
        Err(e) => {
            eprintln!("{}", e);
            exit_code(e.exit_code())
        }
    }
}

fn try_main(args: &[String]) -> Result<i32, InterpError> {
    let parsed = cli::parse(args)?;
    if parsed.help {
        println!("{}", cli::usage());
        return Ok(0);
    }

    log::debug!(
        "source = {:?}, input = {:?}",
        parsed.source,
        parsed.input
    );

    let xml_text = xml::read_source_text(parsed.source.as_deref())?;
    let input_lines = match &parsed.input {
        Some(path) => cli::read_input_lines(path)?,
        None => Vec::new(),
    };

    run_source(&xml_text, input_lines)
}

/// Exit codes above 255 aren't representable on most platforms; the
/// interpreter's own contract (spec §6/§7) never produces one.
fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code.clamp(0, 255) as u8)
}
