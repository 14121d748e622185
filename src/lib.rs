//! # ippcode22
//!
//! An interpreter for IPPcode22: XML-described programs run against a
//! three-frame stack machine (spec §1–§4). The crate is organized the way
//! the pipeline actually flows:
//!
//! `xml` (load) → `validate` (check, normalize) → `program` (dense table) →
//! `interp` (dispatcher + per-opcode handlers, driven by `machine` and
//! `resolver`) → stdout/stderr/exit code.
//!
//! `cli` and `input` are the external collaborators described in spec §6:
//! they own the process command line and the optional input-file buffer,
//! and hand off to [`run_source`] for everything else.

pub mod cli;
pub mod decode;
pub mod error;
pub mod input;
pub mod interp;
pub mod lex;
pub mod machine;
pub mod program;
pub mod resolver;
pub mod validate;
pub mod value;
pub mod xml;

use error::InterpError;
use input::InputSource;

/// Run a complete IPPcode22 program: load, validate, then execute.
///
/// `xml_text` is the full program document; `input_lines` pre-seeds
/// `READ`'s line buffer (spec §6 "the missing stream is read from standard
/// input" — this function takes an already-materialized buffer, since
/// deciding *where* that buffer comes from is `cli`'s job, not the core's).
///
/// Returns the process exit code on normal or `EXIT`-driven termination;
/// an [`InterpError`] on any static or runtime fault, for the caller to
/// report and turn into `std::process::exit`.
pub fn run_source(xml_text: &str, input_lines: Vec<String>) -> Result<i32, InterpError> {
    let raw = xml::parse_program(xml_text)?;
    let program = validate::validate(raw)?;
    interp::run(&program, InputSource::new(input_lines))
}
