//! # XML Loader
//!
//! Turns a complete IPPcode22 XML document into a flat, document-order list
//! of raw instructions (spec §4.2). This stage only understands XML shape —
//! it does not know what a valid opcode or operand looks like; that is
//! `validate.rs`'s job. Parsing is done with `quick-xml`'s pull-based
//! `Reader`, which matches how a linear, order-preserving instruction stream
//! wants to be built (no need to materialize a DOM).

use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{ExitCode, InterpError};

/// One `<argN type=...>text</argN>` child, before any lexical validation.
#[derive(Clone, Debug)]
pub struct RawArg {
    pub position: usize,
    pub kind: String,
    pub text: String,
}

/// One `<instruction order=... opcode=...>` element, before validation.
#[derive(Clone, Debug)]
pub struct RawInstr {
    pub order_text: String,
    pub opcode_text: String,
    pub args: Vec<RawArg>,
}

/// Read the full XML document either from a file path or from standard
/// input, matching the CLI's "at least one of `--source`/`--input`" rule
/// (spec §6): when no source path is given, the program text itself is
/// read from stdin.
pub fn read_source_text(source: Option<&Path>) -> Result<String, InterpError> {
    match source {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| ExitCode::InputFile.at(format!("cannot read source file: {}", e))),
        None => {
            use std::io::Read;
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| ExitCode::InputFile.at(format!("cannot read source from stdin: {}", e)))?;
            Ok(buf)
        }
    }
}

/// Does this tag name (already lower-cased) equal `want`, case-insensitively?
fn tag_name_eq(raw: &[u8], want: &str) -> bool {
    raw.eq_ignore_ascii_case(want.as_bytes())
}

/// Parse `arg1`/`arg2`/`arg3` into a zero-based position. Any other spelling
/// is not an argument child at all (spec §4.2: document's only other
/// children are whitespace/comments, already filtered by the caller).
fn arg_position(tag: &[u8]) -> Option<usize> {
    if tag.len() != 4 || !tag[..3].eq_ignore_ascii_case(b"arg") {
        return None;
    }
    match tag[3] {
        b'1' => Some(0),
        b'2' => Some(1),
        b'3' => Some(2),
        _ => None,
    }
}

fn attr_value(e: &quick_xml::events::BytesStart<'_>, name: &str) -> Option<String> {
    e.attributes().flatten().find_map(|a| {
        if a.key.as_ref().eq_ignore_ascii_case(name.as_bytes()) {
            a.unescape_value().ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

/// Parse the already-read XML text into a document-order list of raw
/// instructions. Rejects anything that isn't shaped like a `program`
/// element whose only non-trivial children are `instruction` elements whose
/// only non-trivial children are `arg1`/`arg2`/`arg3` (spec §4.2).
pub fn parse_program(xml_text: &str) -> Result<Vec<RawInstr>, InterpError> {
    let mut reader = Reader::from_str(xml_text);
    reader.config_mut().trim_text = true;

    let mut instrs = Vec::new();
    let mut saw_root = false;

    loop {
        match reader
            .read_event()
            .map_err(|e| ExitCode::MalformedXml.at(format!("XML parse error: {}", e)))?
        {
            Event::Start(e) if !saw_root => {
                if !tag_name_eq(e.local_name().as_ref(), "program") {
                    return Err(ExitCode::MalformedXml.at(format!(
                        "expected root element <program>, found <{}>",
                        String::from_utf8_lossy(e.local_name().as_ref())
                    )));
                }
                saw_root = true;
                instrs = read_instructions(&mut reader)?;
            }
            Event::Empty(e) if !saw_root => {
                if !tag_name_eq(e.local_name().as_ref(), "program") {
                    return Err(ExitCode::MalformedXml.at(format!(
                        "expected root element <program>, found <{}>",
                        String::from_utf8_lossy(e.local_name().as_ref())
                    )));
                }
                saw_root = true;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(ExitCode::MalformedXml.at("no <program> root element found"));
    }

    Ok(instrs)
}

/// Read `<program>`'s children until its matching end tag, collecting every
/// `instruction` element and rejecting anything else.
fn read_instructions(reader: &mut Reader<&[u8]>) -> Result<Vec<RawInstr>, InterpError> {
    let mut instrs = Vec::new();
    loop {
        match reader
            .read_event()
            .map_err(|e| ExitCode::MalformedXml.at(format!("XML parse error: {}", e)))?
        {
            Event::Start(e) => {
                if !tag_name_eq(e.local_name().as_ref(), "instruction") {
                    return Err(ExitCode::Structural.at(format!(
                        "unexpected element at instruction level: <{}>",
                        String::from_utf8_lossy(e.local_name().as_ref())
                    )));
                }
                let order_text = attr_value(&e, "order").unwrap_or_default();
                let opcode_text = attr_value(&e, "opcode").unwrap_or_default();
                let args = read_instruction_body(reader)?;
                instrs.push(RawInstr {
                    order_text,
                    opcode_text,
                    args,
                });
            }
            Event::Empty(e) => {
                if !tag_name_eq(e.local_name().as_ref(), "instruction") {
                    return Err(ExitCode::Structural.at(format!(
                        "unexpected element at instruction level: <{}>",
                        String::from_utf8_lossy(e.local_name().as_ref())
                    )));
                }
                let order_text = attr_value(&e, "order").unwrap_or_default();
                let opcode_text = attr_value(&e, "opcode").unwrap_or_default();
                instrs.push(RawInstr {
                    order_text,
                    opcode_text,
                    args: Vec::new(),
                });
            }
            Event::End(e) if tag_name_eq(e.local_name().as_ref(), "program") => break,
            Event::Eof => {
                return Err(ExitCode::MalformedXml.at("unexpected end of document inside <program>"))
            }
            _ => {}
        }
    }
    Ok(instrs)
}

/// Read one `<instruction>`'s children until its matching end tag.
fn read_instruction_body(reader: &mut Reader<&[u8]>) -> Result<Vec<RawArg>, InterpError> {
    let mut args = Vec::new();
    loop {
        match reader
            .read_event()
            .map_err(|e| ExitCode::MalformedXml.at(format!("XML parse error: {}", e)))?
        {
            Event::Start(e) => {
                let position = arg_position(e.local_name().as_ref()).ok_or_else(|| {
                    ExitCode::Structural.at(format!(
                        "unexpected argument element: <{}>",
                        String::from_utf8_lossy(e.local_name().as_ref())
                    ))
                })?;
                let kind = attr_value(&e, "type").unwrap_or_default();
                let text = read_text_until_end(reader, e.local_name().as_ref())?;
                args.push(RawArg {
                    position,
                    kind,
                    text,
                });
            }
            Event::Empty(e) => {
                let position = arg_position(e.local_name().as_ref()).ok_or_else(|| {
                    ExitCode::Structural.at(format!(
                        "unexpected argument element: <{}>",
                        String::from_utf8_lossy(e.local_name().as_ref())
                    ))
                })?;
                let kind = attr_value(&e, "type").unwrap_or_default();
                args.push(RawArg {
                    position,
                    kind,
                    text: String::new(),
                });
            }
            Event::End(e) if tag_name_eq(e.local_name().as_ref(), "instruction") => break,
            Event::Eof => {
                return Err(
                    ExitCode::MalformedXml.at("unexpected end of document inside <instruction>")
                )
            }
            _ => {}
        }
    }
    Ok(args)
}

/// Accumulate text content until the end tag matching `tag` closes.
/// `quick-xml`'s own `unescape` already performs spec §4.3 pass 1 (XML
/// entity decoding) once; nothing here repeats it, so the `\DDD` escape
/// pass in `decode.rs` is the only decoding step still owed to a `string`
/// argument once it reaches the validator.
fn read_text_until_end(reader: &mut Reader<&[u8]>, tag: &[u8]) -> Result<String, InterpError> {
    let mut text = String::new();
    loop {
        match reader
            .read_event()
            .map_err(|e| ExitCode::MalformedXml.at(format!("XML parse error: {}", e)))?
        {
            Event::Text(t) => {
                let raw = t
                    .unescape()
                    .map_err(|e| ExitCode::MalformedXml.at(format!("XML text error: {}", e)))?;
                text.push_str(&raw);
            }
            Event::End(e) if e.local_name().as_ref() == tag => break,
            Event::Eof => {
                return Err(ExitCode::MalformedXml.at("unexpected end of document inside argument"))
            }
            _ => {}
        }
    }
    Ok(text)
}

/// Convenience wrapper used by `main`/`lib`: read, then parse.
pub fn load(source: Option<&Path>) -> Result<Vec<RawInstr>, InterpError> {
    let text = read_source_text(source)?;
    parse_program(&text)
}
