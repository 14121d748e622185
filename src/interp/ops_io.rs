//! # I/O and Introspection Operations
//!
//! `READ`, `WRITE`, `DPRINT`, `BREAK` (spec §4.7 "I/O", "Introspection").
//! `WRITE`/`DPRINT`/`BREAK` are the interpreted program's own output and
//! must stay byte-exact `print!`/`eprintln!` calls — unlike the `log`-backed
//! internal diagnostics used elsewhere in the dispatcher, this output is
//! part of the language contract (spec §10.2).

use std::io::Write as _;

use crate::program::Instr;
use crate::resolver::{resolve_symb, write_var};
use crate::value::{parse_bool_literal, parse_int_literal, Value};
use crate::error::InterpError;

use super::Machine;

pub(super) fn read(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let declared_type = instr.args[1].text.as_str();
    let line = m.input.next_line().unwrap_or_default();
    let value = match declared_type {
        "int" => match parse_int_literal(&line) {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Nil,
        },
        "bool" => Value::Bool(parse_bool_literal(&line.to_ascii_lowercase()).unwrap_or(false)),
        "string" => Value::Str(line),
        _ => Value::Nil,
    };
    write_var(&mut m.frames, &instr.args[0], value)
}

pub(super) fn write(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let value = resolve_symb(&m.frames, &instr.args[0])?;
    print!("{}", value.display());
    let _ = std::io::stdout().flush();
    Ok(())
}

pub(super) fn dprint(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let value = resolve_symb(&m.frames, &instr.args[0])?;
    eprint!("{}", value.display());
    Ok(())
}

pub(super) fn break_(m: &mut Machine) {
    eprintln!("###### BREAK instr ######");
    eprintln!("ip = {}", m.ip);
    eprintln!("instr count = {}", m.instr_count);
    eprintln!("### frame register set ###");
    eprintln!("{:#?}", m.frames);
    eprintln!("### data stack ###");
    eprintln!("{:#?}", m.data);
    eprintln!("### call stack ###");
    eprintln!("{:#?}", m.calls);
    eprintln!("###### end of BREAK instr ######");
}
