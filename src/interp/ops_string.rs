//! # String and Conversion Operations
//!
//! `INT2CHAR`, `STRI2INT`, `CONCAT`, `STRLEN`, `GETCHAR`, `SETCHAR`, `TYPE`
//! (spec §4.7 "Conversions", "String operations", "Type reflection"). All
//! indexing is by code point (`.chars()`), never by byte, per spec §3's
//! string tag definition.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::error::{ExitCode, InterpError};
use crate::program::Instr;
use crate::resolver::{resolve_symb, resolve_var, type_name_of, write_var};
use crate::value::{bigint_to_index, Value};

use super::Machine;

pub(super) fn int2char(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let code = resolve_symb(&m.frames, &instr.args[1])?.as_int()?.clone();
    let code_u32 = code
        .to_u32()
        .ok_or_else(|| ExitCode::OutOfRange.at(format!("INT2CHAR: code point out of range: {}", code)))?;
    let ch = char::from_u32(code_u32)
        .ok_or_else(|| ExitCode::OutOfRange.at(format!("INT2CHAR: invalid code point: {}", code)))?;
    write_var(&mut m.frames, &instr.args[0], Value::Str(ch.to_string()))
}

pub(super) fn stri2int(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let s = resolve_symb(&m.frames, &instr.args[1])?.as_str()?.to_string();
    let idx = resolve_symb(&m.frames, &instr.args[2])?.as_int()?.clone();
    let idx = bigint_to_index(&idx)?;
    let ch = s
        .chars()
        .nth(idx)
        .ok_or_else(|| ExitCode::OutOfRange.at(format!("STRI2INT: index out of range: {}", idx)))?;
    write_var(
        &mut m.frames,
        &instr.args[0],
        Value::Int(BigInt::from(ch as u32)),
    )
}

pub(super) fn concat(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let a = resolve_symb(&m.frames, &instr.args[1])?.as_str()?.to_string();
    let b = resolve_symb(&m.frames, &instr.args[2])?.as_str()?.to_string();
    write_var(&mut m.frames, &instr.args[0], Value::Str(a + &b))
}

pub(super) fn strlen(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let s = resolve_symb(&m.frames, &instr.args[1])?.as_str()?.to_string();
    write_var(
        &mut m.frames,
        &instr.args[0],
        Value::Int(BigInt::from(s.chars().count())),
    )
}

pub(super) fn getchar(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let s = resolve_symb(&m.frames, &instr.args[1])?.as_str()?.to_string();
    let idx = resolve_symb(&m.frames, &instr.args[2])?.as_int()?.clone();
    let idx = bigint_to_index(&idx)?;
    let ch = s
        .chars()
        .nth(idx)
        .ok_or_else(|| ExitCode::OutOfRange.at(format!("GETCHAR: index out of range: {}", idx)))?;
    write_var(&mut m.frames, &instr.args[0], Value::Str(ch.to_string()))
}

pub(super) fn setchar(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let (kind, name) = resolve_var(&instr.args[0])?;
    let original = m.frames.frame(kind)?.read(name)?.as_str()?.to_string();

    let idx = resolve_symb(&m.frames, &instr.args[1])?.as_int()?.clone();
    let idx = bigint_to_index(&idx)?;
    let replacement = resolve_symb(&m.frames, &instr.args[2])?.as_str()?.to_string();
    let replacement_ch = replacement
        .chars()
        .next()
        .ok_or_else(|| ExitCode::OutOfRange.at("SETCHAR: replacement string is empty"))?;

    let mut chars: Vec<char> = original.chars().collect();
    if idx >= chars.len() {
        return Err(ExitCode::OutOfRange.at(format!("SETCHAR: index out of range: {}", idx)));
    }
    chars[idx] = replacement_ch;
    let updated: String = chars.into_iter().collect();
    m.frames.frame_mut(kind)?.write(name, Value::Str(updated))
}

pub(super) fn type_(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let name = type_name_of(&m.frames, &instr.args[1])?;
    write_var(&mut m.frames, &instr.args[0], Value::Str(name))
}
