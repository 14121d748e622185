//! # Data-Movement Operations
//!
//! `MOVE`, `PUSHS`, `POPS` (spec §4.7 "Data stack"). Every path through here
//! produces an independent copy of the source value — `Value` is `Clone`
//! and carries no shared interior state, so a plain `.clone()` already
//! satisfies the "deep copy on read" rule (spec §9).

use crate::error::InterpError;
use crate::program::Instr;
use crate::resolver::{resolve_symb, resolve_var, write_var};

use super::Machine;

pub(super) fn move_(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let value = resolve_symb(&m.frames, &instr.args[1])?;
    write_var(&mut m.frames, &instr.args[0], value)
}

pub(super) fn push_s(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let value = resolve_symb(&m.frames, &instr.args[0])?;
    m.data.push(value);
    Ok(())
}

pub(super) fn pops(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let value = m.data.pop()?;
    let (kind, name) = resolve_var(&instr.args[0])?;
    m.frames.frame_mut(kind)?.write(name, value)
}
