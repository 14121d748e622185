//! # Frame-Control Operations
//!
//! `CREATEFRAME`, `PUSHFRAME`, `POPFRAME`, `DEFVAR` (spec §4.7 "Frame
//! control", "Variable declaration").

use crate::error::InterpError;
use crate::program::Instr;
use crate::resolver::resolve_var;

use super::Machine;

pub(super) fn create_frame(m: &mut Machine) {
    m.frames.create_frame();
}

pub(super) fn push_frame(m: &mut Machine) -> Result<(), InterpError> {
    m.frames.push_frame()
}

pub(super) fn pop_frame(m: &mut Machine) -> Result<(), InterpError> {
    m.frames.pop_frame()
}

pub(super) fn def_var(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let (kind, name) = resolve_var(&instr.args[0])?;
    m.frames.frame_mut(kind)?.declare(name)
}
