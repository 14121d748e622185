//! # Dispatcher
//!
//! The execution engine's main loop (spec §4.6): fetch the instruction at
//! `ip`, dispatch to its handler, then advance `ip` unless the handler set
//! it itself. Mirrors the reference VM's `pc`/`advance_pc` pattern, but
//! since `RETURN`/`CALL`/jumps here target `order` values rather than dense
//! vector indices, the "don't auto-advance" signal is carried as an
//! explicit [`Flow::Goto`] rather than a separate boolean flag.

use crate::error::{ExitCode, InterpError};
use crate::input::InputSource;
use crate::machine::{CallStack, DataStack, FrameSet};
use crate::program::{Instr, OpCode, ProgramTable};

mod ops_arith;
mod ops_control;
mod ops_data;
mod ops_frame;
mod ops_io;
mod ops_string;

#[cfg(test)]
mod tests;

/// What the dispatcher should do with `ip` after a handler returns.
pub enum Flow {
    /// Advance `ip` by one (the default for every non-control instruction).
    Advance,
    /// Set `ip` to this order directly; used by jumps, `CALL`, and `RETURN`.
    Goto(i64),
    /// Terminate the process with this exit code; used by `EXIT`.
    Exit(i32),
}

/// All mutable state threaded through instruction handlers (spec §9 "Global
/// state": the reference source's process-wide globals, packaged into a
/// single value owned by the entry point instead).
pub struct Machine<'p> {
    pub program: &'p ProgramTable,
    pub frames: FrameSet,
    pub data: DataStack,
    pub calls: CallStack,
    pub input: InputSource,
    pub ip: i64,
    pub instr_count: u64,
}

impl<'p> Machine<'p> {
    pub fn new(program: &'p ProgramTable, input: InputSource) -> Self {
        Machine {
            ip: program.min_order,
            program,
            frames: FrameSet::new(),
            data: DataStack::new(),
            calls: CallStack::new(),
            input,
            instr_count: 0,
        }
    }
}

/// Run a validated program to completion, returning the process exit code
/// (spec §4.6 "Termination").
pub fn run(program: &ProgramTable, input: InputSource) -> Result<i32, InterpError> {
    if program.is_empty() {
        return Ok(0);
    }

    let mut machine = Machine::new(program, input);
    log::debug!(
        "starting execution at order {} (range {}..={})",
        machine.ip,
        program.min_order,
        program.max_order
    );

    loop {
        if machine.ip > program.max_order {
            log::debug!("ip {} past max_order, normal termination", machine.ip);
            return Ok(0);
        }

        let instr = program.get(machine.ip).ok_or_else(|| {
            ExitCode::Internal.at_order(format!("no instruction at order {}", machine.ip), machine.ip)
        })?;
        machine.instr_count += 1;
        log::trace!(
            "#{} order={} opcode={}",
            machine.instr_count,
            instr.order,
            instr.opcode.name()
        );

        let flow = dispatch(&mut machine, instr).map_err(|e| e.or_at_order(instr.order))?;
        match flow {
            Flow::Advance => machine.ip += 1,
            Flow::Goto(target) => machine.ip = target,
            Flow::Exit(code) => return Ok(code),
        }
    }
}

/// Map an opcode to its handler (spec §4.6, §4.7).
fn dispatch(m: &mut Machine, instr: &Instr) -> Result<Flow, InterpError> {
    use OpCode::*;
    match instr.opcode {
        CreateFrame => {
            ops_frame::create_frame(m);
            Ok(Flow::Advance)
        }
        PushFrame => {
            ops_frame::push_frame(m)?;
            Ok(Flow::Advance)
        }
        PopFrame => {
            ops_frame::pop_frame(m)?;
            Ok(Flow::Advance)
        }
        DefVar => {
            ops_frame::def_var(m, instr)?;
            Ok(Flow::Advance)
        }
        Move => {
            ops_data::move_(m, instr)?;
            Ok(Flow::Advance)
        }
        PushS => {
            ops_data::push_s(m, instr)?;
            Ok(Flow::Advance)
        }
        Pops => {
            ops_data::pops(m, instr)?;
            Ok(Flow::Advance)
        }
        Add | Sub | Mul | IDiv => {
            ops_arith::arith(m, instr)?;
            Ok(Flow::Advance)
        }
        Lt | Gt | Eq => {
            ops_arith::compare(m, instr)?;
            Ok(Flow::Advance)
        }
        And | Or => {
            ops_arith::logic(m, instr)?;
            Ok(Flow::Advance)
        }
        Not => {
            ops_arith::not(m, instr)?;
            Ok(Flow::Advance)
        }
        Int2Char => {
            ops_string::int2char(m, instr)?;
            Ok(Flow::Advance)
        }
        Stri2Int => {
            ops_string::stri2int(m, instr)?;
            Ok(Flow::Advance)
        }
        Concat => {
            ops_string::concat(m, instr)?;
            Ok(Flow::Advance)
        }
        StrLen => {
            ops_string::strlen(m, instr)?;
            Ok(Flow::Advance)
        }
        GetChar => {
            ops_string::getchar(m, instr)?;
            Ok(Flow::Advance)
        }
        SetChar => {
            ops_string::setchar(m, instr)?;
            Ok(Flow::Advance)
        }
        Type => {
            ops_string::type_(m, instr)?;
            Ok(Flow::Advance)
        }
        Read => {
            ops_io::read(m, instr)?;
            Ok(Flow::Advance)
        }
        Write => {
            ops_io::write(m, instr)?;
            Ok(Flow::Advance)
        }
        DPrint => {
            ops_io::dprint(m, instr)?;
            Ok(Flow::Advance)
        }
        Break => {
            ops_io::break_(m);
            Ok(Flow::Advance)
        }
        Label => Ok(Flow::Advance),
        Jump => ops_control::jump(m, instr),
        JumpIfEq => ops_control::jump_if(m, instr, true),
        JumpIfNeq => ops_control::jump_if(m, instr, false),
        Call => ops_control::call(m, instr),
        Return => ops_control::ret(m),
        Exit => ops_control::exit(m, instr),
    }
}
