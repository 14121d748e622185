//! # Control-Flow Operations
//!
//! `JUMP`, `JUMPIFEQ`, `JUMPIFNEQ`, `CALL`, `RETURN`, `EXIT` (spec §4.7
//! "Control flow", "Termination"). These are the only handlers that decide
//! `ip` themselves — every other opcode leaves that to the dispatcher's
//! default advance-by-one (spec §4.6).

use num_traits::ToPrimitive;

use crate::error::{ExitCode, InterpError};
use crate::program::Instr;
use crate::resolver::resolve_symb;
use crate::value::Value;

use super::{Flow, Machine};

pub(super) fn jump(m: &mut Machine, instr: &Instr) -> Result<Flow, InterpError> {
    let target = m.program.resolve_label(&instr.args[0].text)?;
    Ok(Flow::Goto(target))
}

/// `JUMPIFEQ`/`JUMPIFNEQ`: resolve both operands, jump if their equality
/// matches `want_eq` (spec §4.7 "Control flow"). Mismatched, non-`nil` tags
/// are a type error, same as plain `EQ`.
pub(super) fn jump_if(m: &mut Machine, instr: &Instr, want_eq: bool) -> Result<Flow, InterpError> {
    let a = resolve_symb(&m.frames, &instr.args[1])?;
    let b = resolve_symb(&m.frames, &instr.args[2])?;
    let equal = a.values_equal(&b)?;
    if equal == want_eq {
        let target = m.program.resolve_label(&instr.args[0].text)?;
        Ok(Flow::Goto(target))
    } else {
        Ok(Flow::Advance)
    }
}

pub(super) fn call(m: &mut Machine, instr: &Instr) -> Result<Flow, InterpError> {
    let target = m.program.resolve_label(&instr.args[0].text)?;
    m.calls.push(m.ip);
    Ok(Flow::Goto(target))
}

/// `RETURN`: pop the call stack and resume just past the matching `CALL`
/// (spec §4.6 step 3: "execution resumes at the instruction after the
/// `CALL`"). The dispatcher's default advance-by-one does the "after" part,
/// so this jumps back to the call site itself and lets that advance apply.
pub(super) fn ret(m: &mut Machine) -> Result<Flow, InterpError> {
    let call_site = m.calls.pop()?;
    Ok(Flow::Goto(call_site + 1))
}

pub(super) fn exit(m: &mut Machine, instr: &Instr) -> Result<Flow, InterpError> {
    let code = resolve_symb(&m.frames, &instr.args[0])?.as_int()?.clone();
    let code_i32 = code
        .to_i32()
        .filter(|c| (0..=49).contains(c))
        .ok_or_else(|| {
            ExitCode::BadValue.at(format!("EXIT: code out of range [0, 49]: {}", code))
        })?;
    Ok(Flow::Exit(code_i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{Arg, OpCode, ProgramTable};
    use std::collections::HashMap;

    fn instr(order: i64, opcode: OpCode, args: Vec<(&str, &str)>) -> Instr {
        Instr {
            order,
            opcode,
            args: args
                .into_iter()
                .map(|(kind, text)| Arg {
                    kind: kind.to_string(),
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    fn program_with_label(name: &str, order: i64) -> ProgramTable {
        let mut labels = HashMap::new();
        labels.insert(name.to_string(), order);
        ProgramTable::new(
            vec![instr(order, OpCode::Label, vec![("label", name)])],
            labels,
        )
        .unwrap()
    }

    #[test]
    fn jump_resolves_label_to_its_order() {
        let program = program_with_label("loop", 3);
        let mut m = Machine::new(&program, crate::input::InputSource::default());
        let i = instr(0, OpCode::Jump, vec![("label", "loop")]);
        match jump(&mut m, &i).unwrap() {
            Flow::Goto(target) => assert_eq!(target, 3),
            _ => panic!("expected Goto"),
        }
    }

    #[test]
    fn jump_to_unresolved_label_is_label_error() {
        let program = program_with_label("loop", 3);
        let mut m = Machine::new(&program, crate::input::InputSource::default());
        let i = instr(0, OpCode::Jump, vec![("label", "nowhere")]);
        let err = jump(&mut m, &i).unwrap_err();
        assert_eq!(err.kind(), ExitCode::Label);
    }

    #[test]
    fn call_then_return_resumes_after_call_site() {
        let program = program_with_label("f", 5);
        let mut m = Machine::new(&program, crate::input::InputSource::default());
        m.ip = 2;
        let i = instr(2, OpCode::Call, vec![("label", "f")]);
        match call(&mut m, &i).unwrap() {
            Flow::Goto(target) => assert_eq!(target, 5),
            _ => panic!("expected Goto"),
        }
        assert_eq!(m.calls.depth(), 1);

        match ret(&mut m).unwrap() {
            Flow::Goto(target) => assert_eq!(target, 3),
            _ => panic!("expected Goto"),
        }
        assert_eq!(m.calls.depth(), 0);
    }

    #[test]
    fn return_with_empty_call_stack_is_missing_value() {
        let program = program_with_label("f", 5);
        let mut m = Machine::new(&program, crate::input::InputSource::default());
        let err = ret(&mut m).unwrap_err();
        assert_eq!(err.kind(), ExitCode::MissingValue);
    }

    #[test]
    fn exit_accepts_boundary_codes() {
        let program = program_with_label("f", 5);
        let mut m = Machine::new(&program, crate::input::InputSource::default());
        let i = instr(0, OpCode::Exit, vec![("int", "0")]);
        assert!(matches!(exit(&mut m, &i).unwrap(), Flow::Exit(0)));
        let i = instr(0, OpCode::Exit, vec![("int", "49")]);
        assert!(matches!(exit(&mut m, &i).unwrap(), Flow::Exit(49)));
    }

    #[test]
    fn exit_out_of_range_is_bad_value() {
        let program = program_with_label("f", 5);
        let mut m = Machine::new(&program, crate::input::InputSource::default());
        let i = instr(0, OpCode::Exit, vec![("int", "50")]);
        let err = exit(&mut m, &i).unwrap_err();
        assert_eq!(err.kind(), ExitCode::BadValue);

        let i = instr(0, OpCode::Exit, vec![("int", "-1")]);
        let err = exit(&mut m, &i).unwrap_err();
        assert_eq!(err.kind(), ExitCode::BadValue);
    }

    #[test]
    fn jumpifeq_regression_uses_correct_operand_per_spec_open_question() {
        // Distinct from a copy-paste fault in the distillation source that
        // compared the wrong operand's literal text for bool symbols — both
        // operands must be read from their own arg, not one shared name.
        let program = program_with_label("target", 7);
        let mut m = Machine::new(&program, crate::input::InputSource::default());
        let i = instr(
            0,
            OpCode::JumpIfEq,
            vec![("label", "target"), ("bool", "true"), ("bool", "false")],
        );
        assert!(matches!(jump_if(&mut m, &i, true).unwrap(), Flow::Advance));

        let i = instr(
            0,
            OpCode::JumpIfNeq,
            vec![("label", "target"), ("bool", "true"), ("bool", "false")],
        );
        match jump_if(&mut m, &i, false).unwrap() {
            Flow::Goto(target) => assert_eq!(target, 7),
            _ => panic!("expected Goto"),
        }
    }

    #[test]
    fn jumpifeq_with_mismatched_non_nil_tags_is_type_mismatch() {
        let program = program_with_label("target", 7);
        let mut m = Machine::new(&program, crate::input::InputSource::default());
        let i = instr(
            0,
            OpCode::JumpIfEq,
            vec![("label", "target"), ("int", "1"), ("string", "1")],
        );
        let err = jump_if(&mut m, &i, true).unwrap_err();
        assert_eq!(err.kind(), ExitCode::TypeMismatch);
    }
}
