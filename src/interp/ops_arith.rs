//! # Arithmetic, Comparison, and Logic Operations
//!
//! `ADD`/`SUB`/`MUL`/`IDIV`, `LT`/`GT`/`EQ`, `AND`/`OR`/`NOT` (spec §4.7
//! "Arithmetic", "Comparison", "Logic"). Each handler resolves both symb
//! operands, applies the operation, and writes the result into the
//! destination `var` — mirroring the reference VM's
//! resolve-then-push-result shape in its own `ops_arith.rs`, adapted from an
//! operand stack to this language's explicit-destination instruction form.

use crate::error::{ExitCode, InterpError};
use crate::program::{Instr, OpCode};
use crate::resolver::{resolve_symb, write_var};
use crate::value::Value;

use super::Machine;

pub(super) fn arith(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let a = resolve_symb(&m.frames, &instr.args[1])?.as_int()?.clone();
    let b = resolve_symb(&m.frames, &instr.args[2])?.as_int()?.clone();
    let result = match instr.opcode {
        OpCode::Add => a + b,
        OpCode::Sub => a - b,
        OpCode::Mul => a * b,
        OpCode::IDiv => {
            if b == num_bigint::BigInt::from(0) {
                return Err(ExitCode::BadValue.at("IDIV: division by zero"));
            }
            // Rust's integer division already truncates toward zero.
            a / b
        }
        other => {
            return Err(ExitCode::Internal.at(format!("arith() called with {:?}", other)))
        }
    };
    write_var(&mut m.frames, &instr.args[0], Value::Int(result))
}

pub(super) fn compare(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let a = resolve_symb(&m.frames, &instr.args[1])?;
    let b = resolve_symb(&m.frames, &instr.args[2])?;
    let result = match instr.opcode {
        OpCode::Eq => a.values_equal(&b)?,
        OpCode::Lt => a.compare(&b)? == std::cmp::Ordering::Less,
        OpCode::Gt => a.compare(&b)? == std::cmp::Ordering::Greater,
        other => return Err(ExitCode::Internal.at(format!("compare() called with {:?}", other))),
    };
    write_var(&mut m.frames, &instr.args[0], Value::Bool(result))
}

pub(super) fn logic(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let a = resolve_symb(&m.frames, &instr.args[1])?.as_bool()?;
    let b = resolve_symb(&m.frames, &instr.args[2])?.as_bool()?;
    let result = match instr.opcode {
        OpCode::And => a && b,
        OpCode::Or => a || b,
        other => return Err(ExitCode::Internal.at(format!("logic() called with {:?}", other))),
    };
    write_var(&mut m.frames, &instr.args[0], Value::Bool(result))
}

pub(super) fn not(m: &mut Machine, instr: &Instr) -> Result<(), InterpError> {
    let a = resolve_symb(&m.frames, &instr.args[1])?.as_bool()?;
    write_var(&mut m.frames, &instr.args[0], Value::Bool(!a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::FrameKind;
    use crate::program::Arg;
    use num_bigint::BigInt;

    fn instr(opcode: OpCode, args: Vec<(&str, &str)>) -> Instr {
        Instr {
            order: 0,
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

    fn machine_with_dest(program: &crate::program::ProgramTable) -> Machine {
        let mut m = Machine::new(program, crate::input::InputSource::default());
        m.frames
            .frame_mut(FrameKind::Global)
            .unwrap()
            .declare("x")
            .unwrap();
        m
    }

    #[test]
    fn idiv_truncates_toward_zero() {
        let program = crate::program::ProgramTable::new(vec![], Default::default()).unwrap();
        let mut m = machine_with_dest(&program);
        let i = instr(OpCode::IDiv, vec![("var", "GF@x"), ("int", "-7"), ("int", "2")]);
        arith(&mut m, &i).unwrap();
        assert_eq!(
            m.frames.frame(FrameKind::Global).unwrap().read("x").unwrap(),
            &Value::Int(BigInt::from(-3))
        );
    }

    #[test]
    fn idiv_by_zero_is_bad_value() {
        let program = crate::program::ProgramTable::new(vec![], Default::default()).unwrap();
        let mut m = machine_with_dest(&program);
        let i = instr(OpCode::IDiv, vec![("var", "GF@x"), ("int", "1"), ("int", "0")]);
        let err = arith(&mut m, &i).unwrap_err();
        assert_eq!(err.kind(), ExitCode::BadValue);
    }

    #[test]
    fn eq_allows_nil_on_either_side() {
        let program = crate::program::ProgramTable::new(vec![], Default::default()).unwrap();
        let mut m = machine_with_dest(&program);
        let i = instr(OpCode::Eq, vec![("var", "GF@x"), ("nil", ""), ("int", "5")]);
        compare(&mut m, &i).unwrap();
        assert_eq!(
            m.frames.frame(FrameKind::Global).unwrap().read("x").unwrap(),
            &Value::Bool(false)
        );
    }

    #[test]
    fn lt_with_nil_is_type_mismatch() {
        let program = crate::program::ProgramTable::new(vec![], Default::default()).unwrap();
        let mut m = machine_with_dest(&program);
        let i = instr(OpCode::Lt, vec![("var", "GF@x"), ("nil", ""), ("int", "5")]);
        let err = compare(&mut m, &i).unwrap_err();
        assert_eq!(err.kind(), ExitCode::TypeMismatch);
    }

    #[test]
    fn bool_ordering_false_lt_true() {
        let program = crate::program::ProgramTable::new(vec![], Default::default()).unwrap();
        let mut m = machine_with_dest(&program);
        let i = instr(
            OpCode::Lt,
            vec![("var", "GF@x"), ("bool", "false"), ("bool", "true")],
        );
        compare(&mut m, &i).unwrap();
        assert_eq!(
            m.frames.frame(FrameKind::Global).unwrap().read("x").unwrap(),
            &Value::Bool(true)
        );
    }
}
