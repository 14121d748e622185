//! Dispatcher-level tests driving [`run`] over hand-built [`ProgramTable`]s
//! (spec §8 "End-to-end scenarios"). These exercise the full fetch-dispatch-
//! advance loop without going through the XML loader/validator — that
//! round trip is covered by the crate's `tests/` integration suite.

use std::collections::HashMap;

use super::*;
use crate::program::{Arg, OpCode, ProgramTable};
use crate::value::Value;

fn arg(kind: &str, text: &str) -> Arg {
    Arg {
        kind: kind.to_string(),
        text: text.to_string(),
    }
}

fn instr(order: i64, opcode: OpCode, args: Vec<Arg>) -> Instr {
    Instr {
        order,
        opcode,
        args,
    }
}

fn table(instrs: Vec<Instr>, labels: HashMap<String, i64>) -> ProgramTable {
    ProgramTable::new(instrs, labels).unwrap()
}

#[test]
fn empty_program_exits_zero() {
    let program = table(vec![], HashMap::new());
    let code = run(&program, InputSource::default()).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn arithmetic_scenario_computes_sum() {
    // DEFVAR GF@x; ADD GF@x int@10 int@-3
    let program = table(
        vec![
            instr(0, OpCode::DefVar, vec![arg("var", "GF@x")]),
            instr(
                1,
                OpCode::Add,
                vec![arg("var", "GF@x"), arg("int", "10"), arg("int", "-3")],
            ),
        ],
        HashMap::new(),
    );
    let mut m = Machine::new(&program, InputSource::default());
    loop {
        if m.ip > program.max_order {
            break;
        }
        let i = program.get(m.ip).unwrap();
        match dispatch(&mut m, i).unwrap() {
            Flow::Advance => m.ip += 1,
            Flow::Goto(t) => m.ip = t,
            Flow::Exit(_) => break,
        }
    }
    assert_eq!(
        m.frames
            .frame(crate::machine::FrameKind::Global)
            .unwrap()
            .read("x")
            .unwrap(),
        &Value::Int(num_bigint::BigInt::from(7))
    );
}

#[test]
fn division_by_zero_surfaces_bad_value_exit_code() {
    // DEFVAR GF@x; IDIV GF@x int@1 int@0
    let program = table(
        vec![
            instr(0, OpCode::DefVar, vec![arg("var", "GF@x")]),
            instr(
                1,
                OpCode::IDiv,
                vec![arg("var", "GF@x"), arg("int", "1"), arg("int", "0")],
            ),
        ],
        HashMap::new(),
    );
    let err = run(&program, InputSource::default()).unwrap_err();
    assert_eq!(err.kind(), ExitCode::BadValue);
}

#[test]
fn uninitialized_read_is_missing_value_exit_code() {
    // DEFVAR GF@x; WRITE GF@x (as PUSHS so no stdout side effect in the test)
    let program = table(
        vec![
            instr(0, OpCode::DefVar, vec![arg("var", "GF@x")]),
            instr(1, OpCode::PushS, vec![arg("var", "GF@x")]),
        ],
        HashMap::new(),
    );
    let err = run(&program, InputSource::default()).unwrap_err();
    assert_eq!(err.kind(), ExitCode::MissingValue);
}

#[test]
fn loop_via_jumps_counts_to_three() {
    // DEFVAR GF@i; MOVE GF@i int@1; LABEL loop; PUSHS GF@i;
    // ADD GF@i GF@i int@1; JUMPIFNEQ loop GF@i int@4
    let mut labels = HashMap::new();
    labels.insert("loop".to_string(), 2);
    let program = table(
        vec![
            instr(0, OpCode::DefVar, vec![arg("var", "GF@i")]),
            instr(1, OpCode::Move, vec![arg("var", "GF@i"), arg("int", "1")]),
            instr(2, OpCode::Label, vec![arg("label", "loop")]),
            instr(3, OpCode::PushS, vec![arg("var", "GF@i")]),
            instr(
                4,
                OpCode::Add,
                vec![arg("var", "GF@i"), arg("var", "GF@i"), arg("int", "1")],
            ),
            instr(
                5,
                OpCode::JumpIfNeq,
                vec![arg("label", "loop"), arg("var", "GF@i"), arg("int", "4")],
            ),
        ],
        labels,
    );
    let mut machine = Machine::new(&program, InputSource::default());
    loop {
        if machine.ip > program.max_order {
            break;
        }
        let i = program.get(machine.ip).unwrap();
        match dispatch(&mut machine, i).unwrap() {
            Flow::Advance => machine.ip += 1,
            Flow::Goto(t) => machine.ip = t,
            Flow::Exit(_) => break,
        }
    }
    let mut pushed = Vec::new();
    while let Ok(v) = machine.data.pop() {
        pushed.push(v);
    }
    pushed.reverse();
    assert_eq!(
        pushed,
        vec![
            Value::Int(num_bigint::BigInt::from(1)),
            Value::Int(num_bigint::BigInt::from(2)),
            Value::Int(num_bigint::BigInt::from(3)),
        ]
    );
    assert_eq!(
        machine
            .frames
            .frame(crate::machine::FrameKind::Global)
            .unwrap()
            .read("i")
            .unwrap(),
        &Value::Int(num_bigint::BigInt::from(4))
    );
}

#[test]
fn call_return_resumes_past_call_site() {
    // CALL f; EXIT int@0; LABEL f; EXIT int@9; RETURN
    let mut labels = HashMap::new();
    labels.insert("f".to_string(), 2);
    let program = table(
        vec![
            instr(0, OpCode::Call, vec![arg("label", "f")]),
            instr(1, OpCode::Exit, vec![arg("int", "0")]),
            instr(2, OpCode::Label, vec![arg("label", "f")]),
            instr(3, OpCode::DefVar, vec![arg("var", "GF@seen")]),
            instr(4, OpCode::Return, vec![]),
        ],
        labels,
    );
    let code = run(&program, InputSource::default()).unwrap();
    // RETURN resumes after order 0 (the CALL site), i.e. at order 1, which
    // exits 0 — proving control returned to the caller rather than falling
    // through past the function body.
    assert_eq!(code, 0);
}

#[test]
fn mismatched_return_is_missing_value() {
    let program = table(vec![instr(0, OpCode::Return, vec![])], HashMap::new());
    let err = run(&program, InputSource::default()).unwrap_err();
    assert_eq!(err.kind(), ExitCode::MissingValue);
}

#[test]
fn exit_terminates_with_requested_code() {
    let program = table(
        vec![instr(0, OpCode::Exit, vec![arg("int", "12")])],
        HashMap::new(),
    );
    let code = run(&program, InputSource::default()).unwrap();
    assert_eq!(code, 12);
}
