//! # Operand Resolver
//!
//! Uniform resolution of a "symb" operand — literal or variable — into a
//! concrete [`Value`] (spec §4.5). Variable operands additionally resolve
//! to a `(FrameKind, name)` pair so handlers can write through them.
//!
//! A `string` literal's text has already been decoded (entities, `\DDD`
//! escapes) by the validator, so resolving one here is a plain copy — see
//! `validate.rs`'s `validate_args`.

use crate::error::{ExitCode, InterpError};
use crate::machine::{FrameKind, FrameSet};
use crate::program::Arg;
use crate::value::{parse_bool_literal, parse_int_literal, Value};

/// Split a `var` operand's text (`FF@name`) into its frame and identifier.
pub fn split_var(text: &str) -> Result<(FrameKind, &str), InterpError> {
    let (prefix, name) = text
        .split_once('@')
        .ok_or_else(|| ExitCode::Structural.at(format!("malformed variable operand: {}", text)))?;
    let kind = match prefix.to_ascii_uppercase().as_str() {
        "GF" => FrameKind::Global,
        "LF" => FrameKind::Local,
        "TF" => FrameKind::Temporary,
        _ => {
            return Err(ExitCode::Structural.at(format!("unknown frame prefix: {}", prefix)));
        }
    };
    Ok((kind, name))
}

/// Resolve a symb operand (literal or variable) against the current frame
/// register set, returning a deep copy of its value (spec §4.5).
pub fn resolve_symb(frames: &FrameSet, arg: &Arg) -> Result<Value, InterpError> {
    match arg.kind.as_str() {
        "var" => {
            let (kind, name) = split_var(&arg.text)?;
            frames.frame(kind)?.read(name).cloned()
        }
        "int" => Ok(Value::Int(parse_int_literal(&arg.text)?)),
        "bool" => Ok(Value::Bool(parse_bool_literal(&arg.text)?)),
        "string" => Ok(Value::Str(arg.text.clone())),
        "nil" => Ok(Value::Nil),
        other => Err(ExitCode::Structural.at(format!("not a symb operand: {}", other))),
    }
}

/// Resolve a `var` operand (e.g. the destination of `MOVE`) to its frame and
/// name, without reading its current value.
pub fn resolve_var<'a>(arg: &'a Arg) -> Result<(FrameKind, &'a str), InterpError> {
    if arg.kind != "var" {
        return Err(ExitCode::Structural.at(format!("expected var operand, found {}", arg.kind)));
    }
    split_var(&arg.text)
}

/// Write `value` into the variable named by `arg` (spec §4.5 "Writing").
pub fn write_var(frames: &mut FrameSet, arg: &Arg, value: Value) -> Result<(), InterpError> {
    let (kind, name) = resolve_var(arg)?;
    frames.frame_mut(kind)?.write(name, value)
}

/// `TYPE`'s operand reflection (spec §4.7 "Type reflection"): reports the
/// empty string for a declared-but-uninitialized variable rather than
/// failing, unlike every other read through a `var` operand.
pub fn type_name_of(frames: &FrameSet, arg: &Arg) -> Result<String, InterpError> {
    match arg.kind.as_str() {
        "var" => {
            let (kind, name) = split_var(&arg.text)?;
            match frames.frame(kind)?.peek(name)? {
                Some(v) => Ok(v.tag_name().to_string()),
                None => Ok(String::new()),
            }
        }
        "int" | "bool" | "string" | "nil" => Ok(arg.kind.clone()),
        other => Err(ExitCode::Structural.at(format!("not a symb operand: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn arg(kind: &str, text: &str) -> Arg {
        Arg {
            kind: kind.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn resolves_int_literal() {
        let frames = FrameSet::new();
        let v = resolve_symb(&frames, &arg("int", "42")).unwrap();
        assert_eq!(v, Value::Int(BigInt::from(42)));
    }

    #[test]
    fn undefined_frame_on_local_with_empty_stack() {
        let frames = FrameSet::new();
        let err = resolve_symb(&frames, &arg("var", "LF@x")).unwrap_err();
        assert_eq!(err.kind(), ExitCode::UndefinedFrame);
    }

    #[test]
    fn undeclared_variable_is_undefined_var() {
        let frames = FrameSet::new();
        let err = resolve_symb(&frames, &arg("var", "GF@x")).unwrap_err();
        assert_eq!(err.kind(), ExitCode::UndefinedVar);
    }

    #[test]
    fn write_then_read_roundtrips() {
        let mut frames = FrameSet::new();
        frames
            .frame_mut(FrameKind::Global)
            .unwrap()
            .declare("x")
            .unwrap();
        write_var(&mut frames, &arg("var", "GF@x"), Value::Int(BigInt::from(7))).unwrap();
        let v = resolve_symb(&frames, &arg("var", "GF@x")).unwrap();
        assert_eq!(v, Value::Int(BigInt::from(7)));
    }
}
