//! # Value Representation
//!
//! [`Value`] is the universal runtime type: every variable slot, data-stack
//! entry, and resolved operand holds one. The tag set is closed and finite
//! (spec §3) — represented as a tagged union with exhaustive matching, never
//! host reflection (spec §9 "Dynamic typing").
//!
//! Integer literals may carry arbitrary magnitude (spec §9 "Big integers"),
//! so the `Int` variant wraps [`BigInt`] rather than a fixed-width type.
//!
//! Values are logically immutable once stored: `MOVE`/`PUSHS`/`POPS` always
//! produce an independent copy (`Value` is `Clone`, and `BigInt`/`String`
//! clone by value, so no aliasing is possible between a slot and anything
//! derived from it).

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{Num, ToPrimitive};

use crate::error::{ExitCode, InterpError};

/// A dynamically typed value: `int`, `bool`, `string`, or `nil`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Int(BigInt),
    Bool(bool),
    Str(String),
    Nil,
}

impl Value {
    /// The tag name as IPPcode22 programs see it via `TYPE`.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Nil => "nil",
        }
    }

    /// Render this value the way `WRITE`/`DPRINT` do (spec §4.7 "I/O").
    pub fn display(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Str(s) => s.clone(),
            Value::Nil => String::new(),
        }
    }

    pub fn as_int(&self) -> Result<&BigInt, InterpError> {
        match self {
            Value::Int(i) => Ok(i),
            other => Err(ExitCode::TypeMismatch.at(format!(
                "expected int, found {}",
                other.tag_name()
            ))),
        }
    }

    pub fn as_bool(&self) -> Result<bool, InterpError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(ExitCode::TypeMismatch.at(format!(
                "expected bool, found {}",
                other.tag_name()
            ))),
        }
    }

    pub fn as_str(&self) -> Result<&str, InterpError> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(ExitCode::TypeMismatch.at(format!(
                "expected string, found {}",
                other.tag_name()
            ))),
        }
    }

    /// `EQ` semantics (spec §4.7 "Comparison"): same-tag values compare
    /// structurally; `nil` may stand on either side of an otherwise
    /// mismatched-tag comparison (and is then simply unequal).
    pub fn values_equal(&self, other: &Value) -> Result<bool, InterpError> {
        if self.tag_name() == other.tag_name() {
            return Ok(self == other);
        }
        if matches!(self, Value::Nil) || matches!(other, Value::Nil) {
            return Ok(false);
        }
        Err(ExitCode::TypeMismatch.at(format!(
            "cannot compare {} with {}",
            self.tag_name(),
            other.tag_name()
        )))
    }

    /// `LT`/`GT` ordering (spec §4.7 "Comparison"): requires a shared,
    /// non-`nil` tag. `bool` orders `false < true`; `string` orders by code
    /// point rather than by byte.
    pub fn compare(&self, other: &Value) -> Result<Ordering, InterpError> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Ok(a.chars().cmp(b.chars())),
            (Value::Nil, _) | (_, Value::Nil) => Err(ExitCode::TypeMismatch.at(
                "nil has no ordering (only EQ may involve nil)",
            )),
            (a, b) => Err(ExitCode::TypeMismatch.at(format!(
                "cannot order {} with {}",
                a.tag_name(),
                b.tag_name()
            ))),
        }
    }
}

/// Convert an already-int-typed index operand to a `usize` (spec §4.7
/// "String operations"). A negative or unrepresentably large index is an
/// out-of-range condition, not a type mismatch.
pub fn bigint_to_index(i: &BigInt) -> Result<usize, InterpError> {
    i.to_usize()
        .ok_or_else(|| ExitCode::OutOfRange.at(format!("index out of range: {}", i)))
}

/// Parse a decoded integer literal surface (spec §4.1) into a [`BigInt`].
///
/// The sign, if present, is stripped before base detection, matching the
/// reference implementation's order of operations (sign first, then
/// prefix).
pub fn parse_int_literal(text: &str) -> Result<BigInt, InterpError> {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };

    let magnitude = if let Some(bin) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        if bin.is_empty() {
            BigInt::from(0)
        } else {
            BigInt::from_str_radix(bin, 2)
        }
        .map_err(|_| ExitCode::Structural.at(format!("invalid binary int literal: {}", text)))?
    } else if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        if hex.is_empty() {
            BigInt::from(0)
        } else {
            BigInt::from_str_radix(hex, 16)
        }
        .map_err(|_| ExitCode::Structural.at(format!("invalid hex int literal: {}", text)))?
    } else if rest.starts_with('0') {
        if rest.len() == 1 {
            BigInt::from(0)
        } else {
            BigInt::from_str_radix(&rest[1..], 8)
        }
        .map_err(|_| ExitCode::Structural.at(format!("invalid octal int literal: {}", text)))?
    } else {
        rest.parse::<BigInt>()
            .map_err(|_| ExitCode::Structural.at(format!("invalid decimal int literal: {}", text)))?
    };

    Ok(magnitude * sign)
}

/// Parse a decoded boolean literal surface: `true` or `false`, exactly.
pub fn parse_bool_literal(text: &str) -> Result<bool, InterpError> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ExitCode::Structural.at(format!("invalid bool literal: {}", other))),
    }
}
