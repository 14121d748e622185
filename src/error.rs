//! # Error Handling for the IPPcode22 Interpreter
//!
//! This module defines the **exit-code categories** and **interpreter errors**
//! used throughout the static validator and the execution engine.
//!
//! ## Design
//! - [`ExitCode`] is a compact, `repr(i32)` enumeration of *categories* of
//!   failure. Each variant maps one-to-one onto a reserved process exit code
//!   (see spec §6/§7).
//! - [`InterpError`] is a richer enum carrying a human-readable message and,
//!   where applicable, the instruction order active when the fault occurred.
//!
//! ## Display
//! - Implements [`fmt::Display`] for [`InterpError`], producing a uniform
//!   `Error: <message> at order <n>` (or `Error: <message>` with no active
//!   order) diagnostic on standard error.
//! - Implements [`std::error::Error`] so `InterpError` integrates with Rust's
//!   standard error handling ecosystem.

use std::fmt;

/// Compact enum of exit-code categories reserved by the interpreter.
///
/// Values match spec §6 exactly; user programs terminating via `EXIT` use
/// the disjoint range `0..=49` and never construct one of these.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitCode {
    /// CLI misuse (missing required `--source`/`--input`, unknown flag).
    Cli = 10,
    /// The requested input file could not be opened or read.
    InputFile = 11,
    /// The XML document itself is malformed, or the root/children are not
    /// the shape the loader expects.
    MalformedXml = 31,
    /// A structural or lexical defect in an otherwise well-formed document:
    /// bad `order`, unknown opcode, wrong argument count, bad lexical form,
    /// invalid escape sequence.
    Structural = 32,
    /// Duplicate label definition, unresolved jump/call target, or
    /// redeclaration of an already-declared variable.
    Label = 52,
    /// Operand type mismatch (wrong tag for the operation).
    TypeMismatch = 53,
    /// Reference to a variable not declared in an existing frame.
    UndefinedVar = 54,
    /// Reference to a frame that does not currently exist (TF absent, or
    /// LF with an empty frame stack).
    UndefinedFrame = 55,
    /// A required value is missing: uninitialized variable read, empty data
    /// stack on `POPS`, empty call stack on `RETURN`.
    MissingValue = 56,
    /// Division/modulo by zero, or an `EXIT` code outside `[0, 49]`.
    BadValue = 57,
    /// A string/character operation index is out of range.
    OutOfRange = 58,
    /// Internal interpreter inconsistency — should never occur in a
    /// correct implementation.
    Internal = 99,
}

impl ExitCode {
    /// The numeric process exit code for this category.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Upgrade this category into a fully descriptive [`InterpError`],
    /// embedding the provided message and optional active order.
    pub fn at(self, msg: impl Into<String>) -> InterpError {
        InterpError {
            kind: self,
            message: msg.into(),
            order: None,
        }
    }

    /// Same as [`ExitCode::at`], but attaches the instruction order active
    /// when the fault occurred.
    pub fn at_order(self, msg: impl Into<String>, order: i64) -> InterpError {
        InterpError {
            kind: self,
            message: msg.into(),
            order: Some(order),
        }
    }
}

/// A structured interpreter error: an [`ExitCode`] category, a message, and
/// (for runtime faults) the order of the instruction that raised it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterpError {
    kind: ExitCode,
    message: String,
    order: Option<i64>,
}

impl InterpError {
    /// The exit-code category this error belongs to.
    pub fn kind(&self) -> ExitCode {
        self.kind
    }

    /// The numeric process exit code to use for this error.
    pub fn exit_code(&self) -> i32 {
        self.kind.code()
    }

    /// Attach an instruction order to an error that was raised without one
    /// (e.g. from a helper that doesn't know which instruction called it).
    /// Leaves an already-tagged error untouched.
    pub fn or_at_order(self, order: i64) -> InterpError {
        match self.order {
            Some(_) => self,
            None => InterpError {
                order: Some(order),
                ..self
            },
        }
    }
}

impl fmt::Display for InterpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.order {
            Some(order) => write!(f, "Error: {} at order {}", self.message, order),
            None => write!(f, "Error: {}", self.message),
        }
    }
}

impl std::error::Error for InterpError {}

/// Convenience alias used throughout the crate.
pub type InterpResult<T> = Result<T, InterpError>;
