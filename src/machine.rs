//! # Frame, Stack, and Register State
//!
//! The three-frame variable model and the three stacks (spec §3: "Frame
//! register set", "Frame stack", "Data stack", "Call stack"). This module
//! owns the state; `resolver.rs` owns how operands read and write through
//! it, and `vm.rs` owns when each handler is allowed to touch it.

use std::collections::HashMap;

use crate::error::{ExitCode, InterpError};
use crate::value::Value;

/// A single frame: a mapping from declared variable name to its slot.
/// A slot that's present but `None` is "declared, uninitialized" (spec §3).
#[derive(Debug, Default)]
pub struct Frame {
    slots: HashMap<String, Option<Value>>,
}

impl Frame {
    pub fn new() -> Self {
        Frame {
            slots: HashMap::new(),
        }
    }

    pub fn declare(&mut self, name: &str) -> Result<(), InterpError> {
        if self.slots.contains_key(name) {
            return Err(ExitCode::Label.at(format!("variable already declared: {}", name)));
        }
        self.slots.insert(name.to_string(), None);
        Ok(())
    }

    pub fn read(&self, name: &str) -> Result<&Value, InterpError> {
        match self.slots.get(name) {
            None => Err(ExitCode::UndefinedVar.at(format!("undeclared variable: {}", name))),
            Some(None) => Err(ExitCode::MissingValue.at(format!("uninitialized variable: {}", name))),
            Some(Some(v)) => Ok(v),
        }
    }

    /// Like [`Frame::read`] but never errors on an uninitialized slot —
    /// `TYPE` needs to distinguish "no value yet" without failing (spec
    /// §4.7 "Type reflection").
    pub fn peek(&self, name: &str) -> Result<Option<&Value>, InterpError> {
        match self.slots.get(name) {
            None => Err(ExitCode::UndefinedVar.at(format!("undeclared variable: {}", name))),
            Some(slot) => Ok(slot.as_ref()),
        }
    }

    pub fn write(&mut self, name: &str, value: Value) -> Result<(), InterpError> {
        match self.slots.get_mut(name) {
            None => Err(ExitCode::UndefinedVar.at(format!("undeclared variable: {}", name))),
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
        }
    }
}

/// The frame register set: global frame, temporary frame, and the frame
/// stack whose top (if any) is the local frame.
#[derive(Debug)]
pub struct FrameSet {
    global: Frame,
    temporary: Option<Frame>,
    stack: Vec<Frame>,
}

/// Which frame register an operand names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    Global,
    Local,
    Temporary,
}

impl FrameSet {
    pub fn new() -> Self {
        FrameSet {
            global: Frame::new(),
            temporary: None,
            stack: Vec::new(),
        }
    }

    pub fn frame(&self, kind: FrameKind) -> Result<&Frame, InterpError> {
        match kind {
            FrameKind::Global => Ok(&self.global),
            FrameKind::Temporary => self
                .temporary
                .as_ref()
                .ok_or_else(|| ExitCode::UndefinedFrame.at("temporary frame does not exist")),
            FrameKind::Local => self
                .stack
                .last()
                .ok_or_else(|| ExitCode::UndefinedFrame.at("local frame stack is empty")),
        }
    }

    pub fn frame_mut(&mut self, kind: FrameKind) -> Result<&mut Frame, InterpError> {
        match kind {
            FrameKind::Global => Ok(&mut self.global),
            FrameKind::Temporary => self
                .temporary
                .as_mut()
                .ok_or_else(|| ExitCode::UndefinedFrame.at("temporary frame does not exist")),
            FrameKind::Local => self
                .stack
                .last_mut()
                .ok_or_else(|| ExitCode::UndefinedFrame.at("local frame stack is empty")),
        }
    }

    /// `CREATEFRAME` — unconditionally replaces any existing TF.
    pub fn create_frame(&mut self) {
        self.temporary = Some(Frame::new());
    }

    /// `PUSHFRAME` — TF must exist; it becomes the new LF.
    pub fn push_frame(&mut self) -> Result<(), InterpError> {
        let tf = self
            .temporary
            .take()
            .ok_or_else(|| ExitCode::UndefinedFrame.at("PUSHFRAME: no temporary frame"))?;
        self.stack.push(tf);
        Ok(())
    }

    /// `POPFRAME` — frame stack must be non-empty; its top becomes the new TF.
    pub fn pop_frame(&mut self) -> Result<(), InterpError> {
        let top = self
            .stack
            .pop()
            .ok_or_else(|| ExitCode::UndefinedFrame.at("POPFRAME: local frame stack is empty"))?;
        self.temporary = Some(top);
        Ok(())
    }
}

impl Default for FrameSet {
    fn default() -> Self {
        Self::new()
    }
}

/// The LIFO data stack used by `PUSHS`/`POPS`.
#[derive(Debug, Default)]
pub struct DataStack(Vec<Value>);

impl DataStack {
    pub fn new() -> Self {
        DataStack(Vec::new())
    }

    pub fn push(&mut self, v: Value) {
        self.0.push(v);
    }

    pub fn pop(&mut self) -> Result<Value, InterpError> {
        self.0
            .pop()
            .ok_or_else(|| ExitCode::MissingValue.at("POPS: data stack is empty"))
    }
}

/// The LIFO call stack used by `CALL`/`RETURN`, holding resume orders.
#[derive(Debug, Default)]
pub struct CallStack(Vec<i64>);

impl CallStack {
    pub fn new() -> Self {
        CallStack(Vec::new())
    }

    pub fn push(&mut self, return_order: i64) {
        self.0.push(return_order);
    }

    pub fn pop(&mut self) -> Result<i64, InterpError> {
        self.0
            .pop()
            .ok_or_else(|| ExitCode::MissingValue.at("RETURN: call stack is empty"))
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}
