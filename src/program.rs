//! # Program Representation
//!
//! Once the validator has approved a document, its instructions live here as
//! a dense, order-indexed table (spec §3 "Program table"). `OpCode` and
//! `ArgClass` form the static shape every instruction must match; `value.rs`
//! and `resolver.rs` deal with what the arguments mean at runtime.

use std::collections::HashMap;

use crate::error::{ExitCode, InterpError};

/// The 35 opcodes, normalized to upper case at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpCode {
    Move,
    CreateFrame,
    PushFrame,
    PopFrame,
    DefVar,
    Call,
    Return,
    PushS,
    Pops,
    Add,
    Sub,
    Mul,
    IDiv,
    Lt,
    Gt,
    Eq,
    And,
    Or,
    Not,
    Int2Char,
    Stri2Int,
    Read,
    Write,
    Concat,
    StrLen,
    GetChar,
    SetChar,
    Type,
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,
    Exit,
    DPrint,
    Break,
}

impl OpCode {
    /// Resolve a case-insensitive opcode token to its normalized variant.
    pub fn parse(token: &str) -> Option<OpCode> {
        Some(match token.to_ascii_uppercase().as_str() {
            "MOVE" => OpCode::Move,
            "CREATEFRAME" => OpCode::CreateFrame,
            "PUSHFRAME" => OpCode::PushFrame,
            "POPFRAME" => OpCode::PopFrame,
            "DEFVAR" => OpCode::DefVar,
            "CALL" => OpCode::Call,
            "RETURN" => OpCode::Return,
            "PUSHS" => OpCode::PushS,
            "POPS" => OpCode::Pops,
            "ADD" => OpCode::Add,
            "SUB" => OpCode::Sub,
            "MUL" => OpCode::Mul,
            "IDIV" => OpCode::IDiv,
            "LT" => OpCode::Lt,
            "GT" => OpCode::Gt,
            "EQ" => OpCode::Eq,
            "AND" => OpCode::And,
            "OR" => OpCode::Or,
            "NOT" => OpCode::Not,
            "INT2CHAR" => OpCode::Int2Char,
            "STRI2INT" => OpCode::Stri2Int,
            "READ" => OpCode::Read,
            "WRITE" => OpCode::Write,
            "CONCAT" => OpCode::Concat,
            "STRLEN" => OpCode::StrLen,
            "GETCHAR" => OpCode::GetChar,
            "SETCHAR" => OpCode::SetChar,
            "TYPE" => OpCode::Type,
            "LABEL" => OpCode::Label,
            "JUMP" => OpCode::Jump,
            "JUMPIFEQ" => OpCode::JumpIfEq,
            "JUMPIFNEQ" => OpCode::JumpIfNeq,
            "EXIT" => OpCode::Exit,
            "DPRINT" => OpCode::DPrint,
            "BREAK" => OpCode::Break,
            _ => return None,
        })
    }

    /// The canonical upper-case mnemonic, used in diagnostics instead of the
    /// `Debug` derive's CamelCase variant spelling.
    pub fn name(self) -> &'static str {
        use OpCode::*;
        match self {
            Move => "MOVE",
            CreateFrame => "CREATEFRAME",
            PushFrame => "PUSHFRAME",
            PopFrame => "POPFRAME",
            DefVar => "DEFVAR",
            Call => "CALL",
            Return => "RETURN",
            PushS => "PUSHS",
            Pops => "POPS",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            IDiv => "IDIV",
            Lt => "LT",
            Gt => "GT",
            Eq => "EQ",
            And => "AND",
            Or => "OR",
            Not => "NOT",
            Int2Char => "INT2CHAR",
            Stri2Int => "STRI2INT",
            Read => "READ",
            Write => "WRITE",
            Concat => "CONCAT",
            StrLen => "STRLEN",
            GetChar => "GETCHAR",
            SetChar => "SETCHAR",
            Type => "TYPE",
            Label => "LABEL",
            Jump => "JUMP",
            JumpIfEq => "JUMPIFEQ",
            JumpIfNeq => "JUMPIFNEQ",
            Exit => "EXIT",
            DPrint => "DPRINT",
            Break => "BREAK",
        }
    }

    /// The argument-position class this opcode belongs to (spec §6 table).
    pub fn class(self) -> ArgClass {
        use ArgClass::*;
        use OpCode::*;
        match self {
            CreateFrame | PushFrame | PopFrame | Return | Break => Nullary,
            DefVar | Pops => Var,
            Call | Label | Jump => Lbl,
            PushS | Write | Exit | DPrint => Symb,
            Move | Int2Char | StrLen | Type | Not => VarSymb,
            Read => VarType,
            Add | Sub | Mul | IDiv | Lt | Gt | Eq | And | Or | Stri2Int | Concat | GetChar
            | SetChar => VarSymbSymb,
            JumpIfEq | JumpIfNeq => LblSymbSymb,
        }
    }
}

/// The argument-position shape of an opcode, per spec §6.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgClass {
    Nullary,
    Var,
    Lbl,
    Symb,
    VarSymb,
    VarType,
    VarSymbSymb,
    LblSymbSymb,
}

impl ArgClass {
    pub fn arity(self) -> usize {
        match self {
            ArgClass::Nullary => 0,
            ArgClass::Var | ArgClass::Lbl | ArgClass::Symb => 1,
            ArgClass::VarSymb | ArgClass::VarType => 2,
            ArgClass::VarSymbSymb | ArgClass::LblSymbSymb => 3,
        }
    }

    /// The set of `type` attribute values permitted at the given zero-based
    /// position within this class.
    pub fn allowed_types_at(self, pos: usize) -> &'static [&'static str] {
        const VAR: &[&str] = &["var"];
        const LABEL: &[&str] = &["label"];
        const SYMB: &[&str] = &["var", "int", "bool", "string", "nil"];
        const TYPE: &[&str] = &["type"];
        match (self, pos) {
            (ArgClass::Var, 0) => VAR,
            (ArgClass::Lbl, 0) => LABEL,
            (ArgClass::Symb, 0) => SYMB,
            (ArgClass::VarSymb, 0) => VAR,
            (ArgClass::VarSymb, 1) => SYMB,
            (ArgClass::VarType, 0) => VAR,
            (ArgClass::VarType, 1) => TYPE,
            (ArgClass::VarSymbSymb, 0) => VAR,
            (ArgClass::VarSymbSymb, 1) | (ArgClass::VarSymbSymb, 2) => SYMB,
            (ArgClass::LblSymbSymb, 0) => LABEL,
            (ArgClass::LblSymbSymb, 1) | (ArgClass::LblSymbSymb, 2) => SYMB,
            _ => &[],
        }
    }
}

/// One already-decoded instruction argument.
#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub kind: String,
    pub text: String,
}

/// A single normalized instruction: its source order, opcode, and argument
/// vector in position order (arg1, arg2, arg3).
#[derive(Clone, Debug)]
pub struct Instr {
    pub order: i64,
    pub opcode: OpCode,
    pub args: Vec<Arg>,
}

/// A validated program: a dense order-indexed instruction table plus the
/// label index built during validation.
#[derive(Debug)]
pub struct ProgramTable {
    instrs: Vec<Instr>,
    order_to_index: HashMap<i64, usize>,
    pub labels: HashMap<String, i64>,
    pub min_order: i64,
    pub max_order: i64,
}

impl ProgramTable {
    pub fn new(mut instrs: Vec<Instr>, labels: HashMap<String, i64>) -> Result<ProgramTable, InterpError> {
        instrs.sort_by_key(|i| i.order);
        let min_order = instrs.first().map(|i| i.order).unwrap_or(0);
        let max_order = instrs.last().map(|i| i.order).unwrap_or(0);
        let mut order_to_index = HashMap::with_capacity(instrs.len());
        for (idx, instr) in instrs.iter().enumerate() {
            order_to_index.insert(instr.order, idx);
        }
        Ok(ProgramTable {
            instrs,
            order_to_index,
            labels,
            min_order,
            max_order,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn get(&self, order: i64) -> Option<&Instr> {
        self.order_to_index.get(&order).map(|&idx| &self.instrs[idx])
    }

    pub fn resolve_label(&self, name: &str) -> Result<i64, InterpError> {
        self.labels
            .get(name)
            .copied()
            .ok_or_else(|| ExitCode::Label.at(format!("unresolved label: {}", name)))
    }
}
