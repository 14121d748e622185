//! # Static Validator
//!
//! Turns the XML loader's raw instruction list into a [`ProgramTable`]
//! (spec §4.4): checks order integers, opcode spelling, argument counts and
//! types, lexical well-formedness, and builds the label index. Fails fast —
//! the first defect encountered, in document order and then in the
//! post-pass, is reported and nothing further is checked (spec §4.4 "fails
//! fast").
//!
//! `string` arguments are also decoded here (spec §4.3), not at resolve
//! time: the reference implementation decodes every string argument while
//! building its instruction table, so a malformed `\DDD` escape is a
//! static defect (exit 32) even on a literal no execution path ever
//! reaches, not a fault that only surfaces if and when the instruction
//! runs.

use std::collections::HashMap;

use crate::error::{ExitCode, InterpError};
use crate::lex;
use crate::program::{Arg, ArgClass, Instr, OpCode, ProgramTable};
use crate::xml::RawInstr;

/// Run the full static validation pass over a document-order instruction
/// list, producing a dense, order-indexed [`ProgramTable`].
pub fn validate(raw: Vec<RawInstr>) -> Result<ProgramTable, InterpError> {
    let mut instrs = Vec::with_capacity(raw.len());
    let mut labels: HashMap<String, i64> = HashMap::new();
    let mut jump_targets: Vec<(String, i64)> = Vec::new();
    let mut orders_seen: Vec<i64> = Vec::with_capacity(raw.len());

    for r in raw {
        let order = parse_order(&r.order_text, orders_seen.last().copied())?;
        orders_seen.push(order);

        let opcode = OpCode::parse(&r.opcode_text).ok_or_else(|| {
            ExitCode::Structural.at_order(
                format!("invalid opcode: {}", r.opcode_text),
                order,
            )
        })?;

        let args = validate_args(opcode, r.args, order)?;

        if opcode == OpCode::Label {
            let name = args[0].text.clone();
            if labels.insert(name.clone(), order).is_some() {
                return Err(ExitCode::Label.at_order(format!("duplicate label: {}", name), order));
            }
        }

        if is_label_referencing(opcode) {
            jump_targets.push((args[0].text.clone(), order));
        }

        instrs.push(Instr {
            order,
            opcode,
            args,
        });
    }

    check_order_continuity(&orders_seen)?;

    for (name, order) in &jump_targets {
        if !labels.contains_key(name) {
            return Err(ExitCode::Label
                .at_order(format!("unresolved label target: {}", name), *order));
        }
    }

    ProgramTable::new(instrs, labels)
}

/// Parse and range-check an instruction's `order` attribute (spec §4.4.1).
pub fn parse_order(text: &str, last_valid: Option<i64>) -> Result<i64, InterpError> {
    let parsed: i64 = text.parse().map_err(|_| {
        let msg = match last_valid {
            Some(o) => format!("missing or invalid instruction order: {:?} (last valid: {})", text, o),
            None => format!("missing or invalid instruction order: {:?}", text),
        };
        ExitCode::Structural.at(msg)
    })?;
    if parsed < 0 {
        return Err(ExitCode::Structural.at(format!("negative instruction order: {}", parsed)));
    }
    Ok(parsed)
}

/// Verify the collected orders form a contiguous range with no duplicates
/// (spec §3 "Invariants", §8 "Static invariants" #1).
pub fn check_order_continuity(orders: &[i64]) -> Result<(), InterpError> {
    let mut sorted = orders.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != orders.len() {
        return Err(ExitCode::Structural.at("duplicate instruction order"));
    }
    for window in sorted.windows(2) {
        if window[1] != window[0] + 1 {
            return Err(ExitCode::Structural.at(format!(
                "non-contiguous instruction order: gap between {} and {}",
                window[0], window[1]
            )));
        }
    }
    Ok(())
}

/// Validate an instruction's argument count, type tags, and lexical form
/// against its opcode class (spec §4.4.3–4).
fn validate_args(
    opcode: OpCode,
    mut raw_args: Vec<crate::xml::RawArg>,
    order: i64,
) -> Result<Vec<Arg>, InterpError> {
    raw_args.sort_by_key(|a| a.position);

    let class = opcode.class();
    let arity = class.arity();
    if raw_args.len() != arity {
        return Err(ExitCode::Structural.at_order(
            format!(
                "incorrect number of args for {} (got {}, expected {})",
                opcode.name(),
                raw_args.len(),
                arity
            ),
            order,
        ));
    }
    for (pos, raw) in raw_args.iter().enumerate() {
        if raw.position != pos {
            return Err(ExitCode::Structural.at_order(
                format!("duplicate or missing arg{} for {}", pos + 1, opcode.name()),
                order,
            ));
        }
    }

    let mut args = Vec::with_capacity(arity);
    for (pos, raw) in raw_args.into_iter().enumerate() {
        let allowed = class.allowed_types_at(pos);
        if !allowed.contains(&raw.kind.as_str()) {
            return Err(ExitCode::Structural.at_order(
                format!(
                    "invalid type {:?} for {} arg{} (expected one of {:?})",
                    raw.kind,
                    opcode.name(),
                    pos + 1,
                    allowed
                ),
                order,
            ));
        }
        validate_lexical_form(&raw.kind, &raw.text, opcode, pos, order)?;

        // String literals are decoded here rather than at resolve time: the
        // reference implementation decodes every string arg while building
        // its instruction table, so a malformed `\DDD` escape is a static
        // defect (exit 32) even on a branch that never executes (spec
        // §4.3/§7; SPEC_FULL §10.5).
        let text = if raw.kind == "string" {
            crate::decode::decode_string_literal(&raw.text).map_err(|e| e.or_at_order(order))?
        } else {
            raw.text
        };

        args.push(Arg {
            kind: raw.kind,
            text,
        });
    }
    Ok(args)
}

/// Check a single argument's text against the lexical pattern implied by
/// its declared type (spec §4.1).
fn validate_lexical_form(
    kind: &str,
    text: &str,
    opcode: OpCode,
    pos: usize,
    order: i64,
) -> Result<(), InterpError> {
    let ok = match kind {
        "var" => lex::VAR.is_match(text),
        "label" => lex::LABEL.is_match(text),
        "type" => lex::TYPE.is_match(text),
        "int" => lex::INT.is_match(text),
        "bool" => lex::BOOL.is_match(text),
        "string" => lex::STRING.is_match(text),
        "nil" => text == "nil",
        other => {
            return Err(ExitCode::Structural.at_order(
                format!("unknown argument type: {}", other),
                order,
            ))
        }
    };
    if !ok {
        return Err(ExitCode::Structural.at_order(
            format!(
                "malformed {} literal for {} arg{}: {:?}",
                kind,
                opcode.name(),
                pos + 1,
                text
            ),
            order,
        ));
    }
    Ok(())
}

/// Does this opcode's first argument name a label (spec §4.4.6)?
fn is_label_referencing(opcode: OpCode) -> bool {
    matches!(
        opcode.class(),
        ArgClass::Lbl | ArgClass::LblSymbSymb
    )
}
