//! # Lexical Patterns for IPPcode22 Operand Surfaces
//!
//! This module owns every regular expression used to validate the textual
//! surface of an operand before it is handed to the decoder or the value
//! parser. Each pattern is compiled exactly once (process lifetime) via
//! [`once_cell::sync::Lazy`], the same pattern the reference VM uses for its
//! process-local file descriptor table.
//!
//! ## Patterns
//! - [`VAR`] — `[GLT]F@` followed by an identifier.
//! - [`LABEL`] — an identifier (no frame prefix).
//! - [`TYPE`] — one of `int`, `string`, `bool`.
//! - [`INT`] — optional sign, then binary/hex/octal/decimal surface.
//! - [`BOOL`] — `true` or `false`.
//! - [`STRING`] — zero or more characters excluding ASCII 0–32 and `#`.
//!
//! `\DDD` escape validation is *not* done with a regex here: the `regex`
//! crate implements no lookaround, and distinguishing "backslash followed by
//! exactly three digits" from "backslash followed by anything else" needs
//! it. The decoder (`decode.rs`) instead walks the string once, char by
//! char, which is both simpler and avoids a crate limitation.

use once_cell::sync::Lazy;
use regex::Regex;

/// `[GLT]F@<identifier>` — a variable operand.
pub static VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[GLTglt]F@[A-Za-z_\-$&%*!?][0-9A-Za-z_\-$&%*!?]*$").unwrap()
});

/// A label or identifier surface (no frame prefix).
pub static LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_\-$&%*!?][0-9A-Za-z_\-$&%*!?]*$").unwrap()
});

/// One of the three declarable value types.
pub static TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(int|string|bool)$").unwrap());

/// A signed integer literal in decimal, binary (`0b`), hex (`0x`), or octal
/// (leading `0`) form.
pub static INT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(([1-9][0-9]*)|(0[bB][01]*)|(0[xX][0-9a-fA-F]*)|(0[0-7]*))$").unwrap()
});

/// `true` or `false`, exactly.
pub static BOOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(true|false)$").unwrap());

/// A string literal surface: no ASCII control characters (0–32) and no
/// `#` (which would otherwise be read as a comment delimiter upstream).
/// Backslash is permitted here; whether its use is well-formed is checked
/// separately by the escape patterns during decoding.
pub static STRING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\x00-\x20\x23]*$").unwrap());
