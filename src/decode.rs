//! # String Decoder for IPPcode22 String Literals
//!
//! Applied only to arguments whose declared `type` is `string` (spec §4.3).
//! Two passes, in order:
//!
//! 1. **Entity decode** — replace the five XML named entity references with
//!    their characters. Idempotent: running it twice is the same as running
//!    it once, since a decoded string never re-introduces an entity name
//!    immediately followed by the exact set of trailing characters the
//!    entity form requires.
//! 2. **Escape decode** — every `\DDD` (exactly three decimal digits)
//!    becomes the code point of that decimal value. Any other
//!    backslash-initiated sequence is a structural error.
//!
//! The two passes are not regex-driven end to end: entity substitution uses
//! simple literal replacement, and escape decoding walks the string once,
//! char by char, since validating "backslash then exactly three digits,
//! nothing else" needs lookahead the `regex` crate doesn't offer.

use crate::error::{ExitCode, InterpError};

/// Replace XML named entity references with their characters.
///
/// Idempotent by construction: the replacement characters (`&`, `<`, `>`,
/// `"`, `'`) never spell out another entity reference on their own.
pub fn decode_entities(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}

/// Decode `\DDD` escape sequences in an already entity-decoded string.
///
/// Returns a [`ExitCode::Structural`] error on the first backslash not
/// immediately followed by exactly three ASCII decimal digits.
pub fn decode_escapes(s: &str) -> Result<String, InterpError> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' {
            let digits: String = chars
                .get(i + 1..i + 4)
                .map(|w| w.iter().collect())
                .unwrap_or_default();
            if digits.len() == 3 && digits.chars().all(|c| c.is_ascii_digit()) {
                let code: u32 = digits.parse().unwrap();
                let ch = char::from_u32(code).ok_or_else(|| {
                    ExitCode::Structural.at(format!("invalid escape code point: \\{}", digits))
                })?;
                out.push(ch);
                i += 4;
            } else {
                return Err(ExitCode::Structural.at(format!(
                    "invalid escape sequence in string literal: {:?}",
                    s
                )));
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Run both decoding passes in the order the spec mandates: entities first,
/// then escapes.
pub fn decode_string_literal(raw: &str) -> Result<String, InterpError> {
    let entity_decoded = decode_entities(raw);
    decode_escapes(&entity_decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;&gt; c"), "a & b <> c");
        assert_eq!(decode_entities("&quot;q&apos;"), "\"q'");
    }

    #[test]
    fn entity_decode_is_idempotent() {
        let once = decode_entities("&amp;lt;");
        let twice = decode_entities(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn decodes_valid_escape() {
        assert_eq!(decode_escapes("a\\032b").unwrap(), "a b");
        assert_eq!(decode_escapes("\\035").unwrap(), "#");
        assert_eq!(decode_escapes("").unwrap(), "");
    }

    #[test]
    fn rejects_malformed_escape() {
        assert!(decode_escapes("\\03").is_err());
        assert!(decode_escapes("\\0a2").is_err());
        assert!(decode_escapes("trailing\\").is_err());
    }

    #[test]
    fn full_literal_decode_order_matches_spec() {
        // "\035" decodes to '#', which would otherwise be forbidden in the
        // raw string surface — exercises the hello-world / escape scenario.
        assert_eq!(decode_string_literal("a\\035b").unwrap(), "a#b");
        assert_eq!(
            decode_string_literal("Hello\\032world!").unwrap(),
            "Hello world!"
        );
    }
}
