//! Escape and interpolation (component D).
//!
//! Two total passes over arbitrary text, always run in this order:
//! interpolation (`@name`/`#name` substitution) then escape expansion
//! (`\n`, `\t`, ...). Running them in this order is load-bearing: a
//! variable whose value contains a literal backslash-n must come out as
//! the two bytes `\` `n`, not a newline, until escapes run over the
//! *composed* text.

use crate::vartable::VariableTable;

/// Substitute `@name` (value) and `#name` (type name) in `input`.
/// An identifier immediately following `@`/`#` is `[A-Za-z0-9_]{1,63}`;
/// if the sigil is not followed by one, it is passed through verbatim.
/// A reference to an undeclared variable renders as the literal text
/// `[undefined]`.
pub fn interpolate(input: &str, table: &VariableTable) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'@' || b == b'#' {
            let ident_start = i + 1;
            let mut j = ident_start;
            while j < bytes.len() && j - ident_start < 63 && is_ident_byte(bytes[j]) {
                j += 1;
            }
            if j == ident_start {
                out.push(b as char);
                i += 1;
                continue;
            }
            let name = &input[ident_start..j];
            match table.find(name) {
                Some(var) if b == b'@' => out.push_str(&var.value.render()),
                Some(var) => out.push_str(var.var_type().name()),
                None => out.push_str("[undefined]"),
            }
            i = j;
        } else {
            out.push(b as char);
            i += 1;
        }
    }
    out
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Expand backslash escapes in `input`: `\n` `\t` `\\` `\"` `\@` `\#`.
/// Any other character after a backslash passes through literally, and
/// a trailing lone backslash at end-of-string is emitted as-is.
pub fn expand_escapes(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            let escaped = match bytes[i + 1] {
                b'n' => Some('\n'),
                b't' => Some('\t'),
                b'\\' => Some('\\'),
                b'"' => Some('"'),
                b'@' => Some('@'),
                b'#' => Some('#'),
                other => Some(other as char),
            };
            if let Some(c) = escaped {
                out.push(c);
            }
            i += 2;
        } else {
            out.push(bytes[i] as char);
            i += 1;
        }
    }
    out
}

/// Run both passes in the order observable behavior depends on:
/// interpolation first, then escapes over the composed text.
pub fn render(input: &str, table: &VariableTable) -> String {
    expand_escapes(&interpolate(input, table))
}
