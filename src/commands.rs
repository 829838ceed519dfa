//! Command handlers (component G).
//!
//! Each function takes the raw remainder of a line (after the keyword
//! [`crate::dispatch::dispatch`] already consumed) and the shared
//! interpreter state, and performs exactly one command's effect.

use std::io::{BufRead, Write};

use crate::error::{NoobieError, NoobieErrorKind, Result};
use crate::text;
use crate::value::VarType;
use crate::vartable::VariableTable;

const CLEAR_SEQUENCE: &str = "\x1B[H\x1B[J";
const DEFAULT_EXIT_MESSAGE: &str = "Exiting program... Goodbye!";
const DEFAULT_LINE_SYMBOL: &str = "-";

fn io_err(e: std::io::Error, line: i32) -> NoobieError {
    NoobieError::new(NoobieErrorKind::Io(e.to_string()), line)
}

/// Parse a `SAY`-style argument: a double-quoted string (verbatim up to
/// the next `"`) or a single bare identifier rendered as `@name`.
/// Returns the rendered text, or `None` if `arg` is empty.
fn render_say_argument(arg: &str, table: &VariableTable, line: i32) -> Result<Option<String>> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Ok(None);
    }
    if let Some(unquoted) = arg.strip_prefix('"') {
        let end = unquoted.find('"').ok_or_else(|| {
            NoobieError::new(NoobieErrorKind::SyntaxError("unterminated string".into()), line)
        })?;
        Ok(Some(text::render(&unquoted[..end], table)))
    } else {
        let name = arg.split_whitespace().next().unwrap_or(arg);
        Ok(Some(text::render(&format!("@{}", name), table)))
    }
}

pub fn clear<W: Write>(out: &mut W, line: i32) -> Result<()> {
    out.write_all(CLEAR_SEQUENCE.as_bytes()).map_err(|e| io_err(e, line))
}

pub fn exit<W: Write>(rest: &str, table: &VariableTable, out: &mut W, line: i32) -> Result<()> {
    let message = render_say_argument(rest, table, line)?;
    let message = message.unwrap_or_else(|| DEFAULT_EXIT_MESSAGE.to_string());
    writeln!(out, "{}", message).map_err(|e| io_err(e, line))
}

pub fn say<W: Write>(rest: &str, table: &VariableTable, out: &mut W, line: i32) -> Result<()> {
    let rendered = render_say_argument(rest, table, line)?.ok_or_else(|| {
        NoobieError::new(NoobieErrorKind::SyntaxError("SAY needs an argument".into()), line)
    })?;
    out.write_all(rendered.as_bytes()).map_err(|e| io_err(e, line))
}

/// `LINE count [symbol]`: `count` is the first whitespace-delimited
/// token (a positive integer, optional leading `+`); the rest of the
/// (already-interpolated) line is the symbol, default `-`.
pub fn line<W: Write>(rest: &str, table: &VariableTable, out: &mut W, line_no: i32) -> Result<()> {
    let rendered = text::interpolate(rest, table);
    let rendered = rendered.trim_start();
    let split = rendered.find(char::is_whitespace).unwrap_or(rendered.len());
    let (count_text, symbol_text) = rendered.split_at(split);

    let count_text = count_text.strip_prefix('+').unwrap_or(count_text);
    let count: usize = count_text.parse().map_err(|_| {
        NoobieError::new(
            NoobieErrorKind::SyntaxError(format!("'{}' is not a valid LINE count", count_text)),
            line_no,
        )
    })?;

    let mut symbol = symbol_text.trim();
    if let Some(inner) = symbol.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        symbol = inner;
    }
    let symbol = if symbol.is_empty() { DEFAULT_LINE_SYMBOL } else { symbol };
    let symbol_bytes = symbol.as_bytes();

    let mut bytes = Vec::with_capacity(count + 1);
    for i in 0..count {
        bytes.push(symbol_bytes[i % symbol_bytes.len()]);
    }
    bytes.push(b'\n');
    out.write_all(&bytes).map_err(|e| io_err(e, line_no))
}

/// `SET [CONST] TYPE name [value]`.
pub fn set(rest: &str, table: &mut VariableTable, line: i32) -> Result<()> {
    let mut tokens = rest.splitn(2, char::is_whitespace);
    let mut first = tokens.next().unwrap_or("").trim();
    let mut remainder = tokens.next().unwrap_or("").trim_start();

    let is_const = first.eq_ignore_ascii_case("CONST");
    if is_const {
        let mut inner = remainder.splitn(2, char::is_whitespace);
        first = inner.next().unwrap_or("").trim();
        remainder = inner.next().unwrap_or("").trim_start();
    }

    let ty = VarType::from_keyword(first);
    if ty == VarType::Unknown {
        return Err(NoobieError::new(NoobieErrorKind::UnknownType(first.to_string()), line));
    }

    let mut rest_tokens = remainder.splitn(2, char::is_whitespace);
    let name = rest_tokens.next().unwrap_or("").trim();
    if name.is_empty() {
        return Err(NoobieError::new(
            NoobieErrorKind::SyntaxError("SET needs a variable name".into()),
            line,
        ));
    }
    let mut value_text = rest_tokens.next().unwrap_or("").trim();
    if let Some(inner) = value_text.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        value_text = inner;
    }
    let value_text = if value_text.is_empty() { None } else { Some(value_text) };

    table.create(name, ty, value_text, is_const, line)
}

/// `LISTEN TYPE [name] [prompt...]`.
pub fn listen<W: Write, R: BufRead>(
    rest: &str,
    table: &mut VariableTable,
    out: &mut W,
    input: &mut R,
    line: i32,
) -> Result<()> {
    let mut tokens = rest.splitn(2, char::is_whitespace);
    let ty_word = tokens.next().unwrap_or("").trim();
    let remainder = tokens.next().unwrap_or("").trim_start();

    let ty = VarType::from_keyword(ty_word);
    if ty == VarType::Unknown {
        return Err(NoobieError::new(NoobieErrorKind::UnknownType(ty_word.to_string()), line));
    }

    let (name, prompt_rest) = if remainder.starts_with('"') {
        ("listened", remainder)
    } else {
        let mut inner = remainder.splitn(2, char::is_whitespace);
        let candidate = inner.next().unwrap_or("").trim();
        let tail = inner.next().unwrap_or("").trim_start();
        if candidate.is_empty() {
            ("listened", "")
        } else {
            (candidate, tail)
        }
    };

    if let Some(prompt) = render_say_argument(prompt_rest, table, line)? {
        out.write_all(prompt.as_bytes()).map_err(|e| io_err(e, line))?;
    }

    let mut raw = String::new();
    input.read_line(&mut raw).map_err(|e| io_err(e, line))?;
    let value_text = raw.trim_end_matches(['\n', '\r']);

    if !is_valid_input(ty, value_text) {
        return Err(NoobieError::new(
            NoobieErrorKind::TypeMismatch(format!("'{}' is not a valid {}", value_text, ty.name())),
            line,
        ));
    }

    table.rebind(name, ty, value_text, line)
}

/// Validity rules for `LISTEN` input, per type (§4.6).
fn is_valid_input(ty: VarType, text: &str) -> bool {
    match ty {
        VarType::Int => {
            let digits = text.strip_prefix('-').unwrap_or(text);
            !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
        VarType::Float => {
            let digits = text.strip_prefix('-').unwrap_or(text);
            let dots = digits.bytes().filter(|&b| b == b'.').count();
            let has_digit = digits.bytes().any(|b| b.is_ascii_digit());
            dots <= 1 && has_digit && digits.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        }
        VarType::Char => text.len() == 1,
        VarType::Bool => text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false"),
        VarType::Str => true,
        VarType::Unknown => false,
    }
}

pub fn increment(rest: &str, table: &mut VariableTable, line: i32) -> Result<()> {
    table.step(rest.trim(), 1, line)
}

pub fn decrement(rest: &str, table: &mut VariableTable, line: i32) -> Result<()> {
    table.step(rest.trim(), -1, line)
}
