//! Command dispatcher (component F).
//!
//! Recognizes the keyword that starts a preprocessed line and routes the
//! remainder of the line to the matching handler in [`crate::commands`].

use std::io::{BufRead, Write};

use crate::commands;
use crate::error::{NoobieError, NoobieErrorKind, Result};
use crate::vartable::VariableTable;

/// What the driver should do after running one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// Split `line` into its leading keyword and the raw remainder, trimming
/// the single space that separates them. The remainder keeps its own
/// internal whitespace untouched — several commands (`SAY`, `LISTEN`,
/// `LINE`) need that to parse quoted strings and repeated symbols.
fn split_keyword(line: &str) -> (&str, &str) {
    let trimmed = line.trim_start();
    match trimmed.find(char::is_whitespace) {
        Some(idx) => (&trimmed[..idx], trimmed[idx..].trim_start()),
        None => (trimmed, ""),
    }
}

/// Dispatch one already-preprocessed, non-empty line.
pub fn dispatch<W: Write, R: BufRead>(
    line: &str,
    line_no: i32,
    table: &mut VariableTable,
    out: &mut W,
    input: &mut R,
) -> Result<Outcome> {
    let (keyword, rest) = split_keyword(line);
    match keyword.to_ascii_uppercase().as_str() {
        "CLEAR" => {
            commands::clear(out, line_no)?;
            Ok(Outcome::Continue)
        }
        "EXIT" => {
            commands::exit(rest, table, out, line_no)?;
            Ok(Outcome::Exit)
        }
        "LINE" => {
            commands::line(rest, table, out, line_no)?;
            Ok(Outcome::Continue)
        }
        "SET" => {
            commands::set(rest, table, line_no)?;
            Ok(Outcome::Continue)
        }
        "SAY" => {
            commands::say(rest, table, out, line_no)?;
            Ok(Outcome::Continue)
        }
        "LISTEN" => {
            commands::listen(rest, table, out, input, line_no)?;
            Ok(Outcome::Continue)
        }
        "INCREMENT" => {
            commands::increment(rest, table, line_no)?;
            Ok(Outcome::Continue)
        }
        "DECREMENT" => {
            commands::decrement(rest, table, line_no)?;
            Ok(Outcome::Continue)
        }
        _ => Err(NoobieError::new(
            NoobieErrorKind::UnknownCommand(keyword.to_string()),
            line_no,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(line: &str, table: &mut VariableTable) -> (Outcome, String) {
        let mut out = Vec::new();
        let mut input: &[u8] = b"";
        let outcome = dispatch(line, 1, table, &mut out, &mut input).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn unknown_keyword_is_reported() {
        let mut t = VariableTable::new();
        let mut out = Vec::new();
        let mut input: &[u8] = b"";
        let err = dispatch("FROBNICATE x", 3, &mut t, &mut out, &mut input).unwrap_err();
        assert_eq!(err.kind, NoobieErrorKind::UnknownCommand("FROBNICATE".into()));
        assert_eq!(err.line, 3);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let mut t = VariableTable::new();
        let (outcome, stdout) = run("set INT x 42", &mut t);
        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(stdout, "");
        assert_eq!(t.find("x").unwrap().value, crate::value::Value::Int(42));
    }

    #[test]
    fn exit_signals_termination() {
        let mut t = VariableTable::new();
        let (outcome, stdout) = run("EXIT", &mut t);
        assert_eq!(outcome, Outcome::Exit);
        assert_eq!(stdout, "Exiting program... Goodbye!\n");
    }
}
