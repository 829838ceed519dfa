//! The interpreter driver: owns the variable table and the preprocessor
//! state, and feeds each source line through preprocessing, dispatch,
//! and the command handlers.

use std::io::{BufRead, Write};

use crate::dispatch::{self, Outcome};
use crate::error::{NoobieError, NoobieErrorKind, Result};
use crate::preprocess::Preprocessor;
use crate::vartable::VariableTable;

/// Lines longer than this fail `LineTooLong` rather than being silently
/// truncated (§5).
const MAX_LINE_LEN: usize = 4096;

#[derive(Default)]
pub struct Interpreter {
    table: VariableTable,
    preprocessor: Preprocessor,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            table: VariableTable::new(),
            preprocessor: Preprocessor::new(),
        }
    }

    pub fn variables(&self) -> &VariableTable {
        &self.table
    }

    /// Run every line read from `source` through preprocessing, dispatch,
    /// and the matching command handler, writing program output to `out`
    /// and reading `LISTEN` input from `input`. Stops at the first error
    /// or at `EXIT`.
    pub fn run<S: BufRead, W: Write, R: BufRead>(
        &mut self,
        mut source: S,
        out: &mut W,
        input: &mut R,
    ) -> Result<()> {
        let mut line_no: i32 = 0;
        let mut raw = String::new();
        loop {
            raw.clear();
            let bytes_read = source
                .read_line(&mut raw)
                .map_err(|e| NoobieError::new(NoobieErrorKind::Io(e.to_string()), line_no))?;
            if bytes_read == 0 {
                return Ok(());
            }
            line_no += 1;
            if raw.len() > MAX_LINE_LEN {
                return Err(NoobieError::new(NoobieErrorKind::LineTooLong, line_no));
            }
            let trimmed = raw.trim_end_matches('\n');

            let Some(preprocessed) = self.preprocessor.process(trimmed) else {
                continue;
            };
            if preprocessed.trim().is_empty() {
                continue;
            }

            match dispatch::dispatch(&preprocessed, line_no, &mut self.table, out, input)? {
                Outcome::Continue => {}
                Outcome::Exit => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_program(src: &str, stdin: &str) -> (Result<()>, String) {
        let mut interp = Interpreter::new();
        let mut out = Vec::new();
        let mut input: &[u8] = stdin.as_bytes();
        let result = interp.run(src.as_bytes(), &mut out, &mut input);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn scenario_set_then_say_interpolates_the_value() {
        let (result, out) = run_program("SET INT x 42\nSAY \"@x\"\n", "");
        result.unwrap();
        assert_eq!(out, "42");
    }

    #[test]
    fn scenario_line_repeats_the_quoted_symbol() {
        let (result, out) = run_program("SET FLOAT pi 3.14\nLINE 5 \"=*\"\n", "");
        result.unwrap();
        assert_eq!(out, "=*=*=\n");
    }

    #[test]
    fn scenario_comment_and_escaped_newline() {
        let (result, out) =
            run_program("-- greet\nSET STR name \"world\"\nSAY \"hi, @name!\\n\"\n", "");
        result.unwrap();
        assert_eq!(out, "hi, world!\n");
    }

    #[test]
    fn say_on_an_undefined_variable_is_not_fatal() {
        let (result, out) = run_program("SAY \"@x\"\n", "");
        result.unwrap();
        assert_eq!(out, "[undefined]");
    }

    #[test]
    fn unknown_command_is_fatal_with_the_offending_line() {
        let (result, _) = run_program("SET INT x 1\nFROBNICATE\n", "");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("LINE 2"));
        assert!(err.to_string().contains("UNKNOWN COMMAND"));
    }

    #[test]
    fn exit_stops_execution_before_later_lines() {
        let (result, out) = run_program("SAY \"a\"\nEXIT\nSAY \"b\"\n", "");
        result.unwrap();
        assert_eq!(out, "aExiting program... Goodbye!\n");
    }

    #[test]
    fn listen_reads_from_the_given_input() {
        let (result, out) = run_program("LISTEN INT age \"age? \"\nSAY \"@age\"\n", "30\n");
        result.unwrap();
        assert_eq!(out, "age? 30");
    }
}
