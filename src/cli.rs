//! Command-line entry point (component I).
//!
//! One positional argument: the path to a Noobie source file.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;

use crate::error::{NoobieError, NoobieErrorKind, Result};
use crate::interpreter::Interpreter;

#[derive(Debug, Parser)]
#[command(name = "noobie", about = "Run a Noobie source file", version)]
pub struct Cli {
    /// Path to the Noobie (.nob) source file to run.
    pub path: PathBuf,
}

/// Parse `argv`, run the named program against real stdin/stdout, and
/// return the result. The caller (`main`) turns any error into the
/// diagnostic format and a non-zero exit code.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    run_path(&cli.path)
}

fn run_path(path: &PathBuf) -> Result<()> {
    let file = File::open(path).map_err(|e| {
        NoobieError::new(
            NoobieErrorKind::Io(format!("{}: {}", path.display(), e)),
            -1,
        )
    })?;
    let reader = BufReader::new(file);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let mut interpreter = Interpreter::new();
    interpreter.run(reader, &mut out, &mut input)
}
