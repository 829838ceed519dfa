//! Error types for the Noobie interpreter.
//!
//! Every failure in this crate is fatal: execution does not resume after
//! one is raised. All of them carry the source line number at which they
//! occurred (`-1` for failures outside any source line, such as a missing
//! file or a missing CLI argument) and render as
//! `LINE <n> -> ERROR: <MESSAGE>`, matching the historical wording for the
//! kinds pinned down by a test scenario.

use std::fmt;

/// The kind of failure, independent of where it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum NoobieErrorKind {
    Io(String),
    UsageError(String),
    SyntaxError(String),
    UnknownCommand(String),
    UnknownType(String),
    ReservedName(String),
    AlreadyDeclared(String),
    LimitExceeded,
    Undefined(String),
    TypeMismatch(String),
    ConstViolation(String),
    DivisionByZero,
    ModuloByZero,
    DomainError,
    UnsupportedInExpr(String),
    InvalidLiteral(String),
    TrailingTokens(String),
    LineTooLong,
}

impl NoobieErrorKind {
    /// The kind's name as space-separated, uppercase words, e.g.
    /// `ModuloByZero` -> `MODULO BY ZERO`. This is the wording the
    /// original interpreter used for its fatal diagnostics.
    fn screaming_name(&self) -> String {
        let camel = match self {
            NoobieErrorKind::Io(_) => "Io",
            NoobieErrorKind::UsageError(_) => "UsageError",
            NoobieErrorKind::SyntaxError(_) => "SyntaxError",
            NoobieErrorKind::UnknownCommand(_) => "UnknownCommand",
            NoobieErrorKind::UnknownType(_) => "UnknownType",
            NoobieErrorKind::ReservedName(_) => "ReservedName",
            NoobieErrorKind::AlreadyDeclared(_) => "AlreadyDeclared",
            NoobieErrorKind::LimitExceeded => "LimitExceeded",
            NoobieErrorKind::Undefined(_) => "Undefined",
            NoobieErrorKind::TypeMismatch(_) => "TypeMismatch",
            NoobieErrorKind::ConstViolation(_) => "ConstViolation",
            NoobieErrorKind::DivisionByZero => "DivisionByZero",
            NoobieErrorKind::ModuloByZero => "ModuloByZero",
            NoobieErrorKind::DomainError => "DomainError",
            NoobieErrorKind::UnsupportedInExpr(_) => "UnsupportedInExpr",
            NoobieErrorKind::InvalidLiteral(_) => "InvalidLiteral",
            NoobieErrorKind::TrailingTokens(_) => "TrailingTokens",
            NoobieErrorKind::LineTooLong => "LineTooLong",
        };
        camel_to_screaming(camel)
    }

    /// Free-form detail to append after the kind's name, if any.
    fn detail(&self) -> Option<&str> {
        match self {
            NoobieErrorKind::Io(s)
            | NoobieErrorKind::UsageError(s)
            | NoobieErrorKind::SyntaxError(s)
            | NoobieErrorKind::UnknownCommand(s)
            | NoobieErrorKind::UnknownType(s)
            | NoobieErrorKind::ReservedName(s)
            | NoobieErrorKind::AlreadyDeclared(s)
            | NoobieErrorKind::Undefined(s)
            | NoobieErrorKind::TypeMismatch(s)
            | NoobieErrorKind::ConstViolation(s)
            | NoobieErrorKind::UnsupportedInExpr(s)
            | NoobieErrorKind::InvalidLiteral(s)
            | NoobieErrorKind::TrailingTokens(s) => Some(s),
            _ => None,
        }
    }
}

fn camel_to_screaming(camel: &str) -> String {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in camel.chars() {
        if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c.to_ascii_uppercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words.join(" ")
}

/// A fatal error at a known (or absent) source line.
#[derive(Debug, Clone, PartialEq)]
pub struct NoobieError {
    pub kind: NoobieErrorKind,
    pub line: i32,
}

impl NoobieError {
    pub fn new(kind: NoobieErrorKind, line: i32) -> Self {
        Self { kind, line }
    }
}

impl fmt::Display for NoobieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.detail() {
            Some(detail) if !detail.is_empty() => write!(
                f,
                "LINE {} -> ERROR: {}: {}",
                self.line,
                self.kind.screaming_name(),
                detail
            ),
            _ => write!(f, "LINE {} -> ERROR: {}", self.line, self.kind.screaming_name()),
        }
    }
}

impl std::error::Error for NoobieError {}

pub type Result<T> = std::result::Result<T, NoobieError>;
