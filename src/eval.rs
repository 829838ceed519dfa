//! Recursive-descent expression parser and evaluator (component C).
//!
//! One function per precedence level, lowest to highest, each delegating
//! to the next for its operands and looping left-to-right over operators
//! at its own level. The exponent level recurses into itself on its right
//! operand to get right-associativity; everything else is left-associative.

use crate::error::{NoobieError, NoobieErrorKind, Result};
use crate::lexer::{Lexer, TokenKind};
use crate::value::CalcResult;
use crate::vartable::VariableTable;

struct Evaluator<'a, 'b> {
    lexer: Lexer<'a>,
    table: &'b VariableTable,
    line: i32,
}

/// Lex, parse, and evaluate `expression`, requiring the full input to be
/// consumed (a trailing token is a [`NoobieErrorKind::TrailingTokens`]
/// failure).
pub fn evaluate(expression: &str, table: &VariableTable, line: i32) -> Result<CalcResult> {
    let mut ev = Evaluator {
        lexer: Lexer::new(expression),
        table,
        line,
    };
    let result = ev.parse_or()?;
    match ev.lexer.peek().kind {
        TokenKind::End => Ok(result),
        other => Err(NoobieError::new(
            NoobieErrorKind::TrailingTokens(format!("{:?}", other)),
            line,
        )),
    }
}

impl<'a, 'b> Evaluator<'a, 'b> {
    fn syntax_error(&self, msg: impl Into<String>) -> NoobieError {
        NoobieError::new(NoobieErrorKind::SyntaxError(msg.into()), self.line)
    }

    fn peek_operator(&mut self) -> Option<String> {
        match self.lexer.peek().kind {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    // Level 1: OR
    fn parse_or(&mut self) -> Result<CalcResult> {
        let mut left = self.parse_xor()?;
        while self.peek_operator().as_deref() == Some("OR") {
            self.lexer.bump();
            let right = self.parse_xor()?;
            left = CalcResult::Bool(left.truthy() || right.truthy());
        }
        Ok(left)
    }

    // Level 2: XOR
    fn parse_xor(&mut self) -> Result<CalcResult> {
        let mut left = self.parse_and()?;
        while self.peek_operator().as_deref() == Some("XOR") {
            self.lexer.bump();
            let right = self.parse_and()?;
            left = CalcResult::Bool(left.truthy() ^ right.truthy());
        }
        Ok(left)
    }

    // Level 3: AND
    fn parse_and(&mut self) -> Result<CalcResult> {
        let mut left = self.parse_equality()?;
        while self.peek_operator().as_deref() == Some("AND") {
            self.lexer.bump();
            let right = self.parse_equality()?;
            left = CalcResult::Bool(left.truthy() && right.truthy());
        }
        Ok(left)
    }

    // Level 4: == !=
    fn parse_equality(&mut self) -> Result<CalcResult> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek_operator().as_deref() {
                Some("==") | Some("!=") => self.peek_operator().unwrap(),
                _ => break,
            };
            self.lexer.bump();
            let right = self.parse_relational()?;
            let eq = compare_equal(&left, &right);
            left = CalcResult::Bool(if op == "==" { eq } else { !eq });
        }
        Ok(left)
    }

    // Level 5: < <= > >=
    fn parse_relational(&mut self) -> Result<CalcResult> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_operator().as_deref() {
                Some(o @ ("<" | "<=" | ">" | ">=")) => o.to_string(),
                _ => break,
            };
            self.lexer.bump();
            let right = self.parse_additive()?;
            left = CalcResult::Bool(compare_order(&left, &right, &op));
        }
        Ok(left)
    }

    // Level 6: binary + -
    fn parse_additive(&mut self) -> Result<CalcResult> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_operator().as_deref() {
                Some(o @ ("+" | "-")) => o.to_string(),
                _ => break,
            };
            self.lexer.bump();
            let right = self.parse_multiplicative()?;
            left = self.apply_add_sub(&op, left, right)?;
        }
        Ok(left)
    }

    // Level 7: * / %
    fn parse_multiplicative(&mut self) -> Result<CalcResult> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.peek_operator().as_deref() {
                Some(o @ ("*" | "/" | "%")) => o.to_string(),
                _ => break,
            };
            self.lexer.bump();
            let right = self.parse_power()?;
            left = self.apply_mul_div_mod(&op, left, right)?;
        }
        Ok(left)
    }

    // Level 8: ** *** (right-associative)
    fn parse_power(&mut self) -> Result<CalcResult> {
        let left = self.parse_unary()?;
        match self.peek_operator().as_deref() {
            Some(op @ ("**" | "***")) => {
                let op = op.to_string();
                self.lexer.bump();
                let right = self.parse_power()?;
                self.apply_power(&op, left, right)
            }
            _ => Ok(left),
        }
    }

    // Level 9: unary + - NOT (right-associative prefix)
    fn parse_unary(&mut self) -> Result<CalcResult> {
        match self.peek_operator().as_deref() {
            Some("+") => {
                self.lexer.bump();
                let operand = self.parse_unary()?;
                self.require_numeric(operand, "unary +")
            }
            Some("-") => {
                self.lexer.bump();
                let operand = self.parse_unary()?;
                let operand = self.require_numeric(operand, "unary -")?;
                Ok(match operand {
                    CalcResult::Int(i) => CalcResult::Int(-i),
                    CalcResult::Float(f) => CalcResult::Float(-f),
                    CalcResult::Bool(_) => unreachable!(),
                })
            }
            Some("NOT") => {
                self.lexer.bump();
                let operand = self.parse_unary()?;
                Ok(CalcResult::Bool(!operand.truthy()))
            }
            _ => self.parse_primary(),
        }
    }

    fn require_numeric(&self, v: CalcResult, who: &str) -> Result<CalcResult> {
        match v {
            CalcResult::Bool(_) => Err(NoobieError::new(
                NoobieErrorKind::TypeMismatch(format!("{} requires INT or FLOAT", who)),
                self.line,
            )),
            numeric => Ok(numeric),
        }
    }

    // Level 10: primary
    fn parse_primary(&mut self) -> Result<CalcResult> {
        let tok = self.lexer.bump();
        match tok.kind {
            TokenKind::Number { value, has_dot } => {
                if has_dot {
                    Ok(CalcResult::Float(value))
                } else {
                    Ok(CalcResult::Int(value as i64))
                }
            }
            TokenKind::Boolean(b) => Ok(CalcResult::Bool(b)),
            TokenKind::Variable(name) => self.table.find_for_expr(&name, self.line),
            TokenKind::LParen => {
                let inner = self.parse_or()?;
                match self.lexer.bump().kind {
                    TokenKind::RParen => Ok(inner),
                    _ => Err(self.syntax_error("expected ')'")),
                }
            }
            other => Err(self.syntax_error(format!("unexpected token {:?}", other))),
        }
    }

    fn apply_add_sub(&self, op: &str, left: CalcResult, right: CalcResult) -> Result<CalcResult> {
        let left = self.require_numeric(left, op)?;
        let right = self.require_numeric(right, op)?;
        if left.is_float() || right.is_float() {
            let (l, r) = (left.as_f64(), right.as_f64());
            Ok(CalcResult::Float(if op == "+" { l + r } else { l - r }))
        } else {
            let (l, r) = (int_of(left, self.line)?, int_of(right, self.line)?);
            Ok(CalcResult::Int(if op == "+" { l + r } else { l - r }))
        }
    }

    fn apply_mul_div_mod(
        &self,
        op: &str,
        left: CalcResult,
        right: CalcResult,
    ) -> Result<CalcResult> {
        match op {
            "*" => {
                let left = self.require_numeric(left, op)?;
                let right = self.require_numeric(right, op)?;
                if left.is_float() || right.is_float() {
                    Ok(CalcResult::Float(left.as_f64() * right.as_f64()))
                } else {
                    Ok(CalcResult::Int(int_of(left, self.line)? * int_of(right, self.line)?))
                }
            }
            "/" => {
                let left = self.require_numeric(left, op)?;
                let right = self.require_numeric(right, op)?;
                let r = right.as_f64();
                if r == 0.0 {
                    return Err(NoobieError::new(NoobieErrorKind::DivisionByZero, self.line));
                }
                Ok(CalcResult::Float(left.as_f64() / r))
            }
            "%" => {
                if left.is_float() || right.is_float() {
                    return Err(NoobieError::new(
                        NoobieErrorKind::TypeMismatch("% requires INT operands".into()),
                        self.line,
                    ));
                }
                let l = int_of(left, self.line)?;
                let r = int_of(right, self.line)?;
                if r == 0 {
                    return Err(NoobieError::new(NoobieErrorKind::ModuloByZero, self.line));
                }
                Ok(CalcResult::Int(l % r))
            }
            _ => unreachable!(),
        }
    }

    fn apply_power(&self, op: &str, left: CalcResult, right: CalcResult) -> Result<CalcResult> {
        let left = self.require_numeric(left, op)?;
        let right = self.require_numeric(right, op)?;
        let (base, exp) = (left.as_f64(), right.as_f64());
        if op == "***" && base < 0.0 && exp.fract() != 0.0 {
            return Err(NoobieError::new(NoobieErrorKind::DomainError, self.line));
        }
        Ok(CalcResult::Float(base.powf(exp)))
    }
}

/// `INT`/`FLOAT` operands are required; `BOOL` is a type error at this
/// point (arithmetic never promotes bools).
fn int_of(v: CalcResult, line: i32) -> Result<i64> {
    match v {
        CalcResult::Int(i) => Ok(i),
        CalcResult::Float(_) => unreachable!("caller already branched on is_float"),
        CalcResult::Bool(_) => Err(NoobieError::new(
            NoobieErrorKind::TypeMismatch("% requires INT operands".into()),
            line,
        )),
    }
}

fn compare_equal(left: &CalcResult, right: &CalcResult) -> bool {
    match (left, right) {
        (CalcResult::Bool(a), CalcResult::Bool(b)) => a == b,
        (a, b) if a.is_float() || b.is_float() => (a.as_f64() - b.as_f64()).abs() < 1e-9,
        (a, b) => a.as_f64() as i64 == b.as_f64() as i64,
    }
}

fn compare_order(left: &CalcResult, right: &CalcResult, op: &str) -> bool {
    let ord = if left.is_float() || right.is_float() {
        left.as_f64().partial_cmp(&right.as_f64())
    } else {
        (left.as_f64() as i64).partial_cmp(&(right.as_f64() as i64))
    };
    let Some(ord) = ord else { return false };
    match op {
        "<" => ord.is_lt(),
        "<=" => ord.is_le(),
        ">" => ord.is_gt(),
        ">=" => ord.is_ge(),
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str) -> CalcResult {
        let t = VariableTable::new();
        evaluate(src, &t, 1).unwrap()
    }

    #[test]
    fn integer_preservation() {
        assert_eq!(eval("1 + 2"), CalcResult::Int(3));
        assert_eq!(eval("1 + 2.0"), CalcResult::Float(3.0));
        assert_eq!(eval("5 / 2"), CalcResult::Float(2.5));
        assert_eq!(eval("5 % 2"), CalcResult::Int(1));
    }

    #[test]
    fn power_always_returns_float() {
        let mut t = VariableTable::new();
        t.create("x", crate::value::VarType::Int, Some("2"), false, 1)
            .unwrap();
        assert_eq!(evaluate("x ** 10", &t, 1).unwrap(), CalcResult::Float(1024.0));
    }

    #[test]
    fn exponentiation_is_right_associative() {
        assert_eq!(eval("2 *** 3 *** 2"), CalcResult::Float(512.0));
    }

    #[test]
    fn comparisons_are_always_bool() {
        assert_eq!(eval("1 == 1"), CalcResult::Bool(true));
        assert_eq!(eval("1.0 < 2"), CalcResult::Bool(true));
        assert_eq!(eval("true == true"), CalcResult::Bool(true));
    }

    #[test]
    fn combined_logical_and_comparison_expression() {
        assert_eq!(
            eval("(1 + 2) * 3 == 9 AND NOT false"),
            CalcResult::Bool(true)
        );
    }

    #[test]
    fn double_not_is_truthiness_as_bool() {
        assert_eq!(eval("NOT NOT 5"), CalcResult::Bool(true));
        assert_eq!(eval("NOT NOT 0"), CalcResult::Bool(false));
    }

    #[test]
    fn modulo_by_zero_is_fatal() {
        let t = VariableTable::new();
        let err = evaluate("5 % 0", &t, 7).unwrap_err();
        assert_eq!(err.to_string(), "LINE 7 -> ERROR: MODULO BY ZERO");
    }

    #[test]
    fn division_by_zero_is_fatal() {
        let t = VariableTable::new();
        let err = evaluate("5 / 0", &t, 2).unwrap_err();
        assert_eq!(err.kind, NoobieErrorKind::DivisionByZero);
    }

    #[test]
    fn domain_error_on_negative_fractional_triple_power() {
        let t = VariableTable::new();
        let err = evaluate("-1 *** 0.5", &t, 1).unwrap_err();
        assert_eq!(err.kind, NoobieErrorKind::DomainError);
    }

    #[test]
    fn modulo_on_floats_is_a_type_error_not_a_panic() {
        let t = VariableTable::new();
        let err = evaluate("5.5 % 2", &t, 1).unwrap_err();
        assert!(matches!(err.kind, NoobieErrorKind::TypeMismatch(_)));
    }

    #[test]
    fn bool_is_never_promoted_for_arithmetic() {
        let t = VariableTable::new();
        assert!(matches!(
            evaluate("true + 1.0", &t, 1).unwrap_err().kind,
            NoobieErrorKind::TypeMismatch(_)
        ));
        assert!(matches!(
            evaluate("true / 2", &t, 1).unwrap_err().kind,
            NoobieErrorKind::TypeMismatch(_)
        ));
        assert!(matches!(
            evaluate("true * 2", &t, 1).unwrap_err().kind,
            NoobieErrorKind::TypeMismatch(_)
        ));
        assert!(matches!(
            evaluate("true ** 2", &t, 1).unwrap_err().kind,
            NoobieErrorKind::TypeMismatch(_)
        ));
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let t = VariableTable::new();
        let err = evaluate("1 + 2 3", &t, 1).unwrap_err();
        assert!(matches!(err.kind, NoobieErrorKind::TrailingTokens(_)));
    }

    #[test]
    fn missing_close_paren_is_syntax_error() {
        let t = VariableTable::new();
        let err = evaluate("(1 + 2", &t, 1).unwrap_err();
        assert!(matches!(err.kind, NoobieErrorKind::SyntaxError(_)));
    }

    #[test]
    fn undefined_variable_fails() {
        let t = VariableTable::new();
        let err = evaluate("missing + 1", &t, 1).unwrap_err();
        assert!(matches!(err.kind, NoobieErrorKind::Undefined(_)));
    }

    #[test]
    fn string_variable_unsupported_in_expr() {
        let mut t = VariableTable::new();
        t.create("s", crate::value::VarType::Str, Some("hi"), false, 1)
            .unwrap();
        let err = evaluate("s", &t, 1).unwrap_err();
        assert!(matches!(err.kind, NoobieErrorKind::UnsupportedInExpr(_)));
    }
}
