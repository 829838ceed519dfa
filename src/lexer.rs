//! Expression lexer (component B).
//!
//! Tokenizes one expression string into a stream of [`Token`]s. The
//! parser needs exactly one token of lookahead, exposed here as
//! [`Lexer::peek`] (non-consuming) and [`Lexer::bump`] (consuming) rather
//! than a C-style `unget` — both give the same expressiveness without a
//! pointer-rewinding implementation.

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number { value: f64, has_dot: bool },
    Variable(String),
    Boolean(bool),
    Operator(String),
    LParen,
    RParen,
    End,
    Error(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
}

impl Token {
    fn new(kind: TokenKind) -> Self {
        Token { kind }
    }
}

/// Multi-character operators, tried longest-match-first.
const MULTI_CHAR_OPS: &[&str] = &["***", "**", "==", "!=", "<=", ">="];

pub struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    lookahead: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            bytes: source.as_bytes(),
            pos: 0,
            lookahead: None,
        }
    }

    /// Return the next token without consuming it.
    pub fn peek(&mut self) -> Token {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.scan());
        }
        self.lookahead.clone().unwrap()
    }

    /// Consume and return the next token.
    pub fn bump(&mut self) -> Token {
        if let Some(tok) = self.lookahead.take() {
            return tok;
        }
        self.scan()
    }

    fn cur(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cur(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.bytes[self.pos..].starts_with(s.as_bytes())
    }

    fn scan(&mut self) -> Token {
        self.skip_whitespace();
        let Some(b) = self.cur() else {
            return Token::new(TokenKind::End);
        };

        if b == b'(' {
            self.pos += 1;
            return Token::new(TokenKind::LParen);
        }
        if b == b')' {
            self.pos += 1;
            return Token::new(TokenKind::RParen);
        }

        if b.is_ascii_digit() || (b == b'.' && matches!(self.at(1), Some(d) if d.is_ascii_digit()))
        {
            return self.scan_number();
        }

        for op in MULTI_CHAR_OPS {
            if self.starts_with(op) {
                self.pos += op.len();
                return Token::new(TokenKind::Operator((*op).to_string()));
            }
        }

        if matches!(b, b'+' | b'-' | b'*' | b'/' | b'%' | b'<' | b'>') {
            self.pos += 1;
            return Token::new(TokenKind::Operator((b as char).to_string()));
        }

        if b.is_ascii_alphabetic() || b == b'_' {
            return self.scan_identifier();
        }

        self.pos += 1;
        Token::new(TokenKind::Error(b))
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        let mut has_dot = false;
        while matches!(self.cur(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.cur() == Some(b'.') && matches!(self.at(1), Some(d) if d.is_ascii_digit()) {
            has_dot = true;
            self.pos += 1;
            while matches!(self.cur(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap();
        let value: f64 = text.parse().unwrap_or(0.0);
        Token::new(TokenKind::Number { value, has_dot })
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.cur(), Some(b) if b.is_ascii_alphanumeric() || b == b'_') {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap();
        let upper = text.to_ascii_uppercase();
        match upper.as_str() {
            "TRUE" => Token::new(TokenKind::Boolean(true)),
            "FALSE" => Token::new(TokenKind::Boolean(false)),
            "AND" | "OR" | "XOR" | "NOT" => Token::new(TokenKind::Operator(upper)),
            _ => Token::new(TokenKind::Variable(text.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lex = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lex.bump();
            let done = tok.kind == TokenKind::End;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn multi_char_operators_are_longest_match_first() {
        let ks = kinds("2 *** 3 ** 4");
        assert_eq!(
            ks,
            vec![
                TokenKind::Number { value: 2.0, has_dot: false },
                TokenKind::Operator("***".into()),
                TokenKind::Number { value: 3.0, has_dot: false },
                TokenKind::Operator("**".into()),
                TokenKind::Number { value: 4.0, has_dot: false },
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn identifier_case_is_preserved_for_variables() {
        let ks = kinds("MyVar");
        assert_eq!(ks, vec![TokenKind::Variable("MyVar".into()), TokenKind::End]);
    }

    #[test]
    fn keywords_are_canonicalized_upper_case() {
        let ks = kinds("true and false");
        assert_eq!(
            ks,
            vec![
                TokenKind::Boolean(true),
                TokenKind::Operator("AND".into()),
                TokenKind::Boolean(false),
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lex = Lexer::new("1 + 2");
        let a = lex.peek();
        let b = lex.peek();
        assert_eq!(a, b);
        let c = lex.bump();
        assert_eq!(c, a);
    }

    #[test]
    fn unknown_byte_is_an_error_token() {
        let ks = kinds("$");
        assert_eq!(ks, vec![TokenKind::Error(b'$'), TokenKind::End]);
    }

    #[test]
    fn leading_dot_number_is_recognized() {
        let ks = kinds(".5");
        assert_eq!(ks, vec![TokenKind::Number { value: 0.5, has_dot: true }, TokenKind::End]);
    }
}
