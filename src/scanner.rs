use std::str::{Chars, FromStr};

use peekmore::{PeekMore, PeekMoreIterator};
use rust_decimal::Decimal;
use substring::Substring;

use crate::error::Diagnostics;
use crate::literal::Literal;
use crate::token::{Token, Type};

/// Converts source text into a token sequence terminated by an EOF token.
/// Scan errors are reported through `diagnostics` but never abort scanning —
/// the scanner always produces a best-effort token stream.
pub struct Scanner<'a> {
    source: &'a str,
    chars: PeekMoreIterator<Chars<'a>>,
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            chars: source.chars().peekmore(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    pub fn scan_tokens(mut self, diagnostics: &Diagnostics) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token(diagnostics);
        }

        self.tokens.push(Token::new(Type::Eof, "", None, self.line));
        self.tokens
    }

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn advance(&mut self) -> char {
        let c = self.chars.next().expect("advance past end of source");
        self.current += 1;
        c
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_next(&mut self) -> Option<char> {
        self.chars.peek_next().copied()
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn lexeme(&self) -> &'a str {
        self.source.substring(self.start, self.current)
    }

    fn add_token(&mut self, kind: Type, literal: Option<Literal>) {
        let lexeme = self.lexeme().to_string();
        self.tokens.push(Token::new(kind, lexeme, literal, self.line));
    }

    fn scan_token(&mut self, diagnostics: &Diagnostics) {
        let c = self.advance();
        match c {
            '(' => self.add_token(Type::LeftParen, None),
            ')' => self.add_token(Type::RightParen, None),
            '{' => self.add_token(Type::LeftBrace, None),
            '}' => self.add_token(Type::RightBrace, None),
            ',' => self.add_token(Type::Comma, None),
            '.' => self.add_token(Type::Dot, None),
            '-' => self.add_token(Type::Minus, None),
            '+' => self.add_token(Type::Plus, None),
            ';' => self.add_token(Type::Semicolon, None),
            '*' => self.add_token(Type::Star, None),

            '!' => {
                let kind = if self.advance_if('=') { Type::BangEqual } else { Type::Bang };
                self.add_token(kind, None);
            },
            '=' => {
                let kind = if self.advance_if('=') { Type::EqualEqual } else { Type::Equal };
                self.add_token(kind, None);
            },
            '<' => {
                let kind = if self.advance_if('=') { Type::LessEqual } else { Type::Less };
                self.add_token(kind, None);
            },
            '>' => {
                let kind = if self.advance_if('=') { Type::GreaterEqual } else { Type::Greater };
                self.add_token(kind, None);
            },
            '/' => {
                if self.advance_if('/') {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                } else {
                    self.add_token(Type::Slash, None);
                }
            },

            ' ' | '\r' | '\t' => {},
            '\n' => self.line += 1,

            '"' => self.string(diagnostics),

            c if c.is_ascii_digit() => self.number(diagnostics),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

            _ => diagnostics.scan_error(self.line, "Unexpected character."),
        }
    }

    fn string(&mut self, diagnostics: &Diagnostics) {
        let start_line = self.line;

        while self.peek().is_some_and(|c| c != '"') {
            if self.advance() == '\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            diagnostics.scan_error(start_line, "Unterminated string.");
            return;
        }

        self.advance(); // closing quote

        // Literal excludes the surrounding quotes; the lexeme includes them.
        let value = self.source.substring(self.start + 1, self.current - 1).to_string();
        self.add_token(Type::String, Some(Literal::String(value)));
    }

    fn number(&mut self, diagnostics: &Diagnostics) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // the '.'
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        match Decimal::from_str(self.lexeme()) {
            Ok(value) => self.add_token(Type::Number, Some(Literal::Number(value))),
            Err(_) => diagnostics.scan_error(self.line, "Number literal out of range."),
        }
    }

    fn identifier(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }

        let kind = match self.lexeme() {
            "and" => Type::And,
            "break" => Type::Break,
            "class" => Type::Class,
            "else" => Type::Else,
            "false" => Type::False,
            "for" => Type::For,
            "fun" => Type::Fun,
            "if" => Type::If,
            "nil" => Type::Nil,
            "or" => Type::Or,
            "print" => Type::Print,
            "return" => Type::Return,
            "super" => Type::Super,
            "this" => Type::This,
            "true" => Type::True,
            "var" => Type::Var,
            "while" => Type::While,
            _ => Type::Identifier,
        };

        self.add_token(kind, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Type> {
        let diagnostics = Diagnostics::new();
        Scanner::new(source)
            .scan_tokens(&diagnostics)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn single_and_double_char_tokens() {
        assert_eq!(scan("!= == <= >="), vec![
            Type::BangEqual, Type::EqualEqual, Type::LessEqual, Type::GreaterEqual, Type::Eof
        ]);
    }

    #[test]
    fn line_comments_are_skipped() {
        assert_eq!(scan("1 // comment\n2"), vec![Type::Number, Type::Number, Type::Eof]);
    }

    #[test]
    fn keywords_vs_identifiers() {
        assert_eq!(scan("var x = orchard;"), vec![
            Type::Var, Type::Identifier, Type::Equal, Type::Identifier, Type::Semicolon, Type::Eof
        ]);
    }

    #[test]
    fn number_literal_preserves_text() {
        let diagnostics = Diagnostics::new();
        let tokens = Scanner::new("1.50").scan_tokens(&diagnostics);
        assert_eq!(tokens[0].lexeme, "1.50");
        assert_eq!(tokens[0].literal, Some(Literal::Number(Decimal::from_str("1.50").unwrap())));
    }

    #[test]
    fn unterminated_string_reports_and_continues() {
        let diagnostics = Diagnostics::new();
        let tokens = Scanner::new("\"abc").scan_tokens(&diagnostics);
        assert!(diagnostics.had_error());
        assert_eq!(tokens, vec![Token::new(Type::Eof, "", None, 1)]);
    }

    #[test]
    fn number_literal_overflowing_decimal_reports_but_does_not_panic() {
        let diagnostics = Diagnostics::new();
        let tokens = Scanner::new("100000000000000000000000000000").scan_tokens(&diagnostics);
        assert!(diagnostics.had_error());
        assert_eq!(tokens, vec![Token::new(Type::Eof, "", None, 1)]);
    }

    #[test]
    fn unexpected_character_does_not_abort_scan() {
        let diagnostics = Diagnostics::new();
        let tokens = Scanner::new("1 @ 2").scan_tokens(&diagnostics);
        assert!(diagnostics.had_error());
        assert_eq!(tokens.iter().map(|t| t.kind).collect::<Vec<_>>(), vec![
            Type::Number, Type::Number, Type::Eof
        ]);
    }
}
