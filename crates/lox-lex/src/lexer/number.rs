//! Number literal lexing.

use crate::lexer::Lexer;
use crate::token::{Literal, Token, TokenKind};

impl Lexer<'_> {
    /// Lex a number literal.
    ///
    /// Lox numbers are a digit run with an optional fractional part. The
    /// dot is only consumed when a digit follows it, so `123.` lexes as a
    /// number and a dot, and `a.0` keeps the dot as property access.
    pub(crate) fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice_from(self.token_start);
        // The lexeme is ASCII digits with at most one interior dot, which
        // always parses as f64.
        let value = text.parse::<f64>().unwrap_or(0.0);
        self.make_literal_token(TokenKind::Number, Some(Literal::Number(value)))
    }
}
