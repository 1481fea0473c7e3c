//! One- and two-character operator lexing.

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl Lexer<'_> {
    /// Lex `!` or `!=`.
    pub(crate) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::BangEqual)
        } else {
            self.make_token(TokenKind::Bang)
        }
    }

    /// Lex `=` or `==`.
    pub(crate) fn lex_equal(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::EqualEqual)
        } else {
            self.make_token(TokenKind::Equal)
        }
    }

    /// Lex `<` or `<=`.
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::LessEqual)
        } else {
            self.make_token(TokenKind::Less)
        }
    }

    /// Lex `>` or `>=`.
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::GreaterEqual)
        } else {
            self.make_token(TokenKind::Greater)
        }
    }
}
