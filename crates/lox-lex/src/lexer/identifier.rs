//! Identifier and keyword lexing.

use crate::lexer::Lexer;
use crate::token::{keyword_from_ident, Token, TokenKind};

/// True for characters that may start an identifier.
///
/// Lox identifiers are ASCII only; the underscore counts as a letter.
#[inline]
pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// True for characters that may continue an identifier.
#[inline]
pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Lexer<'_> {
    /// Lex an identifier or keyword.
    ///
    /// The whole `[A-Za-z0-9_]*` run is consumed, then checked against the
    /// keyword table; anything not reserved is an identifier.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        match keyword_from_ident(text) {
            Some(kind) => self.make_token(kind),
            None => self.make_token(TokenKind::Identifier),
        }
    }
}
