//! Main lexer implementation.
//!
//! The lexer transforms source text into a stream of tokens. It dispatches
//! on the first character of each token to the specialized lexing functions
//! in the sibling modules, skipping whitespace and comments in between.
//!
//! Unrecognized characters are reported through the handler and skipped, so
//! the lexer is total: it always reaches end of input and always produces a
//! final `Eof` token.

use lox_util::{Handler, Span, Symbol};

use crate::cursor::Cursor;
use crate::lexer::identifier::is_ident_start;
use crate::token::{Literal, Token, TokenKind};

/// The Lox lexer.
///
/// # Examples
///
/// ```
/// use lox_lex::{Lexer, TokenKind};
/// use lox_util::Handler;
///
/// let handler = Handler::new();
/// let mut lexer = Lexer::new("print 1;", &handler);
///
/// assert_eq!(lexer.next_token().kind, TokenKind::Print);
/// assert_eq!(lexer.next_token().kind, TokenKind::Number);
/// assert_eq!(lexer.next_token().kind, TokenKind::Semicolon);
/// assert_eq!(lexer.next_token().kind, TokenKind::Eof);
/// ```
pub struct Lexer<'a> {
    /// Character cursor over the source
    pub(crate) cursor: Cursor<'a>,

    /// Diagnostic sink for lexical errors
    pub(crate) handler: &'a Handler,

    /// Start byte offset of the token being scanned
    pub(crate) token_start: usize,

    /// Start line of the token being scanned
    pub(crate) token_start_line: u32,

    /// Start column of the token being scanned
    pub(crate) token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `source`, reporting errors to `handler`.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Scan and return the next token.
    ///
    /// Returns `Eof` (repeatedly, if called again) once the input is
    /// exhausted. Invalid characters and unterminated strings are reported
    /// and skipped rather than producing a token.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();

            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();
            self.token_start_column = self.cursor.column();

            if self.cursor.is_at_end() {
                return self.make_token(TokenKind::Eof);
            }

            let c = self.cursor.current_char();
            let token = match c {
                '(' => Some(self.single(TokenKind::LeftParen)),
                ')' => Some(self.single(TokenKind::RightParen)),
                '{' => Some(self.single(TokenKind::LeftBrace)),
                '}' => Some(self.single(TokenKind::RightBrace)),
                ',' => Some(self.single(TokenKind::Comma)),
                '.' => Some(self.single(TokenKind::Dot)),
                '-' => Some(self.single(TokenKind::Minus)),
                '+' => Some(self.single(TokenKind::Plus)),
                ';' => Some(self.single(TokenKind::Semicolon)),
                '*' => Some(self.single(TokenKind::Star)),
                // Comments were consumed above, so a slash here is division.
                '/' => Some(self.single(TokenKind::Slash)),

                '!' => Some(self.lex_bang()),
                '=' => Some(self.lex_equal()),
                '<' => Some(self.lex_less()),
                '>' => Some(self.lex_greater()),

                '"' => self.lex_string(),

                c if c.is_ascii_digit() => Some(self.lex_number()),
                c if is_ident_start(c) => Some(self.lex_identifier()),

                _ => {
                    self.handler
                        .error(self.token_start_line, "Unexpected character.");
                    self.cursor.advance();
                    None
                }
            };

            if let Some(token) = token {
                return token;
            }
        }
    }

    /// Consume one character and emit a single-character token.
    pub(crate) fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.make_token(kind)
    }

    /// Build a token spanning from the recorded start to the cursor.
    pub(crate) fn make_token(&self, kind: TokenKind) -> Token {
        self.make_literal_token(kind, None)
    }

    /// Build a token with a literal payload.
    pub(crate) fn make_literal_token(&self, kind: TokenKind, literal: Option<Literal>) -> Token {
        let lexeme = Symbol::intern(self.cursor.slice_from(self.token_start));
        Token {
            kind,
            lexeme,
            literal,
            span: Span::new(
                self.token_start,
                self.cursor.position(),
                self.token_start_line,
                self.token_start_column,
            ),
        }
    }
}

/// Iterate tokens up to, and not including, `Eof`.
impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use lox_util::Handler;

    use crate::token::TokenKind;
    use crate::scan_tokens;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let handler = Handler::new();
        scan_tokens(source, &handler)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("(){},.-+;*/"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Semicolon,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_character_is_reported_and_skipped() {
        let handler = Handler::new();
        let tokens = scan_tokens("var @x;", &handler);
        assert!(handler.had_error());
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(handler.diagnostics()[0].message, "Unexpected character.");
    }

    #[test]
    fn test_eof_carries_last_line() {
        let handler = Handler::new();
        let tokens = scan_tokens("1\n2\n3", &handler);
        assert_eq!(tokens.last().unwrap().span.line, 3);
    }

    #[test]
    fn test_iterator_stops_before_eof() {
        let handler = Handler::new();
        let lexer = crate::Lexer::new("1 + 2", &handler);
        assert_eq!(lexer.count(), 3);
    }
}
