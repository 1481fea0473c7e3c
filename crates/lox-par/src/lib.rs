//! lox-par - Parser (syntactic analysis).
//!
//! A recursive-descent parser over the token buffer from `lox-lex`.
//! Statements and declarations are parsed by one function per grammar rule
//! (`stmt.rs`); expressions use Pratt parsing with explicit binding powers
//! (`expr.rs`), which encodes the precedence ladder
//!
//! ```text
//! assignment < or < and < equality < comparison < term < factor < unary < call
//! ```
//!
//! in one loop instead of one function per level.
//!
//! # Error recovery
//!
//! A syntax error reports through the shared handler and returns a
//! [`ParseError`] sentinel, which `?` propagates up to the enclosing
//! declaration. The declaration loop then synchronizes: it discards tokens
//! until it passes a `;` or sits in front of a token that can begin a
//! statement, and resumes parsing there. One parse therefore collects as
//! many independent syntax errors as the input contains.
//!
//! The parse result is the list of statements that parsed cleanly; the
//! caller must consult `Handler::had_error` before executing any of it.

pub mod ast;
mod expr;
mod stmt;

pub use ast::{Expr, ExprId, FunctionDecl, LitValue, Stmt};

use lox_lex::{report_error, Token, TokenKind};
use lox_util::Handler;

/// Sentinel for a reported syntax error.
///
/// Carries no payload: the diagnostic has already been emitted by the time
/// one of these is constructed. Its only job is to unwind to the nearest
/// synchronization point.
#[derive(Debug)]
pub(crate) struct ParseError;

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// The Lox parser.
///
/// # Examples
///
/// ```
/// use lox_lex::scan_tokens;
/// use lox_par::Parser;
/// use lox_util::Handler;
///
/// let handler = Handler::new();
/// let tokens = scan_tokens("print 1 + 2;", &handler);
/// let statements = Parser::new(tokens, &handler).parse();
///
/// assert!(!handler.had_error());
/// assert_eq!(statements.len(), 1);
/// ```
pub struct Parser<'a> {
    /// Token stream from the lexer, ending with `Eof`
    tokens: Vec<Token>,

    /// Current position in the token stream
    position: usize,

    /// Error handler
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    /// Create a parser over a token buffer.
    ///
    /// The buffer must end with an `Eof` token, as produced by
    /// [`lox_lex::scan_tokens`].
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        Self {
            tokens,
            position: 0,
            handler,
        }
    }

    /// Parse the whole program: `declaration* EOF`.
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }
        statements
    }

    // =========================================================================
    // Token stream helpers
    // =========================================================================

    /// The token at the current position.
    pub(crate) fn peek(&self) -> Token {
        self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    /// The most recently consumed token.
    pub(crate) fn previous(&self) -> Token {
        self.tokens[self.position.saturating_sub(1)]
    }

    /// Consume and return the current token. Stops at `Eof`.
    pub(crate) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    /// True when the current token is `Eof`.
    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// True if the current token has the given kind, without consuming.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a token of the given kind, or report `message` at the
    /// current token and unwind.
    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(&self.peek(), message))
        }
    }

    /// Report a syntax error at `token` and build the unwind sentinel.
    pub(crate) fn error(&self, token: &Token, message: &str) -> ParseError {
        report_error(self.handler, token, message);
        ParseError
    }

    /// Skip tokens until a likely statement boundary.
    ///
    /// Called after an error has unwound to the declaration loop: advances
    /// past the offending token, then discards until the previous token was
    /// a semicolon or the next token starts a statement.
    pub(crate) fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {}
            }

            self.advance();
        }
    }
}
