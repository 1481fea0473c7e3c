//! lox-lex - Lexical analysis for Lox.
//!
//! The lexer turns source text into a flat token stream. It is a
//! direct-coded scanner: a [`Cursor`] steps through the bytes while the
//! [`Lexer`] dispatches on the first character of each token to the
//! specialized routine for identifiers, numbers, strings, operators, or
//! punctuation.
//!
//! Lexical errors (unexpected characters, unterminated strings) go to the
//! shared [`Handler`](lox_util::Handler); the lexer keeps scanning after
//! each one, so a single pass collects every lexical error in the input.
//!
//! # Examples
//!
//! ```
//! use lox_lex::{scan_tokens, TokenKind};
//! use lox_util::Handler;
//!
//! let handler = Handler::new();
//! let tokens = scan_tokens("var answer = 42;", &handler);
//!
//! assert!(!handler.had_error());
//! assert_eq!(tokens.first().unwrap().kind, TokenKind::Var);
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
//! ```

mod cursor;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{keyword_from_ident, report_error, Literal, Token, TokenKind};

use lox_util::Handler;

/// Scan the whole source into a token buffer.
///
/// The result always ends with exactly one `Eof` token carrying the final
/// line number, whatever errors were encountered along the way.
pub fn scan_tokens(source: &str, handler: &Handler) -> Vec<Token> {
    let mut lexer = Lexer::new(source, handler);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}
