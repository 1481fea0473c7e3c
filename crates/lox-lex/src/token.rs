//! Token definitions for Lox source code.
//!
//! A [`Token`] couples a [`TokenKind`] tag with the interned lexeme, an
//! optional literal payload (numbers and strings only), and the span it was
//! scanned from. Tokens are `Copy`; the parser embeds them freely in AST
//! nodes so later phases can locate errors.

use std::fmt;

use lox_util::{Handler, Span, Symbol};

/// The closed set of token tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Single-character punctuation
    /// "("
    LeftParen,
    /// ")"
    RightParen,
    /// "{"
    LeftBrace,
    /// "}"
    RightBrace,
    /// ","
    Comma,
    /// "."
    Dot,
    /// "-"
    Minus,
    /// "+"
    Plus,
    /// ";"
    Semicolon,
    /// "/"
    Slash,
    /// "*"
    Star,

    // One- or two-character operators
    /// "!"
    Bang,
    /// "!="
    BangEqual,
    /// "="
    Equal,
    /// "=="
    EqualEqual,
    /// ">"
    Greater,
    /// ">="
    GreaterEqual,
    /// "<"
    Less,
    /// "<="
    LessEqual,

    // Literals
    /// Identifier (variable, function, class, property name)
    Identifier,
    /// String literal
    Str,
    /// Number literal
    Number,

    // Keywords
    /// "and"
    And,
    /// "class"
    Class,
    /// "else"
    Else,
    /// "false"
    False,
    /// "fun"
    Fun,
    /// "for"
    For,
    /// "if"
    If,
    /// "nil"
    Nil,
    /// "or"
    Or,
    /// "print"
    Print,
    /// "return"
    Return,
    /// "super"
    Super,
    /// "this"
    This,
    /// "true"
    True,
    /// "var"
    Var,
    /// "while"
    While,

    /// End of input marker
    Eof,
}

/// Literal payload carried by number and string tokens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Literal {
    /// Numeric value of a `Number` token
    Number(f64),
    /// Unquoted, unescaped content of a `Str` token
    Str(Symbol),
}

/// A scanned token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token {
    /// Token tag
    pub kind: TokenKind,
    /// Interned source text of the token (empty for `Eof`)
    pub lexeme: Symbol,
    /// Literal payload; present only for `Number` and `Str`
    pub literal: Option<Literal>,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Line the token starts on.
    #[inline]
    pub fn line(&self) -> u32 {
        self.span.line
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::Eof {
            write!(f, "end")
        } else {
            write!(f, "'{}'", self.lexeme)
        }
    }
}

/// Look up the keyword kind for an identifier spelling.
pub fn keyword_from_ident(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "and" => TokenKind::And,
        "class" => TokenKind::Class,
        "else" => TokenKind::Else,
        "false" => TokenKind::False,
        "for" => TokenKind::For,
        "fun" => TokenKind::Fun,
        "if" => TokenKind::If,
        "nil" => TokenKind::Nil,
        "or" => TokenKind::Or,
        "print" => TokenKind::Print,
        "return" => TokenKind::Return,
        "super" => TokenKind::Super,
        "this" => TokenKind::This,
        "true" => TokenKind::True,
        "var" => TokenKind::Var,
        "while" => TokenKind::While,
        _ => return None,
    };
    Some(kind)
}

/// Report a static error located at a token.
///
/// Eof tokens render as ` at end`; everything else as ` at '<lexeme>'`.
/// This is the token-located half of the error sink protocol; the parser
/// and resolver both report through it.
pub fn report_error(handler: &Handler, token: &Token, message: &str) {
    if token.kind == TokenKind::Eof {
        handler.report(token.line(), " at end", message);
    } else {
        handler.report(token.line(), &format!(" at '{}'", token.lexeme), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(keyword_from_ident("while"), Some(TokenKind::While));
        assert_eq!(keyword_from_ident("fun"), Some(TokenKind::Fun));
        assert_eq!(keyword_from_ident("funny"), None);
        assert_eq!(keyword_from_ident(""), None);
        assert_eq!(keyword_from_ident("While"), None);
    }

    #[test]
    fn test_token_error_location_format() {
        let handler = Handler::new();
        let token = Token {
            kind: TokenKind::Identifier,
            lexeme: Symbol::intern("oops"),
            literal: None,
            span: Span::new(0, 4, 3, 1),
        };
        report_error(&handler, &token, "Expect expression.");

        let diagnostics = handler.diagnostics();
        assert_eq!(diagnostics[0].line, 3);
        assert_eq!(diagnostics[0].message, "Expect expression.");
    }
}
