//! String literal lexing.

use lox_util::Symbol;

use crate::lexer::Lexer;
use crate::token::{Literal, Token, TokenKind};

impl Lexer<'_> {
    /// Lex a string literal.
    ///
    /// Strings are double-quoted and may span multiple lines. There is no
    /// escape processing; the literal value is the raw content between the
    /// quotes. Returns `None` after reporting if the input ends before the
    /// closing quote, so the dispatch loop falls through to `Eof`.
    pub(crate) fn lex_string(&mut self) -> Option<Token> {
        self.cursor.advance();

        let content_start = self.cursor.position();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '"' {
            self.cursor.advance();
        }

        if self.cursor.is_at_end() {
            self.handler
                .error(self.cursor.line(), "Unterminated string.");
            return None;
        }

        let content = Symbol::intern(self.cursor.slice_from(content_start));
        self.cursor.advance();
        Some(self.make_literal_token(TokenKind::Str, Some(Literal::Str(content))))
    }
}

#[cfg(test)]
mod tests {
    use lox_util::{Handler, Symbol};

    use crate::scan_tokens;
    use crate::token::{Literal, TokenKind};

    fn string_value(source: &str) -> Symbol {
        let handler = Handler::new();
        let tokens = scan_tokens(source, &handler);
        match tokens[0].literal {
            Some(Literal::Str(s)) => s,
            other => panic!("expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_string() {
        assert_eq!(string_value("\"hi there\""), Symbol::intern("hi there"));
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(string_value("\"\""), Symbol::intern(""));
    }

    #[test]
    fn test_no_escape_processing() {
        assert_eq!(string_value(r#""a\nb""#), Symbol::intern("a\\nb"));
    }

    #[test]
    fn test_multiline_string_counts_lines() {
        let handler = Handler::new();
        let tokens = scan_tokens("\"one\ntwo\" x", &handler);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].span.line, 1);
        // The identifier after the string sits on line 2.
        assert_eq!(tokens[1].span.line, 2);
    }

    #[test]
    fn test_unterminated_string() {
        let handler = Handler::new();
        let tokens = scan_tokens("\"never closed", &handler);
        assert!(handler.had_error());
        assert_eq!(handler.diagnostics()[0].message, "Unterminated string.");
        // No string token is produced; scanning ends at Eof.
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn test_unterminated_string_reports_final_line() {
        let handler = Handler::new();
        scan_tokens("\"spans\nthree\nlines", &handler);
        assert_eq!(handler.diagnostics()[0].line, 3);
    }
}
