//! Whitespace and comment skipping.

use crate::lexer::Lexer;

impl Lexer<'_> {
    /// Skip whitespace and `//` line comments.
    ///
    /// Newlines advance the cursor's line counter. A lone slash is left in
    /// place for the dispatch loop to emit as a division operator.
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\r' | '\t' | '\n' => self.cursor.advance(),
                '/' if self.cursor.peek_char(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lox_util::Handler;

    use crate::scan_tokens;
    use crate::token::TokenKind;

    #[test]
    fn test_line_comment_consumed_to_newline() {
        let handler = Handler::new();
        let tokens = scan_tokens("1 // the rest is ignored ;;;\n2", &handler);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]
        );
        assert_eq!(tokens[1].span.line, 2);
    }

    #[test]
    fn test_comment_at_end_of_input() {
        let handler = Handler::new();
        let tokens = scan_tokens("// nothing here", &handler);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert!(!handler.had_error());
    }

    #[test]
    fn test_slash_alone_is_division() {
        let handler = Handler::new();
        let tokens = scan_tokens("8 / 2", &handler);
        assert_eq!(tokens[1].kind, TokenKind::Slash);
    }
}
