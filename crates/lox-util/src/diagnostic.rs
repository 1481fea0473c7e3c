//! Diagnostic module - Error reporting infrastructure.
//!
//! The [`Handler`] is the single error sink shared by every pipeline phase.
//! It prints each diagnostic to stderr as it is reported, keeps a copy for
//! inspection by tests, and tracks the two flags the driver consults:
//! `had_error` (lexical, syntax, and resolution errors) and
//! `had_runtime_error`.
//!
//! Static errors render as `[line L] Error<location>: message`, where the
//! location part is empty, ` at end`, or ` at '<lexeme>'`. Runtime errors
//! render as the message followed by `[line L]` on its own line.
//!
//! # Examples
//!
//! ```
//! use lox_util::Handler;
//!
//! let handler = Handler::new();
//! handler.error(3, "Unexpected character.");
//! assert!(handler.had_error());
//!
//! handler.reset();
//! assert!(!handler.had_error());
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A static error: lexical, syntactic, or from resolution
    Error,
    /// An error raised during evaluation
    RuntimeError,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::RuntimeError => write!(f, "runtime error"),
        }
    }
}

/// A single reported diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level
    pub level: Level,
    /// Source line the diagnostic points at
    pub line: u32,
    /// Diagnostic message
    pub message: String,
}

/// Sink for diagnostics from every phase.
///
/// The handler uses interior mutability so it can be shared by reference
/// through the lexer, parser, resolver, and interpreter, all of which only
/// ever append to it.
#[derive(Default)]
pub struct Handler {
    /// Collected diagnostics, in report order
    diagnostics: RefCell<Vec<Diagnostic>>,
    /// Set by any static error; gates the phases that follow
    had_error: Cell<bool>,
    /// Set by a runtime error escaping to the top level
    had_runtime_error: Cell<bool>,
}

impl Handler {
    /// Create a new handler with clear flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a static error located only by line.
    ///
    /// Used by the scanner, which has no token to point at.
    pub fn error(&self, line: u32, message: &str) {
        self.report(line, "", message);
    }

    /// Report a static error with an explicit location part.
    ///
    /// `location` is rendered between `Error` and the colon; callers pass
    /// `" at end"` or `" at '<lexeme>'"` for token-located errors.
    pub fn report(&self, line: u32, location: &str, message: &str) {
        eprintln!("[line {line}] Error{location}: {message}");
        self.had_error.set(true);
        self.diagnostics.borrow_mut().push(Diagnostic {
            level: Level::Error,
            line,
            message: message.to_owned(),
        });
    }

    /// Report a runtime error escaping the interpreter.
    pub fn runtime_error(&self, line: u32, message: &str) {
        eprintln!("{message}\n[line {line}]");
        self.had_runtime_error.set(true);
        self.diagnostics.borrow_mut().push(Diagnostic {
            level: Level::RuntimeError,
            line,
            message: message.to_owned(),
        });
    }

    /// True if any static error has been reported since the last reset.
    pub fn had_error(&self) -> bool {
        self.had_error.get()
    }

    /// True if any runtime error has been reported.
    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error.get()
    }

    /// Clear the static error flag.
    ///
    /// The REPL calls this between lines so one bad input does not poison
    /// the next. The runtime error flag is left alone; it only feeds the
    /// file-mode exit code.
    pub fn reset(&self) {
        self.had_error.set(false);
    }

    /// Snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Number of diagnostics reported so far.
    pub fn count(&self) -> usize {
        self.diagnostics.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_sets_flag_and_records() {
        let handler = Handler::new();
        assert!(!handler.had_error());

        handler.error(7, "Unexpected character.");
        assert!(handler.had_error());
        assert!(!handler.had_runtime_error());

        let diagnostics = handler.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].level, Level::Error);
        assert_eq!(diagnostics[0].line, 7);
        assert_eq!(diagnostics[0].message, "Unexpected character.");
    }

    #[test]
    fn test_runtime_error_sets_its_own_flag() {
        let handler = Handler::new();
        handler.runtime_error(2, "Operands must be numbers.");
        assert!(handler.had_runtime_error());
        assert!(!handler.had_error());
    }

    #[test]
    fn test_reset_clears_only_static_flag() {
        let handler = Handler::new();
        handler.error(1, "Expect expression.");
        handler.runtime_error(1, "Operand must be a number.");

        handler.reset();
        assert!(!handler.had_error());
        assert!(handler.had_runtime_error());
        // Diagnostics are kept across resets.
        assert_eq!(handler.count(), 2);
    }
}
