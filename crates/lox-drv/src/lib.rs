//! lox-drv - The interpreter driver.
//!
//! One [`Session`] per process invocation. The session owns the long-lived
//! pieces (the diagnostic handler and the interpreter); the lexer, parser,
//! and resolver are constructed fresh for every input, which is what lets
//! the REPL feed many inputs into one set of globals.
//!
//! The phase policy is strict: if any phase reports a static error, the
//! phases after it never run for that input. Runtime errors stop the
//! current input but never the session.

use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use tracing::debug;

use lox_interp::Interpreter;
use lox_par::Parser;
use lox_sem::Resolver;
use lox_util::Handler;

/// Exit code for static errors, per sysexits `EX_DATAERR`.
pub const EXIT_STATIC_ERROR: i32 = 65;

/// Exit code for runtime errors, per sysexits `EX_SOFTWARE`.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Exit code for bad command lines, per sysexits `EX_USAGE`.
pub const EXIT_USAGE: i32 = 64;

/// A driver session: one handler, one interpreter, many inputs.
#[derive(Default)]
pub struct Session {
    handler: Handler,
    interpreter: Interpreter,
}

impl Session {
    /// Create a session with a fresh interpreter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one input through the pipeline.
    ///
    /// Each phase is gated on the previous ones having reported nothing.
    pub fn run(&mut self, source: &str) {
        let tokens = lox_lex::scan_tokens(source, &self.handler);
        debug!(tokens = tokens.len(), "scanned");
        if self.handler.had_error() {
            return;
        }

        let statements = Parser::new(tokens, &self.handler).parse();
        debug!(statements = statements.len(), "parsed");
        if self.handler.had_error() {
            return;
        }

        let locals = Resolver::new(&self.handler).resolve(&statements);
        debug!(resolved = locals.len(), "resolved");
        if self.handler.had_error() {
            return;
        }

        self.interpreter.add_locals(locals);
        self.interpreter.interpret(&statements, &self.handler);
    }

    /// Run a script file and compute the process exit code.
    pub fn run_file(&mut self, path: &Path) -> Result<i32> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        self.run(&source);

        Ok(if self.handler.had_error() {
            EXIT_STATIC_ERROR
        } else if self.handler.had_runtime_error() {
            EXIT_RUNTIME_ERROR
        } else {
            0
        })
    }

    /// Run the interactive prompt until end of input.
    ///
    /// Each line runs against the same interpreter, so globals persist,
    /// and the static error flag resets so one bad line does not block the
    /// next. Runtime errors never end the prompt.
    pub fn run_prompt(&mut self) -> Result<()> {
        if io::stdin().is_terminal() {
            self.prompt_interactive()
        } else {
            self.prompt_piped()
        }
    }

    /// Line-edited prompt for a real terminal.
    fn prompt_interactive(&mut self) -> Result<()> {
        let mut editor = rustyline::DefaultEditor::new()?;
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.run(&line);
                    self.handler.reset();
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Plain line loop for piped stdin.
    fn prompt_piped(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        loop {
            write!(stdout, "> ")?;
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                return Ok(());
            }
            self.run(line.trim_end_matches(['\n', '\r']));
            self.handler.reset();
        }
    }
}
