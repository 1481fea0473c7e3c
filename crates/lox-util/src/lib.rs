//! lox-util - Shared infrastructure for the Lox interpreter pipeline.
//!
//! This crate provides the types that every phase of the pipeline depends on:
//!
//! - [`Span`] - source location tracking for tokens and diagnostics
//! - [`Symbol`] - interned string handles for identifiers and keywords
//! - [`Handler`] - the diagnostic sink that collects and prints errors and
//!   tracks the error flags the driver consults between phases
//!
//! The crates downstream of this one (`lox-lex`, `lox-par`, `lox-sem`,
//! `lox-interp`, `lox-drv`) never print errors themselves; they report
//! through a shared [`Handler`] and the driver decides whether to continue.

pub mod diagnostic;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use span::Span;
pub use symbol::Symbol;
