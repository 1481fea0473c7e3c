//! lox-interp - The tree-walking evaluator and its runtime.
//!
//! Everything past the static phases lives here: the [`Value`] universe,
//! environment chains, callables (functions, classes, natives), and the
//! [`Interpreter`] that walks the AST. Runtime errors unwind through the
//! recursive evaluation as an explicit signal ([`Unwind`]) and
//! surface at [`Interpreter::interpret`], which reports them and leaves
//! the interpreter reusable for the next input.

mod class;
mod control;
mod env;
mod function;
mod interp;
mod native;
mod value;

pub use class::{Instance, LoxClass};
pub use control::{RuntimeError, Unwind};
pub use env::Environment;
pub use function::LoxFunction;
pub use interp::Interpreter;
pub use native::NativeFn;
pub use value::{Callable, Value};
