//! The runtime value universe.
//!
//! [`Value`] is an explicit tagged sum over Lox's six kinds of value, and
//! [`Callable`] tags the three kinds of thing a call expression can invoke.
//! Keeping the tags explicit (rather than leaning on trait objects) keeps
//! the `+` operator dispatch and the error message texts direct.
//!
//! Strings are `Rc<str>`: values are cloned freely during evaluation and a
//! cheap pointer clone matters more than mutation, which Lox strings do not
//! have. Functions, classes, and instances also sit behind `Rc` so that
//! equality can be identity, as the language requires.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::class::{Instance, LoxClass};
use crate::control::RuntimeError;
use crate::function::LoxFunction;
use crate::interp::Interpreter;
use crate::native::NativeFn;

/// A Lox runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// `nil`
    Nil,
    /// `true` / `false`
    Bool(bool),
    /// IEEE-754 double
    Number(f64),
    /// Immutable string
    Str(Rc<str>),
    /// Anything invocable
    Callable(Callable),
    /// A class instance
    Instance(Rc<RefCell<Instance>>),
}

/// The callable kinds.
#[derive(Clone, Debug)]
pub enum Callable {
    /// A user-declared function or bound method
    Function(Rc<LoxFunction>),
    /// A class; calling it constructs an instance
    Class(Rc<LoxClass>),
    /// A host-provided builtin
    Native(Rc<NativeFn>),
}

impl Value {
    /// Lox truthiness: only `nil` and `false` are falsey.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Lox equality.
    ///
    /// `nil` equals only `nil`; numbers, strings, and booleans compare
    /// structurally; callables and instances compare by identity. Values
    /// of different kinds are never equal.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Callable {
    /// Number of arguments this callable expects.
    pub fn arity(&self) -> usize {
        match self {
            Callable::Function(function) => function.arity(),
            Callable::Class(class) => class.arity(),
            Callable::Native(native) => native.arity,
        }
    }

    /// Invoke with already-evaluated arguments.
    ///
    /// The interpreter has checked the arity before calling.
    pub fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match self {
            Callable::Function(function) => function.call(interpreter, args),
            Callable::Class(class) => LoxClass::construct(class, interpreter, args),
            Callable::Native(native) => (native.func)(&args),
        }
    }

    fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Function(a), Callable::Function(b)) => Rc::ptr_eq(a, b),
            (Callable::Class(a), Callable::Class(b)) => Rc::ptr_eq(a, b),
            (Callable::Native(a), Callable::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// `Display` implements stringify, the text `print` produces.
///
/// Rust's `f64` formatting already renders integral doubles without a
/// trailing `.0`, which is exactly the required number format.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Callable(callable) => write!(f, "{callable}"),
            Value::Instance(instance) => {
                write!(f, "{} instance", instance.borrow().class_name())
            }
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Function(function) => write!(f, "<fn {}>", function.name()),
            Callable::Class(class) => write!(f, "{}", class.name),
            Callable::Native(_) => write!(f, "<native fn>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Number(0.0).is_truthy());
        assert!(Value::Str(Rc::from("")).is_truthy());
    }

    #[test]
    fn test_nil_equality() {
        assert!(Value::Nil.equals(&Value::Nil));
        assert!(!Value::Nil.equals(&Value::Bool(false)));
        assert!(!Value::Number(0.0).equals(&Value::Nil));
    }

    #[test]
    fn test_structural_equality_by_kind() {
        assert!(Value::Number(2.0).equals(&Value::Number(2.0)));
        assert!(!Value::Number(2.0).equals(&Value::Number(3.0)));
        assert!(Value::Str(Rc::from("a")).equals(&Value::Str(Rc::from("a"))));
        assert!(!Value::Str(Rc::from("a")).equals(&Value::Str(Rc::from("b"))));
        // Different kinds never compare equal, even when they print alike.
        assert!(!Value::Number(1.0).equals(&Value::Str(Rc::from("1"))));
    }

    #[test]
    fn test_equality_is_reflexive_for_every_kind() {
        let values = [
            Value::Nil,
            Value::Bool(true),
            Value::Number(3.5),
            Value::Str(Rc::from("x")),
        ];
        for value in &values {
            assert!(value.equals(value));
        }
    }

    #[test]
    fn test_number_display_strips_integral_fraction() {
        assert_eq!(Value::Number(7.0).to_string(), "7");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-0.5).to_string(), "-0.5");
        assert_eq!(Value::Number(9007199254740991.0).to_string(), "9007199254740991");
    }

    #[test]
    fn test_nil_and_bool_display() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }
}
