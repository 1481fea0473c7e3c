//! User-declared functions and methods.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lox_par::FunctionDecl;
use lox_util::{symbol, Symbol};

use crate::class::Instance;
use crate::control::{RuntimeError, Unwind};
use crate::env::Environment;
use crate::interp::Interpreter;
use crate::value::Value;

/// A function value: a declaration plus the environment captured where the
/// declaration was evaluated.
///
/// The closure is the whole point: calling the function builds its frame
/// over that captured chain, not over the caller's environment, so free
/// variables mean what they meant at the definition site.
pub struct LoxFunction {
    /// Shared AST of the declaration
    declaration: Rc<FunctionDecl>,
    /// Environment captured at declaration time
    closure: Rc<RefCell<Environment>>,
    /// Initializers return `this` regardless of `return` statements
    is_initializer: bool,
}

impl LoxFunction {
    /// Build a function value closing over `closure`.
    pub fn new(
        declaration: Rc<FunctionDecl>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    /// The declared name.
    pub fn name(&self) -> Symbol {
        self.declaration.name.lexeme
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// Produce a copy of this function with `this` bound to an instance.
    ///
    /// The binding lives in a fresh one-entry frame wedged between the
    /// function and its original closure, which is where the resolver
    /// expects `this` to sit for method bodies.
    pub fn bind(&self, instance: Rc<RefCell<Instance>>) -> LoxFunction {
        let mut env = Environment::with_enclosing(Rc::clone(&self.closure));
        env.define(symbol::KW_THIS, Value::Instance(instance));

        LoxFunction {
            declaration: Rc::clone(&self.declaration),
            closure: Rc::new(RefCell::new(env)),
            is_initializer: self.is_initializer,
        }
    }

    /// Call the function with already-evaluated arguments.
    ///
    /// A `Return` unwind from the body stops here and becomes the call's
    /// value; runtime errors continue outward. Initializers ignore the
    /// returned value and hand back `this` on every path.
    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let mut env = Environment::with_enclosing(Rc::clone(&self.closure));
        for (param, arg) in self.declaration.params.iter().zip(args) {
            env.define(param.lexeme, arg);
        }

        let result = interpreter.execute_block(&self.declaration.body, Rc::new(RefCell::new(env)));
        match result {
            Ok(()) => {
                if self.is_initializer {
                    Ok(self.this_value())
                } else {
                    Ok(Value::Nil)
                }
            }
            Err(Unwind::Return(value)) => {
                if self.is_initializer {
                    Ok(self.this_value())
                } else {
                    Ok(value)
                }
            }
            Err(Unwind::Error(error)) => Err(error),
        }
    }

    /// The `this` binding of a bound initializer.
    ///
    /// Initializers only ever run bound, so the binding sits in the
    /// closure's own frame at distance zero.
    fn this_value(&self) -> Value {
        Environment::get_at(&self.closure, 0, symbol::KW_THIS).unwrap_or(Value::Nil)
    }
}

impl fmt::Debug for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The closure chain can be cyclic through captured function
        // values, so only the name is printed.
        f.debug_struct("LoxFunction")
            .field("name", &self.name())
            .field("is_initializer", &self.is_initializer)
            .finish()
    }
}
