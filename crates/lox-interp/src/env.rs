//! Environments: chains of mutable frames.
//!
//! A frame maps interned names to values and optionally links to the frame
//! that lexically encloses it; the chain bottoms out at the global frame.
//! Frames are shared as `Rc<RefCell<...>>` because closures capture them by
//! reference: two closures over the same `var` must observe each other's
//! mutations.
//!
//! Lookup comes in two flavors. `get`/`assign` search the chain by name and
//! can fail; `get_at`/`assign_at` jump a resolver-computed number of links
//! and touch that frame's map directly, no search.

use std::cell::RefCell;
use std::rc::Rc;

use lox_lex::Token;
use lox_util::Symbol;
use rustc_hash::FxHashMap;

use crate::control::RuntimeError;
use crate::value::Value;

/// One frame in an environment chain.
pub struct Environment {
    /// Bindings in this frame
    values: FxHashMap<Symbol, Value>,

    /// Lexically enclosing frame; `None` only for globals
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create a root frame with no enclosing link.
    pub fn new() -> Self {
        Self {
            values: FxHashMap::default(),
            enclosing: None,
        }
    }

    /// Create a frame nested inside `enclosing`.
    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Self {
            values: FxHashMap::default(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind a name in this frame, overwriting any existing binding.
    ///
    /// Definition never fails; redefining a global is allowed and routine
    /// in the REPL.
    pub fn define(&mut self, name: Symbol, value: Value) {
        self.values.insert(name, value);
    }

    /// Read a name, searching outward through the chain.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(parent) => parent.borrow().get(name),
            None => Err(undefined_variable(name)),
        }
    }

    /// Write to an existing binding, searching outward through the chain.
    ///
    /// Unlike `define`, assignment requires the binding to exist somewhere.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme, value);
            return Ok(());
        }

        match &self.enclosing {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(undefined_variable(name)),
        }
    }

    /// Walk exactly `distance` enclosing links.
    ///
    /// Returns `None` if the chain is shorter, which the resolver's
    /// soundness rules out for well-formed programs.
    fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
    ) -> Option<Rc<RefCell<Environment>>> {
        let mut current = Rc::clone(env);
        for _ in 0..distance {
            let next = current.borrow().enclosing.clone()?;
            current = next;
        }
        Some(current)
    }

    /// Read a name from the frame exactly `distance` links out.
    pub fn get_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: Symbol,
    ) -> Option<Value> {
        Self::ancestor(env, distance)
            .and_then(|frame| frame.borrow().values.get(&name).cloned())
    }

    /// Write a name into the frame exactly `distance` links out.
    ///
    /// Returns false if the chain is shorter than `distance`.
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: Symbol,
        value: Value,
    ) -> bool {
        match Self::ancestor(env, distance) {
            Some(frame) => {
                frame.borrow_mut().values.insert(name, value);
                true
            }
            None => false,
        }
    }
}

/// The error every failed lookup produces.
pub(crate) fn undefined_variable(name: &Token) -> RuntimeError {
    RuntimeError::new(
        name.line(),
        format!("Undefined variable '{}'.", name.lexeme),
    )
}

#[cfg(test)]
mod tests {
    use lox_lex::{Token, TokenKind};
    use lox_util::{Span, Symbol};

    use super::*;

    fn token(name: &str) -> Token {
        Token {
            kind: TokenKind::Identifier,
            lexeme: Symbol::intern(name),
            literal: None,
            span: Span::new(0, name.len(), 1, 1),
        }
    }

    #[test]
    fn test_define_and_get() {
        let mut env = Environment::new();
        env.define(Symbol::intern("x"), Value::Number(1.0));
        assert!(env.get(&token("x")).unwrap().equals(&Value::Number(1.0)));
    }

    #[test]
    fn test_define_overwrites_in_same_frame() {
        let mut env = Environment::new();
        let x = Symbol::intern("x");
        env.define(x, Value::Number(1.0));
        env.define(x, Value::Number(2.0));
        assert!(env.get(&token("x")).unwrap().equals(&Value::Number(2.0)));
    }

    #[test]
    fn test_get_searches_enclosing() {
        let mut globals = Environment::new();
        globals.define(Symbol::intern("x"), Value::Number(1.0));
        let globals = Rc::new(RefCell::new(globals));

        let inner = Environment::with_enclosing(Rc::clone(&globals));
        assert!(inner.get(&token("x")).unwrap().equals(&Value::Number(1.0)));
    }

    #[test]
    fn test_get_undefined_fails_with_message() {
        let env = Environment::new();
        let error = env.get(&token("missing")).unwrap_err();
        assert_eq!(error.message, "Undefined variable 'missing'.");
    }

    #[test]
    fn test_assign_updates_enclosing_binding() {
        let mut globals = Environment::new();
        globals.define(Symbol::intern("x"), Value::Number(1.0));
        let globals = Rc::new(RefCell::new(globals));

        let mut inner = Environment::with_enclosing(Rc::clone(&globals));
        inner.assign(&token("x"), Value::Number(5.0)).unwrap();

        assert!(globals
            .borrow()
            .get(&token("x"))
            .unwrap()
            .equals(&Value::Number(5.0)));
    }

    #[test]
    fn test_assign_to_undefined_fails() {
        let mut env = Environment::new();
        let error = env.assign(&token("y"), Value::Nil).unwrap_err();
        assert_eq!(error.message, "Undefined variable 'y'.");
    }

    #[test]
    fn test_get_at_skips_shadowing_frames() {
        let x = Symbol::intern("x");

        let mut outer = Environment::new();
        outer.define(x, Value::Number(1.0));
        let outer = Rc::new(RefCell::new(outer));

        let mut inner = Environment::with_enclosing(Rc::clone(&outer));
        inner.define(x, Value::Number(99.0));
        let inner = Rc::new(RefCell::new(inner));

        // Distance 0 sees the shadow, distance 1 the original.
        assert!(Environment::get_at(&inner, 0, x)
            .unwrap()
            .equals(&Value::Number(99.0)));
        assert!(Environment::get_at(&inner, 1, x)
            .unwrap()
            .equals(&Value::Number(1.0)));
    }

    #[test]
    fn test_assign_at_writes_the_exact_frame() {
        let x = Symbol::intern("x");

        let mut outer = Environment::new();
        outer.define(x, Value::Number(1.0));
        let outer = Rc::new(RefCell::new(outer));

        let inner = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(&outer))));
        assert!(Environment::assign_at(&inner, 1, x, Value::Number(7.0)));

        assert!(outer
            .borrow()
            .get(&token("x"))
            .unwrap()
            .equals(&Value::Number(7.0)));
    }

    #[test]
    fn test_shared_frame_is_visible_through_both_chains() {
        // Two nested environments over one shared frame observe the same
        // mutations, which is what closure capture relies on.
        let counter = Symbol::intern("i");
        let mut shared = Environment::new();
        shared.define(counter, Value::Number(0.0));
        let shared = Rc::new(RefCell::new(shared));

        let a = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(&shared))));
        let b = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(&shared))));

        assert!(Environment::assign_at(&a, 1, counter, Value::Number(1.0)));
        assert!(Environment::get_at(&b, 1, counter)
            .unwrap()
            .equals(&Value::Number(1.0)));
    }
}
