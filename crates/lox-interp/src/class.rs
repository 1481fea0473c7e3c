//! Classes and instances.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lox_lex::Token;
use lox_util::{symbol, Symbol};
use rustc_hash::FxHashMap;

use crate::control::RuntimeError;
use crate::function::LoxFunction;
use crate::interp::Interpreter;
use crate::value::{Callable, Value};

/// A class value.
pub struct LoxClass {
    /// Class name
    pub name: Symbol,
    /// Superclass, if declared with `<`
    pub superclass: Option<Rc<LoxClass>>,
    /// Methods declared in the class body, by name
    methods: FxHashMap<Symbol, Rc<LoxFunction>>,
}

impl LoxClass {
    /// Build a class value.
    pub fn new(
        name: Symbol,
        superclass: Option<Rc<LoxClass>>,
        methods: FxHashMap<Symbol, Rc<LoxFunction>>,
    ) -> Self {
        Self {
            name,
            superclass,
            methods,
        }
    }

    /// Find a method on this class or up the superclass chain.
    pub fn find_method(&self, name: Symbol) -> Option<Rc<LoxFunction>> {
        if let Some(method) = self.methods.get(&name) {
            return Some(Rc::clone(method));
        }
        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }

    /// Arity of the class as a callable: its initializer's, or zero.
    pub fn arity(&self) -> usize {
        self.find_method(symbol::SYM_INIT)
            .map(|init| init.arity())
            .unwrap_or(0)
    }

    /// Calling a class constructs an instance.
    ///
    /// If an `init` method exists it runs bound to the new instance; the
    /// instance itself is the result either way.
    pub fn construct(
        class: &Rc<LoxClass>,
        interpreter: &mut Interpreter,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(class))));

        if let Some(initializer) = class.find_method(symbol::SYM_INIT) {
            initializer
                .bind(Rc::clone(&instance))
                .call(interpreter, args)?;
        }

        Ok(Value::Instance(instance))
    }
}

impl fmt::Debug for LoxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoxClass").field("name", &self.name).finish()
    }
}

/// An instance: a class pointer plus open-ended fields.
pub struct Instance {
    class: Rc<LoxClass>,
    fields: FxHashMap<Symbol, Value>,
}

impl Instance {
    /// Create a field-less instance of `class`.
    pub fn new(class: Rc<LoxClass>) -> Self {
        Self {
            class,
            fields: FxHashMap::default(),
        }
    }

    /// Name of the instance's class, for stringify.
    pub fn class_name(&self) -> Symbol {
        self.class.name
    }

    /// Property read: fields shadow methods; a method found instead is
    /// bound to this instance before being returned.
    pub fn get(instance: &Rc<RefCell<Instance>>, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = instance.borrow().fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        let method = instance.borrow().class.find_method(name.lexeme);
        if let Some(method) = method {
            let bound = method.bind(Rc::clone(instance));
            return Ok(Value::Callable(Callable::Function(Rc::new(bound))));
        }

        Err(RuntimeError::new(
            name.line(),
            format!("Undefined property '{}'.", name.lexeme),
        ))
    }

    /// Property write. Fields spring into being on first assignment.
    pub fn set(&mut self, name: Symbol, value: Value) {
        self.fields.insert(name, value);
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Fields can hold the instance itself; print only the class.
        f.debug_struct("Instance")
            .field("class", &self.class.name)
            .finish()
    }
}
