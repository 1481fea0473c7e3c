//! The tree-walking evaluator.
//!
//! Two dispatch surfaces, one match each: [`Interpreter::execute`] for
//! statements and [`Interpreter::evaluate`] for expressions. The visitor
//! indirection the AST would need in a language without sum types collapses
//! into these two functions.
//!
//! The interpreter is long-lived. In REPL mode the driver keeps one
//! instance across lines, so global bindings persist and the resolver side
//! table grows by [`Interpreter::add_locals`] as each line arrives.

use std::cell::RefCell;
use std::io::{self, Write};
use std::mem;
use std::rc::Rc;

use lox_lex::{Token, TokenKind};
use lox_par::{Expr, ExprId, LitValue, Stmt};
use lox_sem::Locals;
use lox_util::{symbol, Handler};
use rustc_hash::FxHashMap;

use crate::class::{Instance, LoxClass};
use crate::control::{ExecResult, RuntimeError, Unwind};
use crate::env::{undefined_variable, Environment};
use crate::function::LoxFunction;
use crate::native::{self, NativeFn};
use crate::value::{Callable, Value};

/// The Lox interpreter.
///
/// # Examples
///
/// ```
/// use lox_interp::Interpreter;
/// use lox_lex::scan_tokens;
/// use lox_par::Parser;
/// use lox_sem::Resolver;
/// use lox_util::Handler;
///
/// let handler = Handler::new();
/// let tokens = scan_tokens("var x = 2 + 3;", &handler);
/// let statements = Parser::new(tokens, &handler).parse();
/// let locals = Resolver::new(&handler).resolve(&statements);
///
/// let mut interpreter = Interpreter::new();
/// interpreter.add_locals(locals);
/// interpreter.interpret(&statements, &handler);
/// assert!(!handler.had_runtime_error());
/// ```
pub struct Interpreter {
    /// The root environment, holding natives and top-level definitions
    globals: Rc<RefCell<Environment>>,

    /// The environment current statements execute in
    environment: Rc<RefCell<Environment>>,

    /// Resolver side table, accumulated across inputs
    locals: Locals,

    /// Sink for `print` output
    out: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter printing to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Create an interpreter printing to an arbitrary sink.
    ///
    /// Tests pass a shared buffer here to capture `print` output.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        let mut globals = Environment::new();
        globals.define(
            symbol::SYM_CLOCK,
            Value::Callable(Callable::Native(Rc::new(NativeFn {
                name: "clock",
                arity: 0,
                func: native::clock,
            }))),
        );
        let globals = Rc::new(RefCell::new(globals));

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: Locals::new(),
            out,
        }
    }

    /// Merge a freshly resolved side table into the accumulated one.
    pub fn add_locals(&mut self, locals: Locals) {
        self.locals.extend(locals);
    }

    /// Execute a program.
    ///
    /// A runtime error stops execution and is reported through the
    /// handler; the interpreter itself stays usable afterwards, which the
    /// REPL depends on.
    pub fn interpret(&mut self, statements: &[Stmt], handler: &Handler) {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {}
                Err(Unwind::Error(error)) => {
                    handler.runtime_error(error.line, &error.message);
                    return;
                }
                // The resolver rejects top-level returns; if one slips
                // through it simply ends the program.
                Err(Unwind::Return(_)) => return,
            }
        }
    }

    // =========================================================================
    // Statement execution
    // =========================================================================

    fn execute(&mut self, statement: &Stmt) -> ExecResult {
        match statement {
            Stmt::Block(statements) => {
                let env = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, Rc::new(RefCell::new(env)))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods),

            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }

            Stmt::Function(declaration) => {
                let function = LoxFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );
                self.environment.borrow_mut().define(
                    declaration.name.lexeme,
                    Value::Callable(Callable::Function(Rc::new(function))),
                );
                Ok(())
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                let _ = writeln!(self.out, "{value}");
                Ok(())
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.borrow_mut().define(name.lexeme, value);
                Ok(())
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
        }
    }

    /// Execute statements in the given environment, restoring the previous
    /// one on every exit path: normal completion, `return`, or error.
    pub(crate) fn execute_block(
        &mut self,
        statements: &[Stmt],
        env: Rc<RefCell<Environment>>,
    ) -> ExecResult {
        let previous = mem::replace(&mut self.environment, env);

        let mut result = Ok(());
        for statement in statements {
            result = self.execute(statement);
            if result.is_err() {
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<lox_par::FunctionDecl>],
    ) -> ExecResult {
        let superclass_value = match superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                match value {
                    Value::Callable(Callable::Class(class)) => Some(class),
                    _ => {
                        let line = match expr {
                            Expr::Variable { name, .. } => name.line(),
                            _ => name.line(),
                        };
                        return Err(RuntimeError::new(line, "Superclass must be a class.").into());
                    }
                }
            }
            None => None,
        };

        // Two-stage binding: the name exists (as nil) before the class
        // value is built, then assignment fills it in. Methods can
        // therefore mention the class by name.
        self.environment.borrow_mut().define(name.lexeme, Value::Nil);

        // Methods close over an extra frame binding `super` when there is
        // a superclass; the resolver arranged their distances to match.
        let method_env = match &superclass_value {
            Some(superclass) => {
                let mut env = Environment::with_enclosing(Rc::clone(&self.environment));
                env.define(
                    symbol::KW_SUPER,
                    Value::Callable(Callable::Class(Rc::clone(superclass))),
                );
                Rc::new(RefCell::new(env))
            }
            None => Rc::clone(&self.environment),
        };

        let mut method_map = FxHashMap::default();
        for method in methods {
            let is_initializer = method.name.lexeme == symbol::SYM_INIT;
            method_map.insert(
                method.name.lexeme,
                Rc::new(LoxFunction::new(
                    Rc::clone(method),
                    Rc::clone(&method_env),
                    is_initializer,
                )),
            );
        }

        let class = LoxClass::new(name.lexeme, superclass_value, method_map);
        self.environment
            .borrow_mut()
            .assign(name, Value::Callable(Callable::Class(Rc::new(class))))?;
        Ok(())
    }

    // =========================================================================
    // Expression evaluation
    // =========================================================================

    fn evaluate(&mut self, expr: &Expr) -> ExecResult<Value> {
        match expr {
            Expr::Literal { value } => Ok(match value {
                LitValue::Nil => Value::Nil,
                LitValue::Bool(b) => Value::Bool(*b),
                LitValue::Number(n) => Value::Number(*n),
                LitValue::Str(s) => Value::Str(Rc::from(s.as_str())),
            }),

            Expr::Grouping { inner } => self.evaluate(inner),

            Expr::Unary { op, right } => {
                let right = self.evaluate(right)?;
                match op.kind {
                    TokenKind::Minus => {
                        let value = check_number_operand(op, &right)?;
                        Ok(Value::Number(-value))
                    }
                    _ => Ok(Value::Bool(!right.is_truthy())),
                }
            }

            Expr::Binary { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(binary_op(op, left, right)?)
            }

            Expr::Logical { left, op, right } => {
                let left = self.evaluate(left)?;
                let decided = if op.kind == TokenKind::Or {
                    left.is_truthy()
                } else {
                    !left.is_truthy()
                };
                if decided {
                    // The left operand alone decides; it is also the
                    // result, uncoerced.
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Call {
                callee,
                paren,
                args,
            } => {
                let callee = self.evaluate(callee)?;

                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.evaluate(arg)?);
                }

                let Value::Callable(callable) = callee else {
                    return Err(RuntimeError::new(
                        paren.line(),
                        "Can only call functions and classes.",
                    )
                    .into());
                };

                if arg_values.len() != callable.arity() {
                    return Err(RuntimeError::new(
                        paren.line(),
                        format!(
                            "Expected {} arguments but got {}.",
                            callable.arity(),
                            arg_values.len()
                        ),
                    )
                    .into());
                }

                Ok(callable.call(self, arg_values)?)
            }

            Expr::Get { object, name } => {
                let object = self.evaluate(object)?;
                match object {
                    Value::Instance(instance) => Ok(Instance::get(&instance, name)?),
                    _ => Err(RuntimeError::new(
                        name.line(),
                        "Only instances have properties.",
                    )
                    .into()),
                }
            }

            Expr::Set {
                object,
                name,
                value,
            } => {
                let object = self.evaluate(object)?;
                let Value::Instance(instance) = object else {
                    return Err(
                        RuntimeError::new(name.line(), "Only instances have fields.").into()
                    );
                };

                let value = self.evaluate(value)?;
                instance.borrow_mut().set(name.lexeme, value.clone());
                Ok(value)
            }

            Expr::Variable { id, name } => Ok(self.look_up_variable(*id, name)?),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(*id) {
                    Some(distance) => {
                        if !Environment::assign_at(
                            &self.environment,
                            distance,
                            name.lexeme,
                            value.clone(),
                        ) {
                            return Err(undefined_variable(name).into());
                        }
                    }
                    None => {
                        self.globals.borrow_mut().assign(name, value.clone())?;
                    }
                }

                Ok(value)
            }

            Expr::This { id, keyword } => Ok(self.look_up_variable(*id, keyword)?),

            Expr::Super {
                id,
                keyword,
                method,
            } => Ok(self.evaluate_super(*id, keyword, method)?),
        }
    }

    /// Distance-indexed lookup with global fallback.
    fn look_up_variable(&self, id: ExprId, name: &Token) -> Result<Value, RuntimeError> {
        match self.locals.get(id) {
            Some(distance) => Environment::get_at(&self.environment, distance, name.lexeme)
                .ok_or_else(|| undefined_variable(name)),
            None => self.globals.borrow().get(name),
        }
    }

    /// `super.method` - find the method on the stored superclass, bound to
    /// the current `this`.
    ///
    /// The resolver pushed the `super` scope immediately outside the
    /// `this` scope, so `this` always sits one frame closer than `super`.
    fn evaluate_super(
        &mut self,
        id: ExprId,
        keyword: &Token,
        method: &Token,
    ) -> Result<Value, RuntimeError> {
        let distance = self
            .locals
            .get(id)
            .ok_or_else(|| undefined_variable(keyword))?;

        let superclass = match Environment::get_at(&self.environment, distance, symbol::KW_SUPER) {
            Some(Value::Callable(Callable::Class(class))) => class,
            _ => return Err(undefined_variable(keyword)),
        };

        let object = match Environment::get_at(&self.environment, distance - 1, symbol::KW_THIS) {
            Some(Value::Instance(instance)) => instance,
            _ => return Err(undefined_variable(keyword)),
        };

        let found = superclass.find_method(method.lexeme).ok_or_else(|| {
            RuntimeError::new(
                method.line(),
                format!("Undefined property '{}'.", method.lexeme),
            )
        })?;

        let bound = found.bind(object);
        Ok(Value::Callable(Callable::Function(Rc::new(bound))))
    }
}

/// Evaluate a binary operator over already-evaluated operands.
fn binary_op(op: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op.kind {
        TokenKind::Plus => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(a), Value::Str(b)) => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(&a);
                joined.push_str(&b);
                Ok(Value::Str(Rc::from(joined)))
            }
            _ => Err(RuntimeError::new(
                op.line(),
                "Operands must be two numbers or two strings.",
            )),
        },

        TokenKind::Minus => {
            let (a, b) = check_number_operands(op, left, right)?;
            Ok(Value::Number(a - b))
        }
        TokenKind::Star => {
            let (a, b) = check_number_operands(op, left, right)?;
            Ok(Value::Number(a * b))
        }
        TokenKind::Slash => {
            let (a, b) = check_number_operands(op, left, right)?;
            Ok(Value::Number(a / b))
        }

        TokenKind::Greater => {
            let (a, b) = check_number_operands(op, left, right)?;
            Ok(Value::Bool(a > b))
        }
        TokenKind::GreaterEqual => {
            let (a, b) = check_number_operands(op, left, right)?;
            Ok(Value::Bool(a >= b))
        }
        TokenKind::Less => {
            let (a, b) = check_number_operands(op, left, right)?;
            Ok(Value::Bool(a < b))
        }
        TokenKind::LessEqual => {
            let (a, b) = check_number_operands(op, left, right)?;
            Ok(Value::Bool(a <= b))
        }

        TokenKind::EqualEqual => Ok(Value::Bool(left.equals(&right))),
        // The parser only builds Binary nodes for the operators above plus
        // BangEqual.
        _ => Ok(Value::Bool(!left.equals(&right))),
    }
}

fn check_number_operand(op: &Token, value: &Value) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError::new(op.line(), "Operand must be a number.")),
    }
}

fn check_number_operands(
    op: &Token,
    left: Value,
    right: Value,
) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((a, b)),
        _ => Err(RuntimeError::new(op.line(), "Operands must be numbers.")),
    }
}
