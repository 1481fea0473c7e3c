//! lox-sem - Static variable resolution.
//!
//! A single pre-order pass over the AST that computes, for every variable
//! use site, how many lexical scopes sit between the use and the binding.
//! The result is the [`Locals`] side table, keyed by expression node
//! identity; the interpreter uses it for distance-indexed environment
//! access, and names absent from the table fall back to the global
//! environment at runtime.
//!
//! The pass also reports the static errors that only scope analysis can
//! see: reading a local in its own initializer, duplicate declarations in
//! one scope, `this`/`super` outside a class, `return` outside a function,
//! and returning a value from an initializer. Errors do not stop the
//! traversal; one pass collects all of them.

pub mod scope;

use std::mem;

use lox_lex::{report_error, Token};
use lox_par::{Expr, ExprId, FunctionDecl, Stmt};
use lox_util::{symbol, Handler, Symbol};
use rustc_hash::FxHashMap;

use scope::{BindingState, Rib};

/// Side table mapping resolvable expressions to scope distances.
///
/// A distance of `d` means: walk `d` enclosing links from the environment
/// current at the use site, then read the name in that frame directly.
#[derive(Clone, Debug, Default)]
pub struct Locals {
    map: FxHashMap<ExprId, usize>,
}

impl Locals {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance recorded for an expression, if it resolved to a local.
    pub fn get(&self, id: ExprId) -> Option<usize> {
        self.map.get(&id).copied()
    }

    /// Merge another table into this one.
    ///
    /// The interpreter accumulates one table across REPL lines this way.
    /// Ids are process-unique, so entries never collide.
    pub fn extend(&mut self, other: Locals) {
        self.map.extend(other.map);
    }

    /// Number of resolved use sites.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when nothing resolved to a local.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn insert(&mut self, id: ExprId, depth: usize) {
        self.map.insert(id, depth);
    }
}

/// What kind of function body the resolver is currently inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
    Initializer,
    Method,
}

/// What kind of class body the resolver is currently inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

/// The resolver pass.
///
/// # Examples
///
/// ```
/// use lox_lex::scan_tokens;
/// use lox_par::Parser;
/// use lox_sem::Resolver;
/// use lox_util::Handler;
///
/// let handler = Handler::new();
/// let tokens = scan_tokens("{ var a = 1; print a; }", &handler);
/// let statements = Parser::new(tokens, &handler).parse();
/// let locals = Resolver::new(&handler).resolve(&statements);
///
/// assert!(!handler.had_error());
/// assert_eq!(locals.len(), 1);
/// ```
pub struct Resolver<'a> {
    /// Stack of scopes, innermost last; the global scope is not tracked
    scopes: Vec<Rib>,

    /// Function context for `return` checking
    current_function: FunctionKind,

    /// Class context for `this`/`super` checking
    current_class: ClassKind,

    /// Accumulated side table
    locals: Locals,

    /// Error handler
    handler: &'a Handler,
}

impl<'a> Resolver<'a> {
    /// Create a resolver reporting through `handler`.
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            scopes: Vec::new(),
            current_function: FunctionKind::None,
            current_class: ClassKind::None,
            locals: Locals::new(),
            handler,
        }
    }

    /// Resolve a statement list and return the side table.
    pub fn resolve(mut self, statements: &[Stmt]) -> Locals {
        self.resolve_stmts(statements);
        self.locals
    }

    fn resolve_stmts(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_stmt(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_stmts(statements);
                self.end_scope();
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.resolve_class(name, superclass.as_ref(), methods),

            Stmt::Expression(expr) | Stmt::Print(expr) => self.resolve_expr(expr),

            Stmt::Function(declaration) => {
                // The name is defined before the body resolves, so the
                // function can refer to itself recursively.
                self.declare(&declaration.name);
                self.define(&declaration.name);
                self.resolve_function(declaration, FunctionKind::Function);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }

            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    self.error_at(keyword, "Can't return from top-level code.");
                }
                if let Some(value) = value {
                    if self.current_function == FunctionKind::Initializer {
                        self.error_at(keyword, "Can't return a value from an initializer.");
                    }
                    self.resolve_expr(value);
                }
            }

            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
        }
    }

    fn resolve_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[std::rc::Rc<FunctionDecl>],
    ) {
        let enclosing_class = mem::replace(&mut self.current_class, ClassKind::Class);

        self.declare(name);
        self.define(name);

        if let Some(superclass_expr) = superclass {
            if let Expr::Variable {
                name: superclass_name,
                ..
            } = superclass_expr
            {
                if superclass_name.lexeme == name.lexeme {
                    self.error_at(superclass_name, "A class can't inherit from itself.");
                }
            }

            self.current_class = ClassKind::Subclass;
            self.resolve_expr(superclass_expr);

            // The super rib sits immediately outside the this rib; the
            // interpreter relies on that nesting when it reads `this` at
            // one frame less than `super`.
            self.begin_scope();
            self.bind_keyword(symbol::KW_SUPER);
        }

        self.begin_scope();
        self.bind_keyword(symbol::KW_THIS);

        for method in methods {
            let kind = if method.name.lexeme == symbol::SYM_INIT {
                FunctionKind::Initializer
            } else {
                FunctionKind::Method
            };
            self.resolve_function(method, kind);
        }

        self.end_scope();

        if superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_function(&mut self, declaration: &FunctionDecl, kind: FunctionKind) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in &declaration.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&declaration.body);
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name.lexeme);
            }

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            Expr::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }

            // Property names are dynamic; only the object resolves.
            Expr::Get { object, .. } => self.resolve_expr(object),

            Expr::Grouping { inner } => self.resolve_expr(inner),

            Expr::Literal { .. } => {}

            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }

            Expr::Super { id, keyword, .. } => {
                match self.current_class {
                    ClassKind::None => {
                        self.error_at(keyword, "Can't use 'super' outside of a class.");
                    }
                    ClassKind::Class => {
                        self.error_at(
                            keyword,
                            "Can't use 'super' in a class with no superclass.",
                        );
                    }
                    ClassKind::Subclass => {}
                }
                self.resolve_local(*id, keyword.lexeme);
            }

            Expr::This { id, keyword } => {
                if self.current_class == ClassKind::None {
                    self.error_at(keyword, "Can't use 'this' outside of a class.");
                }
                self.resolve_local(*id, keyword.lexeme);
            }

            Expr::Unary { right, .. } => self.resolve_expr(right),

            Expr::Variable { id, name } => {
                if let Some(rib) = self.scopes.last() {
                    if rib.bindings.get(&name.lexeme) == Some(&BindingState::Declared) {
                        self.error_at(
                            name,
                            "Can't read local variable in its own initializer.",
                        );
                    }
                }
                self.resolve_local(*id, name.lexeme);
            }
        }
    }

    // =========================================================================
    // Scope bookkeeping
    // =========================================================================

    fn begin_scope(&mut self) {
        self.scopes.push(Rib::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Mark a name as declared in the innermost scope.
    ///
    /// No-op at global scope; redeclaring an existing local is an error.
    fn declare(&mut self, name: &Token) {
        let Some(rib) = self.scopes.last() else {
            return;
        };
        if rib.bindings.contains_key(&name.lexeme) {
            self.error_at(name, "Already a variable with this name in this scope.");
        }

        if let Some(rib) = self.scopes.last_mut() {
            rib.bindings.insert(name.lexeme, BindingState::Declared);
        }
    }

    /// Mark a declared name as fully defined.
    fn define(&mut self, name: &Token) {
        if let Some(rib) = self.scopes.last_mut() {
            rib.bindings.insert(name.lexeme, BindingState::Defined);
        }
    }

    /// Bind an implicit name (`this`, `super`) in the innermost scope.
    fn bind_keyword(&mut self, name: Symbol) {
        if let Some(rib) = self.scopes.last_mut() {
            rib.bindings.insert(name, BindingState::Defined);
        }
    }

    /// Record the scope distance for a use site.
    ///
    /// Scans from the innermost scope outward; the first hit's distance
    /// from the use site goes into the table. No hit means global, which
    /// stays absent from the table.
    fn resolve_local(&mut self, id: ExprId, name: Symbol) {
        for (index, rib) in self.scopes.iter().enumerate().rev() {
            if rib.bindings.contains_key(&name) {
                self.locals.insert(id, self.scopes.len() - 1 - index);
                return;
            }
        }
    }

    fn error_at(&self, token: &Token, message: &str) {
        report_error(self.handler, token, message);
    }
}
