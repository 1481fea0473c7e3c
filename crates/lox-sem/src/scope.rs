//! Lexical scope tracking for the resolver.

use lox_util::Symbol;
use rustc_hash::FxHashMap;

/// State of a name within a rib.
///
/// A variable is `Declared` from the moment its `var` statement is reached
/// until its initializer has been resolved, and `Defined` afterwards.
/// Reading a `Declared` name is the "read in its own initializer" error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingState {
    /// Declared but initializer not yet resolved
    Declared,
    /// Fully defined and readable
    Defined,
}

/// A single lexical scope.
///
/// The resolver keeps a stack of these, innermost last. The global scope is
/// deliberately not represented: names that resolve past the whole stack
/// are looked up in the global environment at runtime.
#[derive(Debug, Default)]
pub struct Rib {
    /// Bindings in this scope
    pub bindings: FxHashMap<Symbol, BindingState>,
}

impl Rib {
    /// Create an empty rib.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rib_tracks_binding_states() {
        let mut rib = Rib::new();
        let name = Symbol::intern("x");

        rib.bindings.insert(name, BindingState::Declared);
        assert_eq!(rib.bindings.get(&name), Some(&BindingState::Declared));

        rib.bindings.insert(name, BindingState::Defined);
        assert_eq!(rib.bindings.get(&name), Some(&BindingState::Defined));
    }
}
