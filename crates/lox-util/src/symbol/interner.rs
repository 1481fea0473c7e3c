//! String interner backing the [`Symbol`] type.
//!
//! The table is a pair of `DashMap`s (spelling to index, index to spelling)
//! behind a `LazyLock`, hashed with `ahash`. Interned strings are leaked to
//! obtain `'static` references; the table lives for the program duration and
//! entries are never removed.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use ahash::RandomState;
use dashmap::DashMap;

use super::Symbol;

/// Global string table.
///
/// Known symbols (keywords plus the `init` and `clock` spellings) are
/// pre-interned during initialization so the `KW_`/`SYM_` constants in the
/// parent module have stable indices.
pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

/// Symbols below this index are reserved for the pre-interned set.
const RESERVED_SYMBOLS_END: u32 = 32;

/// Thread-safe string table.
pub struct StringTable {
    /// Spelling to table index
    map: DashMap<&'static str, u32, RandomState>,

    /// Table index to spelling, for [`Symbol::as_str`]
    strings: DashMap<u32, &'static str, RandomState>,

    /// Next free index for dynamically interned strings
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            strings: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            next_index: AtomicU32::new(RESERVED_SYMBOLS_END),
        }
    }

    /// Pre-intern the known symbols.
    ///
    /// The order here must match the `KW_`/`SYM_` constant indices in the
    /// parent module.
    fn initialize_known_symbols(&self) {
        let known_symbols = [
            "and", "class", "else", "false", "for", "fun", "if", "nil", "or", "print", "return",
            "super", "this", "true", "var", "while", "init", "clock",
        ];

        for (index, text) in known_symbols.into_iter().enumerate() {
            self.map.insert(text, index as u32);
            self.strings.insert(index as u32, text);
        }
    }

    /// Intern a string, returning its symbol.
    pub fn intern(&self, text: &str) -> Symbol {
        if let Some(entry) = self.map.get(text) {
            return Symbol { index: *entry };
        }

        // A racing intern of the same spelling leaks one duplicate
        // allocation; the entry API still yields a single index.
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        let index = *self.map.entry(leaked).or_insert_with(|| {
            let index = self.next_index.fetch_add(1, Ordering::Relaxed);
            self.strings.insert(index, leaked);
            index
        });

        Symbol { index }
    }

    /// Look up the spelling for a table index.
    pub fn resolve(&self, index: u32) -> &'static str {
        self.strings.get(&index).map(|entry| *entry).unwrap_or("")
    }

    /// Number of interned strings, including the pre-interned set.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Always false once initialized; the known symbols are interned first.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_initialized_with_known_symbols() {
        assert!(STRING_TABLE.len() >= 18);
        assert!(!STRING_TABLE.is_empty());
    }

    #[test]
    fn test_dynamic_symbols_start_past_reserved_range() {
        let sym = Symbol::intern("a_dynamically_interned_name");
        assert!(sym.index >= RESERVED_SYMBOLS_END);
    }

    #[test]
    fn test_resolve_unknown_index_is_empty() {
        assert_eq!(STRING_TABLE.resolve(u32::MAX), "");
    }
}
