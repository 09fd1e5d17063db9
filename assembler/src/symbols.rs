//! Symbol table: predefined symbols, pass-1 labels, pass-2 variable slots.

use std::collections::HashMap;

use crate::tables::PREDEFINED;

/// First RAM address handed out to an unresolved variable symbol.
const FIRST_VARIABLE_SLOT: u16 = 16;

/// Why a label could not be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindError {
    AlreadyBound,
    Predefined,
}

pub struct SymbolTable {
    user: HashMap<String, u16>,
    next_slot: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            user: HashMap::with_capacity(64),
            next_slot: FIRST_VARIABLE_SLOT,
        }
    }

    /// Bind a `(LABEL)` to a ROM address during pass 1.
    pub fn bind_label(&mut self, label: &str, address: u16) -> Result<(), BindError> {
        if PREDEFINED.contains_key(label) {
            return Err(BindError::Predefined);
        }
        if self.user.contains_key(label) {
            return Err(BindError::AlreadyBound);
        }
        self.user.insert(label.to_string(), address);
        Ok(())
    }

    /// Resolve a symbol during pass 2, allocating a fresh RAM slot for a
    /// symbol seen for the first time.
    pub fn resolve(&mut self, symbol: &str) -> u16 {
        if let Some(&addr) = PREDEFINED.get(symbol) {
            return addr;
        }
        if let Some(&addr) = self.user.get(symbol) {
            return addr;
        }
        let addr = self.next_slot;
        self.user.insert(symbol.to_string(), addr);
        self.next_slot += 1;
        addr
    }

    /// Look up a symbol without allocating.
    pub fn lookup(&self, symbol: &str) -> Option<u16> {
        PREDEFINED
            .get(symbol)
            .copied()
            .or_else(|| self.user.get(symbol).copied())
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_resolution() {
        let mut table = SymbolTable::new();
        assert_eq!(table.resolve("SP"), 0);
        assert_eq!(table.resolve("R13"), 13);
        assert_eq!(table.resolve("KBD"), 24576);
    }

    #[test]
    fn labels_bind_once() {
        let mut table = SymbolTable::new();
        assert_eq!(table.bind_label("LOOP", 4), Ok(()));
        assert_eq!(table.lookup("LOOP"), Some(4));
        assert_eq!(table.bind_label("LOOP", 9), Err(BindError::AlreadyBound));
    }

    #[test]
    fn labels_cannot_shadow_predefined() {
        let mut table = SymbolTable::new();
        assert_eq!(table.bind_label("SCREEN", 0), Err(BindError::Predefined));
        assert_eq!(table.bind_label("R7", 0), Err(BindError::Predefined));
    }

    #[test]
    fn variables_allocate_from_sixteen() {
        let mut table = SymbolTable::new();
        assert_eq!(table.resolve("i"), 16);
        assert_eq!(table.resolve("sum"), 17);
        assert_eq!(table.resolve("i"), 16);
    }

    #[test]
    fn labels_take_priority_over_allocation() {
        let mut table = SymbolTable::new();
        table.bind_label("END", 42).unwrap();
        assert_eq!(table.resolve("END"), 42);
    }
}
