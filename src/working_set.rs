//! The working set: spec.md §4.6.
//!
//! A projection over the lookup table: methods with an empty dependency
//! set that have never been processed before. The `history` set persists
//! across recomputations so a method enters the working set at most once
//! in the analyzer's lifetime (invariant 5).

use std::collections::HashSet;

use crate::lookup_table::LookupTable;
use crate::method_identity::MethodIdentity;

#[derive(Default)]
pub struct WorkingSet {
    sequence: Vec<MethodIdentity>,
    history: HashSet<MethodIdentity>,
}

impl WorkingSet {
    pub fn new() -> Self {
        WorkingSet::default()
    }

    pub fn as_slice(&self) -> &[MethodIdentity] {
        &self.sequence
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Clears the sequence and repopulates it, in row-insertion order from
    /// `table`, with every method whose dependency set is now empty and
    /// that has never been added to the working set before.
    pub fn recompute(&mut self, table: &LookupTable) {
        self.sequence.clear();
        for m in table.methods_with_empty_dependencies() {
            if self.history.insert(m.clone()) {
                self.sequence.push(m);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::PurityLevel;

    fn ext(name: &str) -> MethodIdentity {
        MethodIdentity::External {
            identifier: name.to_string(),
        }
    }

    #[test]
    fn recompute_only_includes_methods_with_no_dependencies() {
        let mut table = LookupTable::new();
        table.add_dependency(ext("caller"), ext("callee"));

        let mut ws = WorkingSet::new();
        ws.recompute(&table);
        assert_eq!(ws.as_slice(), &[ext("callee")]);
    }

    #[test]
    fn a_method_enters_the_working_set_at_most_once() {
        let mut table = LookupTable::new();
        table.add_method(ext("a"));

        let mut ws = WorkingSet::new();
        ws.recompute(&table);
        assert_eq!(ws.as_slice(), &[ext("a")]);

        // "a" briefly gains then loses a dependency; it must not reappear.
        table.add_dependency(ext("a"), ext("b"));
        table.set_purity(&ext("b"), PurityLevel::Pure).unwrap();
        table.remove_dependency(&ext("a"), &ext("b")).unwrap();

        ws.recompute(&table);
        assert!(ws.is_empty());
    }
}
