//! The lookup table: spec.md §4.4, the mutable central data structure.
//!
//! Grounded on `iepathos-debtmap`'s `priority::call_graph::CallGraph`: rows
//! keyed by identity with an incrementally-maintained reverse (caller)
//! index, backed by `im`'s persistent collections so `Copy()` (spec.md
//! §4.4) is a cheap structural clone rather than a deep walk.
//!
//! `SetPurity` enforces the lattice join rather than a raw overwrite.
//! Read literally, spec.md §4.4's table calls it an "overwrite", but
//! invariant 4 ("once `P(m)` becomes `Impure` or `Unknown`, it never rises
//! above that value") and the determinism property P4 only hold if it
//! actually clamps to `current.join(new)`; a raw overwrite would let a
//! later `Pure` propagation undo an earlier `Impure` one, depending on
//! iteration order. Section 2's description of the lattice role ("a join
//! operation used when combining a method's own purity with that of its
//! callees") backs this reading, so that's what's implemented here.

use im::{HashMap, HashSet, Vector};

use crate::errors::EngineError;
use crate::lattice::PurityLevel;
use crate::method_identity::MethodIdentity;

#[derive(Clone)]
struct Row {
    dependencies: Vector<MethodIdentity>,
    purity: PurityLevel,
}

#[derive(Clone)]
pub struct LookupTable {
    rows: HashMap<MethodIdentity, Row>,
    /// Reverse index: callee -> set of callers that still depend on it.
    caller_index: HashMap<MethodIdentity, HashSet<MethodIdentity>>,
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupTable {
    pub fn new() -> Self {
        LookupTable {
            rows: HashMap::new(),
            caller_index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_method(&self, m: &MethodIdentity) -> bool {
        self.rows.contains_key(m)
    }

    /// Idempotent: adds `(m, ∅, Pure)` if `m` is absent (invariant 3).
    pub fn add_method(&mut self, m: MethodIdentity) {
        self.rows.entry(m).or_insert_with(|| Row {
            dependencies: Vector::new(),
            purity: PurityLevel::Pure,
        });
    }

    pub fn remove_method(&mut self, m: &MethodIdentity) -> Result<(), EngineError> {
        if self.rows.remove(m).is_none() {
            return Err(EngineError::structural(format!(
                "RemoveMethod: no such method {m}"
            )));
        }
        self.caller_index.remove(m);
        for (_, callers) in self.caller_index.iter_mut() {
            callers.remove(m);
        }
        Ok(())
    }

    /// Ensures both rows exist, then adds `n` to `D(m)` if not already
    /// present (invariant 2: every dependency is itself a row).
    pub fn add_dependency(&mut self, m: MethodIdentity, n: MethodIdentity) {
        self.add_method(m.clone());
        self.add_method(n.clone());

        let row = self.rows.get_mut(&m).expect("just inserted");
        if !row.dependencies.iter().any(|dep| dep == &n) {
            row.dependencies.push_back(n.clone());
        }

        self.caller_index.entry(n).or_default().insert(m);
    }

    pub fn remove_dependency(
        &mut self,
        m: &MethodIdentity,
        n: &MethodIdentity,
    ) -> Result<(), EngineError> {
        let row = self
            .rows
            .get_mut(m)
            .ok_or_else(|| EngineError::structural(format!("RemoveDependency: no such method {m}")))?;

        let before = row.dependencies.len();
        row.dependencies.retain(|dep| dep != n);
        if row.dependencies.len() == before {
            return Err(EngineError::structural(format!(
                "RemoveDependency: {n} is not a dependency of {m}"
            )));
        }

        if let Some(callers) = self.caller_index.get_mut(n) {
            callers.remove(m);
        }
        Ok(())
    }

    pub fn has_dependency(&self, m: &MethodIdentity, n: &MethodIdentity) -> bool {
        self.rows
            .get(m)
            .map(|row| row.dependencies.iter().any(|dep| dep == n))
            .unwrap_or(false)
    }

    pub fn dependencies_of(&self, m: &MethodIdentity) -> Vector<MethodIdentity> {
        self.rows
            .get(m)
            .map(|row| row.dependencies.clone())
            .unwrap_or_default()
    }

    pub fn get_purity(&self, m: &MethodIdentity) -> Result<PurityLevel, EngineError> {
        self.rows
            .get(m)
            .map(|row| row.purity)
            .ok_or_else(|| EngineError::structural(format!("GetPurity: no such method {m}")))
    }

    /// Clamps to the lattice join of the current and incoming value; see
    /// the module doc for why this isn't a raw overwrite.
    pub fn set_purity(&mut self, m: &MethodIdentity, p: PurityLevel) -> Result<(), EngineError> {
        let row = self
            .rows
            .get_mut(m)
            .ok_or_else(|| EngineError::structural(format!("SetPurity: no such method {m}")))?;
        row.purity = row.purity.join(p);
        Ok(())
    }

    pub fn get_callers(&self, m: &MethodIdentity) -> HashSet<MethodIdentity> {
        self.caller_index.get(m).cloned().unwrap_or_default()
    }

    /// For each caller `c` of `m`: fold `P(m)` into `P(c)`, then drop the
    /// now-resolved `m -> c` edge (spec.md §4.4/§4.5).
    pub fn propagate_purity(&mut self, m: &MethodIdentity) -> Result<(), EngineError> {
        let purity = self.get_purity(m)?;
        let callers = self.get_callers(m);
        for caller in &callers {
            self.set_purity(caller, purity)?;
            self.remove_dependency(caller, m)?;
        }
        Ok(())
    }

    /// All rows whose identity is resolved to a declaration in the parsed
    /// tree — the filter the CLI applies before printing a report for a
    /// source file (not `-s`).
    pub fn strip_external(&self) -> LookupTable {
        let rows: HashMap<MethodIdentity, Row> = self
            .rows
            .iter()
            .filter(|(m, _)| m.is_resolved())
            .map(|(m, row)| (m.clone(), row.clone()))
            .collect();
        let caller_index: HashMap<MethodIdentity, HashSet<MethodIdentity>> = self
            .caller_index
            .iter()
            .filter(|(m, _)| m.is_resolved())
            .map(|(m, callers)| {
                let callers = callers.iter().filter(|c| c.is_resolved()).cloned().collect();
                (m.clone(), callers)
            })
            .collect();
        LookupTable { rows, caller_index }
    }

    /// Deep clone; cheap thanks to the underlying persistent collections.
    pub fn copy(&self) -> LookupTable {
        self.clone()
    }

    pub fn total_edges(&self) -> usize {
        self.rows.values().map(|row| row.dependencies.len()).sum()
    }

    /// Rows with an empty dependency set — candidates for the working set
    /// (spec.md §4.6 applies the "seen before" history filter on top).
    pub fn methods_with_empty_dependencies(&self) -> Vec<MethodIdentity> {
        self.rows
            .iter()
            .filter(|(_, row)| row.dependencies.is_empty())
            .map(|(m, _)| m.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MethodIdentity, PurityLevel)> {
        self.rows.iter().map(|(m, row)| (m, row.purity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(name: &str) -> MethodIdentity {
        MethodIdentity::External {
            identifier: name.to_string(),
        }
    }

    #[test]
    fn add_method_is_idempotent() {
        let mut table = LookupTable::new();
        table.add_method(ext("a"));
        table.add_method(ext("a"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn add_dependency_creates_both_rows() {
        let mut table = LookupTable::new();
        table.add_dependency(ext("a"), ext("b"));
        assert!(table.has_method(&ext("a")));
        assert!(table.has_method(&ext("b")));
        assert!(table.has_dependency(&ext("a"), &ext("b")));
    }

    #[test]
    fn add_dependency_deduplicates() {
        let mut table = LookupTable::new();
        table.add_dependency(ext("a"), ext("b"));
        table.add_dependency(ext("a"), ext("b"));
        assert_eq!(table.dependencies_of(&ext("a")).len(), 1);
    }

    #[test]
    fn remove_dependency_fails_when_absent() {
        let mut table = LookupTable::new();
        table.add_method(ext("a"));
        table.add_method(ext("b"));
        assert!(table.remove_dependency(&ext("a"), &ext("b")).is_err());
    }

    #[test]
    fn propagate_purity_removes_edges_and_joins_caller_purity() {
        let mut table = LookupTable::new();
        table.add_dependency(ext("caller"), ext("callee"));
        table.set_purity(&ext("callee"), PurityLevel::Impure).unwrap();
        table.propagate_purity(&ext("callee")).unwrap();
        assert_eq!(table.get_purity(&ext("caller")).unwrap(), PurityLevel::Impure);
        assert!(!table.has_dependency(&ext("caller"), &ext("callee")));
    }

    #[test]
    fn set_purity_never_rises_back_up() {
        let mut table = LookupTable::new();
        table.add_method(ext("a"));
        table.set_purity(&ext("a"), PurityLevel::Impure).unwrap();
        table.set_purity(&ext("a"), PurityLevel::Pure).unwrap();
        assert_eq!(table.get_purity(&ext("a")).unwrap(), PurityLevel::Impure);
    }

    #[test]
    fn strip_external_keeps_only_resolved_rows() {
        let mut table = LookupTable::new();
        table.add_dependency(ext("a"), ext("b"));
        let stripped = table.strip_external();
        assert_eq!(stripped.len(), 0);
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_identity() -> impl Strategy<Value = MethodIdentity> {
        "[a-d]".prop_map(|s| MethodIdentity::External { identifier: s })
    }

    proptest! {
        #[test]
        fn uniqueness_and_closure_hold_after_random_ops(
            ops in prop::collection::vec(
                (arb_identity(), arb_identity(), prop::bool::ANY),
                1..30,
            )
        ) {
            let mut table = LookupTable::new();
            for (m, n, add) in ops {
                if add {
                    table.add_dependency(m, n);
                } else {
                    let _ = table.remove_dependency(&m, &n);
                }
            }

            // P1: no duplicate rows (guaranteed by HashMap keys, checked for sanity).
            let mut seen = std::collections::HashSet::new();
            for (m, _) in table.iter() {
                prop_assert!(seen.insert(m.display_form().to_string()));
            }

            // P2: every remaining dependency is itself a row.
            for (m, _) in table.iter() {
                for dep in table.dependencies_of(m) {
                    prop_assert!(table.has_method(&dep));
                }
            }
        }
    }
}
