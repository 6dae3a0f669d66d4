//! The purity lattice: `Impure < Unknown < ParametricallyImpure < Pure`.
//!
//! `join` combines a caller's current purity with a callee's; it is the
//! lattice meet in trust order, i.e. the lesser of the two. `Pure` is the
//! join identity, `Impure` is absorbing.

use std::cmp::Ordering;
use std::fmt;

/// A method's purity classification.
///
/// Ordered least to greatest trust: `Impure < Unknown < ParametricallyImpure
/// < Pure`. The discriminant order below is what `derive(PartialOrd, Ord)`
/// uses, so it must match that ranking exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum PurityLevel {
    Impure,
    Unknown,
    ParametricallyImpure,
    Pure,
}

impl PurityLevel {
    /// `a ⊔ b = min(a, b)` in trust order.
    pub fn join(self, other: Self) -> Self {
        self.min(other)
    }

    /// Display name as used in the report and as the prior-knowledge table's
    /// textual tag.
    pub fn name(self) -> &'static str {
        match self {
            PurityLevel::Impure => "Impure",
            PurityLevel::Unknown => "Unknown",
            PurityLevel::ParametricallyImpure => "ParametricallyImpure",
            PurityLevel::Pure => "Pure",
        }
    }

    /// Parse from the textual tag used by the prior-knowledge table.
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag {
            "Impure" => Some(PurityLevel::Impure),
            "Unknown" => Some(PurityLevel::Unknown),
            "ParametricallyImpure" => Some(PurityLevel::ParametricallyImpure),
            "Pure" => Some(PurityLevel::Pure),
            _ => None,
        }
    }
}

impl fmt::Display for PurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Explicit comparison helper matching spec.md §4.1's operation list
/// (`eq`, `lt`, `join`) one-to-one, for callers that prefer free functions
/// over the `Ord`/`PartialOrd` impls.
pub fn lt(a: PurityLevel, b: PurityLevel) -> bool {
    a.cmp(&b) == Ordering::Less
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_level() -> impl Strategy<Value = PurityLevel> {
        prop_oneof![
            Just(PurityLevel::Impure),
            Just(PurityLevel::Unknown),
            Just(PurityLevel::ParametricallyImpure),
            Just(PurityLevel::Pure),
        ]
    }

    #[test]
    fn ordering_matches_spec() {
        assert!(PurityLevel::Impure < PurityLevel::Unknown);
        assert!(PurityLevel::Unknown < PurityLevel::ParametricallyImpure);
        assert!(PurityLevel::ParametricallyImpure < PurityLevel::Pure);
    }

    #[test]
    fn parse_tag_round_trips() {
        for level in [
            PurityLevel::Impure,
            PurityLevel::Unknown,
            PurityLevel::ParametricallyImpure,
            PurityLevel::Pure,
        ] {
            assert_eq!(PurityLevel::parse_tag(level.name()), Some(level));
        }
        assert_eq!(PurityLevel::parse_tag("Nonsense"), None);
    }

    proptest! {
        #[test]
        fn join_is_commutative(a in arb_level(), b in arb_level()) {
            prop_assert_eq!(a.join(b), b.join(a));
        }

        #[test]
        fn join_is_associative(a in arb_level(), b in arb_level(), c in arb_level()) {
            prop_assert_eq!(a.join(b).join(c), a.join(b.join(c)));
        }

        #[test]
        fn join_is_idempotent(a in arb_level()) {
            prop_assert_eq!(a.join(a), a);
        }

        #[test]
        fn pure_is_identity(a in arb_level()) {
            prop_assert_eq!(a.join(PurityLevel::Pure), a);
        }

        #[test]
        fn impure_is_absorbing(a in arb_level()) {
            prop_assert_eq!(a.join(PurityLevel::Impure), PurityLevel::Impure);
        }
    }
}
