//! The prior-knowledge table: spec.md §4.3.
//!
//! A fixed, ordered list of `(qualified-name, purity)` pairs seeding the
//! fixed-point loop with a-priori knowledge about well-known impure
//! operations (console/file/directory I/O, HTTP, threads, clocks, RNG,
//! `Dispose`). Modeled as a `static` const table, grounded on
//! `iepathos-debtmap`'s `IoPattern` const-slice design
//! (`analyzers/io_detector.rs`), which enumerates known I/O call shapes the
//! same way.

use once_cell::sync::Lazy;

use crate::lattice::PurityLevel;
use crate::method_identity::MethodIdentity;

struct Entry {
    qualified_name: &'static str,
    purity: PurityLevel,
}

/// Raw table as written by hand; deliberately allowed to contain duplicate
/// keys (e.g. `Console.Read` is a plausible double entry in a hand-curated
/// list like this). Construction dedupes: first match, by insertion order,
/// wins — spec.md §9's resolution of the "duplicate entries" open question.
const RAW_ENTRIES: &[(&str, PurityLevel)] = &[
    ("Console.Write", PurityLevel::Impure),
    ("Console.WriteLine", PurityLevel::Impure),
    ("Console.Read", PurityLevel::Impure),
    ("Console.ReadLine", PurityLevel::Impure),
    ("Console.Read", PurityLevel::Impure), // duplicate, first match wins
    ("File.Create", PurityLevel::Impure),
    ("File.Move", PurityLevel::Impure),
    ("File.Delete", PurityLevel::Impure),
    ("File.ReadAllText", PurityLevel::Impure),
    ("File.ReadAllBytes", PurityLevel::Impure),
    ("File.WriteAllText", PurityLevel::Impure),
    ("File.WriteAllBytes", PurityLevel::Impure),
    ("File.Open", PurityLevel::Impure),
    ("Directory.CreateDirectory", PurityLevel::Impure),
    ("Directory.Move", PurityLevel::Impure),
    ("Directory.Delete", PurityLevel::Impure),
    ("HttpClient.Get", PurityLevel::Impure),
    ("HttpClient.Post", PurityLevel::Impure),
    ("HttpClient.Put", PurityLevel::Impure),
    ("HttpClient.Delete", PurityLevel::Impure),
    ("Thread.Start", PurityLevel::Impure),
    ("Thread.Abort", PurityLevel::Impure),
    ("DateTime.Now", PurityLevel::Impure),
    ("DateTime.UtcNow", PurityLevel::Impure),
    ("Random.Next", PurityLevel::Impure),
    ("Random.NextDouble", PurityLevel::Impure),
    ("Dispose", PurityLevel::Impure),
];

/// Lookup by the textual form produced by §4.2: exact string match,
/// first-entry-wins on duplicates.
pub struct PriorKnowledgeTable {
    entries: Vec<Entry>,
}

static TABLE: Lazy<PriorKnowledgeTable> = Lazy::new(PriorKnowledgeTable::build);

impl PriorKnowledgeTable {
    fn build() -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut entries = Vec::new();
        for &(qualified_name, purity) in RAW_ENTRIES {
            if seen.insert(qualified_name) {
                entries.push(Entry {
                    qualified_name,
                    purity,
                });
            }
        }
        PriorKnowledgeTable { entries }
    }

    pub fn global() -> &'static PriorKnowledgeTable {
        &TABLE
    }

    fn first_match(&self, key: &str) -> Option<PurityLevel> {
        self.entries
            .iter()
            .find(|e| e.qualified_name == key)
            .map(|e| e.purity)
    }

    /// Look up a method identity's a-priori purity, if any.
    ///
    /// For an `External` identity, the lookup key is its identifier
    /// verbatim. For a `Resolved` identity, spec.md §9 notes a key-shape
    /// mismatch (prior-knowledge entries omit the return type): try the
    /// full display form first, then fall back to stripping the
    /// return-type prefix down to `<class>.<name>`.
    pub fn lookup(&self, identity: &MethodIdentity) -> Option<PurityLevel> {
        match identity {
            MethodIdentity::External { identifier } => self.first_match(identifier),
            MethodIdentity::Resolved { display, .. } => self
                .first_match(display)
                .or_else(|| self.first_match(&strip_return_type(display))),
        }
    }
}

/// `"<return-type> <class>.<name>"` -> `"<class>.<name>"`.
fn strip_return_type(display: &str) -> String {
    match display.rsplit_once(' ') {
        Some((_, rest)) => rest.to_string(),
        None => display.to_string(),
    }
}
