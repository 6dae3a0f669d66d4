pub mod analyzer;
pub mod cli;
pub mod errors;
pub mod lattice;
pub mod lookup_table;
pub mod method_identity;
pub mod observability;
pub mod output;
pub mod parser;
pub mod prior_knowledge;
pub mod working_set;

pub use analyzer::analyze;
pub use errors::EngineError;
pub use lattice::PurityLevel;
pub use lookup_table::LookupTable;
pub use method_identity::MethodIdentity;
