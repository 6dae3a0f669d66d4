//! Unified error type for the engine: spec.md §7.
//!
//! Grounded on `iepathos-debtmap/src/errors.rs`'s `AnalysisError`: a
//! `thiserror`-derived enum categorizing failures, with a bridge into
//! `anyhow::Error` at the CLI boundary so `main.rs` can propagate any of
//! them with `?` behind a single return type.

use std::path::PathBuf;

use thiserror::Error;

/// The four failure categories spec.md §7 names. Semantic uncertainty
/// (missing symbol, missing declaring reference) is deliberately not a
/// variant here — per §7 it collapses into `PurityLevel::Unknown` inside
/// the engine and never surfaces as an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("I/O error: {message}{}", path.as_ref().map(|p| format!(" ({})", p.display())).unwrap_or_default())]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("parse error: {message}{}", line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Parse { message: String, line: Option<usize> },

    /// A lookup-table precondition was violated (spec.md §4.4's operations
    /// are all partial: `RemoveMethod`/`GetPurity`/etc. on an absent row).
    /// Carries the offending method's display form per §7.
    #[error("structural error: {0}")]
    Structural(String),

    #[error("validation error: {0}")]
    Validation(String),

    /// The fixed-point loop failed to converge within its iteration bound
    /// (spec.md §4.5's termination argument should make this unreachable;
    /// kept as a diagnostic rather than a panic).
    #[error("analysis error: {0}")]
    Analysis(String),
}

impl EngineError {
    pub fn io(message: impl Into<String>) -> Self {
        EngineError::Io {
            message: message.into(),
            path: None,
        }
    }

    pub fn io_at(message: impl Into<String>, path: PathBuf) -> Self {
        EngineError::Io {
            message: message.into(),
            path: Some(path),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        EngineError::Parse {
            message: message.into(),
            line: None,
        }
    }

    pub fn structural(message: impl Into<String>) -> Self {
        EngineError::Structural(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation(message.into())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_error_carries_its_message_through_display() {
        let err = EngineError::structural("GetPurity: no such method int C.f");
        assert_eq!(
            err.to_string(),
            "structural error: GetPurity: no such method int C.f"
        );
    }

    #[test]
    fn io_error_from_std_io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EngineError = io_err.into();
        assert!(matches!(err, EngineError::Io { .. }));
    }
}
