//! CLI surface: spec.md §6, reproduced faithfully plus ambient verbosity.
//!
//! Grounded on `iepathos-debtmap/src/cli.rs`'s `clap` derive usage and its
//! `ArgAction::Count` verbosity flag, trimmed down to the engine's two
//! input modes.

use std::path::PathBuf;

use clap::Parser;

/// `<tool> <path>` or `<tool> -s <source>`. Exactly one of `path` or
/// `source` must be given; `main.rs` enforces that and prints the
/// guidance message spec.md §6 calls for when neither is present.
#[derive(Parser, Debug)]
#[command(name = "puritas")]
#[command(about = "Infers method purity from a parsed program", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a source file to analyze.
    pub path: Option<PathBuf>,

    /// Analyze source passed directly as a string instead of a file.
    #[arg(short = 's', long = "source", value_name = "SOURCE")]
    pub source: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv). Ambient; does not
    /// change the report itself.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_argument() {
        let cli = Cli::parse_from(["puritas", "input.src"]);
        assert_eq!(cli.path, Some(PathBuf::from("input.src")));
        assert_eq!(cli.source, None);
    }

    #[test]
    fn parses_inline_source_flag() {
        let cli = Cli::parse_from(["puritas", "-s", "class C {}"]);
        assert_eq!(cli.source.as_deref(), Some("class C {}"));
        assert_eq!(cli.path, None);
    }

    #[test]
    fn counts_repeated_verbose_flags() {
        let cli = Cli::parse_from(["puritas", "-vvv", "input.src"]);
        assert_eq!(cli.verbosity, 3);
    }
}
