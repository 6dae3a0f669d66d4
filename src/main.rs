//! `puritas` CLI entry point: spec.md §6.2.
//!
//! Grounded on `iepathos-debtmap/src/main.rs`'s shape (install logging,
//! parse CLI, dispatch, bridge engine errors to `anyhow` at the boundary),
//! trimmed to the engine's single `<path>` / `-s <source>` surface.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use puritas::analyzer::analyze;
use puritas::cli::Cli;
use puritas::errors::EngineError;
use puritas::observability::init_tracing;
use puritas::output;
use puritas::parser::grammar::parse_program;
use puritas::parser::resolver::Resolver;

/// Precondition/structural failures are never expected from well-formed
/// input (spec.md §7); a distinct exit code separates them from ordinary
/// I/O or parse failures so automation can tell the two apart.
const EXIT_STRUCTURAL: u8 = 70;
const EXIT_USAGE: u8 = 64;
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbosity);

    if cli.path.is_none() && cli.source.is_none() {
        eprintln!("usage: puritas <path-to-source-file>");
        eprintln!("       puritas -s <source-as-string>");
        return ExitCode::from(EXIT_USAGE);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<EngineError>() {
        Some(EngineError::Structural(_)) | Some(EngineError::Analysis(_)) => EXIT_STRUCTURAL,
        _ => EXIT_FAILURE,
    }
}

fn run(cli: Cli) -> Result<()> {
    let (source, strip_external) = match (&cli.path, &cli.source) {
        (Some(path), None) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            (source, true)
        }
        (None, Some(source)) => (source.clone(), false),
        (None, None) => unreachable!("main() checks for this case before calling run()"),
        (Some(_), Some(_)) => {
            return Err(EngineError::validation(
                "pass either a path or -s/--source, not both".to_string(),
            )
            .into());
        }
    };

    let program = parse_program(&source)?;
    let resolver = Resolver::build(&program);
    let table = analyze(&program, &resolver)?;
    let table = if strip_external {
        table.strip_external()
    } else {
        table
    };

    print!("{}", output::render(&table));
    Ok(())
}
