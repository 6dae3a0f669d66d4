//! The analyzer driver: spec.md §4.5's fixed-point propagation loop.
//!
//! Reconciling the pseudocode with termination and with spec.md §8's six
//! concrete scenarios required two decisions beyond what §4.5 states
//! literally; both are recorded here and in `DESIGN.md`:
//!
//! 1. `PropagatePurity(m)` is called for *every* method drained from the
//!    working set, not only the branches that explicitly mention it. A
//!    method can already be non-`Pure` by the time it's dequeued (its own
//!    dependencies may have propagated impurity into it on an earlier
//!    pass); if the "no propagation" branch were taken literally whenever
//!    none of the three named rules fire, that value would never reach its
//!    callers and the loop would under-propagate (scenario 3's `a` would
//!    stay `Pure` instead of becoming `Impure`). Propagating a value that's
//!    already `Pure` is a harmless no-op (`Pure` is the join identity), so
//!    always propagating subsumes the documented "stays Pure" case.
//! 2. An `External` identity with no prior-knowledge entry is assigned
//!    `Unknown`, not left at the default `Pure`. Section 7 reads as if such
//!    a method "remains Pure", but scenario 5 requires the *caller* of an
//!    unrecognized external call to end up `Unknown`, which is only
//!    reachable if the external callee itself becomes `Unknown` and
//!    propagates that into its caller. This is also what makes the
//!    `GetPurity(m) == Unknown` branch in §4.5's pseudocode reachable at
//!    all — nothing else in the written algorithm ever assigns `Unknown`.

use crate::errors::EngineError;
use crate::lattice::PurityLevel;
use crate::lookup_table::LookupTable;
use crate::method_identity::MethodIdentity;
use crate::parser::ast::{Block, Expr, Program, Stmt};
use crate::parser::resolver::Resolver;
use crate::prior_knowledge::PriorKnowledgeTable;
use crate::working_set::WorkingSet;

/// Run the engine to completion on an already-parsed program, returning the
/// populated lookup table (spec.md §5: `Analyze` is synchronous and owns
/// its table exclusively for the duration of the call).
pub fn analyze(program: &Program, resolver: &Resolver) -> Result<LookupTable, EngineError> {
    let mut table = build_initial_table(program, resolver)?;
    run_fixed_point(&mut table, program, resolver)?;
    Ok(table)
}

/// spec.md §4.4 "Initial construction": one row per declared method, with
/// only its *immediate* dependencies (the "known anomaly" in §4.4 — the
/// source recurses into callees here, which this implementation does not
/// reproduce; the fixed-point loop computes the transitive closure).
fn build_initial_table(program: &Program, resolver: &Resolver) -> Result<LookupTable, EngineError> {
    let mut table = LookupTable::new();

    for (handle, _) in program.iter_methods() {
        table.add_method(MethodIdentity::of_declaration(program, handle));
    }

    for (handle, method) in program.iter_methods() {
        let caller = MethodIdentity::of_declaration(program, handle);
        let mut invocations = Vec::new();
        collect_invocations(&method.body, &mut invocations);
        for invocation in invocations {
            if let Some(callee) = MethodIdentity::of_invocation(program, resolver, invocation) {
                table.add_dependency(caller.clone(), callee);
            }
        }
    }

    Ok(table)
}

fn run_fixed_point(
    table: &mut LookupTable,
    program: &Program,
    resolver: &Resolver,
) -> Result<(), EngineError> {
    let prior_table = PriorKnowledgeTable::global();
    let mut working_set = WorkingSet::new();
    let max_iterations = table.total_edges() + table.len() + 1;

    let mut iterations = 0;
    loop {
        working_set.recompute(table);
        if working_set.is_empty() {
            break;
        }

        let mut modified = false;
        for m in working_set.as_slice().to_vec() {
            let mut item_modified = false;

            if let Some(prior) = prior_table.lookup(&m) {
                table.set_purity(&m, prior)?;
                item_modified = true;
            } else if table.get_purity(&m)? == PurityLevel::Unknown {
                item_modified = true;
            } else if m.is_resolved() && m.reads_static_program_state(program, resolver) {
                table.set_purity(&m, PurityLevel::Impure)?;
                item_modified = true;
            } else if !m.is_resolved() {
                table.set_purity(&m, PurityLevel::Unknown)?;
                item_modified = true;
            }
            // else: resolved, doesn't read static state — its purity already
            // reflects whatever its own dependencies propagated into it.

            // propagate_purity always runs (see the module doc comment), and
            // it can change the table even when none of the branches above
            // did: m may already carry purity propagated into it from its
            // own dependencies on an earlier pass, and pushing that onward
            // to its callers removes edges those callers are waiting on.
            // Gating `modified` on `item_modified` alone would miss that, so
            // a caller whose only dependency was this kind of "pass-through"
            // method would never get woken up and would stall forever.
            let had_callers = !table.get_callers(&m).is_empty();
            table.propagate_purity(&m)?;
            modified |= item_modified || had_callers;
        }

        if !modified {
            break;
        }

        iterations += 1;
        if iterations > max_iterations {
            return Err(EngineError::Analysis(format!(
                "fixed-point loop exceeded {max_iterations} iterations without converging"
            )));
        }
    }

    Ok(())
}

fn collect_invocations<'a>(block: &'a Block, out: &mut Vec<&'a Expr>) {
    for stmt in block {
        match stmt {
            Stmt::Return(Some(expr)) | Stmt::Expr(expr) => collect_invocations_in_expr(expr, out),
            Stmt::Return(None) => {}
            Stmt::Let { init, .. } => {
                if let Some(expr) = init {
                    collect_invocations_in_expr(expr, out);
                }
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                collect_invocations_in_expr(cond, out);
                collect_invocations(then_branch, out);
                if let Some(else_branch) = else_branch {
                    collect_invocations(else_branch, out);
                }
            }
        }
    }
}

fn collect_invocations_in_expr<'a>(expr: &'a Expr, out: &mut Vec<&'a Expr>) {
    match expr {
        Expr::Literal(_) | Expr::Ident { .. } => {}
        Expr::FieldAccess { target, .. } => collect_invocations_in_expr(target, out),
        Expr::Invocation { callee, args, .. } => {
            collect_invocations_in_expr(callee, out);
            for arg in args {
                collect_invocations_in_expr(arg, out);
            }
            out.push(expr);
        }
        Expr::Unary { expr, .. } => collect_invocations_in_expr(expr, out),
        Expr::Binary { lhs, rhs, .. } => {
            collect_invocations_in_expr(lhs, out);
            collect_invocations_in_expr(rhs, out);
        }
    }
}
