//! Method identity: spec.md §3/§4.2's resolved/external tagged value.
//!
//! A systems-language reimplementation of the source's nullable-field
//! `Method` object: an explicit two-variant sum type instead of a struct
//! with sometimes-null fields, per the "Method identity as tagged variant"
//! design note (spec.md §9).

use std::fmt;

use crate::parser::ast::{render_expr_text, Expr, MethodHandle, Program};
use crate::parser::resolver::{Resolver, SymbolKind};

/// Uniquely names a method, whether declared in the analyzed tree
/// (`Resolved`) or only known by external name (`External`).
///
/// Equality matches spec.md §3 exactly: two `Resolved` identities are equal
/// iff they name the same declaration (the cached `display` string is not
/// part of equality — two handles to the same declaration are always
/// equal even if constructed independently); two `External` identities are
/// equal iff their identifiers match; a `Resolved` and an `External` are
/// never equal.
#[derive(Debug, Clone)]
pub enum MethodIdentity {
    Resolved { handle: MethodHandle, display: String },
    External { identifier: String },
}

impl MethodIdentity {
    /// Construct the identity of a method declaration itself.
    pub fn of_declaration(program: &Program, handle: MethodHandle) -> Self {
        let display = program.method(handle).display_form();
        MethodIdentity::Resolved { handle, display }
    }

    /// Construct the identity of an invocation expression's callee, per
    /// spec.md §4.2(b).
    ///
    /// `invocation` must be an `Expr::Invocation`; any other expression
    /// cannot name a method and is rejected with `None`.
    pub fn of_invocation(program: &Program, resolver: &Resolver, invocation: &Expr) -> Option<Self> {
        let (id, callee) = match invocation {
            Expr::Invocation { id, callee, .. } => (*id, callee.as_ref()),
            _ => return None,
        };

        match resolver.symbol_of_invocation(id) {
            Some(symbol) => match symbol.declaring_method {
                Some(handle) => Some(Self::of_declaration(program, handle)),
                None => Some(Self::external_from_callee(callee)),
            },
            None => Some(Self::external_from_callee(callee)),
        }
    }

    fn external_from_callee(callee: &Expr) -> Self {
        let identifier: String = render_expr_text(callee)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        MethodIdentity::External { identifier }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, MethodIdentity::Resolved { .. })
    }

    pub fn handle(&self) -> Option<MethodHandle> {
        match self {
            MethodIdentity::Resolved { handle, .. } => Some(*handle),
            MethodIdentity::External { .. } => None,
        }
    }

    /// `<return-type> <enclosing-class>.<method-name>` for a resolved
    /// identity; the raw identifier string for an external one.
    pub fn display_form(&self) -> &str {
        match self {
            MethodIdentity::Resolved { display, .. } => display,
            MethodIdentity::External { identifier } => identifier,
        }
    }

    /// spec.md §4.2: scan the identifier-name references inside a resolved
    /// method's body; true as soon as one resolves to a static field or
    /// property. If any identifier fails to resolve at all, the scan
    /// terminates early and conservatively returns false.
    pub fn reads_static_program_state(&self, program: &Program, resolver: &Resolver) -> bool {
        let handle = match self.handle() {
            Some(handle) => handle,
            None => return false,
        };
        let method = program.method(handle);
        let mut idents = Vec::new();
        collect_idents_in_block(&method.body, &mut idents);

        for ident in idents {
            let (id, _name) = match ident {
                Expr::Ident { id, name } => (id, name),
                _ => unreachable!("collect_idents only yields Ident nodes"),
            };
            match resolver.symbol_of_ident(*id) {
                None => return false,
                Some(symbol) => {
                    let is_field_or_property =
                        matches!(symbol.kind, SymbolKind::Field | SymbolKind::Property);
                    if symbol.is_static && is_field_or_property {
                        return true;
                    }
                }
            }
        }
        false
    }
}

impl PartialEq for MethodIdentity {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MethodIdentity::Resolved { handle: a, .. }, MethodIdentity::Resolved { handle: b, .. }) => {
                a == b
            }
            (
                MethodIdentity::External { identifier: a },
                MethodIdentity::External { identifier: b },
            ) => a == b,
            _ => false,
        }
    }
}

impl Eq for MethodIdentity {}

impl std::hash::Hash for MethodIdentity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            MethodIdentity::Resolved { handle, .. } => {
                0u8.hash(state);
                handle.hash(state);
            }
            MethodIdentity::External { identifier } => {
                1u8.hash(state);
                identifier.hash(state);
            }
        }
    }
}

impl fmt::Display for MethodIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_form())
    }
}

fn collect_idents_in_block<'a>(block: &'a crate::parser::ast::Block, out: &mut Vec<&'a Expr>) {
    use crate::parser::ast::Stmt;
    for stmt in block {
        match stmt {
            Stmt::Return(Some(expr)) | Stmt::Expr(expr) => collect_idents_in_expr(expr, out),
            Stmt::Return(None) => {}
            Stmt::Let { init, .. } => {
                if let Some(expr) = init {
                    collect_idents_in_expr(expr, out);
                }
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                collect_idents_in_expr(cond, out);
                collect_idents_in_block(then_branch, out);
                if let Some(else_branch) = else_branch {
                    collect_idents_in_block(else_branch, out);
                }
            }
        }
    }
}

fn collect_idents_in_expr<'a>(expr: &'a Expr, out: &mut Vec<&'a Expr>) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Ident { .. } => out.push(expr),
        Expr::FieldAccess { target, .. } => collect_idents_in_expr(target, out),
        Expr::Invocation { callee, args, .. } => {
            collect_idents_in_expr(callee, out);
            for arg in args {
                collect_idents_in_expr(arg, out);
            }
        }
        Expr::Unary { expr, .. } => collect_idents_in_expr(expr, out),
        Expr::Binary { lhs, rhs, .. } => {
            collect_idents_in_expr(lhs, out);
            collect_idents_in_expr(rhs, out);
        }
    }
}
