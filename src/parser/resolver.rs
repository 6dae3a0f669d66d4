//! The symbol resolver collaborator described in spec.md §6: exposes
//! `symbol_of` for identifier-name and invocation-expression nodes.
//!
//! Built once, in a single pass over the parsed `Program`, after parsing
//! completes (a classic "binding" pass). The engine only ever reads from it.

use std::collections::HashMap;

use super::ast::{Block, ClassDecl, Expr, MethodHandle, NodeId, Program, Stmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Field,
    Property,
    Method,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub is_static: bool,
    /// Present only for `Method` symbols: the declaration this name binds to.
    pub declaring_method: Option<MethodHandle>,
}

/// Maps every identifier-name and invocation-expression node id to the
/// symbol it binds to, or to nothing if it is unresolved.
#[derive(Debug, Default)]
pub struct Resolver {
    ident_symbols: HashMap<NodeId, Symbol>,
    invocation_symbols: HashMap<NodeId, Symbol>,
}

impl Resolver {
    pub fn build(program: &Program) -> Self {
        let mut resolver = Resolver::default();
        for class in &program.classes {
            for &method_idx in &class.method_indices {
                let method = &program.methods[method_idx];
                resolver.visit_block(program, class, &method.body);
            }
        }
        resolver
    }

    pub fn symbol_of_ident(&self, id: NodeId) -> Option<&Symbol> {
        self.ident_symbols.get(&id)
    }

    pub fn symbol_of_invocation(&self, id: NodeId) -> Option<&Symbol> {
        self.invocation_symbols.get(&id)
    }

    fn visit_block(&mut self, program: &Program, class: &ClassDecl, block: &Block) {
        for stmt in block {
            self.visit_stmt(program, class, stmt);
        }
    }

    fn visit_stmt(&mut self, program: &Program, class: &ClassDecl, stmt: &Stmt) {
        match stmt {
            Stmt::Return(Some(expr)) | Stmt::Expr(expr) => self.visit_expr(program, class, expr),
            Stmt::Return(None) => {}
            Stmt::Let { init, .. } => {
                if let Some(expr) = init {
                    self.visit_expr(program, class, expr);
                }
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.visit_expr(program, class, cond);
                self.visit_block(program, class, then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_block(program, class, else_branch);
                }
            }
        }
    }

    fn visit_expr(&mut self, program: &Program, class: &ClassDecl, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Ident { id, name } => {
                let symbol = resolve_ident(program, class, name);
                if let Some(symbol) = symbol {
                    self.ident_symbols.insert(*id, symbol);
                }
            }
            Expr::FieldAccess { target, .. } => {
                self.visit_expr(program, class, target);
            }
            Expr::Invocation { id, callee, args } => {
                if let Some(symbol) = resolve_callee(program, class, callee) {
                    self.invocation_symbols.insert(*id, symbol);
                }
                self.visit_expr(program, class, callee);
                for arg in args {
                    self.visit_expr(program, class, arg);
                }
            }
            Expr::Unary { expr, .. } => self.visit_expr(program, class, expr),
            Expr::Binary { lhs, rhs, .. } => {
                self.visit_expr(program, class, lhs);
                self.visit_expr(program, class, rhs);
            }
        }
    }
}

fn resolve_ident(program: &Program, class: &ClassDecl, name: &str) -> Option<Symbol> {
    if let Some(field) = class.find_field(name) {
        return Some(Symbol {
            kind: SymbolKind::Field,
            is_static: field.is_static,
            declaring_method: None,
        });
    }
    method_in_class(program, class, name).map(|handle| Symbol {
        kind: SymbolKind::Method,
        is_static: false,
        declaring_method: Some(handle),
    })
}

fn method_in_class(program: &Program, class: &ClassDecl, name: &str) -> Option<MethodHandle> {
    class
        .method_indices
        .iter()
        .find(|&&idx| program.methods[idx].name == name)
        .map(|&idx| MethodHandle(idx))
}

/// Resolve the callee of an invocation expression to a method declared
/// somewhere in the parsed `Program`. Supports a bare call (`bar()`,
/// resolved against the enclosing class) and a static-style qualified call
/// (`B.y()`, resolved against the named class).
fn resolve_callee(program: &Program, class: &ClassDecl, callee: &Expr) -> Option<Symbol> {
    match callee {
        Expr::Ident { name, .. } => method_in_class(program, class, name),
        Expr::FieldAccess { target, name, .. } => {
            if let Expr::Ident {
                name: target_name, ..
            } = target.as_ref()
            {
                let target_class = program.find_class(target_name)?;
                method_in_class(program, target_class, name)
            } else {
                None
            }
        }
        _ => None,
    }
    .map(|handle| Symbol {
        kind: SymbolKind::Method,
        is_static: false,
        declaring_method: Some(handle),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::parse_program;

    #[test]
    fn resolves_static_field_read() {
        let program =
            parse_program("class C { static int s; int f() { return s + 1; } }").unwrap();
        let resolver = Resolver::build(&program);
        let body = &program.methods[0].body;
        let ident_id = match &body[0] {
            Stmt::Return(Some(Expr::Binary { lhs, .. })) => match lhs.as_ref() {
                Expr::Ident { id, .. } => *id,
                _ => panic!("expected ident"),
            },
            _ => panic!("expected return"),
        };
        let symbol = resolver.symbol_of_ident(ident_id).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Field);
        assert!(symbol.is_static);
    }

    #[test]
    fn resolves_bare_call_within_class() {
        let program =
            parse_program("class C { int foo() { return bar(); } int bar() { return 42; } }")
                .unwrap();
        let resolver = Resolver::build(&program);
        let invocation_id = match &program.methods[0].body[0] {
            Stmt::Return(Some(Expr::Invocation { id, .. })) => *id,
            _ => panic!("expected invocation"),
        };
        let symbol = resolver.symbol_of_invocation(invocation_id).unwrap();
        assert_eq!(symbol.declaring_method, Some(MethodHandle(1)));
    }

    #[test]
    fn leaves_unresolved_external_call_unbound() {
        let program =
            parse_program(r#"class C { void f() { Console.WriteLine("x"); } }"#).unwrap();
        let resolver = Resolver::build(&program);
        let invocation_id = match &program.methods[0].body[0] {
            Stmt::Expr(Expr::Invocation { id, .. }) => *id,
            _ => panic!("expected invocation"),
        };
        assert!(resolver.symbol_of_invocation(invocation_id).is_none());
    }
}
