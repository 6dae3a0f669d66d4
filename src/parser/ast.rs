//! The parsed-tree data model handed to the engine.
//!
//! Methods are kept in a dense arena (`Program::methods`) and referenced by
//! `MethodHandle`, a plain index — the "Graph representation" design note:
//! a systems-language reimplementation keys method identities by dense
//! integer handle rather than by object reference.

use std::fmt;

/// Stable id assigned to every identifier, field-access, and invocation
/// expression node as the parser constructs it. Used by the resolver to
/// look symbols up without needing a pointer/reference into the tree.
pub type NodeId = u32;

/// Index into `Program::methods`. Two handles are equal iff they name the
/// same declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodHandle(pub usize);

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub methods: Vec<MethodDecl>,
    pub classes: Vec<ClassDecl>,
}

impl Program {
    pub fn method(&self, handle: MethodHandle) -> &MethodDecl {
        &self.methods[handle.0]
    }

    pub fn iter_methods(&self) -> impl Iterator<Item = (MethodHandle, &MethodDecl)> {
        self.methods
            .iter()
            .enumerate()
            .map(|(i, m)| (MethodHandle(i), m))
    }

    pub fn find_class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    /// Indices into `Program::methods` of the methods declared on this class.
    pub method_indices: Vec<usize>,
}

impl ClassDecl {
    pub fn find_field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub is_static: bool,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: String,
    pub class_name: String,
    pub params: Vec<Param>,
    pub body: Block,
}

impl MethodDecl {
    /// `<return-type> <enclosing-class>.<method-name>`, per spec.md §3.
    pub fn display_form(&self) -> String {
        format!("{} {}.{}", self.return_type, self.class_name, self.name)
    }
}

impl fmt::Display for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_form())
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    #[allow(dead_code)]
    pub ty: String,
}

pub type Block = Vec<Stmt>;

#[derive(Debug, Clone)]
pub enum Stmt {
    Return(Option<Expr>),
    Expr(Expr),
    Let {
        #[allow(dead_code)]
        name: String,
        init: Option<Expr>,
    },
    If {
        cond: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    Ident {
        id: NodeId,
        name: String,
    },
    FieldAccess {
        id: NodeId,
        target: Box<Expr>,
        name: String,
    },
    Invocation {
        id: NodeId,
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Unary {
        op: String,
        expr: Box<Expr>,
    },
    Binary {
        op: String,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone)]
pub enum Literal {
    Int(i64),
    Str(String),
    Bool(bool),
}

/// Render an expression back to source-like text with all whitespace
/// stripped, used for both external identifiers (§4.2) and prior-knowledge
/// lookups of invocation receivers (§4.3).
pub fn render_expr_text(expr: &Expr) -> String {
    match expr {
        Expr::Literal(Literal::Int(n)) => n.to_string(),
        Expr::Literal(Literal::Str(s)) => format!("\"{s}\""),
        Expr::Literal(Literal::Bool(b)) => b.to_string(),
        Expr::Ident { name, .. } => name.clone(),
        Expr::FieldAccess { target, name, .. } => {
            format!("{}.{}", render_expr_text(target), name)
        }
        Expr::Invocation { callee, args, .. } => {
            let args_text = args
                .iter()
                .map(render_expr_text)
                .collect::<Vec<_>>()
                .join(",");
            format!("{}({})", render_expr_text(callee), args_text)
        }
        Expr::Unary { op, expr } => format!("{op}{}", render_expr_text(expr)),
        Expr::Binary { op, lhs, rhs } => {
            format!(
                "{}{op}{}",
                render_expr_text(lhs),
                render_expr_text(rhs)
            )
        }
    }
}
