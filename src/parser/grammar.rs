//! Recursive-descent parser over the token stream produced by `lexer`.
//!
//! State (the token cursor and the `NodeId` counter) is threaded through
//! plain `&mut self` methods rather than `nom` combinators — once the
//! stream is tokenized, assigning ids to invocation/identifier/field-access
//! nodes as they're built is far simpler as ordinary imperative code.

use super::ast::*;
use super::lexer::{tokenize, Token};

#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at token {position}: {message}")]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source).map_err(|message| ParseError {
        position: 0,
        message,
    })?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        next_id: 0,
    };
    parser.program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    next_id: NodeId,
}

const MODIFIERS: &[&str] = &["public", "private", "protected", "internal"];

impl Parser {
    fn fresh_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            position: self.pos,
            message: message.into(),
        }
    }

    fn expect_symbol(&mut self, sym: &str) -> Result<(), ParseError> {
        match self.advance() {
            Some(Token::Symbol(s)) if s == sym => Ok(()),
            other => Err(self.err(format!("expected '{sym}', found {other:?}"))),
        }
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<(), ParseError> {
        match self.advance() {
            Some(Token::Keyword(k)) if k == kw => Ok(()),
            other => Err(self.err(format!("expected '{kw}', found {other:?}"))),
        }
    }

    fn at_symbol(&self, sym: &str) -> bool {
        matches!(self.peek(), Some(Token::Symbol(s)) if *s == sym)
    }

    fn at_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), Some(Token::Keyword(k)) if *k == kw)
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Some(Token::Ident(name)) => Ok(name),
            other => Err(self.err(format!("expected identifier, found {other:?}"))),
        }
    }

    fn skip_modifiers(&mut self) {
        while let Some(Token::Keyword(k)) = self.peek() {
            if MODIFIERS.contains(k) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();
        while self.peek().is_some() {
            let class = self.class_decl(&mut program)?;
            program.classes.push(class);
        }
        Ok(program)
    }

    fn class_decl(&mut self, program: &mut Program) -> Result<ClassDecl, ParseError> {
        self.expect_keyword("class")?;
        let name = self.expect_ident()?;
        self.expect_symbol("{")?;

        let mut fields = Vec::new();
        let mut method_indices = Vec::new();

        while !self.at_symbol("}") {
            self.skip_modifiers();
            let is_static = if self.at_keyword("static") {
                self.advance();
                true
            } else {
                false
            };
            self.skip_modifiers();

            let ty = self.expect_ident()?;
            let member_name = self.expect_ident()?;

            if self.at_symbol("(") {
                let method = self.method_tail(name.clone(), ty, member_name)?;
                method_indices.push(program.methods.len());
                program.methods.push(method);
            } else {
                self.expect_symbol(";")?;
                fields.push(FieldDecl {
                    name: member_name,
                    is_static,
                });
            }
        }
        self.expect_symbol("}")?;

        Ok(ClassDecl {
            name,
            fields,
            method_indices,
        })
    }

    fn method_tail(
        &mut self,
        class_name: String,
        return_type: String,
        name: String,
    ) -> Result<MethodDecl, ParseError> {
        self.expect_symbol("(")?;
        let mut params = Vec::new();
        while !self.at_symbol(")") {
            let ty = self.expect_ident()?;
            let pname = self.expect_ident()?;
            params.push(Param { name: pname, ty });
            if self.at_symbol(",") {
                self.advance();
            }
        }
        self.expect_symbol(")")?;
        let body = self.block()?;
        Ok(MethodDecl {
            name,
            return_type,
            class_name,
            params,
            body,
        })
    }

    fn block(&mut self) -> Result<Block, ParseError> {
        self.expect_symbol("{")?;
        let mut stmts = Vec::new();
        while !self.at_symbol("}") {
            stmts.push(self.stmt()?);
        }
        self.expect_symbol("}")?;
        Ok(stmts)
    }

    fn stmt(&mut self) -> Result<Stmt, ParseError> {
        if self.at_keyword("return") {
            self.advance();
            if self.at_symbol(";") {
                self.advance();
                return Ok(Stmt::Return(None));
            }
            let expr = self.expr()?;
            self.expect_symbol(";")?;
            return Ok(Stmt::Return(Some(expr)));
        }
        if self.at_keyword("if") {
            self.advance();
            self.expect_symbol("(")?;
            let cond = self.expr()?;
            self.expect_symbol(")")?;
            let then_branch = self.block()?;
            let else_branch = if self.at_keyword("else") {
                self.advance();
                Some(self.block()?)
            } else {
                None
            };
            return Ok(Stmt::If {
                cond,
                then_branch,
                else_branch,
            });
        }
        if self.at_keyword("var") {
            self.advance();
            let name = self.expect_ident()?;
            let init = if self.at_symbol("=") {
                self.advance();
                Some(self.expr()?)
            } else {
                None
            };
            self.expect_symbol(";")?;
            return Ok(Stmt::Let { name, init });
        }
        // Local declaration with explicit type: `<type> <name> [= expr];`
        if let Some(Token::Ident(_)) = self.peek() {
            if let Some(Token::Ident(_)) = self.tokens.get(self.pos + 1) {
                let _ty = self.expect_ident()?;
                let name = self.expect_ident()?;
                let init = if self.at_symbol("=") {
                    self.advance();
                    Some(self.expr()?)
                } else {
                    None
                };
                self.expect_symbol(";")?;
                return Ok(Stmt::Let { name, init });
            }
        }
        let expr = self.expr()?;
        self.expect_symbol(";")?;
        Ok(Stmt::Expr(expr))
    }

    // Precedence, loosest first: assignment-as-expr is not modeled; we only
    // need equality/relational, additive, multiplicative, unary, postfix.
    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.equality()
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.relational()?;
        while let Some(Token::Symbol(op @ ("==" | "!="))) = self.peek() {
            let op = op.to_string();
            self.advance();
            let rhs = self.relational()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn relational(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.additive()?;
        while let Some(Token::Symbol(op @ ("<" | ">" | "<=" | ">="))) = self.peek() {
            let op = op.to_string();
            self.advance();
            let rhs = self.additive()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.multiplicative()?;
        while let Some(Token::Symbol(op @ ("+" | "-"))) = self.peek() {
            let op = op.to_string();
            self.advance();
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        while let Some(Token::Symbol(op @ ("*" | "/"))) = self.peek() {
            let op = op.to_string();
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if let Some(Token::Symbol(op @ ("-" | "!"))) = self.peek() {
            let op = op.to_string();
            self.advance();
            let expr = self.unary()?;
            return Ok(Expr::Unary {
                op,
                expr: Box::new(expr),
            });
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        loop {
            if self.at_symbol(".") {
                self.advance();
                let name = self.expect_ident()?;
                let id = self.fresh_id();
                expr = Expr::FieldAccess {
                    id,
                    target: Box::new(expr),
                    name,
                };
            } else if self.at_symbol("(") {
                self.advance();
                let mut args = Vec::new();
                while !self.at_symbol(")") {
                    args.push(self.expr()?);
                    if self.at_symbol(",") {
                        self.advance();
                    }
                }
                self.expect_symbol(")")?;
                let id = self.fresh_id();
                expr = Expr::Invocation {
                    id,
                    callee: Box::new(expr),
                    args,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Some(Token::IntLiteral(n)) => Ok(Expr::Literal(Literal::Int(n))),
            Some(Token::StringLiteral(s)) => Ok(Expr::Literal(Literal::Str(s))),
            Some(Token::BoolLiteral(b)) => Ok(Expr::Literal(Literal::Bool(b))),
            Some(Token::Ident(name)) => {
                let id = self.fresh_id();
                Ok(Expr::Ident { id, name })
            }
            Some(Token::Symbol("(")) => {
                let expr = self.expr()?;
                self.expect_symbol(")")?;
                Ok(expr)
            }
            other => Err(self.err(format!("expected expression, found {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_methods() {
        let program =
            parse_program("class C { int foo() { return bar(); } int bar() { return 42; } }")
                .unwrap();
        assert_eq!(program.classes.len(), 1);
        assert_eq!(program.methods.len(), 2);
        assert_eq!(program.methods[0].name, "foo");
        assert_eq!(program.methods[1].name, "bar");
    }

    #[test]
    fn parses_static_field() {
        let program =
            parse_program("class C { static int s; int f() { return s + 1; } }").unwrap();
        let class = &program.classes[0];
        assert!(class.find_field("s").unwrap().is_static);
    }

    #[test]
    fn parses_console_write_line() {
        let program =
            parse_program(r#"class C { void f() { Console.WriteLine("x"); } }"#).unwrap();
        assert_eq!(program.methods.len(), 1);
    }

    #[test]
    fn parses_cross_class_chain() {
        let program = parse_program(
            "class A { int x() { return B.y(); } } class B { public static int y() { return 1; } }",
        )
        .unwrap();
        assert_eq!(program.classes.len(), 2);
    }
}
