//! Parser for the Pascal subset
//!
//! A predictive recursive descent parser with a single token of lookahead.
//! It owns its [`Lexer`] and pulls tokens on demand. One method per
//! production:
//!
//! ```text
//! program      := "program" ID ";" block "."
//! block        := declarations compound
//! declarations := ("var" (varDecl ";")+)? (procDecl ";")*
//! varDecl      := ID ("," ID)* ":" typeSpec
//! procDecl     := "procedure" ID ("(" paramList ")")? ";" block
//! paramList    := params (";" params)*
//! params       := ID ("," ID)* ":" typeSpec
//! typeSpec     := "integer" | "real"
//! compound     := "begin" stmtList "end"
//! stmtList     := stmt (";" stmt)*
//! stmt         := compound | assign | /* empty */
//! assign       := ID ":=" expr
//! expr         := term (("+" | "-") term)*
//! term         := factor (("*" | "div" | "/") factor)*
//! factor       := ("+" | "-") factor | INT | REAL | "(" expr ")" | ID
//! ```
//!
//! Precedence lives in the layering of `expr`, `term` and `factor`; there is
//! no precedence table.

use crate::ast::*;
use crate::diagnostics::{CompileError, Result};
use crate::lexer::{Lexer, Token, TokenKind, TokenValue};

/// Parse a complete program
pub fn parse(source: &str) -> Result<Program> {
    let mut parser = Parser::new(Lexer::new(source))?;
    parser.parse_program()
}

/// Parse a bare arithmetic expression followed by end of input
pub fn parse_expression(source: &str) -> Result<Expr> {
    let mut parser = Parser::new(Lexer::new(source))?;
    parser.parse_expression()
}

/// Parser state
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
}

impl<'src> Parser<'src> {
    /// Take ownership of `lexer` and prime the lookahead token
    pub fn new(mut lexer: Lexer<'src>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    fn current(&self) -> &Token {
        &self.current
    }

    fn peek(&self) -> TokenKind {
        self.current.kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    /// Consume the lookahead token and return it
    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.at(kind) {
            self.advance()
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> CompileError {
        CompileError::unexpected(self.current().clone())
    }

    // ==================== PROGRAM ====================

    /// `program`, then end of input
    pub fn parse_program(&mut self) -> Result<Program> {
        let program = self.program()?;
        self.expect(TokenKind::Eof)?;
        tracing::debug!(
            "Parsed program {} ({} declarations)",
            program.name.name,
            program.block.declarations.len()
        );
        Ok(program)
    }

    /// `expr`, then end of input
    pub fn parse_expression(&mut self) -> Result<Expr> {
        let expr = self.expr()?;
        self.expect(TokenKind::Eof)?;
        Ok(expr)
    }

    fn program(&mut self) -> Result<Program> {
        self.expect(TokenKind::Program)?;
        let name = self.ident()?;
        self.expect(TokenKind::Semi)?;
        let block = self.block()?;
        self.expect(TokenKind::Dot)?;
        Ok(Program { name, block })
    }

    fn block(&mut self) -> Result<Block> {
        let declarations = self.declarations()?;
        let body = self.compound()?;
        Ok(Block { declarations, body })
    }

    // ==================== DECLARATIONS ====================

    fn declarations(&mut self) -> Result<Vec<Decl>> {
        let mut decls = Vec::new();

        if self.at(TokenKind::Var) {
            self.advance()?;
            loop {
                decls.extend(self.var_decl()?.into_iter().map(Decl::Var));
                self.expect(TokenKind::Semi)?;
                if !self.at(TokenKind::Ident) {
                    break;
                }
            }
        }

        while self.at(TokenKind::Procedure) {
            decls.push(Decl::Procedure(self.proc_decl()?));
            self.expect(TokenKind::Semi)?;
        }

        Ok(decls)
    }

    fn var_decl(&mut self) -> Result<Vec<VarDecl>> {
        let names = self.ident_list()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.type_spec()?;
        Ok(names
            .into_iter()
            .map(|var| VarDecl { var, ty: ty.clone() })
            .collect())
    }

    fn proc_decl(&mut self) -> Result<ProcedureDecl> {
        self.expect(TokenKind::Procedure)?;
        let name = self.ident()?;

        let params = if self.at(TokenKind::LParen) {
            self.advance()?;
            let params = self.param_list()?;
            self.expect(TokenKind::RParen)?;
            params
        } else {
            Vec::new()
        };

        self.expect(TokenKind::Semi)?;
        let block = self.block()?;
        Ok(ProcedureDecl {
            name,
            params,
            block,
        })
    }

    fn param_list(&mut self) -> Result<Vec<Param>> {
        let mut params = self.params()?;
        while self.at(TokenKind::Semi) {
            self.advance()?;
            params.extend(self.params()?);
        }
        Ok(params)
    }

    fn params(&mut self) -> Result<Vec<Param>> {
        let names = self.ident_list()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.type_spec()?;
        Ok(names
            .into_iter()
            .map(|var| Param { var, ty: ty.clone() })
            .collect())
    }

    /// `ID ("," ID)*`
    fn ident_list(&mut self) -> Result<Vec<Ident>> {
        let mut names = vec![self.ident()?];
        while self.at(TokenKind::Comma) {
            self.advance()?;
            names.push(self.ident()?);
        }
        Ok(names)
    }

    fn type_spec(&mut self) -> Result<TypeSpec> {
        let kind = match self.peek() {
            TokenKind::Integer => TypeKind::Integer,
            TokenKind::Real => TypeKind::Real,
            _ => return Err(self.unexpected()),
        };
        let token = self.advance()?;
        Ok(TypeSpec {
            kind,
            span: token.span,
        })
    }

    // ==================== STATEMENTS ====================

    fn compound(&mut self) -> Result<Compound> {
        self.expect(TokenKind::Begin)?;
        let statements = self.stmt_list()?;
        self.expect(TokenKind::End)?;
        Ok(Compound { statements })
    }

    fn stmt_list(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = vec![self.stmt()?];
        while self.at(TokenKind::Semi) {
            self.advance()?;
            stmts.push(self.stmt()?);
        }
        // Two statements with no separator between them
        if self.at(TokenKind::Ident) {
            return Err(self.unexpected());
        }
        Ok(stmts)
    }

    fn stmt(&mut self) -> Result<Stmt> {
        match self.peek() {
            TokenKind::Begin => Ok(Stmt::Compound(self.compound()?)),
            TokenKind::Ident => Ok(Stmt::Assign(self.assign()?)),
            _ => Ok(Stmt::NoOp),
        }
    }

    fn assign(&mut self) -> Result<Assign> {
        let target = self.ident()?;
        self.expect(TokenKind::Assign)?;
        let value = self.expr()?;
        Ok(Assign { target, value })
    }

    // ==================== EXPRESSIONS ====================

    fn expr(&mut self) -> Result<Expr> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let token = self.advance()?;
            let right = self.term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: token.span,
            };
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut left = self.factor()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Div => BinaryOp::IntDiv,
                TokenKind::Slash => BinaryOp::FloatDiv,
                _ => break,
            };
            let token = self.advance()?;
            let right = self.factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: token.span,
            };
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<Expr> {
        match self.peek() {
            TokenKind::Plus | TokenKind::Minus => {
                let token = self.advance()?;
                let op = if token.kind == TokenKind::Plus {
                    UnaryOp::Plus
                } else {
                    UnaryOp::Neg
                };
                let operand = self.factor()?;
                Ok(Expr::Unary {
                    op,
                    expr: Box::new(operand),
                    span: token.span,
                })
            }
            TokenKind::IntegerConst | TokenKind::RealConst => {
                let token = self.advance()?;
                let value = match token.value {
                    Some(TokenValue::Integer(n)) => Number::Integer(n),
                    Some(TokenValue::Real(r)) => Number::Real(r),
                    _ => return Err(CompileError::unexpected(token)),
                };
                Ok(Expr::Num {
                    value,
                    span: token.span,
                })
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Ident => Ok(Expr::Var(self.ident()?)),
            _ => Err(self.unexpected()),
        }
    }

    fn ident(&mut self) -> Result<Ident> {
        let token = self.expect(TokenKind::Ident)?;
        let name = token.text().unwrap_or_default().to_string();
        Ok(Ident::new(name, token.span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorCode;

    #[test]
    fn test_term_binds_tighter_than_expr() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        match expr {
            Expr::Binary {
                op: BinaryOp::Add,
                right,
                ..
            } => assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. })),
            other => panic!("Expected addition at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_additive_is_left_associative() {
        let expr = parse_expression("7 - 3 - 1").unwrap();
        match expr {
            Expr::Binary {
                op: BinaryOp::Sub,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Binary { op: BinaryOp::Sub, .. }));
                assert!(matches!(*right, Expr::Num { value: Number::Integer(1), .. }));
            }
            other => panic!("Expected subtraction at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_tokens_after_expression() {
        let err = parse_expression("1 2").unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::UnexpectedToken));
        assert_eq!(err.token().unwrap().kind, TokenKind::IntegerConst);
    }
}
