//! Grammar productions for C--.
//!
//! One `parse_*` method per nonterminal. Precedence is encoded in the call
//! chain (`assign` → `||` → `&&` → equality → relational → additive →
//! multiplicative → unary → term); dot-access chains hang off identifiers
//! only, so `loc` is its own little grammar.

use super::SyntaxError;
use super::lexer::{LineIndex, Tok, Token, lex, token_text};
use crate::ast::{
    AssignExp, BinaryOp, Block, CallExp, Decl, DeclId, DotExp, Exp, ExpId, FnDecl, FormalDecl,
    IdExp, Ident, Loc, Pos, Program, Stmt, StructDecl, TypeSpec, UnaryOp, VarDecl,
};

pub struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    index: LineIndex,
    next_exp: u32,
    next_decl: u32,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Result<Self, SyntaxError> {
        let tokens = lex(source)?;
        Ok(Self {
            source,
            tokens,
            pos: 0,
            index: LineIndex::new(source),
            next_exp: 0,
            next_decl: 0,
        })
    }

    pub fn parse(mut self) -> Result<Program, SyntaxError> {
        let mut decls = Vec::new();
        while self.peek().is_some() {
            decls.push(self.parse_decl()?);
        }
        Ok(Program {
            decls,
            num_exps: self.next_exp,
            num_decls: self.next_decl,
        })
    }

    // ---- token plumbing ----

    fn peek(&self) -> Option<Tok> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn peek_nth(&self, n: usize) -> Option<Tok> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn at(&self, kind: Tok) -> bool {
        self.peek() == Some(kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token. Callers check `peek` first.
    fn bump(&mut self) -> Token {
        self.advance().expect("bump past end of input")
    }

    fn expect(&mut self, kind: Tok, what: &str) -> Result<Token, SyntaxError> {
        match self.tokens.get(self.pos).copied() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            Some(token) => Err(SyntaxError {
                pos: self.pos_at(&token),
                message: format!("expected {what}, found `{}`", token_text(self.source, &token)),
            }),
            None => Err(SyntaxError {
                pos: self.eof_pos(),
                message: format!("expected {what}, found end of file"),
            }),
        }
    }

    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        let pos = match self.tokens.get(self.pos) {
            Some(token) => self.pos_at(token),
            None => self.eof_pos(),
        };
        SyntaxError {
            pos,
            message: message.into(),
        }
    }

    fn pos_at(&self, token: &Token) -> Pos {
        self.index.pos(token.span.start)
    }

    fn eof_pos(&self) -> Pos {
        self.index.pos(self.source.len() as u32)
    }

    fn text(&self, token: &Token) -> &'s str {
        token_text(self.source, token)
    }

    fn fresh_exp(&mut self) -> ExpId {
        let id = ExpId::new(self.next_exp);
        self.next_exp += 1;
        id
    }

    fn fresh_decl(&mut self) -> DeclId {
        let id = DeclId::new(self.next_decl);
        self.next_decl += 1;
        id
    }

    fn ident(&mut self) -> Result<Ident, SyntaxError> {
        let token = self.expect(Tok::Id, "an identifier")?;
        Ok(Ident {
            name: self.text(&token).to_string(),
            pos: self.pos_at(&token),
        })
    }

    // ---- declarations ----

    fn parse_decl(&mut self) -> Result<Decl, SyntaxError> {
        // `struct Name {` is a type definition; `struct Name x;` is a var.
        if self.at(Tok::Struct) && self.peek_nth(2) == Some(Tok::LCurly) {
            return Ok(Decl::Struct(self.parse_struct_decl()?));
        }

        let ty = self.parse_type_spec()?;
        let name = self.ident()?;
        match self.peek() {
            Some(Tok::LParen) => Ok(Decl::Fn(self.parse_fn_decl(ty, name)?)),
            Some(Tok::Semicolon) => {
                self.advance();
                Ok(Decl::Var(VarDecl {
                    id: self.fresh_decl(),
                    ty,
                    name,
                }))
            }
            _ => Err(self.error_here("expected `;` or `(` after declared name")),
        }
    }

    fn parse_type_spec(&mut self) -> Result<TypeSpec, SyntaxError> {
        match self.peek() {
            Some(Tok::Int) => {
                let token = self.bump();
                Ok(TypeSpec::Int(self.pos_at(&token)))
            }
            Some(Tok::Bool) => {
                let token = self.bump();
                Ok(TypeSpec::Bool(self.pos_at(&token)))
            }
            Some(Tok::Void) => {
                let token = self.bump();
                Ok(TypeSpec::Void(self.pos_at(&token)))
            }
            Some(Tok::Struct) => {
                self.advance();
                Ok(TypeSpec::Struct(self.ident()?))
            }
            _ => Err(self.error_here("expected a type")),
        }
    }

    fn parse_var_decl(&mut self) -> Result<VarDecl, SyntaxError> {
        let ty = self.parse_type_spec()?;
        let name = self.ident()?;
        self.expect(Tok::Semicolon, "`;` after variable declaration")?;
        Ok(VarDecl {
            id: self.fresh_decl(),
            ty,
            name,
        })
    }

    fn parse_struct_decl(&mut self) -> Result<StructDecl, SyntaxError> {
        self.expect(Tok::Struct, "`struct`")?;
        let name = self.ident()?;
        self.expect(Tok::LCurly, "`{` after struct name")?;

        let mut fields = Vec::new();
        while !self.at(Tok::RCurly) && self.peek().is_some() {
            fields.push(self.parse_var_decl()?);
        }
        if fields.is_empty() {
            return Err(self.error_here("struct must declare at least one field"));
        }
        self.expect(Tok::RCurly, "`}` after struct fields")?;
        self.expect(Tok::Semicolon, "`;` after struct declaration")?;

        Ok(StructDecl {
            id: self.fresh_decl(),
            name,
            fields,
        })
    }

    fn parse_fn_decl(&mut self, ret: TypeSpec, name: Ident) -> Result<FnDecl, SyntaxError> {
        self.expect(Tok::LParen, "`(`")?;
        let mut formals = Vec::new();
        if !self.at(Tok::RParen) {
            loop {
                let ty = self.parse_type_spec()?;
                let formal_name = self.ident()?;
                formals.push(FormalDecl {
                    id: self.fresh_decl(),
                    ty,
                    name: formal_name,
                });
                if !self.at(Tok::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.expect(Tok::RParen, "`)` after formals")?;
        let body = self.parse_block()?;
        Ok(FnDecl {
            id: self.fresh_decl(),
            ret,
            name,
            formals,
            body,
        })
    }

    // ---- statements ----

    fn parse_block(&mut self) -> Result<Block, SyntaxError> {
        self.expect(Tok::LCurly, "`{`")?;

        let mut decls = Vec::new();
        while matches!(
            self.peek(),
            Some(Tok::Int) | Some(Tok::Bool) | Some(Tok::Void) | Some(Tok::Struct)
        ) {
            decls.push(self.parse_var_decl()?);
        }

        let mut stmts = Vec::new();
        while !self.at(Tok::RCurly) && self.peek().is_some() {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(Tok::RCurly, "`}`")?;

        Ok(Block { decls, stmts })
    }

    fn parse_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        match self.peek() {
            Some(Tok::If) => {
                self.advance();
                self.expect(Tok::LParen, "`(` after `if`")?;
                let cond = self.parse_exp()?;
                self.expect(Tok::RParen, "`)` after condition")?;
                let then_block = self.parse_block()?;
                if self.at(Tok::Else) {
                    self.advance();
                    let else_block = self.parse_block()?;
                    Ok(Stmt::IfElse(cond, then_block, else_block))
                } else {
                    Ok(Stmt::If(cond, then_block))
                }
            }
            Some(Tok::While) => {
                self.advance();
                self.expect(Tok::LParen, "`(` after `while`")?;
                let cond = self.parse_exp()?;
                self.expect(Tok::RParen, "`)` after condition")?;
                Ok(Stmt::While(cond, self.parse_block()?))
            }
            Some(Tok::Repeat) => {
                self.advance();
                self.expect(Tok::LParen, "`(` after `repeat`")?;
                let count = self.parse_exp()?;
                self.expect(Tok::RParen, "`)` after repeat clause")?;
                Ok(Stmt::Repeat(count, self.parse_block()?))
            }
            Some(Tok::Return) => {
                let token = self.bump();
                let pos = self.pos_at(&token);
                let value = if self.at(Tok::Semicolon) {
                    None
                } else {
                    Some(self.parse_exp()?)
                };
                self.expect(Tok::Semicolon, "`;` after return")?;
                Ok(Stmt::Return(value, pos))
            }
            Some(Tok::Cin) => {
                self.advance();
                self.expect(Tok::ReadOp, "`>>` after `cin`")?;
                let loc = self.parse_loc()?;
                self.expect(Tok::Semicolon, "`;`")?;
                Ok(Stmt::Read(loc))
            }
            Some(Tok::Cout) => {
                self.advance();
                self.expect(Tok::WriteOp, "`<<` after `cout`")?;
                let exp = self.parse_exp()?;
                self.expect(Tok::Semicolon, "`;`")?;
                Ok(Stmt::Write(exp))
            }
            Some(Tok::Id) => {
                if self.peek_nth(1) == Some(Tok::LParen) {
                    let call = self.parse_call()?;
                    self.expect(Tok::Semicolon, "`;` after call")?;
                    return Ok(Stmt::Call(call));
                }
                let loc = self.parse_loc()?;
                let stmt = match self.peek() {
                    Some(Tok::PlusPlus) => {
                        self.advance();
                        Stmt::Increment(loc)
                    }
                    Some(Tok::MinusMinus) => {
                        self.advance();
                        Stmt::Decrement(loc)
                    }
                    Some(Tok::Assign) => {
                        self.advance();
                        let rhs = self.parse_exp()?;
                        Stmt::Assign(AssignExp {
                            id: self.fresh_exp(),
                            lhs: loc,
                            rhs: Box::new(rhs),
                        })
                    }
                    _ => {
                        return Err(self.error_here("expected `=`, `++`, `--`, or `(` in statement"));
                    }
                };
                self.expect(Tok::Semicolon, "`;`")?;
                Ok(stmt)
            }
            Some(Tok::Int) | Some(Tok::Bool) | Some(Tok::Void) | Some(Tok::Struct) => {
                Err(self.error_here("declarations must come before statements in a block"))
            }
            _ => Err(self.error_here("expected a statement")),
        }
    }

    // ---- expressions ----

    fn parse_exp(&mut self) -> Result<Exp, SyntaxError> {
        self.parse_assign_exp()
    }

    fn parse_assign_exp(&mut self) -> Result<Exp, SyntaxError> {
        let lhs = self.parse_or_exp()?;
        if !self.at(Tok::Assign) {
            return Ok(lhs);
        }
        let Exp::Loc(loc) = lhs else {
            return Err(self.error_here("left-hand side of assignment is not assignable"));
        };
        self.advance();
        let rhs = self.parse_assign_exp()?;
        Ok(Exp::Assign(AssignExp {
            id: self.fresh_exp(),
            lhs: loc,
            rhs: Box::new(rhs),
        }))
    }

    fn parse_or_exp(&mut self) -> Result<Exp, SyntaxError> {
        let mut lhs = self.parse_and_exp()?;
        while self.at(Tok::Or) {
            let token = self.bump();
            let rhs = self.parse_and_exp()?;
            lhs = self.binary(BinaryOp::Or, &token, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and_exp(&mut self) -> Result<Exp, SyntaxError> {
        let mut lhs = self.parse_eq_exp()?;
        while self.at(Tok::And) {
            let token = self.bump();
            let rhs = self.parse_eq_exp()?;
            lhs = self.binary(BinaryOp::And, &token, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_eq_exp(&mut self) -> Result<Exp, SyntaxError> {
        let mut lhs = self.parse_rel_exp()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Equals) => BinaryOp::Eq,
                Some(Tok::NotEquals) => BinaryOp::Ne,
                _ => break,
            };
            let token = self.bump();
            let rhs = self.parse_rel_exp()?;
            lhs = self.binary(op, &token, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_rel_exp(&mut self) -> Result<Exp, SyntaxError> {
        let mut lhs = self.parse_add_exp()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Less) => BinaryOp::Lt,
                Some(Tok::Greater) => BinaryOp::Gt,
                Some(Tok::LessEq) => BinaryOp::Le,
                Some(Tok::GreaterEq) => BinaryOp::Ge,
                _ => break,
            };
            let token = self.bump();
            let rhs = self.parse_add_exp()?;
            lhs = self.binary(op, &token, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_add_exp(&mut self) -> Result<Exp, SyntaxError> {
        let mut lhs = self.parse_mul_exp()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Plus) => BinaryOp::Plus,
                Some(Tok::Minus) => BinaryOp::Minus,
                _ => break,
            };
            let token = self.bump();
            let rhs = self.parse_mul_exp()?;
            lhs = self.binary(op, &token, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_mul_exp(&mut self) -> Result<Exp, SyntaxError> {
        let mut lhs = self.parse_unary_exp()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Times) => BinaryOp::Times,
                Some(Tok::Divide) => BinaryOp::Divide,
                _ => break,
            };
            let token = self.bump();
            let rhs = self.parse_unary_exp()?;
            lhs = self.binary(op, &token, lhs, rhs);
        }
        Ok(lhs)
    }

    fn binary(&mut self, op: BinaryOp, token: &Token, lhs: Exp, rhs: Exp) -> Exp {
        Exp::Binary {
            id: self.fresh_exp(),
            pos: self.pos_at(token),
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    fn parse_unary_exp(&mut self) -> Result<Exp, SyntaxError> {
        let op = match self.peek() {
            Some(Tok::Minus) => UnaryOp::Neg,
            Some(Tok::Not) => UnaryOp::Not,
            _ => return self.parse_term(),
        };
        let token = self.bump();
        let operand = self.parse_unary_exp()?;
        Ok(Exp::Unary {
            id: self.fresh_exp(),
            pos: self.pos_at(&token),
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_term(&mut self) -> Result<Exp, SyntaxError> {
        match self.peek() {
            Some(Tok::IntLit) => {
                let token = self.bump();
                let pos = self.pos_at(&token);
                let value = match self.text(&token).parse::<i32>() {
                    Ok(v) => v,
                    Err(_) => {
                        return Err(SyntaxError {
                            pos,
                            message: "integer literal too large".to_string(),
                        });
                    }
                };
                Ok(Exp::IntLit {
                    id: self.fresh_exp(),
                    pos,
                    value,
                })
            }
            Some(Tok::StrLit) => {
                let token = self.bump();
                let text = self.text(&token);
                Ok(Exp::StrLit {
                    id: self.fresh_exp(),
                    pos: self.pos_at(&token),
                    value: text[1..text.len() - 1].to_string(),
                })
            }
            Some(Tok::True) => {
                let token = self.bump();
                Ok(Exp::True {
                    id: self.fresh_exp(),
                    pos: self.pos_at(&token),
                })
            }
            Some(Tok::False) => {
                let token = self.bump();
                Ok(Exp::False {
                    id: self.fresh_exp(),
                    pos: self.pos_at(&token),
                })
            }
            Some(Tok::LParen) => {
                self.advance();
                let exp = self.parse_exp()?;
                self.expect(Tok::RParen, "`)`")?;
                Ok(exp)
            }
            Some(Tok::Id) => {
                if self.peek_nth(1) == Some(Tok::LParen) {
                    Ok(Exp::Call(self.parse_call()?))
                } else {
                    Ok(Exp::Loc(self.parse_loc()?))
                }
            }
            _ => Err(self.error_here("expected an expression")),
        }
    }

    fn parse_loc(&mut self) -> Result<Loc, SyntaxError> {
        let name = self.ident()?;
        let mut loc = Loc::Id(IdExp {
            id: self.fresh_exp(),
            name: name.name,
            pos: name.pos,
        });
        while self.at(Tok::Dot) {
            self.advance();
            let field = self.ident()?;
            loc = Loc::Dot(DotExp {
                id: self.fresh_exp(),
                base: Box::new(loc),
                field,
            });
        }
        Ok(loc)
    }

    fn parse_call(&mut self) -> Result<CallExp, SyntaxError> {
        let name = self.ident()?;
        let callee = IdExp {
            id: self.fresh_exp(),
            name: name.name,
            pos: name.pos,
        };
        self.expect(Tok::LParen, "`(`")?;
        let mut args = Vec::new();
        if !self.at(Tok::RParen) {
            loop {
                args.push(self.parse_exp()?);
                if !self.at(Tok::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.expect(Tok::RParen, "`)` after arguments")?;
        Ok(CallExp {
            id: self.fresh_exp(),
            callee,
            args,
        })
    }
}
