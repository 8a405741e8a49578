//! Abstract syntax tree for C-- programs.
//!
//! The tree is built once by the parser and never changes shape afterwards.
//! Analysis passes do not write into the nodes; instead every expression
//! carries a dense [`ExpId`] and every declaration a dense [`DeclId`], and
//! each pass records its results in a side table keyed by those handles
//! (resolved symbols, computed types, frame offsets).

mod printer;


pub use printer::{unparse, unparse_annotated};

use serde::Serialize;

/// 1-based source position, as reported by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Handle of an expression node; indexes the side tables filled by analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpId(u32);

impl ExpId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of a declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(u32);

impl DeclId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A whole source file: the ordered top-level declarations plus the node
/// counts the side tables are sized from.
#[derive(Debug, Clone)]
pub struct Program {
    pub decls: Vec<Decl>,
    pub num_exps: u32,
    pub num_decls: u32,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
    Struct(StructDecl),
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: DeclId,
    pub ty: TypeSpec,
    pub name: Ident,
}

#[derive(Debug, Clone)]
pub struct FnDecl {
    pub id: DeclId,
    pub ret: TypeSpec,
    pub name: Ident,
    pub formals: Vec<FormalDecl>,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct FormalDecl {
    pub id: DeclId,
    pub ty: TypeSpec,
    pub name: Ident,
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub id: DeclId,
    pub name: Ident,
    pub fields: Vec<VarDecl>,
}

/// A written-out type in a declaration.
#[derive(Debug, Clone)]
pub enum TypeSpec {
    Int(Pos),
    Bool(Pos),
    Void(Pos),
    Struct(Ident),
}

impl TypeSpec {
    pub fn pos(&self) -> Pos {
        match self {
            TypeSpec::Int(p) | TypeSpec::Bool(p) | TypeSpec::Void(p) => *p,
            TypeSpec::Struct(id) => id.pos,
        }
    }
}

/// An identifier token with its position.
#[derive(Debug, Clone)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
}

/// A `{ decls stmts }` body. Declarations come first, per the grammar.
#[derive(Debug, Clone)]
pub struct Block {
    pub decls: Vec<VarDecl>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    /// `loc = exp ;`
    Assign(AssignExp),
    /// `loc ++ ;`
    Increment(Loc),
    /// `loc -- ;`
    Decrement(Loc),
    /// `cin >> loc ;`
    Read(Loc),
    /// `cout << exp ;`
    Write(Exp),
    If(Exp, Block),
    IfElse(Exp, Block, Block),
    While(Exp, Block),
    Repeat(Exp, Block),
    Call(CallExp),
    /// `return exp? ;` — the position is the `return` keyword's.
    Return(Option<Exp>, Pos),
}

/// An assignable location: a plain identifier or a dot-access chain.
#[derive(Debug, Clone)]
pub enum Loc {
    Id(IdExp),
    Dot(DotExp),
}

impl Loc {
    pub fn id(&self) -> ExpId {
        match self {
            Loc::Id(e) => e.id,
            Loc::Dot(e) => e.id,
        }
    }

    /// Position of the leftmost identifier in the chain.
    pub fn pos(&self) -> Pos {
        match self {
            Loc::Id(e) => e.pos,
            Loc::Dot(e) => e.base.pos(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdExp {
    pub id: ExpId,
    pub name: String,
    pub pos: Pos,
}

#[derive(Debug, Clone)]
pub struct DotExp {
    pub id: ExpId,
    pub base: Box<Loc>,
    pub field: Ident,
}

#[derive(Debug, Clone)]
pub struct CallExp {
    pub id: ExpId,
    pub callee: IdExp,
    pub args: Vec<Exp>,
}

#[derive(Debug, Clone)]
pub struct AssignExp {
    pub id: ExpId,
    pub lhs: Loc,
    pub rhs: Box<Exp>,
}

#[derive(Debug, Clone)]
pub enum Exp {
    IntLit {
        id: ExpId,
        pos: Pos,
        value: i32,
    },
    /// The value keeps the source escape sequences (`\n` stays two
    /// characters); they pass through to `.asciiz` untouched.
    StrLit {
        id: ExpId,
        pos: Pos,
        value: String,
    },
    True {
        id: ExpId,
        pos: Pos,
    },
    False {
        id: ExpId,
        pos: Pos,
    },
    Loc(Loc),
    Assign(AssignExp),
    Call(CallExp),
    Unary {
        id: ExpId,
        pos: Pos,
        op: UnaryOp,
        operand: Box<Exp>,
    },
    Binary {
        id: ExpId,
        pos: Pos,
        op: BinaryOp,
        lhs: Box<Exp>,
        rhs: Box<Exp>,
    },
}

impl Exp {
    pub fn id(&self) -> ExpId {
        match self {
            Exp::IntLit { id, .. }
            | Exp::StrLit { id, .. }
            | Exp::True { id, .. }
            | Exp::False { id, .. }
            | Exp::Unary { id, .. }
            | Exp::Binary { id, .. } => *id,
            Exp::Loc(loc) => loc.id(),
            Exp::Assign(a) => a.id,
            Exp::Call(c) => c.id,
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Exp::IntLit { pos, .. }
            | Exp::StrLit { pos, .. }
            | Exp::True { pos, .. }
            | Exp::False { pos, .. }
            | Exp::Unary { pos, .. }
            | Exp::Binary { pos, .. } => *pos,
            Exp::Loc(loc) => loc.pos(),
            Exp::Assign(a) => a.lhs.pos(),
            Exp::Call(c) => c.callee.pos,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-e`
    Neg,
    /// `!e`
    Not,
}

impl UnaryOp {
    pub fn token(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/// Operator family, used by the type checker to pick the rule and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Arith,
    Logical,
    Equality,
    Relational,
}

impl BinaryOp {
    pub fn kind(self) -> OpKind {
        match self {
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Times | BinaryOp::Divide => OpKind::Arith,
            BinaryOp::And | BinaryOp::Or => OpKind::Logical,
            BinaryOp::Eq | BinaryOp::Ne => OpKind::Equality,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => OpKind::Relational,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
        }
    }
}
