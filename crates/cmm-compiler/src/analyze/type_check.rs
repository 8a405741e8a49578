//! Type checking: the second walk over function bodies.
//!
//! Every expression gets a computed type, recorded by `ExpId`. Once an
//! operand has been diagnosed its type is `Error`, and `Error` operands
//! never produce further messages, so each original mistake yields exactly
//! one line. The walk never stops early: every error in the program is
//! surfaced in a single run.

use super::resolve::Resolutions;
use super::symbol_table::{SymId, SymKind, Symbols};
use super::types::Ty;
use crate::ast::{
    AssignExp, Block, CallExp, Decl, Exp, ExpId, FnDecl, Loc, OpKind, Pos, Program, Stmt, UnaryOp,
};
use crate::diagnostics::Diagnostics;

const ARITH_OPD: &str = "Arithmetic operator applied to non-numeric operand";
const LOGICAL_OPD: &str = "Logical operator applied to non-bool operand";
const RELATIONAL_OPD: &str = "Relational operator applied to non-numeric operand";
const TYPE_MISMATCH: &str = "Type mismatch";
const EQ_FN: &str = "Equality operator applied to functions";
const EQ_VOID_FN: &str = "Equality operator applied to void functions";
const EQ_STRUCT_NAME: &str = "Equality operator applied to struct names";
const EQ_STRUCT_VAR: &str = "Equality operator applied to struct variables";
const ASSIGN_FN: &str = "Function assignment";
const ASSIGN_STRUCT_NAME: &str = "Struct name assignment";
const ASSIGN_STRUCT_VAR: &str = "Struct variable assignment";
const READ_FN: &str = "Attempt to read a function";
const READ_STRUCT_NAME: &str = "Attempt to read a struct name";
const READ_STRUCT_VAR: &str = "Attempt to read a struct variable";
const WRITE_FN: &str = "Attempt to write a function";
const WRITE_VOID: &str = "Attempt to write void";
const WRITE_STRUCT_NAME: &str = "Attempt to write a struct name";
const WRITE_STRUCT_VAR: &str = "Attempt to write a struct variable";
const CALL_NON_FN: &str = "Attempt to call a non-function";
const CALL_BAD_ARITY: &str = "Function call with wrong number of args";
const CALL_BAD_ACTUAL: &str = "Type of actual does not match type of formal";
const RETURN_MISSING: &str = "Missing return value";
const RETURN_IN_VOID: &str = "Return with a value in a void function";
const RETURN_BAD: &str = "Bad return value";
const COND_IF: &str = "Non-bool expression used as an if condition";
const COND_WHILE: &str = "Non-bool expression used as a while condition";
const REPEAT_CLAUSE: &str = "Non-integer expression used as a repeat clause";

/// Computed type of every expression node, keyed by [`ExpId`].
#[derive(Debug, Clone)]
pub struct ExpTypes {
    tys: Vec<Ty>,
}

impl ExpTypes {
    pub fn of(&self, id: ExpId) -> &Ty {
        &self.tys[id.index()]
    }

    pub fn error_count(&self) -> usize {
        self.tys.iter().filter(|t| t.is_error()).count()
    }
}

pub fn check(
    program: &Program,
    symbols: &Symbols,
    resolutions: &Resolutions,
    diag: &mut Diagnostics,
) -> ExpTypes {
    let mut checker = Checker {
        symbols,
        res: resolutions,
        diag,
        tys: vec![Ty::Error; program.num_exps as usize],
    };
    for decl in &program.decls {
        if let Decl::Fn(f) = decl {
            checker.fn_body(f);
        }
    }
    ExpTypes { tys: checker.tys }
}

struct Checker<'a> {
    symbols: &'a Symbols,
    res: &'a Resolutions,
    diag: &'a mut Diagnostics,
    tys: Vec<Ty>,
}

impl Checker<'_> {
    fn fn_body(&mut self, decl: &FnDecl) {
        let ret = Ty::of_spec(&decl.ret);
        self.block(&decl.body, &ret);
    }

    fn block(&mut self, block: &Block, ret: &Ty) {
        for stmt in &block.stmts {
            self.stmt(stmt, ret);
        }
    }

    fn stmt(&mut self, stmt: &Stmt, ret: &Ty) {
        match stmt {
            Stmt::Assign(assign) => {
                self.assign(assign);
            }
            Stmt::Increment(loc) | Stmt::Decrement(loc) => {
                let ty = self.loc(loc);
                if !ty.is_error() && !ty.is_int() {
                    self.diag.error(ARITH_OPD, loc.pos()).emit();
                }
            }
            Stmt::Read(loc) => {
                let ty = self.loc(loc);
                if ty.is_fn() {
                    self.diag.error(READ_FN, loc.pos()).emit();
                } else if ty.is_struct_def() {
                    self.diag.error(READ_STRUCT_NAME, loc.pos()).emit();
                } else if ty.is_struct() {
                    self.diag.error(READ_STRUCT_VAR, loc.pos()).emit();
                }
            }
            Stmt::Write(exp) => {
                let ty = self.exp(exp);
                if ty.is_fn() {
                    self.diag.error(WRITE_FN, exp.pos()).emit();
                } else if ty.is_struct_def() {
                    self.diag.error(WRITE_STRUCT_NAME, exp.pos()).emit();
                } else if ty.is_struct() {
                    self.diag.error(WRITE_STRUCT_VAR, exp.pos()).emit();
                } else if ty.is_void() {
                    self.diag.error(WRITE_VOID, exp.pos()).emit();
                }
            }
            Stmt::If(cond, body) => {
                self.condition(cond, COND_IF);
                self.block(body, ret);
            }
            Stmt::IfElse(cond, then_block, else_block) => {
                self.condition(cond, COND_IF);
                self.block(then_block, ret);
                self.block(else_block, ret);
            }
            Stmt::While(cond, body) => {
                self.condition(cond, COND_WHILE);
                self.block(body, ret);
            }
            Stmt::Repeat(count, body) => {
                let ty = self.exp(count);
                if !ty.is_error() && !ty.is_int() {
                    self.diag.error(REPEAT_CLAUSE, count.pos()).emit();
                }
                self.block(body, ret);
            }
            Stmt::Call(call) => {
                self.call(call);
            }
            Stmt::Return(value, pos) => self.return_stmt(value.as_ref(), *pos, ret),
        }
    }

    fn condition(&mut self, cond: &Exp, message: &str) {
        let ty = self.exp(cond);
        if !ty.is_error() && !ty.is_bool() {
            self.diag.error(message, cond.pos()).emit();
        }
    }

    fn return_stmt(&mut self, value: Option<&Exp>, pos: Pos, ret: &Ty) {
        match value {
            None => {
                if !ret.is_void() {
                    self.diag.error(RETURN_MISSING, pos).emit();
                }
            }
            Some(exp) => {
                let ty = self.exp(exp);
                if ret.is_void() {
                    self.diag.error(RETURN_IN_VOID, exp.pos()).emit();
                } else if !ty.is_error() && !ty.same(ret) {
                    self.diag.error(RETURN_BAD, exp.pos()).emit();
                }
            }
        }
    }

    // ---- expressions ----

    fn set(&mut self, id: ExpId, ty: Ty) -> Ty {
        self.tys[id.index()] = ty.clone();
        ty
    }

    fn exp(&mut self, exp: &Exp) -> Ty {
        match exp {
            Exp::IntLit { id, .. } => self.set(*id, Ty::Int),
            Exp::StrLit { id, .. } => self.set(*id, Ty::Str),
            Exp::True { id, .. } | Exp::False { id, .. } => self.set(*id, Ty::Bool),
            Exp::Loc(loc) => self.loc(loc),
            Exp::Assign(assign) => self.assign(assign),
            Exp::Call(call) => self.call(call),
            Exp::Unary {
                id,
                op,
                operand,
                ..
            } => {
                let ty = self.exp(operand);
                let (want_int, message) = match op {
                    UnaryOp::Neg => (true, ARITH_OPD),
                    UnaryOp::Not => (false, LOGICAL_OPD),
                };
                if ty.is_error() {
                    return self.set(*id, Ty::Error);
                }
                let ok = if want_int { ty.is_int() } else { ty.is_bool() };
                if !ok {
                    self.diag.error(message, operand.pos()).emit();
                    return self.set(*id, Ty::Error);
                }
                self.set(*id, ty)
            }
            Exp::Binary {
                id,
                pos,
                op,
                lhs,
                rhs,
            } => {
                let lt = self.exp(lhs);
                let rt = self.exp(rhs);
                let ty = match op.kind() {
                    OpKind::Arith => {
                        self.operand_pair(&lt, lhs, &rt, rhs, Ty::is_int, ARITH_OPD, Ty::Int)
                    }
                    OpKind::Logical => {
                        self.operand_pair(&lt, lhs, &rt, rhs, Ty::is_bool, LOGICAL_OPD, Ty::Bool)
                    }
                    OpKind::Relational => {
                        self.operand_pair(&lt, lhs, &rt, rhs, Ty::is_int, RELATIONAL_OPD, Ty::Bool)
                    }
                    OpKind::Equality => self.equality(&lt, &rt, *pos),
                };
                self.set(*id, ty)
            }
        }
    }

    /// Shared rule for the operand-typed binary operators: each bad operand
    /// gets its own message, then the node types `Error`.
    #[allow(clippy::too_many_arguments)]
    fn operand_pair(
        &mut self,
        lt: &Ty,
        lhs: &Exp,
        rt: &Ty,
        rhs: &Exp,
        ok: fn(&Ty) -> bool,
        message: &str,
        result: Ty,
    ) -> Ty {
        let mut bad = false;
        if !lt.is_error() && !ok(lt) {
            self.diag.error(message, lhs.pos()).emit();
            bad = true;
        }
        if !rt.is_error() && !ok(rt) {
            self.diag.error(message, rhs.pos()).emit();
            bad = true;
        }
        if bad || lt.is_error() || rt.is_error() {
            Ty::Error
        } else {
            result
        }
    }

    fn equality(&mut self, lt: &Ty, rt: &Ty, pos: Pos) -> Ty {
        if lt.is_error() || rt.is_error() {
            return Ty::Error;
        }
        if lt.is_void() && rt.is_void() {
            self.diag.error(EQ_VOID_FN, pos).emit();
            return Ty::Error;
        }
        if lt.is_fn() && rt.is_fn() {
            self.diag.error(EQ_FN, pos).emit();
            return Ty::Error;
        }
        if lt.is_struct_def() && rt.is_struct_def() {
            self.diag.error(EQ_STRUCT_NAME, pos).emit();
            return Ty::Error;
        }
        if lt.is_struct() && rt.is_struct() {
            self.diag.error(EQ_STRUCT_VAR, pos).emit();
            return Ty::Error;
        }
        if !lt.same(rt) {
            self.diag.error(TYPE_MISMATCH, pos).emit();
            return Ty::Error;
        }
        Ty::Bool
    }

    fn assign(&mut self, assign: &AssignExp) -> Ty {
        let lt = self.loc(&assign.lhs);
        let rt = self.exp(&assign.rhs);
        let pos = assign.lhs.pos();

        let ty = if lt.is_error() || rt.is_error() {
            Ty::Error
        } else if lt.is_fn() && rt.is_fn() {
            self.diag.error(ASSIGN_FN, pos).emit();
            Ty::Error
        } else if lt.is_struct_def() && rt.is_struct_def() {
            self.diag.error(ASSIGN_STRUCT_NAME, pos).emit();
            Ty::Error
        } else if lt.is_struct() && rt.is_struct() {
            self.diag.error(ASSIGN_STRUCT_VAR, pos).emit();
            Ty::Error
        } else if !lt.same(&rt) {
            self.diag.error(TYPE_MISMATCH, pos).emit();
            Ty::Error
        } else {
            lt
        };
        self.set(assign.id, ty)
    }

    fn call(&mut self, call: &CallExp) -> Ty {
        let Some(sym) = self.res.use_of(call.callee.id) else {
            // Undeclared; resolution already reported it.
            return self.set(call.id, Ty::Error);
        };
        self.set(call.callee.id, self.symbols.get(sym).ty.clone());

        let Some(data) = self.symbols.fn_data(sym) else {
            self.diag.error(CALL_NON_FN, call.callee.pos).emit();
            return self.set(call.id, Ty::Error);
        };
        let ret = data.ret.clone();
        let params = data.params.clone();

        if call.args.len() != params.len() {
            self.diag.error(CALL_BAD_ARITY, call.callee.pos).emit();
            return self.set(call.id, ret);
        }

        for (arg, formal) in call.args.iter().zip(&params) {
            let ty = self.exp(arg);
            if !ty.is_error() && !ty.same(formal) {
                self.diag.error(CALL_BAD_ACTUAL, arg.pos()).emit();
            }
        }
        self.set(call.id, ret)
    }

    fn loc(&mut self, loc: &Loc) -> Ty {
        // Type the whole chain; a dot-access node gets its field's type.
        if let Loc::Dot(dot) = loc {
            self.loc(&dot.base);
        }
        let ty = match self.res.use_of(loc.id()) {
            Some(sym) => self.loc_sym_ty(sym),
            None => Ty::Error,
        };
        self.set(loc.id(), ty)
    }

    fn loc_sym_ty(&self, sym: SymId) -> Ty {
        let symbol = self.symbols.get(sym);
        match symbol.kind {
            SymKind::Var | SymKind::StructVar { .. } => symbol.ty.clone(),
            SymKind::Fn(_) => Ty::Fn,
            SymKind::StructDef { .. } => symbol.ty.clone(),
        }
    }
}
