//! MIPS assembly emission.
//!
//! A strict stack machine: every expression leaves exactly one word on top
//! of `$sp`, binary operators pop right into `$t1` and left into `$t0`, and
//! statements are stack-neutral. The listing is assembled at the end so the
//! `.data` section (globals, then interned strings) precedes `.text` even
//! though strings are discovered during body emission.

use std::fmt::Write;

use super::strings::{LabelAlloc, StringTable};
use crate::analyze::{ExpTypes, Resolutions, Symbols, Ty};
use crate::ast::{
    AssignExp, BinaryOp, Block, CallExp, Decl, Exp, FnDecl, Loc, Program, Stmt, UnaryOp,
};

pub fn generate(
    program: &Program,
    symbols: &Symbols,
    resolutions: &Resolutions,
    types: &ExpTypes,
) -> String {
    let emitter = Emitter {
        symbols,
        res: resolutions,
        types,
        text: String::new(),
        strings: StringTable::new(),
        labels: LabelAlloc::new(),
        globals: Vec::new(),
    };
    emitter.run(program)
}

/// Per-function facts the statement walk needs for `return`.
#[derive(Clone, Copy)]
struct FnCtx {
    size_params: i32,
    is_main: bool,
}

struct Emitter<'a> {
    symbols: &'a Symbols,
    res: &'a Resolutions,
    types: &'a ExpTypes,
    text: String,
    strings: StringTable,
    labels: LabelAlloc,
    /// Global labels and their `.space` sizes, in declaration order.
    globals: Vec<(String, i32)>,
}

impl Emitter<'_> {
    fn run(mut self, program: &Program) -> String {
        for decl in &program.decls {
            match decl {
                Decl::Var(var) => {
                    if let Some(sym) = self.res.decl_of(var.id) {
                        let size = self.symbols.size_of(sym);
                        self.globals
                            .push((format!("_{}", self.symbols.get(sym).name), size));
                    }
                }
                Decl::Fn(f) => self.function(f),
                Decl::Struct(_) => {}
            }
        }

        let mut out = String::new();
        out.push_str("\t.data\n");
        for (label, size) in &self.globals {
            let _ = writeln!(out, "{label}:\t.space {size}");
        }
        for (content, label) in self.strings.iter() {
            let _ = writeln!(out, "{label}:\t.asciiz \"{content}\"");
        }
        out.push_str(&self.text);
        out
    }

    // ---- low-level helpers ----

    fn ins(&mut self, op: &str, args: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.text, "\t{op}\t{args}");
    }

    fn ins0(&mut self, op: &str) {
        let _ = writeln!(self.text, "\t{op}");
    }

    fn raw(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn label(&mut self, label: &str) {
        let _ = writeln!(self.text, "{label}:");
    }

    fn push(&mut self, reg: &str) {
        self.ins("sw", format_args!("{reg}, 0($sp)"));
        self.ins("subu", format_args!("$sp, $sp, 4"));
    }

    fn pop(&mut self, reg: &str) {
        self.ins("lw", format_args!("{reg}, 4($sp)"));
        self.ins("addu", format_args!("$sp, $sp, 4"));
    }

    fn fn_label(name: &str) -> String {
        if name == "main" {
            name.to_string()
        } else {
            format!("_{name}")
        }
    }

    // ---- functions ----

    fn function(&mut self, decl: &FnDecl) {
        let Some(sym) = self.res.decl_of(decl.id) else {
            return;
        };
        let Some(data) = self.symbols.fn_data(sym) else {
            return;
        };
        let ctx = FnCtx {
            size_params: data.size_params,
            is_main: decl.name.name == "main",
        };
        let size_locals = data.size_locals;

        self.raw("\t.text");
        if ctx.is_main {
            self.raw("\t.globl\tmain");
        }
        let label = Self::fn_label(&decl.name.name);
        self.label(&label);

        self.raw("\t# FUNCTION ENTRY");
        self.push("$ra");
        self.push("$fp");
        self.ins("addu", format_args!("$fp, $sp, {}", ctx.size_params + 8));
        self.ins("subu", format_args!("$sp, $sp, {size_locals}"));

        self.block(&decl.body, ctx);

        // Fall-through exit for functions without a trailing return.
        self.epilogue(ctx);
    }

    fn epilogue(&mut self, ctx: FnCtx) {
        self.raw("\t# FUNCTION EXIT");
        self.ins("lw", format_args!("$ra, {}($fp)", -ctx.size_params));
        self.ins("move", format_args!("$t0, $fp"));
        self.ins("lw", format_args!("$fp, {}($t0)", -(ctx.size_params + 4)));
        self.ins("subu", format_args!("$sp, $t0, {}", ctx.size_params));
        if ctx.is_main {
            self.ins("li", format_args!("$v0, 10"));
            self.ins0("syscall");
        } else {
            self.ins("jr", format_args!("$ra"));
        }
    }

    // ---- statements ----

    fn block(&mut self, block: &Block, ctx: FnCtx) {
        for stmt in &block.stmts {
            self.stmt(stmt, ctx);
        }
    }

    fn stmt(&mut self, stmt: &Stmt, ctx: FnCtx) {
        match stmt {
            Stmt::Assign(assign) => {
                self.assign(assign);
                // Statement context discards the value.
                self.ins("addu", format_args!("$sp, $sp, 4"));
            }
            Stmt::Increment(loc) => self.bump_loc(loc, "add"),
            Stmt::Decrement(loc) => self.bump_loc(loc, "sub"),
            Stmt::Read(loc) => {
                self.loc_addr(loc);
                self.ins("li", format_args!("$v0, 5"));
                self.ins0("syscall");
                self.pop("$t0");
                self.ins("sw", format_args!("$v0, 0($t0)"));
            }
            Stmt::Write(exp) => {
                self.exp(exp);
                self.pop("$a0");
                let code = if self.types.of(exp.id()) == &Ty::Str {
                    4
                } else {
                    1
                };
                self.ins("li", format_args!("$v0, {code}"));
                self.ins0("syscall");
            }
            Stmt::If(cond, body) => {
                self.exp(cond);
                self.pop("$t0");
                let end = self.labels.fresh();
                self.ins("beq", format_args!("$t0, $zero, {end}"));
                self.block(body, ctx);
                self.label(&end);
            }
            Stmt::IfElse(cond, then_block, else_block) => {
                self.exp(cond);
                self.pop("$t0");
                let else_label = self.labels.fresh();
                self.ins("beq", format_args!("$t0, $zero, {else_label}"));
                self.block(then_block, ctx);
                let end = self.labels.fresh();
                self.ins("j", format_args!("{end}"));
                self.label(&else_label);
                self.block(else_block, ctx);
                self.label(&end);
            }
            Stmt::While(cond, body) => {
                let top = self.labels.fresh();
                self.label(&top);
                self.exp(cond);
                self.pop("$t0");
                let end = self.labels.fresh();
                self.ins("beq", format_args!("$t0, $zero, {end}"));
                self.block(body, ctx);
                self.ins("j", format_args!("{top}"));
                self.label(&end);
            }
            Stmt::Repeat(count, body) => {
                // The count lives in a dedicated stack slot for the whole
                // loop; the body is stack-neutral, so 4($sp) stays ours.
                self.exp(count);
                let top = self.labels.fresh();
                self.label(&top);
                self.ins("lw", format_args!("$t0, 4($sp)"));
                let end = self.labels.fresh();
                self.ins("beq", format_args!("$t0, $zero, {end}"));
                self.block(body, ctx);
                self.ins("lw", format_args!("$t0, 4($sp)"));
                self.ins("sub", format_args!("$t0, $t0, 1"));
                self.ins("sw", format_args!("$t0, 4($sp)"));
                self.ins("j", format_args!("{top}"));
                self.label(&end);
                self.ins("addu", format_args!("$sp, $sp, 4"));
            }
            Stmt::Call(call) => {
                self.call(call);
                if self.call_ret(call).is_some_and(|ty| !ty.is_void()) {
                    self.ins("addu", format_args!("$sp, $sp, 4"));
                }
            }
            Stmt::Return(value, _) => {
                if let Some(exp) = value {
                    self.exp(exp);
                    self.pop("$v0");
                }
                self.epilogue(ctx);
            }
        }
    }

    /// `loc++` / `loc--`.
    fn bump_loc(&mut self, loc: &Loc, op: &str) {
        self.loc_addr(loc);
        self.pop("$t0");
        self.ins("lw", format_args!("$t1, 0($t0)"));
        self.ins(op, format_args!("$t1, $t1, 1"));
        self.ins("sw", format_args!("$t1, 0($t0)"));
    }

    // ---- expressions ----

    fn exp(&mut self, exp: &Exp) {
        match exp {
            Exp::IntLit { value, .. } => {
                self.ins("li", format_args!("$t0, {value}"));
                self.push("$t0");
            }
            Exp::True { .. } => {
                self.ins("li", format_args!("$t0, 1"));
                self.push("$t0");
            }
            Exp::False { .. } => {
                self.ins("li", format_args!("$t0, 0"));
                self.push("$t0");
            }
            Exp::StrLit { value, .. } => {
                let label = self.strings.get_or_intern(value, &mut self.labels);
                self.ins("la", format_args!("$t0, {label}"));
                self.push("$t0");
            }
            Exp::Loc(loc) => self.loc_value(loc),
            Exp::Assign(assign) => self.assign(assign),
            Exp::Call(call) => self.call(call),
            Exp::Unary { op, operand, .. } => {
                self.exp(operand);
                self.pop("$t0");
                match op {
                    UnaryOp::Neg => self.ins("neg", format_args!("$t0, $t0")),
                    UnaryOp::Not => self.ins("xori", format_args!("$t0, $t0, 1")),
                }
                self.push("$t0");
            }
            Exp::Binary { op, lhs, rhs, .. } => match op {
                BinaryOp::And => self.short_circuit(lhs, rhs, true),
                BinaryOp::Or => self.short_circuit(lhs, rhs, false),
                _ => {
                    self.exp(lhs);
                    self.exp(rhs);
                    self.pop("$t1");
                    self.pop("$t0");
                    self.ins(binary_mnemonic(*op), format_args!("$t0, $t0, $t1"));
                    self.push("$t0");
                }
            },
        }
    }

    /// `&&` and `||`: when the left operand already decides the result,
    /// jump over the right operand and push the decided literal.
    fn short_circuit(&mut self, lhs: &Exp, rhs: &Exp, is_and: bool) {
        self.exp(lhs);
        self.pop("$t0");
        let shortcut = self.labels.fresh();
        let branch = if is_and { "beq" } else { "bne" };
        self.ins(branch, format_args!("$t0, $zero, {shortcut}"));
        self.exp(rhs);
        let end = self.labels.fresh();
        self.ins("j", format_args!("{end}"));
        self.label(&shortcut);
        self.ins("li", format_args!("$t0, {}", if is_and { 0 } else { 1 }));
        self.push("$t0");
        self.label(&end);
    }

    /// Address of the left-hand side first, then the value; store and leave
    /// the value on the stack for expression contexts.
    fn assign(&mut self, assign: &AssignExp) {
        self.loc_addr(&assign.lhs);
        self.exp(&assign.rhs);
        self.pop("$t1");
        self.pop("$t0");
        self.ins("sw", format_args!("$t1, 0($t0)"));
        self.push("$t1");
    }

    fn call(&mut self, call: &CallExp) {
        for arg in &call.args {
            self.exp(arg);
        }
        self.ins(
            "jal",
            format_args!("{}", Self::fn_label(&call.callee.name)),
        );
        if !call.args.is_empty() {
            self.ins("addu", format_args!("$sp, $sp, {}", 4 * call.args.len()));
        }
        if self.call_ret(call).is_some_and(|ty| !ty.is_void()) {
            self.push("$v0");
        }
    }

    fn call_ret(&self, call: &CallExp) -> Option<&Ty> {
        let sym = self.res.use_of(call.callee.id)?;
        Some(&self.symbols.fn_data(sym)?.ret)
    }

    fn loc_value(&mut self, loc: &Loc) {
        match loc {
            Loc::Id(id) => {
                let Some(sym) = self.res.use_of(id.id) else {
                    return;
                };
                let symbol = self.symbols.get(sym);
                if symbol.is_global {
                    self.ins("lw", format_args!("$t0, _{}", symbol.name));
                } else {
                    self.ins("lw", format_args!("$t0, {}($fp)", symbol.offset));
                }
                self.push("$t0");
            }
            Loc::Dot(_) => {
                self.loc_addr(loc);
                self.pop("$t0");
                self.ins("lw", format_args!("$t0, 0($t0)"));
                self.push("$t0");
            }
        }
    }

    /// Pushes the address of a location: data-segment label for globals,
    /// `$fp`-relative slot for locals, base plus field offset for
    /// dot-access.
    fn loc_addr(&mut self, loc: &Loc) {
        match loc {
            Loc::Id(id) => {
                let Some(sym) = self.res.use_of(id.id) else {
                    return;
                };
                let symbol = self.symbols.get(sym);
                if symbol.is_global {
                    self.ins("la", format_args!("$t0, _{}", symbol.name));
                } else {
                    self.ins("la", format_args!("$t0, {}($fp)", symbol.offset));
                }
                self.push("$t0");
            }
            Loc::Dot(dot) => {
                self.loc_addr(&dot.base);
                let Some(field) = self.res.use_of(dot.id) else {
                    return;
                };
                let offset = self.symbols.get(field).offset;
                self.pop("$t0");
                self.ins("addu", format_args!("$t0, $t0, {offset}"));
                self.push("$t0");
            }
        }
    }
}

fn binary_mnemonic(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Plus => "add",
        BinaryOp::Minus => "sub",
        BinaryOp::Times => "mul",
        BinaryOp::Divide => "div",
        BinaryOp::Lt => "slt",
        BinaryOp::Gt => "sgt",
        BinaryOp::Le => "sle",
        BinaryOp::Ge => "sge",
        BinaryOp::Eq => "seq",
        BinaryOp::Ne => "sne",
        BinaryOp::And | BinaryOp::Or => unreachable!("short-circuit ops have no mnemonic"),
    }
}
