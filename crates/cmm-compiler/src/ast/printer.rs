//! Pretty-printing ("unparse") of the AST back to source form.
//!
//! Plain mode reproduces the program with canonical indentation. Annotated
//! mode additionally tags every resolved identifier use with its type —
//! `x(int)`, `f(int,int->void)` — which is the name-resolution report the
//! CLI exposes.

use super::{
    AssignExp, Block, CallExp, Decl, Exp, FnDecl, Loc, Program, Stmt, StructDecl, TypeSpec,
    UnaryOp, VarDecl,
};
use crate::analyze::{Resolutions, SymKind, Symbols};

pub fn unparse(program: &Program) -> String {
    Printer {
        out: String::new(),
        ann: None,
        indent: 0,
    }
    .run(program)
}

pub fn unparse_annotated(program: &Program, symbols: &Symbols, res: &Resolutions) -> String {
    Printer {
        out: String::new(),
        ann: Some((symbols, res)),
        indent: 0,
    }
    .run(program)
}

struct Printer<'a> {
    out: String,
    ann: Option<(&'a Symbols, &'a Resolutions)>,
    indent: usize,
}

impl Printer<'_> {
    fn run(mut self, program: &Program) -> String {
        for decl in &program.decls {
            match decl {
                Decl::Var(v) => self.var_decl(v),
                Decl::Fn(f) => self.fn_decl(f),
                Decl::Struct(s) => self.struct_decl(s),
            }
        }
        self.out
    }

    fn pad(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }

    fn type_spec(&mut self, spec: &TypeSpec) {
        let text = match spec {
            TypeSpec::Int(_) => "int".to_string(),
            TypeSpec::Bool(_) => "bool".to_string(),
            TypeSpec::Void(_) => "void".to_string(),
            TypeSpec::Struct(id) => format!("struct {}", id.name),
        };
        self.out.push_str(&text);
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        self.pad();
        self.type_spec(&decl.ty);
        self.out.push(' ');
        self.out.push_str(&decl.name.name);
        self.out.push_str(";\n");
    }

    fn struct_decl(&mut self, decl: &StructDecl) {
        self.pad();
        self.out.push_str("struct ");
        self.out.push_str(&decl.name.name);
        self.out.push_str(" {\n");
        self.indent += 1;
        for field in &decl.fields {
            self.var_decl(field);
        }
        self.indent -= 1;
        self.pad();
        self.out.push_str("};\n");
    }

    fn fn_decl(&mut self, decl: &FnDecl) {
        self.pad();
        self.type_spec(&decl.ret);
        self.out.push(' ');
        self.out.push_str(&decl.name.name);
        self.out.push('(');
        for (i, formal) in decl.formals.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.type_spec(&formal.ty);
            self.out.push(' ');
            self.out.push_str(&formal.name.name);
        }
        self.out.push_str(") ");
        self.block(&decl.body);
    }

    fn block(&mut self, block: &Block) {
        self.out.push_str("{\n");
        self.indent += 1;
        for var in &block.decls {
            self.var_decl(var);
        }
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.pad();
        self.out.push_str("}\n");
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.pad();
        match stmt {
            Stmt::Assign(assign) => {
                self.loc(&assign.lhs);
                self.out.push_str(" = ");
                self.exp(&assign.rhs);
                self.out.push_str(";\n");
            }
            Stmt::Increment(loc) => {
                self.loc(loc);
                self.out.push_str("++;\n");
            }
            Stmt::Decrement(loc) => {
                self.loc(loc);
                self.out.push_str("--;\n");
            }
            Stmt::Read(loc) => {
                self.out.push_str("cin >> ");
                self.loc(loc);
                self.out.push_str(";\n");
            }
            Stmt::Write(exp) => {
                self.out.push_str("cout << ");
                self.exp(exp);
                self.out.push_str(";\n");
            }
            Stmt::If(cond, body) => {
                self.out.push_str("if (");
                self.exp(cond);
                self.out.push_str(") ");
                self.block(body);
            }
            Stmt::IfElse(cond, then_block, else_block) => {
                self.out.push_str("if (");
                self.exp(cond);
                self.out.push_str(") ");
                self.block_inline(then_block);
                self.out.push_str(" else ");
                self.block(else_block);
            }
            Stmt::While(cond, body) => {
                self.out.push_str("while (");
                self.exp(cond);
                self.out.push_str(") ");
                self.block(body);
            }
            Stmt::Repeat(count, body) => {
                self.out.push_str("repeat (");
                self.exp(count);
                self.out.push_str(") ");
                self.block(body);
            }
            Stmt::Call(call) => {
                self.call(call);
                self.out.push_str(";\n");
            }
            Stmt::Return(value, _) => {
                self.out.push_str("return");
                if let Some(exp) = value {
                    self.out.push(' ');
                    self.exp(exp);
                }
                self.out.push_str(";\n");
            }
        }
    }

    /// A block whose closing brace is not followed by a newline (the
    /// `} else {` join).
    fn block_inline(&mut self, block: &Block) {
        self.block(block);
        // Drop the newline the block just wrote.
        self.out.pop();
    }

    fn exp(&mut self, exp: &Exp) {
        match exp {
            Exp::IntLit { value, .. } => {
                self.out.push_str(&value.to_string());
            }
            Exp::StrLit { value, .. } => {
                self.out.push('"');
                self.out.push_str(value);
                self.out.push('"');
            }
            Exp::True { .. } => self.out.push_str("true"),
            Exp::False { .. } => self.out.push_str("false"),
            Exp::Loc(loc) => self.loc(loc),
            Exp::Assign(assign) => self.assign(assign),
            Exp::Call(call) => self.call(call),
            Exp::Unary { op, operand, .. } => {
                self.out.push('(');
                self.out.push_str(match op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Not => "!",
                });
                self.exp(operand);
                self.out.push(')');
            }
            Exp::Binary { op, lhs, rhs, .. } => {
                self.out.push('(');
                self.exp(lhs);
                self.out.push(' ');
                self.out.push_str(op.token());
                self.out.push(' ');
                self.exp(rhs);
                self.out.push(')');
            }
        }
    }

    fn assign(&mut self, assign: &AssignExp) {
        self.out.push('(');
        self.loc(&assign.lhs);
        self.out.push_str(" = ");
        self.exp(&assign.rhs);
        self.out.push(')');
    }

    fn call(&mut self, call: &CallExp) {
        self.out.push_str(&call.callee.name);
        self.annotate(call.callee.id);
        self.out.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.exp(arg);
        }
        self.out.push(')');
    }

    fn loc(&mut self, loc: &Loc) {
        match loc {
            Loc::Id(id) => {
                self.out.push_str(&id.name);
                self.annotate(id.id);
            }
            Loc::Dot(dot) => {
                self.loc(&dot.base);
                self.out.push('.');
                self.out.push_str(&dot.field.name);
                self.annotate(dot.id);
            }
        }
    }

    /// In annotated mode, append `(type)` after a resolved use.
    fn annotate(&mut self, id: super::ExpId) {
        let Some((symbols, res)) = self.ann else {
            return;
        };
        let Some(sym) = res.use_of(id) else {
            return;
        };
        let symbol = symbols.get(sym);
        match &symbol.kind {
            SymKind::Fn(data) => {
                let params: Vec<String> = data.params.iter().map(|t| t.to_string()).collect();
                self.out
                    .push_str(&format!("({}->{})", params.join(","), data.ret));
            }
            _ => {
                self.out.push_str(&format!("({})", symbol.ty));
            }
        }
    }
}
