//! Name resolution: a single depth-first walk that builds the symbol
//! tables and links every identifier occurrence to its entry.
//!
//! Diagnostics never stop the walk. A declaration that fails a check is
//! simply not entered in the table; later uses of it then report
//! "Undeclared identifier" on their own.

use indexmap::IndexMap;

use super::symbol_table::{
    FieldTable, FieldsId, ScopeError, SymId, SymKind, Symbol, SymbolTable, Symbols,
};
use super::types::Ty;
use crate::ast::{
    Block, CallExp, Decl, DeclId, Exp, ExpId, FnDecl, FormalDecl, Loc, Program, Stmt, StructDecl,
    TypeSpec, VarDecl,
};
use crate::diagnostics::Diagnostics;

const MULTIPLY_DECLARED: &str = "Multiply declared identifier";
const UNDECLARED: &str = "Undeclared identifier";
const NON_FN_VOID: &str = "Non-function declared void";
const BAD_STRUCT_TYPE: &str = "Invalid name of struct type";
const BAD_FIELD: &str = "Invalid struct field name";
const DOT_NON_STRUCT: &str = "Dot-access of non-struct type";

/// Links from AST handles to symbol entries, filled by [`resolve`].
#[derive(Debug, Clone)]
pub struct Resolutions {
    uses: Vec<Option<SymId>>,
    decls: Vec<Option<SymId>>,
}

impl Resolutions {
    fn new(num_exps: u32, num_decls: u32) -> Self {
        Self {
            uses: vec![None; num_exps as usize],
            decls: vec![None; num_decls as usize],
        }
    }

    /// Entry linked to an identifier or dot-access use site.
    pub fn use_of(&self, id: ExpId) -> Option<SymId> {
        self.uses[id.index()]
    }

    /// Entry created for a declaration.
    pub fn decl_of(&self, id: DeclId) -> Option<SymId> {
        self.decls[id.index()]
    }

    fn set_use(&mut self, id: ExpId, sym: SymId) {
        self.uses[id.index()] = Some(sym);
    }

    fn set_decl(&mut self, id: DeclId, sym: SymId) {
        self.decls[id.index()] = Some(sym);
    }
}

/// Output of name resolution. The scope stack is kept (global frame only
/// remains open) for the symbol dump.
#[derive(Debug)]
pub struct Resolved {
    pub symbols: Symbols,
    pub table: SymbolTable,
    pub resolutions: Resolutions,
}

pub fn resolve(program: &Program, diag: &mut Diagnostics) -> Result<Resolved, ScopeError> {
    let mut resolver = Resolver {
        symbols: Symbols::new(),
        table: SymbolTable::new(),
        res: Resolutions::new(program.num_exps, program.num_decls),
        diag,
    };
    resolver.program(program)?;
    Ok(Resolved {
        symbols: resolver.symbols,
        table: resolver.table,
        resolutions: resolver.res,
    })
}

struct Resolver<'d> {
    symbols: Symbols,
    table: SymbolTable,
    res: Resolutions,
    diag: &'d mut Diagnostics,
}

/// Where a dot-access chain currently stands.
enum DotCtx {
    /// The prefix named a struct-typed entry with this field table.
    Struct(FieldsId),
    /// The prefix resolved, but to something without fields.
    NotStruct,
    /// Already diagnosed somewhere along the chain; stay silent.
    Bad,
}

impl Resolver<'_> {
    fn program(&mut self, program: &Program) -> Result<(), ScopeError> {
        self.table.add_scope();
        for decl in &program.decls {
            match decl {
                Decl::Var(v) => self.var_decl(v)?,
                Decl::Fn(f) => self.fn_decl(f)?,
                Decl::Struct(s) => self.struct_decl(s)?,
            }
        }
        Ok(())
    }

    /// Builds the entry for a `type name;` declaration, applying the type
    /// checks shared by globals, locals, formals, and struct fields.
    /// Returns `None` (after reporting) if the declaration is ignored.
    fn var_symbol(&mut self, ty: &TypeSpec, decl_name: &str) -> Result<Option<Symbol>, ScopeError> {
        match ty {
            TypeSpec::Void(pos) => {
                self.diag.error(NON_FN_VOID, *pos).emit();
                Ok(None)
            }
            TypeSpec::Int(_) => Ok(Some(Symbol::var(decl_name, Ty::Int))),
            TypeSpec::Bool(_) => Ok(Some(Symbol::var(decl_name, Ty::Bool))),
            TypeSpec::Struct(type_name) => {
                let def = self.table.lookup_global(&type_name.name)?;
                match def {
                    Some(id) if matches!(self.symbols.get(id).kind, SymKind::StructDef { .. }) => {
                        Ok(Some(Symbol::struct_var(decl_name, &type_name.name, id)))
                    }
                    _ => {
                        self.diag.error(BAD_STRUCT_TYPE, type_name.pos).emit();
                        Ok(None)
                    }
                }
            }
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) -> Result<(), ScopeError> {
        let Some(symbol) = self.var_symbol(&decl.ty, &decl.name.name)? else {
            return Ok(());
        };
        if self.table.lookup_local(&decl.name.name)?.is_some() {
            self.diag.error(MULTIPLY_DECLARED, decl.name.pos).emit();
            return Ok(());
        }
        let id = self.symbols.alloc(symbol);
        self.table.add_decl(&decl.name.name, id)?;
        self.res.set_decl(decl.id, id);
        Ok(())
    }

    fn fn_decl(&mut self, decl: &FnDecl) -> Result<(), ScopeError> {
        let ret = Ty::of_spec(&decl.ret);
        let duplicate = self.table.lookup_local(&decl.name.name)?.is_some();

        let fn_sym = if duplicate {
            self.diag.error(MULTIPLY_DECLARED, decl.name.pos).emit();
            None
        } else {
            let id = self.symbols.alloc(Symbol::function(&decl.name.name, ret));
            self.table.add_decl(&decl.name.name, id)?;
            self.res.set_decl(decl.id, id);
            Some(id)
        };

        // Formals and locals share one scope; the body is resolved even when
        // the function name itself was rejected.
        self.table.add_scope();
        let mut params = Vec::new();
        for formal in &decl.formals {
            if let Some(ty) = self.formal_decl(formal)? {
                params.push(ty);
            }
        }
        if let Some(id) = fn_sym
            && let Some(data) = self.symbols.fn_data_mut(id)
        {
            data.params = params;
        }

        for var in &decl.body.decls {
            self.var_decl(var)?;
        }
        for stmt in &decl.body.stmts {
            self.stmt(stmt)?;
        }
        self.table.remove_scope()
    }

    fn formal_decl(&mut self, decl: &FormalDecl) -> Result<Option<Ty>, ScopeError> {
        let Some(symbol) = self.var_symbol(&decl.ty, &decl.name.name)? else {
            return Ok(None);
        };
        if self.table.lookup_local(&decl.name.name)?.is_some() {
            self.diag.error(MULTIPLY_DECLARED, decl.name.pos).emit();
            return Ok(None);
        }
        let ty = symbol.ty.clone();
        let id = self.symbols.alloc(symbol);
        self.table.add_decl(&decl.name.name, id)?;
        self.res.set_decl(decl.id, id);
        Ok(Some(ty))
    }

    fn struct_decl(&mut self, decl: &StructDecl) -> Result<(), ScopeError> {
        if self.table.lookup_local(&decl.name.name)?.is_some() {
            self.diag.error(MULTIPLY_DECLARED, decl.name.pos).emit();
            return Ok(());
        }

        // Fields live in their own single-frame table; struct-typed fields
        // still resolve their type names against the enclosing table.
        let mut fields: FieldTable = IndexMap::new();
        for field in &decl.fields {
            let Some(symbol) = self.var_symbol(&field.ty, &field.name.name)? else {
                continue;
            };
            if fields.contains_key(&field.name.name) {
                self.diag.error(MULTIPLY_DECLARED, field.name.pos).emit();
                continue;
            }
            let id = self.symbols.alloc(symbol);
            fields.insert(field.name.name.clone(), id);
            self.res.set_decl(field.id, id);
        }

        let fields_id = self.symbols.alloc_fields(fields);
        let id = self
            .symbols
            .alloc(Symbol::struct_def(&decl.name.name, fields_id));
        self.table.add_decl(&decl.name.name, id)?;
        self.res.set_decl(decl.id, id);
        Ok(())
    }

    // ---- statements ----

    fn block(&mut self, block: &Block) -> Result<(), ScopeError> {
        self.table.add_scope();
        for var in &block.decls {
            self.var_decl(var)?;
        }
        for stmt in &block.stmts {
            self.stmt(stmt)?;
        }
        self.table.remove_scope()
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), ScopeError> {
        match stmt {
            Stmt::Assign(assign) => {
                self.loc(&assign.lhs)?;
                self.exp(&assign.rhs)
            }
            Stmt::Increment(loc) | Stmt::Decrement(loc) | Stmt::Read(loc) => self.loc(loc),
            Stmt::Write(exp) => self.exp(exp),
            Stmt::If(cond, body) | Stmt::While(cond, body) | Stmt::Repeat(cond, body) => {
                self.exp(cond)?;
                self.block(body)
            }
            Stmt::IfElse(cond, then_block, else_block) => {
                self.exp(cond)?;
                self.block(then_block)?;
                self.block(else_block)
            }
            Stmt::Call(call) => self.call(call),
            Stmt::Return(value, _) => match value {
                Some(exp) => self.exp(exp),
                None => Ok(()),
            },
        }
    }

    // ---- expressions ----

    fn exp(&mut self, exp: &Exp) -> Result<(), ScopeError> {
        match exp {
            Exp::IntLit { .. } | Exp::StrLit { .. } | Exp::True { .. } | Exp::False { .. } => {
                Ok(())
            }
            Exp::Loc(loc) => self.loc(loc),
            Exp::Assign(assign) => {
                self.loc(&assign.lhs)?;
                self.exp(&assign.rhs)
            }
            Exp::Call(call) => self.call(call),
            Exp::Unary { operand, .. } => self.exp(operand),
            Exp::Binary { lhs, rhs, .. } => {
                self.exp(lhs)?;
                self.exp(rhs)
            }
        }
    }

    fn call(&mut self, call: &CallExp) -> Result<(), ScopeError> {
        match self.table.lookup_global(&call.callee.name)? {
            Some(id) => self.res.set_use(call.callee.id, id),
            None => self.diag.error(UNDECLARED, call.callee.pos).emit(),
        }
        for arg in &call.args {
            self.exp(arg)?;
        }
        Ok(())
    }

    fn loc(&mut self, loc: &Loc) -> Result<(), ScopeError> {
        self.loc_chain(loc)?;
        Ok(())
    }

    fn loc_chain(&mut self, loc: &Loc) -> Result<DotCtx, ScopeError> {
        match loc {
            Loc::Id(id_exp) => match self.table.lookup_global(&id_exp.name)? {
                None => {
                    self.diag.error(UNDECLARED, id_exp.pos).emit();
                    Ok(DotCtx::Bad)
                }
                Some(id) => {
                    self.res.set_use(id_exp.id, id);
                    Ok(self.dot_ctx(id))
                }
            },
            Loc::Dot(dot) => {
                let base = self.loc_chain(&dot.base)?;
                match base {
                    DotCtx::Bad => Ok(DotCtx::Bad),
                    DotCtx::NotStruct => {
                        self.diag.error(DOT_NON_STRUCT, dot.base.pos()).emit();
                        Ok(DotCtx::Bad)
                    }
                    DotCtx::Struct(fields) => {
                        match self.symbols.lookup_field(fields, &dot.field.name) {
                            None => {
                                self.diag.error(BAD_FIELD, dot.field.pos).emit();
                                Ok(DotCtx::Bad)
                            }
                            Some(field_sym) => {
                                self.res.set_use(dot.id, field_sym);
                                Ok(self.dot_ctx(field_sym))
                            }
                        }
                    }
                }
            }
        }
    }

    fn dot_ctx(&self, sym: SymId) -> DotCtx {
        match self.symbols.fields_of_var(sym) {
            Some(fields) => DotCtx::Struct(fields),
            None => DotCtx::NotStruct,
        }
    }
}
