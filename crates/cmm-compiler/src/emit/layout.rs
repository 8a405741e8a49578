//! Storage layout: the walk between type checking and emission.
//!
//! Marks globals, gives every parameter and local its `$fp`-relative
//! offset, records per-function frame sizes, and numbers struct fields.
//! Everything here is arithmetic over the symbol arena; the layout for a
//! given program never varies.

use crate::analyze::{Resolutions, SymId, SymKind, Symbols};
use crate::ast::{Block, Decl, FnDecl, Program, Stmt, StructDecl};

/// Bytes reserved between the parameters and the locals for the saved
/// return address and control link.
const LINKAGE_BYTES: i32 = 8;

pub fn assign_offsets(program: &Program, symbols: &mut Symbols, res: &Resolutions) {
    for decl in &program.decls {
        match decl {
            Decl::Var(var) => {
                if let Some(sym) = res.decl_of(var.id) {
                    symbols.get_mut(sym).is_global = true;
                }
            }
            Decl::Struct(decl) => layout_struct(decl, symbols, res),
            Decl::Fn(decl) => layout_fn(decl, symbols, res),
        }
    }
}

/// Field offsets count up from 0 in declaration order, 4 bytes per field.
fn layout_struct(decl: &StructDecl, symbols: &mut Symbols, res: &Resolutions) {
    let Some(sym) = res.decl_of(decl.id) else {
        return;
    };
    let SymKind::StructDef { fields } = symbols.get(sym).kind else {
        return;
    };
    let field_syms: Vec<SymId> = symbols.fields(fields).values().copied().collect();
    for (i, field) in field_syms.into_iter().enumerate() {
        symbols.get_mut(field).offset = 4 * i as i32;
    }
}

fn layout_fn(decl: &FnDecl, symbols: &mut Symbols, res: &Resolutions) {
    // First parameter at 0($fp), the next at -4($fp), and so on.
    let mut nparams = 0;
    for formal in &decl.formals {
        if let Some(sym) = res.decl_of(formal.id) {
            symbols.get_mut(sym).offset = -4 * nparams;
            nparams += 1;
        }
    }
    let size_params = 4 * nparams;

    // Locals start below the linkage area and grow downward. A local's
    // offset is the lowest address of its slot, so multi-word struct
    // locals sit entirely inside the frame.
    let first_local = -(size_params + LINKAGE_BYTES);
    let mut cursor = first_local;
    layout_block(&decl.body, symbols, res, &mut cursor);
    let size_locals = first_local - cursor;

    if let Some(sym) = res.decl_of(decl.id)
        && let Some(data) = symbols.fn_data_mut(sym)
    {
        data.size_params = size_params;
        data.size_locals = size_locals;
    }
}

/// Assigns offsets to a block's vars, then recurses into nested blocks.
/// The cursor keeps descending, so locals in sibling blocks get distinct
/// slots and `size_locals` covers the whole body.
fn layout_block(block: &Block, symbols: &mut Symbols, res: &Resolutions, cursor: &mut i32) {
    for var in &block.decls {
        let Some(sym) = res.decl_of(var.id) else {
            continue;
        };
        let size = symbols.size_of(sym);
        symbols.get_mut(sym).offset = *cursor - size + 4;
        *cursor -= size;
    }
    for stmt in &block.stmts {
        match stmt {
            Stmt::If(_, body) | Stmt::While(_, body) | Stmt::Repeat(_, body) => {
                layout_block(body, symbols, res, cursor);
            }
            Stmt::IfElse(_, then_block, else_block) => {
                layout_block(then_block, symbols, res, cursor);
                layout_block(else_block, symbols, res, cursor);
            }
            _ => {}
        }
    }
}
