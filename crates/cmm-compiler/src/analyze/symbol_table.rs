//! Symbol entries, the arena that owns them, and the scope stack.
//!
//! Entries are arena-allocated and referenced by integer handles, so a
//! struct variable can point at its struct definition (and the definition at
//! its field table) without any ownership cycle. The scope stack itself only
//! stores handles.

use indexmap::IndexMap;

use super::types::Ty;

/// Handle of a symbol entry in [`Symbols`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymId(u32);

impl SymId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of a struct field table in [`Symbols`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldsId(u32);

impl FieldsId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Structural failures of the scope stack.
///
/// These are compiler invariants, not user errors: a leak past the analysis
/// passes terminates the driver with a non-zero exit, it is never printed as
/// a source diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("symbol table has no open scope")]
    EmptyScope,
    #[error("`{0}` is already declared in this scope")]
    Duplicate(String),
    #[error("symbol table given an empty name")]
    IllegalArgument,
}

/// One declared name. The core (`ty`, `offset`, `is_global`) is shared by
/// every kind; the payload carries what only that kind needs.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub ty: Ty,
    /// Frame offset from `$fp`, assigned by storage layout. Unused for
    /// globals, functions, and struct definitions.
    pub offset: i32,
    pub is_global: bool,
    pub kind: SymKind,
}

#[derive(Debug, Clone)]
pub enum SymKind {
    /// Scalar `int` or `bool` variable.
    Var,
    Fn(FnData),
    /// A variable of some struct type; `def` is its struct definition.
    StructVar { def: SymId },
    /// A struct type declaration; owns its single-frame field table.
    StructDef { fields: FieldsId },
}

#[derive(Debug, Clone)]
pub struct FnData {
    pub ret: Ty,
    pub params: Vec<Ty>,
    /// 4 bytes per parameter, filled by storage layout.
    pub size_params: i32,
    /// Total bytes of locals, including vars in nested blocks.
    pub size_locals: i32,
}

impl Symbol {
    pub fn var(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
            offset: 0,
            is_global: false,
            kind: SymKind::Var,
        }
    }

    pub fn function(name: impl Into<String>, ret: Ty) -> Self {
        Self {
            name: name.into(),
            ty: Ty::Fn,
            offset: 0,
            is_global: false,
            kind: SymKind::Fn(FnData {
                ret,
                params: Vec::new(),
                size_params: 0,
                size_locals: 0,
            }),
        }
    }

    pub fn struct_var(name: impl Into<String>, struct_name: &str, def: SymId) -> Self {
        Self {
            name: name.into(),
            ty: Ty::Struct(struct_name.to_string()),
            offset: 0,
            is_global: false,
            kind: SymKind::StructVar { def },
        }
    }

    pub fn struct_def(name: impl Into<String>, fields: FieldsId) -> Self {
        let name = name.into();
        Self {
            ty: Ty::StructDef(name.clone()),
            name,
            offset: 0,
            is_global: false,
            kind: SymKind::StructDef { fields },
        }
    }
}

/// Field tables map field name to entry, in declaration order (offsets are
/// assigned in iteration order, so the order matters).
pub type FieldTable = IndexMap<String, SymId>;

/// Arena of symbol entries and struct field tables.
#[derive(Debug, Clone, Default)]
pub struct Symbols {
    entries: Vec<Symbol>,
    field_tables: Vec<FieldTable>,
}

impl Symbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymId {
        let id = SymId(self.entries.len() as u32);
        self.entries.push(symbol);
        id
    }

    pub fn alloc_fields(&mut self, table: FieldTable) -> FieldsId {
        let id = FieldsId(self.field_tables.len() as u32);
        self.field_tables.push(table);
        id
    }

    pub fn get(&self, id: SymId) -> &Symbol {
        &self.entries[id.index()]
    }

    pub fn get_mut(&mut self, id: SymId) -> &mut Symbol {
        &mut self.entries[id.index()]
    }

    pub fn fields(&self, id: FieldsId) -> &FieldTable {
        &self.field_tables[id.index()]
    }

    pub fn lookup_field(&self, id: FieldsId, name: &str) -> Option<SymId> {
        self.field_tables[id.index()].get(name).copied()
    }

    pub fn fn_data(&self, id: SymId) -> Option<&FnData> {
        match &self.get(id).kind {
            SymKind::Fn(data) => Some(data),
            _ => None,
        }
    }

    pub fn fn_data_mut(&mut self, id: SymId) -> Option<&mut FnData> {
        match &mut self.get_mut(id).kind {
            SymKind::Fn(data) => Some(data),
            _ => None,
        }
    }

    /// Field table of a struct variable's definition.
    pub fn fields_of_var(&self, id: SymId) -> Option<FieldsId> {
        match self.get(id).kind {
            SymKind::StructVar { def } => match self.get(def).kind {
                SymKind::StructDef { fields } => Some(fields),
                _ => None,
            },
            _ => None,
        }
    }

    /// Storage size in bytes: 4 per scalar, 4 per field for struct vars.
    pub fn size_of(&self, id: SymId) -> i32 {
        match self.fields_of_var(id) {
            Some(fields) => 4 * self.fields(fields).len() as i32,
            None => 4,
        }
    }
}

/// Stack of lexical scopes mapping names to entry handles. The innermost
/// scope is the last frame. A fresh table has *no* frame: every operation
/// below requires at least one, and fails `EmptyScope` otherwise.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    frames: Vec<IndexMap<String, SymId>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scope(&mut self) {
        self.frames.push(IndexMap::new());
    }

    pub fn remove_scope(&mut self) -> Result<(), ScopeError> {
        self.frames.pop().map(|_| ()).ok_or(ScopeError::EmptyScope)
    }

    pub fn add_decl(&mut self, name: &str, entry: SymId) -> Result<(), ScopeError> {
        if name.is_empty() {
            return Err(ScopeError::IllegalArgument);
        }
        let frame = self.frames.last_mut().ok_or(ScopeError::EmptyScope)?;
        if frame.contains_key(name) {
            return Err(ScopeError::Duplicate(name.to_string()));
        }
        frame.insert(name.to_string(), entry);
        Ok(())
    }

    /// Search only the innermost frame.
    pub fn lookup_local(&self, name: &str) -> Result<Option<SymId>, ScopeError> {
        let frame = self.frames.last().ok_or(ScopeError::EmptyScope)?;
        Ok(frame.get(name).copied())
    }

    /// Search all frames, innermost first.
    pub fn lookup_global(&self, name: &str) -> Result<Option<SymId>, ScopeError> {
        if self.frames.is_empty() {
            return Err(ScopeError::EmptyScope);
        }
        for frame in self.frames.iter().rev() {
            if let Some(id) = frame.get(name) {
                return Ok(Some(*id));
            }
        }
        Ok(None)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Deterministic human-readable dump, innermost frame first.
    pub fn dump(&self, symbols: &Symbols) -> String {
        let mut out = String::new();
        for (level, frame) in self.frames.iter().rev().enumerate() {
            out.push_str(&format!("scope {level}\n"));
            for (name, &id) in frame {
                let sym = symbols.get(id);
                match &sym.kind {
                    SymKind::Fn(data) => {
                        let params: Vec<String> =
                            data.params.iter().map(|t| t.to_string()).collect();
                        out.push_str(&format!(
                            "    {name}: {}->{}\n",
                            params.join(","),
                            data.ret
                        ));
                    }
                    SymKind::StructDef { fields } => {
                        out.push_str(&format!("    {name}: struct\n"));
                        for (field, &fid) in symbols.fields(*fields) {
                            out.push_str(&format!(
                                "        {field}: {}\n",
                                symbols.get(fid).ty
                            ));
                        }
                    }
                    SymKind::Var | SymKind::StructVar { .. } => {
                        out.push_str(&format!("    {name}: {}\n", sym.ty));
                    }
                }
            }
        }
        out
    }
}
