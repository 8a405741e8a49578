//! Type tags shared by the analysis passes.

use crate::ast::TypeSpec;

/// The closed set of C-- types.
///
/// `Str` exists only for string literals: it cannot be named in a
/// declaration, so no variable ever has it. `Error` is the absorbing
/// sentinel: once an expression has been diagnosed, everything computed
/// from it is `Error` and stays silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    Int,
    Bool,
    Void,
    Str,
    Fn,
    Struct(String),
    StructDef(String),
    Error,
}

impl Ty {
    /// The type a written-out declaration names.
    pub fn of_spec(spec: &TypeSpec) -> Ty {
        match spec {
            TypeSpec::Int(_) => Ty::Int,
            TypeSpec::Bool(_) => Ty::Bool,
            TypeSpec::Void(_) => Ty::Void,
            TypeSpec::Struct(id) => Ty::Struct(id.name.clone()),
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Ty::Int)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Ty::Bool)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Ty::Void)
    }

    pub fn is_fn(&self) -> bool {
        matches!(self, Ty::Fn)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Ty::Struct(_))
    }

    pub fn is_struct_def(&self) -> bool {
        matches!(self, Ty::StructDef(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Ty::Error)
    }

    /// Type equality for checking: struct types compare by declared name,
    /// and `Error` equals everything so one mistake produces one message.
    pub fn same(&self, other: &Ty) -> bool {
        match (self, other) {
            (Ty::Error, _) | (_, Ty::Error) => true,
            (Ty::Struct(a), Ty::Struct(b)) => a == b,
            (Ty::StructDef(a), Ty::StructDef(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl std::fmt::Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Bool => write!(f, "bool"),
            Ty::Void => write!(f, "void"),
            Ty::Str => write!(f, "string"),
            Ty::Fn => write!(f, "function"),
            Ty::Struct(name) | Ty::StructDef(name) => write!(f, "struct {name}"),
            Ty::Error => write!(f, "error"),
        }
    }
}
