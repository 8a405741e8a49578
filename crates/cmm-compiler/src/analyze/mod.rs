//! Semantic analysis: name resolution and type checking.
//!
//! Both passes accumulate diagnostics and always finish their walk; the
//! driver checks the error flag between phases, not the passes themselves.

pub mod resolve;
pub mod symbol_table;
pub mod type_check;
pub mod types;

#[cfg(test)]
mod symbol_table_tests;
#[cfg(test)]
mod type_check_tests;

pub use resolve::{Resolutions, Resolved, resolve};
pub use symbol_table::{
    FieldsId, FnData, ScopeError, SymId, SymKind, Symbol, SymbolTable, Symbols,
};
pub use type_check::{ExpTypes, check};
pub use types::Ty;
