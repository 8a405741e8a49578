//! cmm: a compiler for the C-- language targeting MIPS (SPIM) assembly.
//!
//! The pipeline is staged and typed: parsing either aborts with a syntax
//! error or yields a [`Parsed`] tree; analysis (name resolution, then type
//! checking) always completes and accumulates diagnostics in an
//! [`Analyzed`]; code generation is the gated phase — it refuses to run
//! while the error flag is set.
//!
//! # Example
//!
//! ```
//! let parsed = cmm_compiler::parse("void main() { cout << 42; }").expect("valid syntax");
//! let mut analyzed = parsed.analyze().expect("scope invariants hold");
//!
//! assert!(analyzed.is_valid());
//! let asm = analyzed.codegen().expect("valid program");
//! assert!(asm.contains("main:"));
//! ```

pub mod analyze;
pub mod ast;
pub mod diagnostics;
pub mod emit;
pub mod parser;

#[cfg(test)]
mod pipeline_tests;

pub use ast::{Pos, Program};
pub use diagnostics::{DiagnosticMessage, Diagnostics, DiagnosticsPrinter, Severity};
pub use parser::SyntaxError;

use analyze::{ExpTypes, Resolutions, ScopeError, SymbolTable, Symbols};

/// Errors that end a compilation outright.
///
/// Semantic (user) errors are not here: they accumulate as diagnostics and
/// are inspected between phases.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The parser aborted; nothing downstream ran.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Code generation was requested while the error flag is set.
    #[error("program has errors; code generation skipped")]
    Invalid,

    /// A symbol-table invariant broke. This is a compiler defect, never a
    /// user error; the driver exits non-zero.
    #[error(transparent)]
    Scope(#[from] ScopeError),
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Parse C-- source into an AST. The first syntax error aborts.
pub fn parse(src: &str) -> Result<Parsed> {
    let ast = parser::Parser::new(src)?.parse()?;
    Ok(Parsed {
        ast,
        diag: Diagnostics::new(),
    })
}

/// A successfully parsed program, before analysis.
#[derive(Debug)]
pub struct Parsed {
    ast: Program,
    diag: Diagnostics,
}

impl Parsed {
    pub fn ast(&self) -> &Program {
        &self.ast
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    pub fn unparse(&self) -> String {
        ast::unparse(&self.ast)
    }

    /// Run name resolution and type checking. Both passes always finish;
    /// their findings land in the diagnostics. `Err` here only ever means a
    /// structural scope failure.
    pub fn analyze(mut self) -> Result<Analyzed> {
        let resolved = analyze::resolve(&self.ast, &mut self.diag)?;
        let types = analyze::check(
            &self.ast,
            &resolved.symbols,
            &resolved.resolutions,
            &mut self.diag,
        );
        Ok(Analyzed {
            ast: self.ast,
            diag: self.diag,
            symbols: resolved.symbols,
            table: resolved.table,
            resolutions: resolved.resolutions,
            types,
        })
    }
}

/// A fully analyzed program: symbol tables built, every identifier linked,
/// every expression typed.
#[derive(Debug)]
pub struct Analyzed {
    ast: Program,
    diag: Diagnostics,
    symbols: Symbols,
    table: SymbolTable,
    resolutions: Resolutions,
    types: ExpTypes,
}

impl Analyzed {
    pub fn ast(&self) -> &Program {
        &self.ast
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    pub fn is_valid(&self) -> bool {
        !self.diag.has_errors()
    }

    pub fn unparse(&self) -> String {
        ast::unparse(&self.ast)
    }

    /// Unparse with every resolved identifier use annotated with its type
    /// (the name-resolution report).
    pub fn unparse_annotated(&self) -> String {
        ast::unparse_annotated(&self.ast, &self.symbols, &self.resolutions)
    }

    /// Deterministic dump of the remaining (global) scope.
    pub fn dump_symbols(&self) -> String {
        self.table.dump(&self.symbols)
    }

    pub fn types(&self) -> &ExpTypes {
        &self.types
    }

    /// Assign storage and emit assembly. Refuses with [`Error::Invalid`] if
    /// any earlier phase reported an error.
    pub fn codegen(&mut self) -> Result<String> {
        if self.diag.has_errors() {
            return Err(Error::Invalid);
        }
        emit::assign_offsets(&self.ast, &mut self.symbols, &self.resolutions);
        Ok(emit::generate(
            &self.ast,
            &self.symbols,
            &self.resolutions,
            &self.types,
        ))
    }
}
