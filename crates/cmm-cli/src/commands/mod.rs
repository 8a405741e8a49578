//! Command implementations.

pub mod ast;
pub mod build;
pub mod check;
pub mod names;
pub mod symbols;

use std::path::Path;

use cmm_compiler::{Analyzed, Parsed};

/// Read the source file or exit with an error.
fn load_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(src) => src,
        Err(e) => {
            eprintln!("error: cannot read {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

/// Parse or exit. Syntax errors already carry the canonical
/// `<line>:<col> ***ERROR***` form.
fn parse_or_exit(src: &str) -> Parsed {
    match cmm_compiler::parse(src) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Parse and analyze or exit. A scope-invariant failure is a compiler
/// defect; it still exits non-zero.
fn analyze_or_exit(src: &str) -> Analyzed {
    match parse_or_exit(src).analyze() {
        Ok(analyzed) => analyzed,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
