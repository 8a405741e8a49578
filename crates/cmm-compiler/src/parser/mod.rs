//! Parser infrastructure for C--.
//!
//! The lexer produces span-based tokens ([`lexer`]); the grammar
//! ([`grammar`]) is a hand-written recursive descent over that stream,
//! building the typed AST directly. There is no error recovery: the first
//! syntax error aborts the parse and nothing downstream runs over a broken
//! tree.

mod grammar;
mod lexer;

#[cfg(test)]
mod lexer_tests;

pub use grammar::Parser;
pub use lexer::{LineIndex, Span, Tok, Token, lex, token_text};

use crate::ast::Pos;

/// A fatal syntax (or lexical) error. Aborts the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{pos} ***ERROR*** {message}")]
pub struct SyntaxError {
    pub pos: Pos,
    pub message: String,
}
