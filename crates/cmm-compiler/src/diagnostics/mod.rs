//! Compiler diagnostics infrastructure.
//!
//! Semantic errors are values: each analysis pass reports into a shared
//! [`Diagnostics`] collection and keeps walking. `has_errors` is the
//! monotone "error encountered" flag the driver inspects between phases.

mod message;
mod printer;


pub use message::{DiagnosticMessage, Severity};
pub use printer::DiagnosticsPrinter;

use crate::ast::Pos;

/// Collection of diagnostic messages from parsing and analysis.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

/// Builder for constructing a diagnostic message.
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn error(&mut self, msg: impl Into<String>, pos: Pos) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            message: DiagnosticMessage::error(pos, msg),
            diagnostics: self,
        }
    }

    pub fn warning(&mut self, msg: impl Into<String>, pos: Pos) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            message: DiagnosticMessage::warning(pos, msg),
            diagnostics: self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}

impl DiagnosticBuilder<'_> {
    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
