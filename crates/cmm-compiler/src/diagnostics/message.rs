//! Diagnostic message types.

use serde::Serialize;

use crate::ast::Pos;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "***ERROR***"),
            Severity::Warning => write!(f, "***WARNING***"),
        }
    }
}

/// A single positioned message.
///
/// `Display` is the canonical one-line form consumed by test harnesses:
/// `<line>:<col> ***ERROR*** <message>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticMessage {
    pub(crate) severity: Severity,
    pub(crate) pos: Pos,
    pub(crate) message: String,
}

impl DiagnosticMessage {
    pub(crate) fn error(pos: Pos, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            pos,
            message: message.into(),
        }
    }

    pub(crate) fn warning(pos: Pos, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            pos,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.pos, self.severity, self.message)
    }
}
