//! Builder-pattern printer for rendering diagnostics.
//!
//! Two renderings are offered: the canonical one-line-per-error form
//! (`<line>:<col> ***ERROR*** <message>`, the format graders and test
//! harnesses parse), and an annotated-source form when the printer is given
//! the source text.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::Diagnostics;
use super::message::Severity;
use crate::ast::Pos;

/// Builder for rendering diagnostics with various options.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    /// Attach source text; switches rendering to annotated snippets.
    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return self.format_plain(w);
        };

        if self.diagnostics.is_empty() {
            return Ok(());
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            let range = pos_to_range(diag.pos(), source);

            let mut snippet = Snippet::source(source).line_start(1).annotation(
                AnnotationKind::Primary
                    .span(range)
                    .label(diag.message()),
            );

            if let Some(p) = self.path {
                snippet = snippet.path(p);
            }

            let level = severity_to_level(diag.severity());
            let report: Vec<Group> = vec![level.primary_title(diag.message()).element(snippet)];

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for diag in self.diagnostics.iter() {
            writeln!(w, "{}", diag)?;
        }
        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Converts a 1-based line/column position into a one-character byte range.
///
/// The analysis passes carry positions, not spans; underlining the single
/// character at the position is enough to anchor the snippet.
fn pos_to_range(pos: Pos, source: &str) -> std::ops::Range<usize> {
    let mut line = 1u32;
    let mut offset = 0usize;

    for (i, b) in source.bytes().enumerate() {
        if line == pos.line {
            offset = i;
            break;
        }
        if b == b'\n' {
            line += 1;
            offset = i + 1;
        }
    }

    let start = (offset + pos.col.saturating_sub(1) as usize).min(source.len());
    start..(start + 1).min(source.len()).max(start)
}
