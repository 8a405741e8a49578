//! String literal interning for the data segment.
//!
//! Each distinct literal gets one `.asciiz` entry; repeats reuse the label.
//! Labels come from the same monotone counter as control-flow labels, so a
//! listing's label numbers read in program order.

use indexmap::IndexMap;

/// Allocator for `.L<k>` labels, shared by strings and control flow.
#[derive(Debug, Clone, Default)]
pub struct LabelAlloc {
    next: u32,
}

impl LabelAlloc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> String {
        let label = format!(".L{}", self.next);
        self.next += 1;
        label
    }
}

/// Interned string literals, in first-use order.
///
/// Contents keep their source escape sequences; they are written into the
/// `.asciiz` directive untouched and the assembler interprets them.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    labels: IndexMap<String, String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, content: &str) -> Option<&str> {
        self.labels.get(content).map(String::as_str)
    }

    /// Label for `content`, allocating on first use.
    pub fn get_or_intern(&mut self, content: &str, labels: &mut LabelAlloc) -> String {
        if let Some(label) = self.labels.get(content) {
            return label.clone();
        }
        let label = labels.fresh();
        self.labels.insert(content.to_string(), label.clone());
        label
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(content, label)` pairs in intern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(c, l)| (c.as_str(), l.as_str()))
    }
}
