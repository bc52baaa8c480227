//! Dashboard layout model: ordered widgets, span normalization, grid packing,
//! session persistence, and the drag-reorder state machine.
//!
//! A [`Layout`] is nothing but an ordered list of widget ids with normalized
//! spans. Grid positions are never stored; they are derived on every render
//! by the packer in [`packing`], so order + spans + column count fully
//! determine what the user sees.

pub mod drag;
pub mod packing;
pub mod span;
pub mod store;

use crate::layout::packing::SpanPair;

/// One widget in a layout: its id plus normalized spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    /// Widget id, unique within the layout.
    pub id: String,
    /// Rows occupied (already clamped to the column count).
    pub row_span: u16,
    /// Columns occupied (already clamped to the column count).
    pub col_span: u16,
}

impl LayoutEntry {
    /// Creates an entry with the given id and spans.
    pub fn new(id: impl Into<String>, row_span: u16, col_span: u16) -> Self {
        Self {
            id: id.into(),
            row_span,
            col_span,
        }
    }
}

/// Ordered list of widgets, top-to-bottom left-to-right packing priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    entries: Vec<LayoutEntry>,
}

impl Layout {
    /// Creates a layout from the given entries, keeping their order.
    pub fn new(entries: Vec<LayoutEntry>) -> Self {
        Self { entries }
    }

    /// The entries in packing order.
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Widget count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the layout holds no widgets.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the widget with the given id, if present.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Span pairs in packing order, the packer's input.
    pub fn span_pairs(&self) -> Vec<SpanPair> {
        self.entries
            .iter()
            .map(|e| SpanPair::new(e.row_span, e.col_span))
            .collect()
    }

    /// Ordered ids, used by persistence round-trip checks.
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    /// Candidate order for a drag: the source entry removed and reinserted
    /// at the target entry's index. Returns `None` when either id is absent
    /// or source equals target.
    pub fn moved(&self, source_id: &str, target_id: &str) -> Option<Layout> {
        if source_id == target_id {
            return None;
        }
        let from = self.position(source_id)?;
        let to = self.position(target_id)?;
        let mut entries = self.entries.clone();
        let entry = entries.remove(from);
        entries.insert(to, entry);
        Some(Layout::new(entries))
    }

    /// Replaces this layout's order with another's.
    pub fn replace(&mut self, other: Layout) {
        self.entries = other.entries;
    }
}
