//! Row-major first-fit dense packing for the dashboard grid.
//!
//! The grid has a fixed column count and unbounded rows. Widgets are placed
//! one at a time in layout order: rows are scanned top to bottom, columns
//! left to right, and a widget lands on the first rectangle of free cells
//! large enough for its spans. Later widgets may backfill holes left above
//! earlier, taller ones (dense packing).
//!
//! The result is deterministic for a given input order, which is what makes
//! "would this reorder grow the grid?" a usable admission test for drags.

/// Spans of one widget entering the packer, already normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanPair {
    /// Rows the widget occupies.
    pub row_span: u16,
    /// Columns the widget occupies.
    pub col_span: u16,
}

impl SpanPair {
    /// Convenience constructor.
    pub fn new(row_span: u16, col_span: u16) -> Self {
        Self { row_span, col_span }
    }
}

/// Grid position assigned to one widget by [`pack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Zero-based row of the widget's top-left cell.
    pub row: u16,
    /// Zero-based column of the widget's top-left cell.
    pub col: u16,
    /// Rows occupied.
    pub row_span: u16,
    /// Columns occupied.
    pub col_span: u16,
}

/// Output of a full packing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedGrid {
    /// One placement per input entry, in input order.
    pub placements: Vec<Placement>,
    /// Total rows used: highest occupied row index plus one, zero when empty.
    pub rows: u16,
}

/// Occupancy matrix used while packing. Rows materialize lazily; a cell in
/// an unmaterialized row counts as free.
struct Occupancy {
    columns: usize,
    cells: Vec<bool>,
}

impl Occupancy {
    fn new(columns: usize) -> Self {
        Self {
            columns,
            cells: Vec::new(),
        }
    }

    fn row_count(&self) -> usize {
        self.cells.len() / self.columns
    }

    fn is_free(&self, row: usize, col: usize) -> bool {
        if row >= self.row_count() {
            return true;
        }
        !self.cells[row * self.columns + col]
    }

    /// True when the whole `row_span x col_span` rectangle at (row, col) is free.
    fn fits(&self, row: usize, col: usize, row_span: usize, col_span: usize) -> bool {
        if col + col_span > self.columns {
            return false;
        }
        (row..row + row_span).all(|r| (col..col + col_span).all(|c| self.is_free(r, c)))
    }

    fn occupy(&mut self, row: usize, col: usize, row_span: usize, col_span: usize) {
        let needed_rows = row + row_span;
        if needed_rows > self.row_count() {
            self.cells.resize(needed_rows * self.columns, false);
        }
        for r in row..row + row_span {
            for c in col..col + col_span {
                self.cells[r * self.columns + c] = true;
            }
        }
    }
}

/// Packs the given spans into a `columns`-wide grid.
///
/// Input spans must already be normalized (see
/// [`normalize_span`](crate::layout::span::normalize_span)); a col span wider
/// than the grid would otherwise never fit and the scan would not terminate.
pub fn pack(entries: &[SpanPair], columns: u16) -> PackedGrid {
    let columns_usize = columns.max(1) as usize;
    let mut grid = Occupancy::new(columns_usize);
    let mut placements = Vec::with_capacity(entries.len());
    let mut rows_used = 0u16;

    for entry in entries {
        let row_span = entry.row_span.max(1) as usize;
        let col_span = (entry.col_span.max(1) as usize).min(columns_usize);

        let mut row = 0usize;
        let (placed_row, placed_col) = loop {
            let slot = (0..=columns_usize.saturating_sub(col_span))
                .find(|&col| grid.fits(row, col, row_span, col_span));
            match slot {
                Some(col) => break (row, col),
                None => row += 1,
            }
        };

        grid.occupy(placed_row, placed_col, row_span, col_span);
        rows_used = rows_used.max((placed_row + row_span) as u16);
        placements.push(Placement {
            row: placed_row as u16,
            col: placed_col as u16,
            row_span: row_span as u16,
            col_span: col_span as u16,
        });
    }

    PackedGrid {
        placements,
        rows: rows_used,
    }
}

/// Rows needed to place `entries` in a `columns`-wide grid.
///
/// This is the admission metric for drag reorders: a candidate order is
/// accepted only if its row count does not exceed the current one.
pub fn row_count(entries: &[SpanPair], columns: u16) -> u16 {
    pack(entries, columns).rows
}
