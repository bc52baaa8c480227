//! Span normalization for grid widgets.
//!
//! Every span entering the packing engine or the renderer passes through
//! [`normalize_span`] first, so downstream code never sees a zero or
//! out-of-range span.

/// Clamps a raw span declaration into `[1, columns]`.
///
/// A missing span means "one cell". A `columns` of zero is treated as a
/// one-column grid rather than a failure.
pub fn normalize_span(raw: Option<u16>, columns: u16) -> u16 {
    let columns = columns.max(1);
    raw.unwrap_or(1).clamp(1, columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_span_defaults_to_one() {
        assert_eq!(normalize_span(None, 4), 1);
    }

    #[test]
    fn zero_span_is_floored_to_one() {
        assert_eq!(normalize_span(Some(0), 4), 1);
    }

    #[test]
    fn in_range_span_passes_through() {
        assert_eq!(normalize_span(Some(2), 4), 2);
        assert_eq!(normalize_span(Some(4), 4), 4);
    }

    #[test]
    fn oversized_span_is_clamped_to_columns() {
        assert_eq!(normalize_span(Some(9), 4), 4);
        assert_eq!(normalize_span(Some(u16::MAX), 6), 6);
    }

    #[test]
    fn zero_columns_behaves_as_single_column() {
        assert_eq!(normalize_span(None, 0), 1);
        assert_eq!(normalize_span(Some(3), 0), 1);
    }

    #[test]
    fn single_column_grid_clamps_everything_to_one() {
        for raw in [None, Some(1), Some(2), Some(100)] {
            assert_eq!(normalize_span(raw, 1), 1);
        }
    }
}
