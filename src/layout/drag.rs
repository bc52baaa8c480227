//! Drag-reorder state machine for the dashboard grid.
//!
//! Mirrors the press/threshold/drag/release lifecycle of pointer drag
//! managers: a left press arms a *pending* drag, motion at or beyond a small
//! cell threshold promotes it to *dragging*, and only the release decides
//! whether the layout changes. Hovering over other tiles is purely visual.
//!
//! A release over a different tile proposes a single-element move and admits
//! it only if the reordered grid does not need more rows than the current
//! one, so a drag can never push widgets below the visible viewport. Every
//! terminal transition clears the transient drag session.

use crate::layout::packing::row_count;
use crate::layout::Layout;

/// Cells of Chebyshev motion required before a pending press becomes a drag.
/// Terminal cells are coarse, so one cell is already a deliberate movement.
pub const DRAG_THRESHOLD_CELLS: u16 = 1;

/// Pointer position in terminal cells.
pub type CellPos = (u16, u16);

/// Rendered size of a tile, used for the drag ghost.
pub type CellSize = (u16, u16);

/// Current phase of a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DragState {
    /// No gesture in progress.
    Idle,
    /// Pressed but not yet moved past the threshold; a release here is a
    /// plain click.
    Pending {
        id: String,
        size: CellSize,
        start: CellPos,
    },
    /// Actively dragging.
    Dragging {
        id: String,
        size: CellSize,
        position: CellPos,
        hover: Option<String>,
    },
}

/// Outcome of a gesture release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// No drag was active, no target, or target equals source.
    NoChange,
    /// The reorder would have grown the grid; order left untouched.
    Rejected,
    /// The layout was reordered; the caller should persist it.
    Committed,
}

/// Live drag info for rendering the ghost and highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDrag<'a> {
    /// Id of the widget being dragged.
    pub id: &'a str,
    /// Rendered size captured at press time.
    pub size: CellSize,
    /// Current pointer position.
    pub position: CellPos,
    /// Tile currently under the pointer, if any.
    pub hover: Option<&'a str>,
}

/// Gesture-to-reorder coordinator.
#[derive(Debug)]
pub struct DragController {
    state: DragState,
    threshold: u16,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    /// Creates an idle controller with the default activation threshold.
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            threshold: DRAG_THRESHOLD_CELLS,
        }
    }

    /// True while a drag is active (past the threshold).
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The active drag, if any, for rendering.
    pub fn active(&self) -> Option<ActiveDrag<'_>> {
        match &self.state {
            DragState::Dragging {
                id,
                size,
                position,
                hover,
            } => Some(ActiveDrag {
                id,
                size: *size,
                position: *position,
                hover: hover.as_deref(),
            }),
            _ => None,
        }
    }

    /// Arms a pending drag on a left press over a tile. Inert unless edit
    /// mode is on.
    pub fn press(&mut self, edit_mode: bool, id: &str, size: CellSize, position: CellPos) {
        if !edit_mode {
            return;
        }
        self.state = DragState::Pending {
            id: id.to_string(),
            size,
            start: position,
        };
    }

    /// Feeds pointer motion. Promotes a pending press past the threshold and
    /// tracks ghost position and hover target while dragging. Never mutates
    /// the layout.
    pub fn motion(&mut self, position: CellPos, hover: Option<&str>) {
        match &mut self.state {
            DragState::Pending { id, size, start } => {
                let dx = position.0.abs_diff(start.0);
                let dy = position.1.abs_diff(start.1);
                if dx.max(dy) >= self.threshold {
                    self.state = DragState::Dragging {
                        id: std::mem::take(id),
                        size: *size,
                        position,
                        hover: hover.map(str::to_string),
                    };
                }
            }
            DragState::Dragging {
                position: pos,
                hover: h,
                ..
            } => {
                *pos = position;
                *h = hover.map(str::to_string);
            }
            DragState::Idle => {}
        }
    }

    /// Ends the gesture. On an active drag with a valid, distinct hover
    /// target, proposes the single-element move and commits it into `layout`
    /// iff the reordered grid needs no more rows than the current one.
    ///
    /// Always returns the controller to idle.
    pub fn release(&mut self, layout: &mut Layout, columns: u16) -> DragOutcome {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        let DragState::Dragging { id, hover, .. } = state else {
            // A press that never crossed the threshold is a click.
            return DragOutcome::NoChange;
        };
        let Some(target) = hover else {
            return DragOutcome::NoChange;
        };
        let Some(candidate) = layout.moved(&id, &target) else {
            // Target equals source or either id vanished mid-gesture.
            return DragOutcome::NoChange;
        };

        let current_rows = row_count(&layout.span_pairs(), columns);
        let candidate_rows = row_count(&candidate.span_pairs(), columns);
        if candidate_rows > current_rows {
            tracing::debug!(
                "rejecting reorder of {:?}: {} rows -> {} rows",
                id,
                current_rows,
                candidate_rows
            );
            return DragOutcome::Rejected;
        }

        layout.replace(candidate);
        DragOutcome::Committed
    }

    /// Abandons any pending or active gesture without touching the layout.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
