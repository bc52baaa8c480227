//! FinPasser Console library
//!
//! Core functionality for the FinPasser operator console: the dashboard
//! layout engine (ordered widgets packed into a dense grid), session
//! persistence of the widget order, drag-and-drop reordering, and the
//! gateway client for pain.001 XML uploads.
//!
//! The layout model is deliberately minimal: a layout is an ordered list of
//! widget ids with normalized spans, and grid positions are derived on every
//! render by a row-major first-fit packer. Order plus spans plus the column
//! count fully determine the grid, so persistence only ever stores order.

/// Gateway and identity-provider clients.
pub mod api;

/// Configuration utilities including XDG path resolution.
pub mod config;

/// Layout system for dashboard widget arrangement.
pub mod layout;

/// Logging initialization.
pub mod logging;

/// TUI module providing the terminal dashboard.
pub mod tui;

/// Widget system for the dashboard tiles.
pub mod widgets;

pub use layout::{Layout, LayoutEntry};
pub use widgets::WidgetRegistry;

#[cfg(test)]
mod tests;
