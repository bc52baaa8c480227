//! Widget system for the FinPasser console dashboard.
//!
//! The [`WidgetRegistry`] is a fixed, ordered catalog: its declaration order
//! is the default layout order, and it is the sole authority for which
//! widgets exist and what their default spans are. Each definition owns a
//! renderable [`Widget`]; the registry never introspects what a widget
//! draws.
//!
//! # Example
//!
//! ```
//! use finpasser_console::widgets::WidgetRegistry;
//!
//! let registry = WidgetRegistry::new();
//! assert!(registry.get("pending").is_some());
//! assert!(registry.get("nonexistent").is_none());
//!
//! let layout = registry.default_layout(4);
//! assert_eq!(layout.len(), registry.len());
//! ```

pub mod card;
pub mod uploader;

pub use uploader::UploadStatus;

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::layout::span::normalize_span;
use crate::layout::{Layout, LayoutEntry};

/// Trait for dashboard tiles.
///
/// Each widget draws itself into the grid cell rectangle it was assigned by
/// the packer. Widgets must be `Send + Sync` so registry references can
/// cross task boundaries freely.
pub trait Widget: Send + Sync {
    /// Draws the widget into `area`.
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &WidgetContext);

    /// Unique identifier, matching the registry entry that owns it.
    fn id(&self) -> &'static str;
}

/// Per-tile state handed to a widget at render time.
pub struct WidgetContext<'a> {
    /// Whether edit mode is active (changes tile chrome).
    pub edit_mode: bool,
    /// Whether this tile is the current drop target of an active drag.
    pub highlighted: bool,
    /// Current upload lifecycle state, consumed by the uploader tile.
    pub upload: &'a UploadStatus,
    /// Tick counter driving spinner animation.
    pub tick: u64,
}

/// One catalog entry: id, default spans, and the renderer.
pub struct WidgetDef {
    /// Stable widget identifier.
    pub id: &'static str,
    /// Default row span; `None` means one row.
    pub row_span: Option<u16>,
    /// Default column span; `None` means one column.
    pub col_span: Option<u16>,
    renderer: Box<dyn Widget>,
}

impl WidgetDef {
    /// The renderer for this definition.
    pub fn widget(&self) -> &dyn Widget {
        self.renderer.as_ref()
    }
}

/// Fixed, ordered widget catalog.
///
/// Declaration order is the default layout order. Ids are unique; the
/// catalog is immutable at runtime.
pub struct WidgetRegistry {
    defs: Vec<WidgetDef>,
}

impl WidgetRegistry {
    /// Creates the registry with the built-in FinPasser widget catalog:
    /// ten metric cards plus the XML uploader.
    pub fn new() -> Self {
        use card::{Accent, MetricCard};

        fn metric(
            id: &'static str,
            title: &'static str,
            value: &'static str,
            caption: &'static str,
            accent: Accent,
        ) -> WidgetDef {
            WidgetDef {
                id,
                row_span: None,
                col_span: None,
                renderer: Box::new(MetricCard::new(id, title, value, caption, accent)),
            }
        }

        let defs = vec![
            metric("pending", "Pending Messages", "12", "Awaiting processing", Accent::Primary),
            metric("processed", "Processed Today", "34", "Successfully routed", Accent::Secondary),
            metric("alerts", "Alerts", "2", "Requires review", Accent::Error),
            metric("throughput", "Daily Throughput", "128", "Files processed in 24h", Accent::Primary),
            metric("latency", "Avg Latency", "820ms", "Upload to ack", Accent::Secondary),
            metric("failures", "Failed Messages", "3", "Last 24 hours", Accent::Error),
            metric("kafka", "Kafka Lag", "12", "Messages waiting", Accent::Primary),
            metric("storage", "Storage Usage", "72%", "MinIO bucket", Accent::Secondary),
            metric("sla", "SLA Compliance", "99.4%", "Past 7 days", Accent::Primary),
            metric("notifications", "Notifications", "5", "Pending acknowledgements", Accent::Secondary),
            WidgetDef {
                id: "uploader",
                row_span: Some(2),
                col_span: Some(1),
                renderer: Box::new(uploader::UploaderWidget),
            },
        ];
        Self { defs }
    }

    /// Looks up a definition by id.
    pub fn get(&self, id: &str) -> Option<&WidgetDef> {
        self.defs.iter().find(|d| d.id == id)
    }

    /// Iterates definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetDef> {
        self.defs.iter()
    }

    /// Count of registered widgets.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// True when the catalog is empty (never, for the built-in set).
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// The default layout: declaration order with spans normalized for a
    /// `columns`-wide grid.
    pub fn default_layout(&self, columns: u16) -> Layout {
        Layout::new(
            self.defs
                .iter()
                .map(|d| {
                    LayoutEntry::new(
                        d.id,
                        normalize_span(d.row_span, columns),
                        normalize_span(d.col_span, columns),
                    )
                })
                .collect(),
        )
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
