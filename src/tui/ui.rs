//! Rendering for the dashboard: header, packed widget grid, footer, drag
//! ghost, and the upload prompt modal.
//!
//! The grid is re-derived every frame: the packer assigns (row, col) cells
//! from the current order and spans, and this module maps those cells to
//! terminal rectangles. Column boundaries are proportional to the available
//! width; rows have a fixed height and tiles are clipped at the viewport
//! edge.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Layout as RatLayout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::api::AuthState;
use crate::layout::packing::{pack, Placement};
use crate::tui::app::App;
use crate::widgets::WidgetContext;

/// Height of one grid row in terminal cells.
pub const ROW_HEIGHT: u16 = 5;

/// Renders the whole dashboard for one frame.
pub fn render_dashboard(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let chunks = RatLayout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, chunks[0], app);
    render_grid(frame, chunks[1], app);
    render_footer(frame, chunks[2], app);
    render_drag_ghost(frame, area, app);

    if let Some(input) = app.upload_prompt.clone() {
        render_upload_prompt(frame, area, &input);
    }
}

/// Header line: app title, auth indicator, wall clock.
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let chunks =
        RatLayout::horizontal([Constraint::Min(0), Constraint::Length(10)]).split(area);

    let mut spans = vec![Span::styled(
        " FinPasser Console ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    match &app.auth {
        AuthState::Disabled => {}
        AuthState::Pending => {
            spans.push(Span::styled("· signing in…", Style::default().fg(Color::Yellow)));
        }
        AuthState::Authenticated { user, .. } => {
            spans.push(Span::styled(
                format!("· {user}"),
                Style::default().fg(Color::Green),
            ));
        }
        AuthState::Failed { .. } => {
            spans.push(Span::styled("· auth failed", Style::default().fg(Color::Red)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let clock = Local::now().format("%H:%M:%S").to_string();
    frame.render_widget(
        Paragraph::new(clock)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

/// Grid area: packs the layout, renders each tile, and retains the tile
/// rectangles for mouse hit-testing.
fn render_grid(frame: &mut Frame, area: Rect, app: &mut App) {
    app.tile_rects.clear();
    if area.width == 0 || area.height == 0 {
        return;
    }

    let packed = pack(&app.layout.span_pairs(), app.columns);
    let hover = app
        .drag
        .active()
        .and_then(|d| d.hover.map(str::to_string));

    let entries: Vec<_> = app.layout.entries().to_vec();
    for (entry, placement) in entries.iter().zip(packed.placements.iter()) {
        let Some(rect) = cell_rect(area, placement, app.columns, ROW_HEIGHT) else {
            continue; // below the viewport
        };
        let Some(def) = app.registry.get(&entry.id) else {
            continue;
        };
        let ctx = WidgetContext {
            edit_mode: app.edit_mode,
            highlighted: hover.as_deref() == Some(entry.id.as_str()),
            upload: &app.upload,
            tick: app.tick_count,
        };
        def.widget().render(frame, rect, &ctx);
        app.tile_rects.push((entry.id.clone(), rect));
    }
}

/// Maps a packed cell placement to a terminal rectangle, or `None` when the
/// tile starts below the viewport. Tiles straddling the bottom edge are
/// clipped.
pub(crate) fn cell_rect(
    area: Rect,
    placement: &Placement,
    columns: u16,
    row_height: u16,
) -> Option<Rect> {
    let columns = columns.max(1) as u32;
    let x0 = (placement.col as u32 * area.width as u32 / columns) as u16;
    let x1 = ((placement.col + placement.col_span) as u32 * area.width as u32 / columns) as u16;
    if x1 <= x0 {
        return None;
    }

    let y = placement.row.checked_mul(row_height)?;
    if y >= area.height {
        return None;
    }
    let height = (placement.row_span * row_height).min(area.height - y);

    Some(Rect {
        x: area.x + x0,
        y: area.y + y,
        width: x1 - x0,
        height,
    })
}

/// Footer: transient status message when one is live, key hints otherwise.
fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let line = if let Some((message, _)) = &app.status_message {
        Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Yellow),
        ))
    } else if app.edit_mode {
        Line::from(Span::styled(
            " drag tiles to reorder · r reset · e done · q quit",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            " e edit layout · u upload · q quit",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Ghost outline following the pointer during an active drag.
fn render_drag_ghost(frame: &mut Frame, area: Rect, app: &App) {
    let Some(active) = app.drag.active() else {
        return;
    };
    let (col, row) = active.position;
    if col >= area.width || row >= area.height {
        return;
    }
    let rect = Rect {
        x: col,
        y: row,
        width: active.size.0.max(3).min(area.width - col),
        height: active.size.1.max(3).min(area.height - row),
    };
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Block::default()
            .title(format!(" {} ", active.id))
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Yellow)),
        rect,
    );
}

/// Centered modal prompting for the path of a pain.001 XML file.
fn render_upload_prompt(frame: &mut Frame, area: Rect, input: &str) {
    let rect = centered_rect(area, 60, 5);
    frame.render_widget(Clear, rect);
    let block = Block::default()
        .title(" Upload pain.001 XML ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let lines = vec![
        Line::from(vec![
            Span::raw("> "),
            Span::raw(input),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            "Enter send · Esc cancel · Ctrl+V paste",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// A rectangle of up to `width` x `height` cells centered in `area`.
pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::packing::SpanPair;

    fn grid_area() -> Rect {
        Rect::new(0, 1, 80, 20)
    }

    #[test]
    fn cell_rect_splits_width_proportionally() {
        let placements = pack(&[SpanPair::new(1, 1); 4], 4).placements;
        let rects: Vec<Rect> = placements
            .iter()
            .map(|p| cell_rect(grid_area(), p, 4, ROW_HEIGHT).expect("visible"))
            .collect();
        assert_eq!(rects[0], Rect::new(0, 1, 20, ROW_HEIGHT));
        assert_eq!(rects[1], Rect::new(20, 1, 20, ROW_HEIGHT));
        assert_eq!(rects[3], Rect::new(60, 1, 20, ROW_HEIGHT));
        // Cells tile the full width with no gaps.
        let total: u16 = rects.iter().map(|r| r.width).sum();
        assert_eq!(total, 80);
    }

    #[test]
    fn cell_rect_uneven_width_leaves_no_gap() {
        // 79 does not divide by 4; boundaries still tile exactly.
        let area = Rect::new(0, 0, 79, 20);
        let placements = pack(&[SpanPair::new(1, 1); 4], 4).placements;
        let rects: Vec<Rect> = placements
            .iter()
            .map(|p| cell_rect(area, p, 4, ROW_HEIGHT).expect("visible"))
            .collect();
        for pair in rects.windows(2) {
            assert_eq!(pair[0].x + pair[0].width, pair[1].x);
        }
        assert_eq!(rects[3].x + rects[3].width, 79);
    }

    #[test]
    fn cell_rect_spans_cover_multiple_cells() {
        let placement = Placement {
            row: 0,
            col: 1,
            row_span: 2,
            col_span: 2,
        };
        let rect = cell_rect(grid_area(), &placement, 4, ROW_HEIGHT).expect("visible");
        assert_eq!(rect, Rect::new(20, 1, 40, 2 * ROW_HEIGHT));
    }

    #[test]
    fn cell_rect_below_viewport_is_none() {
        let placement = Placement {
            row: 4, // starts at y offset 20, past a 20-high area
            col: 0,
            row_span: 1,
            col_span: 1,
        };
        assert!(cell_rect(grid_area(), &placement, 4, ROW_HEIGHT).is_none());
    }

    #[test]
    fn cell_rect_clips_at_viewport_bottom() {
        let placement = Placement {
            row: 3, // y offset 15 in a 20-high area, only 5 of 10 fit
            col: 0,
            row_span: 2,
            col_span: 1,
        };
        let rect = cell_rect(grid_area(), &placement, 4, ROW_HEIGHT).expect("partially visible");
        assert_eq!(rect.height, 5);
    }

    #[test]
    fn cell_rect_zero_width_area_is_none() {
        let area = Rect::new(0, 0, 0, 20);
        let placement = Placement {
            row: 0,
            col: 0,
            row_span: 1,
            col_span: 1,
        };
        assert!(cell_rect(area, &placement, 4, ROW_HEIGHT).is_none());
    }

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 100, 30);
        let rect = centered_rect(area, 60, 5);
        assert_eq!(rect, Rect::new(20, 12, 60, 5));
    }

    #[test]
    fn centered_rect_clamps_to_small_areas() {
        let area = Rect::new(0, 0, 10, 3);
        let rect = centered_rect(area, 60, 5);
        assert_eq!(rect, Rect::new(0, 0, 10, 3));
    }
}
