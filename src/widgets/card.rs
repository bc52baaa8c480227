//! Metric card tile: title, headline value, caption.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::widgets::{Widget, WidgetContext};

/// Accent palette for metric values, mirroring the gateway UI's theme roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    /// Routine metrics.
    Primary,
    /// Informational metrics.
    Secondary,
    /// Metrics that demand attention.
    Error,
}

impl Accent {
    /// Terminal color for this accent.
    pub fn color(self) -> Color {
        match self {
            Accent::Primary => Color::Cyan,
            Accent::Secondary => Color::Magenta,
            Accent::Error => Color::Red,
        }
    }
}

/// A static metric tile. Values are placeholders supplied by the registry;
/// live metric feeds are a backend concern the console does not own.
pub struct MetricCard {
    id: &'static str,
    title: &'static str,
    value: &'static str,
    caption: &'static str,
    accent: Accent,
}

impl MetricCard {
    /// Creates a card with the given static content.
    pub fn new(
        id: &'static str,
        title: &'static str,
        value: &'static str,
        caption: &'static str,
        accent: Accent,
    ) -> Self {
        Self {
            id,
            title,
            value,
            caption,
            accent,
        }
    }

    /// The headline value, for tests.
    pub fn value(&self) -> &'static str {
        self.value
    }
}

/// Border style shared by all tiles: dotted-looking and highlighted while
/// edit mode is on, plain otherwise.
pub fn tile_block(title: &str, edit_mode: bool, highlighted: bool) -> Block<'_> {
    let border_style = if highlighted {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if edit_mode {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let border_type = if edit_mode {
        BorderType::Double
    } else {
        BorderType::Rounded
    };
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
}

impl Widget for MetricCard {
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &WidgetContext) {
        if area.width < 4 || area.height < 3 {
            return; // Too small to render meaningfully
        }
        let block = tile_block(self.title, ctx.edit_mode, ctx.highlighted);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = vec![
            Line::from(Span::styled(
                self.value,
                Style::default()
                    .fg(self.accent.color())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.caption,
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn id(&self) -> &'static str {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_colors_are_distinct() {
        let colors = [
            Accent::Primary.color(),
            Accent::Secondary.color(),
            Accent::Error.color(),
        ];
        assert_eq!(
            colors.iter().collect::<std::collections::HashSet<_>>().len(),
            3
        );
    }

    #[test]
    fn card_reports_its_id() {
        let card = MetricCard::new("alerts", "Alerts", "2", "Requires review", Accent::Error);
        assert_eq!(card.id(), "alerts");
        assert_eq!(card.value(), "2");
    }
}
