//! Upload tile: pain.001 XML submission state.
//!
//! The tile itself never talks to the network; it renders whatever
//! [`UploadStatus`] the app currently holds. Submissions are started from
//! the upload prompt (`u`) and their result lands back here.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::widgets::card::tile_block;
use crate::widgets::{Widget, WidgetContext};

/// Spinner frames advanced by the app tick while an upload is in flight.
pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Lifecycle of the most recent upload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadStatus {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A file is on its way to the gateway.
    InFlight {
        /// Base name of the file being sent.
        file_name: String,
    },
    /// The gateway answered; body is the pretty-printed receipt.
    Done(String),
    /// The submission failed; message already formatted for display.
    Failed(String),
}

/// The XML uploader tile.
pub struct UploaderWidget;

impl Widget for UploaderWidget {
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &WidgetContext) {
        if area.width < 4 || area.height < 3 {
            return;
        }
        let block = tile_block("Upload XML Message", ctx.edit_mode, ctx.highlighted);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = match ctx.upload {
            UploadStatus::Idle => vec![
                Line::from(Span::styled(
                    "Select a pain.001 XML file",
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    "press 'u' to enter a path",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            UploadStatus::InFlight { file_name } => {
                let frame_idx = (ctx.tick as usize) % SPINNER_FRAMES.len();
                vec![Line::from(vec![
                    Span::styled(
                        SPINNER_FRAMES[frame_idx],
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(" uploading {file_name}")),
                ])]
            }
            UploadStatus::Done(receipt) => {
                let mut lines = vec![Line::from(Span::styled(
                    "Sent",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ))];
                lines.extend(
                    receipt
                        .lines()
                        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Gray)))),
                );
                lines
            }
            UploadStatus::Failed(message) => vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))],
        };

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }

    fn id(&self) -> &'static str {
        "uploader"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_idle() {
        assert_eq!(UploadStatus::default(), UploadStatus::Idle);
    }

    #[test]
    fn widget_id_matches_registry_entry() {
        assert_eq!(UploaderWidget.id(), "uploader");
    }

    #[test]
    fn spinner_frames_cycle() {
        // Tick-driven frame selection must stay in bounds for any tick.
        for tick in [0u64, 1, 3, 4, 1000, u64::MAX] {
            let idx = (tick as usize) % SPINNER_FRAMES.len();
            assert!(idx < SPINNER_FRAMES.len());
        }
    }
}
