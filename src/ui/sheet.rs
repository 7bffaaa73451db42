//! The bottom sheet widget.
//!
//! Draws whatever part of the sheet is on screen: a grip bar at the top,
//! a title, and a small readout of the panel's live state.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::theme::Theme;
use crate::core::panel::{DismissPanel, PanelState};

const GRIP: &str = "━━━━━━━━";

pub struct SheetWidget<'a> {
    pub panel: &'a DismissPanel,
    /// Rows of the full sheet hidden below the area (drag offset).
    pub hidden_rows: u16,
}

impl SheetWidget<'_> {
    fn readout(&self) -> Vec<Line<'static>> {
        let panel = self.panel;
        let geometry = panel.geometry();
        let dim = Theme::dimmed_content_style();

        let mut lines = vec![
            Line::from(vec![
                Span::styled("state     ", dim),
                Span::raw(panel.state().label()),
            ]),
            Line::from(vec![
                Span::styled("offset    ", dim),
                Span::raw(format!(
                    "{:.1} down, {:.1} to go",
                    geometry.distance_to_shown(),
                    geometry.distance_to_off_screen()
                )),
            ]),
            Line::from(vec![
                Span::styled("threshold ", dim),
                Span::raw(format!(
                    "{:.1} rows",
                    geometry.height() * panel.tuning().dismiss_threshold
                )),
            ]),
        ];

        if let Some(anim) = panel.animation() {
            lines.push(Line::from(vec![
                Span::styled("animation ", dim),
                Span::raw(format!(
                    "{} {:.1} -> {:.1} {:>3.0}% of {}ms {} (x{:.2})",
                    anim.transition().label(),
                    anim.from(),
                    anim.to(),
                    anim.progress() * 100.0,
                    anim.duration().as_millis(),
                    anim.easing().label(),
                    anim.time_scale()
                )),
            ]));
        } else if let Some(drag) = panel.drag_session() {
            lines.push(Line::from(vec![
                Span::styled("drag      ", dim),
                Span::raw(format!("{:.1} rows", drag.start().y - drag.last().y)),
            ]));
        }

        if !panel.is_active() {
            lines.push(Line::from(Span::styled("(component disabled)", dim)));
        }
        lines
    }
}

impl Widget for SheetWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height == 0 {
            return;
        }
        Clear.render(area, buf);
        buf.set_style(area, Theme::sheet_style());

        // The top border and grip scroll off with the sheet once it is
        // dragged below them.
        let (borders, grip_visible) = if self.hidden_rows == 0 {
            (Borders::TOP | Borders::LEFT | Borders::RIGHT, true)
        } else {
            (Borders::LEFT | Borders::RIGHT, false)
        };
        let block = Block::default()
            .borders(borders)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_style())
            .style(Theme::sheet_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let dragging = self.panel.state() == PanelState::Dragging;
        let mut lines = Vec::new();
        if grip_visible {
            lines.push(
                Line::from(Span::styled(GRIP, Theme::grip_style(dragging)))
                    .alignment(Alignment::Center),
            );
            lines.push(
                Line::from(Span::styled(" Pull down to dismiss ", Theme::sheet_title_style()))
                    .alignment(Alignment::Center),
            );
        }
        lines.push(Line::raw(""));
        lines.extend(self.readout());

        // Content hidden by the drag scrolls away with the sheet.
        let skip = usize::from(self.hidden_rows.saturating_sub(1));
        let lines: Vec<Line> = lines.into_iter().skip(skip).collect();
        Paragraph::new(lines).render(inner, buf);
    }
}
