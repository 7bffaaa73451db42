//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen layout.
///
/// `content_area` is everything above the status bar; the sheet overlays
/// its bottom `sheet_slot` when fully shown, leaving `backdrop_area` clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub content_area: Rect,
    pub backdrop_area: Rect,
    pub sheet_slot: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area and the configured
    /// sheet height.  A sheet taller than the content area takes all of it.
    pub fn from_area(area: Rect, sheet_rows: u16) -> Self {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // content + sheet overlay
                Constraint::Length(1), // status bar
            ])
            .split(area);
        let content_area = outer[0];

        let rows = sheet_rows.min(content_area.height);
        let inner = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(rows)])
            .split(content_area);

        Self {
            content_area,
            backdrop_area: inner[0],
            sheet_slot: inner[1],
            status_area: outer[1],
        }
    }
}
