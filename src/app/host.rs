//! The terminal side of the panel: maps cells to panel space, owns the
//! sheet overlay that gets hidden on dismissal, and keeps the sheet's
//! on-screen rectangle in sync with the panel position.

use ratatui::layout::Rect as CellRect;

use crate::core::geometry::{Point, Rect, Size};
use crate::core::host::{HitTest, LayoutRefresh, PanelHost, ParentVisibility};

/// Converts between terminal cells and the panel's y-up space.
///
/// The anchor is the top-left corner of the fully shown sheet.  Panel
/// positions are relative to it, so the shown position is `(0, 0)` and the
/// off-screen position is `(0, -height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMapping {
    area: CellRect,
    sheet_rows: u16,
}

impl CellMapping {
    pub fn new(area: CellRect, sheet_rows: u16) -> Self {
        Self {
            area,
            sheet_rows: sheet_rows.min(area.height),
        }
    }

    pub fn sheet_size(&self) -> Size {
        Size::new(f64::from(self.area.width), f64::from(self.sheet_rows))
    }

    /// Row of the sheet's top edge when fully shown.
    pub fn shown_top(&self) -> u16 {
        self.area.bottom().saturating_sub(self.sheet_rows)
    }

    /// Screen-space anchor of the shown sheet.
    pub fn anchor(&self) -> Point {
        Point::new(f64::from(self.area.x), -f64::from(self.shown_top()))
    }

    /// Centre of a terminal cell in screen space.
    pub fn cell_to_point(column: u16, row: u16) -> Point {
        Point::new(f64::from(column) + 0.5, -f64::from(row) - 0.5)
    }

    /// Visible part of the sheet for a panel at `position`, or `None` when
    /// it is entirely below the area.
    pub fn sheet_rect(&self, position: Point) -> Option<CellRect> {
        let top = f64::from(self.shown_top()) - position.y;
        let top = top.round().max(f64::from(self.area.y));
        let bottom = f64::from(self.area.bottom());
        if top >= bottom {
            return None;
        }
        let rows = (bottom - top).min(f64::from(self.sheet_rows));
        // Both values are bounded by the u16 area above.
        Some(CellRect::new(self.area.x, top as u16, self.area.width, rows as u16))
    }
}

/// Host for the terminal sheet.
#[derive(Debug)]
pub struct SheetHost {
    mapping: CellMapping,
    /// Whether the sheet overlay (the panel's parent) is drawn at all.
    parent_active: bool,
    sheet_area: Option<CellRect>,
}

impl SheetHost {
    pub fn new(mapping: CellMapping) -> Self {
        Self {
            mapping,
            parent_active: true,
            sheet_area: mapping.sheet_rect(Point::default()),
        }
    }

    pub fn mapping(&self) -> CellMapping {
        self.mapping
    }

    /// Switch to a new terminal size.  The caller re-creates the panel.
    pub fn set_mapping(&mut self, mapping: CellMapping) {
        self.mapping = mapping;
        self.sheet_area = mapping.sheet_rect(Point::default());
    }

    /// Where to draw the sheet this frame, if anywhere.
    pub fn sheet_area(&self) -> Option<CellRect> {
        if self.parent_active {
            self.sheet_area
        } else {
            None
        }
    }
}

impl LayoutRefresh for SheetHost {
    fn refresh_layout(&mut self, position: Point) {
        self.sheet_area = self.mapping.sheet_rect(position);
    }
}

impl HitTest for SheetHost {
    fn hit_test(&self, region: Rect, point: Point) -> bool {
        self.parent_active && region.translated(self.mapping.anchor()).contains(point)
    }
}

impl ParentVisibility for SheetHost {
    fn set_active(&mut self, active: bool) {
        tracing::debug!(active, "sheet overlay visibility changed");
        self.parent_active = active;
    }

    fn is_active(&self) -> bool {
        self.parent_active
    }
}

impl PanelHost for SheetHost {
    fn parent(&mut self) -> Option<&mut dyn ParentVisibility> {
        Some(self)
    }
}
