//! Panel geometry: anchored positions, bounds and drag clamping.
//!
//! Coordinates are y-up: dragging the panel "down" the screen makes `y`
//! smaller.  The shown position is the top edge of the panel when fully
//! visible; the off-screen position sits exactly one panel height below it.

use super::host::LayoutRefresh;

/// Tolerance used when comparing anchored positions.
pub const POSITION_EPSILON: f64 = 1e-4;

/// A 2D point in anchored / pointer space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same point with a different vertical coordinate.
    pub fn with_y(self, y: f64) -> Self {
        Self { x: self.x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Panel size as reported by the hosting layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle.  `(x, y)` is the bottom-left corner; the
/// rectangle covers `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.x < self.x + self.width
            && p.y >= self.y
            && p.y < self.y + self.height
    }

    /// The rectangle moved by `by`.
    pub fn translated(self, by: Point) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
            ..self
        }
    }
}

/// Owns the panel's anchored position and the rules that bound it.
#[derive(Debug, Clone)]
pub struct PanelGeometry {
    shown: Point,
    size: Size,
    position: Point,
}

impl PanelGeometry {
    /// Capture geometry from the layout.  `position` is where the panel
    /// currently sits; it is not clamped.
    pub fn new(shown: Point, size: Size, position: Point) -> Self {
        let sanitize = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            shown,
            size: Size::new(sanitize(size.width), sanitize(size.height)),
            position,
        }
    }

    pub fn shown_position(&self) -> Point {
        self.shown
    }

    pub fn off_screen_position(&self) -> Point {
        Point::new(self.shown.x, self.min_y())
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Lowest allowed `y` (fully off-screen).
    pub fn min_y(&self) -> f64 {
        self.shown.y - self.size.height
    }

    /// Highest allowed `y` (fully shown).
    pub fn max_y(&self) -> f64 {
        self.shown.y
    }

    /// Set the position unconditionally and let the layout re-flow.
    pub fn set_position(&mut self, position: Point, layout: &mut impl LayoutRefresh) {
        self.position = position;
        layout.refresh_layout(position);
    }

    /// Vertical delta actually applied when the pointer moved by `delta_y`,
    /// keeping the result inside `[min_y, max_y]`.
    pub fn clamp_drag_delta(&self, delta_y: f64) -> f64 {
        let target = (self.position.y + delta_y).clamp(self.min_y(), self.max_y());
        target - self.position.y
    }

    pub fn is_at_shown(&self) -> bool {
        (self.position.y - self.shown.y).abs() <= POSITION_EPSILON
    }

    pub fn distance_to_shown(&self) -> f64 {
        (self.shown.y - self.position.y).abs()
    }

    pub fn distance_to_off_screen(&self) -> f64 {
        (self.position.y - self.min_y()).abs()
    }

    /// Panel bounds relative to its own anchored position.
    pub fn local_bounds(&self) -> Rect {
        Rect::new(0.0, -self.size.height, self.size.width, self.size.height)
    }
}
