//! Collaborators the panel talks to.
//!
//! The panel never owns the surrounding UI.  Whoever hosts it implements
//! these traits and passes itself into every operation that may move the
//! panel, hit-test a pointer, or hide the parent.

use super::geometry::{Point, Rect};

/// Re-flow anything laid out relative to the panel.
///
/// Called synchronously after every position mutation.  Must be idempotent.
pub trait LayoutRefresh {
    fn refresh_layout(&mut self, position: Point);
}

/// Decides whether a pointer lies inside a region.
pub trait HitTest {
    /// `region` is already translated to the panel's current anchored
    /// position.  Hosts whose pointer space differs from anchored space
    /// apply their own transform here.
    fn hit_test(&self, region: Rect, point: Point) -> bool {
        region.contains(point)
    }
}

/// An object with an on/off activity flag.
pub trait ParentVisibility {
    fn set_active(&mut self, active: bool);
    fn is_active(&self) -> bool;
}

/// Everything a [`DismissPanel`](super::panel::DismissPanel) needs from its host.
pub trait PanelHost: LayoutRefresh + HitTest {
    /// The object to deactivate once a dismissal completes, if any.
    fn parent(&mut self) -> Option<&mut dyn ParentVisibility> {
        None
    }
}
