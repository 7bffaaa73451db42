//! Single-pointer drag tracking.
//!
//! A [`DragSession`] only exists between pointer-down on the handle and the
//! matching release or cancel.  It remembers where the drag started and the
//! most recent sample, which is all the release decision needs.

use std::time::Duration;

use super::geometry::Point;

/// Fastest release speed we believe, in pointer units per second.
///
/// Also stands in for the speed of a release that arrives in the same
/// instant as the previous sample.
pub const MAX_RELEASE_SPEED: f64 = 8_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Began,
    Moved,
    Ended,
    /// The host lost the pointer mid-gesture.
    Cancelled,
}

/// One pointer sample from the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub phase: PointerPhase,
    pub position: Point,
    pub time: Duration,
}

impl PointerSample {
    pub fn new(phase: PointerPhase, position: Point, time: Duration) -> Self {
        Self {
            phase,
            position,
            time,
        }
    }
}

/// What a release means for the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseOutcome {
    /// Dragged far enough downward: slide off-screen at `velocity`.
    Dismiss { velocity: f64 },
    /// Not far enough: snap back.
    Reset,
}

/// Measurements taken at release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    /// Pointer travel from the start of the drag (negative = downward).
    pub total_delta: f64,
    /// Vertical velocity over the last sample interval.
    pub velocity: f64,
}

impl Release {
    /// Dismiss when the drag went down by more than `threshold` of `height`.
    pub fn outcome(&self, height: f64, threshold: f64) -> ReleaseOutcome {
        if self.total_delta < 0.0 && self.total_delta.abs() > height * threshold {
            ReleaseOutcome::Dismiss {
                velocity: self.velocity,
            }
        } else {
            ReleaseOutcome::Reset
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    start: Point,
    last: Point,
    last_time: Duration,
}

impl DragSession {
    pub fn begin(position: Point, time: Duration) -> Self {
        Self {
            start: position,
            last: position,
            last_time: time,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn last(&self) -> Point {
        self.last
    }

    /// Vertical movement since the previous sample.
    pub fn step_delta(&self, position: Point) -> f64 {
        position.y - self.last.y
    }

    pub fn record(&mut self, position: Point, time: Duration) {
        self.last = position;
        self.last_time = time;
    }

    pub fn release(&self, position: Point, time: Duration) -> Release {
        Release {
            total_delta: position.y - self.start.y,
            velocity: self.velocity(position, time),
        }
    }

    /// Velocity between the last recorded sample and `position`.
    ///
    /// Never NaN or infinite: a zero time step yields zero for no movement
    /// and [`MAX_RELEASE_SPEED`] in the direction of motion otherwise.
    pub fn velocity(&self, position: Point, time: Duration) -> f64 {
        let dy = position.y - self.last.y;
        let dt = time.saturating_sub(self.last_time).as_secs_f64();

        if !dy.is_finite() || dy == 0.0 {
            return 0.0;
        }
        if dt <= 0.0 {
            return dy.signum() * MAX_RELEASE_SPEED;
        }
        (dy / dt).clamp(-MAX_RELEASE_SPEED, MAX_RELEASE_SPEED)
    }
}
