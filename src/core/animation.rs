//! Time-bounded, eased panel transitions.
//!
//! An animation is plain resumable state: the owner calls
//! [`PanelAnimation::advance`] once per frame with the current clock value
//! and reads back [`PanelAnimation::value`].  Nothing blocks and nothing
//! runs in the background.

use std::time::Duration;

/// Which transition an animation is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Hidden (or partially hidden) back to the shown position.
    Show,
    /// Released drag snapping back to the shown position.
    Reset,
    /// Released drag sliding off-screen.
    Dismiss,
}

impl Transition {
    pub fn label(self) -> &'static str {
        match self {
            Transition::Show => "show",
            Transition::Reset => "reset",
            Transition::Dismiss => "dismiss",
        }
    }
}

/// Time-remapping curve applied to raw progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Quintic ease-out: fast start, long soft landing.
    #[default]
    OutQuint,
    /// Quadratic ease-in: starts slow, keeps accelerating.
    InQuad,
}

impl Easing {
    pub fn label(self) -> &'static str {
        match self {
            Easing::OutQuint => "out-quint",
            Easing::InQuad => "in-quad",
        }
    }

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::OutQuint => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv * inv * inv
            }
            Easing::InQuad => t * t,
        }
    }
}

/// Speeds up the tail of an animation and snaps the last bit.
///
/// Evaluated after every advance: once raw progress passes `boost_after`
/// the next step runs at `1 + (progress - 0.5) * 2` times real time, and
/// once it passes `snap_after` the animation jumps to its end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerationRule {
    pub boost_after: f64,
    pub snap_after: f64,
}

impl Default for AccelerationRule {
    fn default() -> Self {
        Self {
            boost_after: 0.8,
            snap_after: 0.9,
        }
    }
}

impl AccelerationRule {
    pub fn time_scale(&self, progress: f64) -> f64 {
        if progress > self.boost_after {
            1.0 + (progress - 0.5) * 2.0
        } else {
            1.0
        }
    }

    pub fn should_snap(&self, progress: f64) -> bool {
        progress > self.snap_after
    }
}

/// Duration window for the velocity-seeded dismiss animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DismissTiming {
    /// Applied to `distance / speed` before clamping.
    pub scale: f64,
    pub min: Duration,
    pub max: Duration,
}

impl Default for DismissTiming {
    fn default() -> Self {
        Self {
            scale: 0.7,
            min: Duration::from_millis(200),
            max: Duration::from_millis(500),
        }
    }
}

impl DismissTiming {
    /// Duration for covering `distance` when the pointer left at `velocity`.
    ///
    /// Always inside `[min, max]`.  Zero or NaN speed takes `max`, infinite
    /// speed takes `min`.
    pub fn duration(&self, distance: f64, velocity: f64) -> Duration {
        let (min, max) = self.bounds();
        let speed = velocity.abs();

        let secs = if speed.is_nan() || speed <= f64::EPSILON {
            max.as_secs_f64()
        } else if speed.is_infinite() {
            min.as_secs_f64()
        } else {
            distance.abs() / speed * self.scale
        };

        if !secs.is_finite() {
            return max;
        }
        Duration::from_secs_f64(secs.clamp(min.as_secs_f64(), max.as_secs_f64()))
    }

    /// `(min, max)` with the two swapped if configured backwards.
    pub fn bounds(&self) -> (Duration, Duration) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        }
    }
}

/// Show duration scaled by the fraction of the height still to travel.
pub fn show_duration(base: Duration, distance: f64, height: f64) -> Duration {
    if height.is_nan() || height <= f64::EPSILON || !distance.is_finite() {
        return Duration::ZERO;
    }
    let fraction = (distance.abs() / height).min(1.0);
    base.mul_f64(fraction)
}

/// A single vertical transition from `from` to `to`.
#[derive(Debug, Clone)]
pub struct PanelAnimation {
    transition: Transition,
    from: f64,
    to: f64,
    duration: Duration,
    easing: Easing,
    acceleration: Option<AccelerationRule>,
    /// Animation-time seconds elapsed (already time-scaled).
    elapsed: f64,
    time_scale: f64,
    last_tick: Duration,
}

impl PanelAnimation {
    pub fn new(
        transition: Transition,
        from: f64,
        to: f64,
        duration: Duration,
        easing: Easing,
        now: Duration,
    ) -> Self {
        Self {
            transition,
            from,
            to,
            duration,
            easing,
            acceleration: None,
            elapsed: 0.0,
            time_scale: 1.0,
            last_tick: now,
        }
    }

    pub fn with_acceleration(mut self, rule: AccelerationRule) -> Self {
        self.acceleration = Some(rule);
        self
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Raw time progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.duration.as_secs_f64();
        if total <= 0.0 {
            return 1.0;
        }
        (self.elapsed / total).clamp(0.0, 1.0)
    }

    /// Eased value at the current progress.
    pub fn value(&self) -> f64 {
        if self.is_done() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(self.progress())
    }

    pub fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Move the animation forward to `now`.  Returns `true` once finished.
    pub fn advance(&mut self, now: Duration) -> bool {
        let dt = now.saturating_sub(self.last_tick).as_secs_f64();
        self.last_tick = now;
        self.elapsed += dt * self.time_scale;

        if let Some(rule) = self.acceleration {
            let progress = self.progress();
            self.time_scale = rule.time_scale(progress);
            if rule.should_snap(progress) {
                self.elapsed = self.duration.as_secs_f64();
            }
        }

        self.is_done()
    }
}
