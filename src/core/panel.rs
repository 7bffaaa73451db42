//! The swipe-to-dismiss panel.
//!
//! State machine:
//!
//! ```text
//!            pointer down on handle           release past threshold
//!   Shown ───────────────────────────▶ Dragging ────────────────────▶ AnimatingToHidden ──▶ Hidden
//!     ▲                                   │                                                   │
//!     │       release short / cancel      ▼                     show_panel()                  │
//!     └──────────────────────────── AnimatingToShown ◀────────────────────────────────────────┘
//! ```
//!
//! Deactivation is a hard reset to `Hidden` from any state.

use std::time::Duration;

use super::animation::{
    show_duration, AccelerationRule, DismissTiming, Easing, PanelAnimation, Transition,
};
use super::geometry::{PanelGeometry, Point, Rect, Size};
use super::gesture::{DragSession, PointerPhase, PointerSample, ReleaseOutcome};
use super::host::PanelHost;

/// Debug diagnostics, emitted only while the panel's debug logging is on.
macro_rules! panel_log {
    ($panel:expr, $($arg:tt)+) => {
        if $panel.tuning.debug_logging {
            tracing::debug!(target: "pulldown_sheet::panel", $($arg)+);
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Hidden,
    Shown,
    Dragging,
    AnimatingToShown,
    AnimatingToHidden,
}

impl PanelState {
    pub fn label(self) -> &'static str {
        match self {
            PanelState::Hidden => "hidden",
            PanelState::Shown => "shown",
            PanelState::Dragging => "dragging",
            PanelState::AnimatingToShown => "showing",
            PanelState::AnimatingToHidden => "dismissing",
        }
    }

    /// States in which pointer input is consumed.
    pub fn accepts_input(self) -> bool {
        matches!(self, PanelState::Shown | PanelState::Dragging)
    }
}

/// Behaviour knobs for a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelTuning {
    /// Fraction of the height a release must have travelled to dismiss.
    pub dismiss_threshold: f64,
    /// Duration of a full-height show; shorter distances scale it down.
    pub show_duration: Duration,
    pub reset_duration: Duration,
    pub dismiss: DismissTiming,
    pub acceleration: AccelerationRule,
    pub debug_logging: bool,
}

impl Default for PanelTuning {
    fn default() -> Self {
        Self {
            dismiss_threshold: 0.3,
            show_duration: Duration::from_millis(300),
            reset_duration: Duration::from_millis(200),
            dismiss: DismissTiming::default(),
            acceleration: AccelerationRule::default(),
            debug_logging: true,
        }
    }
}

/// Where the hosting layout has the panel when the component is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    /// Anchored position of the fully visible panel.
    pub shown: Point,
    /// Anchored position the panel currently has.
    pub current: Point,
    pub size: Size,
}

#[derive(Debug)]
pub struct DismissPanel {
    tuning: PanelTuning,
    geometry: PanelGeometry,
    /// Drag handle in panel-local coordinates; `None` means the whole panel.
    handle: Option<Rect>,
    state: PanelState,
    drag: Option<DragSession>,
    animation: Option<PanelAnimation>,
    initially_visible: bool,
    active: bool,
}

impl DismissPanel {
    /// Capture geometry and settle the initial state.
    ///
    /// A panel created at its shown position starts `Shown`; anything else
    /// is snapped off-screen and starts `Hidden`.
    pub fn new(
        tuning: PanelTuning,
        layout: PanelLayout,
        handle: Option<Rect>,
        host: &mut impl PanelHost,
    ) -> Self {
        let geometry = PanelGeometry::new(layout.shown, layout.size, layout.current);
        let initially_visible = geometry.is_at_shown();

        let mut panel = Self {
            tuning,
            geometry,
            handle,
            state: PanelState::Hidden,
            drag: None,
            animation: None,
            initially_visible,
            active: true,
        };

        panel_log!(
            panel,
            height = panel.geometry.height(),
            shown = ?panel.geometry.shown_position(),
            initially_visible,
            "panel initialized"
        );

        if initially_visible {
            panel.state = PanelState::Shown;
        } else {
            panel.snap_off_screen(host);
        }
        panel
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn position(&self) -> Point {
        self.geometry.position()
    }

    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    pub fn tuning(&self) -> &PanelTuning {
        &self.tuning
    }

    pub fn set_debug_logging(&mut self, enabled: bool) {
        self.tuning.debug_logging = enabled;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `true` when sitting exactly at the shown position with nothing in flight.
    pub fn is_fully_shown(&self) -> bool {
        self.state == PanelState::Shown
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn animation(&self) -> Option<&PanelAnimation> {
        self.animation.as_ref()
    }

    /// Drag handle region in anchored space at the panel's current position.
    pub fn handle_region(&self) -> Rect {
        self.handle
            .unwrap_or_else(|| self.geometry.local_bounds())
            .translated(self.geometry.position())
    }

    // ── lifecycle ───────────────────────────────────────────────

    /// The component was enabled.
    pub fn activate(&mut self, host: &mut impl PanelHost) {
        if self.active {
            return;
        }
        self.active = true;
        if !self.initially_visible && self.state == PanelState::Hidden {
            self.snap_off_screen(host);
        }
        panel_log!(self, state = self.state.label(), "panel activated");
    }

    /// The component was disabled: drop everything in flight and hide.
    pub fn deactivate(&mut self) {
        self.cancel_animation();
        self.drag = None;
        self.state = PanelState::Hidden;
        self.active = false;
        panel_log!(self, "panel deactivated");
    }

    // ── input ───────────────────────────────────────────────────

    /// Feed one pointer sample.  Returns `true` if the sample was consumed.
    pub fn handle_pointer(&mut self, sample: PointerSample, host: &mut impl PanelHost) -> bool {
        if !self.active || !self.state.accepts_input() {
            return false;
        }

        match sample.phase {
            PointerPhase::Began => {
                if self.state != PanelState::Shown {
                    return false;
                }
                if !host.hit_test(self.handle_region(), sample.position) {
                    return false;
                }
                self.begin_drag(sample);
                true
            }
            PointerPhase::Moved => {
                if self.state != PanelState::Dragging {
                    return false;
                }
                self.continue_drag(sample, host);
                true
            }
            PointerPhase::Ended => {
                if self.state != PanelState::Dragging {
                    return false;
                }
                self.end_drag(sample);
                true
            }
            PointerPhase::Cancelled => {
                if self.state != PanelState::Dragging {
                    return false;
                }
                self.drag = None;
                panel_log!(self, "drag cancelled");
                self.start_reset(sample.time);
                true
            }
        }
    }

    fn begin_drag(&mut self, sample: PointerSample) {
        self.cancel_animation();
        self.drag = Some(DragSession::begin(sample.position, sample.time));
        self.state = PanelState::Dragging;
        panel_log!(self, start = ?sample.position, "drag started");
    }

    fn continue_drag(&mut self, sample: PointerSample, host: &mut impl PanelHost) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        let delta_y = drag.step_delta(sample.position);
        drag.record(sample.position, sample.time);

        // Only downward motion moves the panel; upward moves are ignored.
        if delta_y < 0.0 {
            let applied = self.geometry.clamp_drag_delta(delta_y);
            let position = self.geometry.position().offset(0.0, applied);
            self.geometry.set_position(position, host);
            panel_log!(self, y = position.y, "panel dragged");
        }
    }

    fn end_drag(&mut self, sample: PointerSample) {
        let Some(drag) = self.drag.take() else {
            return;
        };

        let release = drag.release(sample.position, sample.time);
        panel_log!(
            self,
            delta_y = release.total_delta,
            velocity = release.velocity,
            "drag ended"
        );

        match release.outcome(self.geometry.height(), self.tuning.dismiss_threshold) {
            ReleaseOutcome::Dismiss { velocity } => self.start_dismiss(velocity, sample.time),
            ReleaseOutcome::Reset => self.start_reset(sample.time),
        }
    }

    // ── transitions ─────────────────────────────────────────────

    /// Bring the panel back.  No-op while already shown (or held by a drag).
    ///
    /// Returns `true` if a show animation was started.
    pub fn show_panel(&mut self, now: Duration, host: &mut impl PanelHost) -> bool {
        if matches!(self.state, PanelState::Shown | PanelState::Dragging) {
            panel_log!(self, "panel is already fully shown, ignoring show request");
            return false;
        }

        panel_log!(self, "show panel requested");
        self.cancel_animation();
        self.activate(host);

        let from = self.geometry.position().y;
        let to = self.geometry.shown_position().y;
        let duration = show_duration(
            self.tuning.show_duration,
            self.geometry.distance_to_shown(),
            self.geometry.height(),
        );

        self.animation = Some(PanelAnimation::new(
            Transition::Show,
            from,
            to,
            duration,
            Easing::OutQuint,
            now,
        ));
        self.state = PanelState::AnimatingToShown;
        true
    }

    fn start_reset(&mut self, now: Duration) {
        panel_log!(self, "resetting panel");
        self.cancel_animation();
        self.animation = Some(PanelAnimation::new(
            Transition::Reset,
            self.geometry.position().y,
            self.geometry.shown_position().y,
            self.tuning.reset_duration,
            Easing::OutQuint,
            now,
        ));
        self.state = PanelState::AnimatingToShown;
    }

    fn start_dismiss(&mut self, velocity: f64, now: Duration) {
        self.cancel_animation();

        let from = self.geometry.position().y;
        let to = self.geometry.min_y();
        let duration = self.tuning.dismiss.duration(to - from, velocity);
        panel_log!(self, velocity, ?duration, "dismissing panel");

        self.animation = Some(
            PanelAnimation::new(Transition::Dismiss, from, to, duration, Easing::InQuad, now)
                .with_acceleration(self.tuning.acceleration),
        );
        self.state = PanelState::AnimatingToHidden;
    }

    fn cancel_animation(&mut self) {
        if let Some(anim) = self.animation.take() {
            panel_log!(self, transition = anim.transition().label(), "animation cancelled");
        }
    }

    // ── frame tick ──────────────────────────────────────────────

    /// Advance the in-flight animation to `now`.
    ///
    /// Returns the transition that completed during this tick, if any.
    pub fn tick(&mut self, now: Duration, host: &mut impl PanelHost) -> Option<Transition> {
        let anim = self.animation.as_mut()?;
        let done = anim.advance(now);
        let value = anim.value();
        let transition = anim.transition();

        let position = self.geometry.position().with_y(value);
        self.geometry.set_position(position, host);

        if !done {
            return None;
        }

        self.animation = None;
        self.complete(transition, host);
        Some(transition)
    }

    fn complete(&mut self, transition: Transition, host: &mut impl PanelHost) {
        match transition {
            Transition::Show | Transition::Reset => {
                let shown = self.geometry.shown_position();
                let position = self.geometry.position().with_y(shown.y);
                self.geometry.set_position(position, host);
                self.state = PanelState::Shown;
                panel_log!(self, transition = transition.label(), "panel shown");
            }
            Transition::Dismiss => {
                let position = self.geometry.position().with_y(self.geometry.min_y());
                self.geometry.set_position(position, host);
                self.state = PanelState::Hidden;
                panel_log!(self, "panel dismissed");

                if let Some(parent) = host.parent() {
                    parent.set_active(false);
                    panel_log!(self, "parent deactivated");
                }
            }
        }
    }

    fn snap_off_screen(&mut self, host: &mut impl PanelHost) {
        let off_screen = self.geometry.off_screen_position();
        self.geometry.set_position(off_screen, host);
        panel_log!(self, position = ?off_screen, "panel positioned off-screen");
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::core::host::{HitTest, LayoutRefresh, ParentVisibility};

    #[derive(Debug, Default)]
    struct Parent {
        active: bool,
        deactivations: usize,
    }

    impl ParentVisibility for Parent {
        fn set_active(&mut self, active: bool) {
            if !active {
                self.deactivations += 1;
            }
            self.active = active;
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    #[derive(Debug, Default)]
    struct TestHost {
        layout_passes: usize,
        parent: Option<Parent>,
    }

    impl TestHost {
        fn with_parent() -> Self {
            Self {
                layout_passes: 0,
                parent: Some(Parent {
                    active: true,
                    deactivations: 0,
                }),
            }
        }

        fn deactivations(&self) -> usize {
            self.parent.as_ref().map_or(0, |p| p.deactivations)
        }
    }

    impl LayoutRefresh for TestHost {
        fn refresh_layout(&mut self, _position: Point) {
            self.layout_passes += 1;
        }
    }

    impl HitTest for TestHost {}

    impl PanelHost for TestHost {
        fn parent(&mut self) -> Option<&mut dyn ParentVisibility> {
            self.parent.as_mut().map(|p| p as &mut dyn ParentVisibility)
        }
    }

    const HEIGHT: f64 = 500.0;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn sample(phase: PointerPhase, y: f64, t: u64) -> PointerSample {
        PointerSample::new(phase, Point::new(50.0, y), ms(t))
    }

    fn shown_panel(host: &mut TestHost) -> DismissPanel {
        let layout = PanelLayout {
            shown: Point::new(0.0, 0.0),
            current: Point::new(0.0, 0.0),
            size: Size::new(200.0, HEIGHT),
        };
        DismissPanel::new(PanelTuning::default(), layout, None, host)
    }

    /// Press at y=-10 (inside the panel), move down to `to`, release there.
    fn drag_to(panel: &mut DismissPanel, host: &mut TestHost, to: f64) {
        assert!(panel.handle_pointer(sample(PointerPhase::Began, -10.0, 0), host));
        assert!(panel.handle_pointer(sample(PointerPhase::Moved, to, 100), host));
        assert!(panel.handle_pointer(sample(PointerPhase::Ended, to, 120), host));
    }

    fn run_to_completion(panel: &mut DismissPanel, host: &mut TestHost, from: u64) -> Option<Transition> {
        let mut t = from;
        for _ in 0..200 {
            t += 16;
            if let Some(done) = panel.tick(ms(t), host) {
                return Some(done);
            }
        }
        None
    }

    #[test]
    fn starts_shown_when_created_at_shown_position() {
        let mut host = TestHost::default();
        let panel = shown_panel(&mut host);
        assert_eq!(panel.state(), PanelState::Shown);
        assert_eq!(host.layout_passes, 0);
    }

    #[test]
    fn starts_hidden_and_snapped_off_screen_otherwise() {
        let mut host = TestHost::default();
        let layout = PanelLayout {
            shown: Point::new(0.0, 0.0),
            current: Point::new(0.0, -40.0),
            size: Size::new(200.0, HEIGHT),
        };
        let panel = DismissPanel::new(PanelTuning::default(), layout, None, &mut host);
        assert_eq!(panel.state(), PanelState::Hidden);
        assert_eq!(panel.position(), Point::new(0.0, -HEIGHT));
        assert!(panel.animation().is_none());
        assert_eq!(host.layout_passes, 1);
    }

    #[test]
    fn long_drag_dismisses_and_hides_parent_once() {
        let mut host = TestHost::with_parent();
        let mut panel = shown_panel(&mut host);

        // 190 below the press point, threshold is 150.
        drag_to(&mut panel, &mut host, -200.0);
        assert_eq!(panel.state(), PanelState::AnimatingToHidden);
        assert!(panel.drag_session().is_none());

        assert_eq!(run_to_completion(&mut panel, &mut host, 120), Some(Transition::Dismiss));
        assert_eq!(panel.state(), PanelState::Hidden);
        assert_eq!(panel.position().y, -HEIGHT);
        assert_eq!(host.deactivations(), 1);
        assert!(!host.parent.as_ref().is_some_and(|p| p.is_active()));

        // Further ticks do nothing.
        assert_eq!(panel.tick(ms(5000), &mut host), None);
        assert_eq!(host.deactivations(), 1);
    }

    #[test]
    fn short_drag_resets_to_shown_position() {
        let mut host = TestHost::with_parent();
        let mut panel = shown_panel(&mut host);

        drag_to(&mut panel, &mut host, -100.0);
        assert_eq!(panel.state(), PanelState::AnimatingToShown);
        assert_abs_diff_eq!(panel.position().y, -90.0);

        assert_eq!(run_to_completion(&mut panel, &mut host, 120), Some(Transition::Reset));
        assert_eq!(panel.state(), PanelState::Shown);
        assert_eq!(panel.position(), Point::new(0.0, 0.0));
        assert_eq!(host.deactivations(), 0);
    }

    #[test]
    fn reset_duration_does_not_depend_on_drag_length() {
        for to in [-20.0, -80.0, -140.0] {
            let mut host = TestHost::default();
            let mut panel = shown_panel(&mut host);

            drag_to(&mut panel, &mut host, to);
            let anim = panel.animation().expect("reset animation");
            assert_eq!(anim.transition(), Transition::Reset);
            assert_eq!(anim.duration(), panel.tuning().reset_duration, "released at {to}");
            assert_eq!(anim.easing(), Easing::OutQuint);
        }
    }

    #[test]
    fn each_transition_uses_its_curve() {
        let mut host = TestHost::with_parent();
        let mut panel = shown_panel(&mut host);

        drag_to(&mut panel, &mut host, -400.0);
        let dismiss = panel.animation().expect("dismiss animation");
        assert_eq!(dismiss.transition(), Transition::Dismiss);
        assert_eq!(dismiss.easing(), Easing::InQuad);

        run_to_completion(&mut panel, &mut host, 120);
        assert!(panel.show_panel(ms(1000), &mut host));
        let show = panel.animation().expect("show animation");
        assert_eq!(show.transition(), Transition::Show);
        assert_eq!(show.easing(), Easing::OutQuint);
    }

    #[test]
    fn release_exactly_at_threshold_resets() {
        let mut host = TestHost::default();
        let mut panel = shown_panel(&mut host);

        assert!(panel.handle_pointer(sample(PointerPhase::Began, -1.0, 0), &mut host));
        assert!(panel.handle_pointer(sample(PointerPhase::Moved, -151.0, 50), &mut host));
        assert!(panel.handle_pointer(sample(PointerPhase::Ended, -151.0, 60), &mut host));
        assert_eq!(panel.state(), PanelState::AnimatingToShown);
    }

    #[test]
    fn pointer_down_outside_handle_is_ignored() {
        let mut host = TestHost::default();
        let mut panel = shown_panel(&mut host);

        // Above the panel's top edge.
        assert!(!panel.handle_pointer(sample(PointerPhase::Began, 25.0, 0), &mut host));
        assert_eq!(panel.state(), PanelState::Shown);
        assert!(panel.drag_session().is_none());

        // Moves and releases without a session are ignored too.
        assert!(!panel.handle_pointer(sample(PointerPhase::Moved, -300.0, 10), &mut host));
        assert!(!panel.handle_pointer(sample(PointerPhase::Ended, -300.0, 20), &mut host));
        assert_eq!(panel.position().y, 0.0);
    }

    #[test]
    fn custom_handle_limits_where_drags_begin() {
        let mut host = TestHost::default();
        let layout = PanelLayout {
            shown: Point::new(0.0, 0.0),
            current: Point::new(0.0, 0.0),
            size: Size::new(200.0, HEIGHT),
        };
        // Top 20 units of the panel.
        let handle = Rect::new(0.0, -20.0, 200.0, 20.0);
        let mut panel = DismissPanel::new(PanelTuning::default(), layout, Some(handle), &mut host);

        assert!(!panel.handle_pointer(sample(PointerPhase::Began, -100.0, 0), &mut host));
        assert!(panel.handle_pointer(sample(PointerPhase::Began, -10.0, 0), &mut host));
        assert_eq!(panel.state(), PanelState::Dragging);
    }

    #[test]
    fn upward_moves_are_ignored_not_reversed() {
        let mut host = TestHost::default();
        let mut panel = shown_panel(&mut host);

        panel.handle_pointer(sample(PointerPhase::Began, -10.0, 0), &mut host);
        panel.handle_pointer(sample(PointerPhase::Moved, -90.0, 10), &mut host);
        assert_abs_diff_eq!(panel.position().y, -80.0);

        panel.handle_pointer(sample(PointerPhase::Moved, -40.0, 20), &mut host);
        assert_abs_diff_eq!(panel.position().y, -80.0);

        // Measured from the last sample, not from where the panel is.
        panel.handle_pointer(sample(PointerPhase::Moved, -60.0, 30), &mut host);
        assert_abs_diff_eq!(panel.position().y, -100.0);
    }

    #[test]
    fn gestures_are_ignored_while_animating() {
        let mut host = TestHost::default();
        let mut panel = shown_panel(&mut host);

        drag_to(&mut panel, &mut host, -100.0);
        assert_eq!(panel.state(), PanelState::AnimatingToShown);
        assert!(!panel.handle_pointer(sample(PointerPhase::Began, -50.0, 130), &mut host));
        assert_eq!(panel.state(), PanelState::AnimatingToShown);
    }

    #[test]
    fn cancel_mid_drag_resets() {
        let mut host = TestHost::default();
        let mut panel = shown_panel(&mut host);

        panel.handle_pointer(sample(PointerPhase::Began, -10.0, 0), &mut host);
        panel.handle_pointer(sample(PointerPhase::Moved, -300.0, 10), &mut host);
        assert!(panel.handle_pointer(sample(PointerPhase::Cancelled, -300.0, 20), &mut host));
        assert!(panel.drag_session().is_none());
        assert_eq!(panel.state(), PanelState::AnimatingToShown);

        run_to_completion(&mut panel, &mut host, 20);
        assert_eq!(panel.state(), PanelState::Shown);
    }

    #[test]
    fn show_from_hidden_lands_exactly_on_shown_position() {
        let mut host = TestHost::with_parent();
        let mut panel = shown_panel(&mut host);
        drag_to(&mut panel, &mut host, -400.0);
        run_to_completion(&mut panel, &mut host, 120);
        assert_eq!(panel.state(), PanelState::Hidden);

        assert!(panel.show_panel(ms(1000), &mut host));
        assert_eq!(panel.state(), PanelState::AnimatingToShown);
        assert_eq!(panel.animation().map(|a| a.duration()), Some(ms(300)));

        assert_eq!(run_to_completion(&mut panel, &mut host, 1000), Some(Transition::Show));
        assert_eq!(panel.state(), PanelState::Shown);
        assert_eq!(panel.position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn show_while_shown_is_a_no_op() {
        let mut host = TestHost::default();
        let mut panel = shown_panel(&mut host);
        let passes = host.layout_passes;

        assert!(!panel.show_panel(ms(0), &mut host));
        assert_eq!(panel.state(), PanelState::Shown);
        assert!(panel.animation().is_none());
        assert_eq!(host.layout_passes, passes);
    }

    #[test]
    fn show_interrupts_dismissal() {
        let mut host = TestHost::with_parent();
        let mut panel = shown_panel(&mut host);
        drag_to(&mut panel, &mut host, -300.0);
        panel.tick(ms(150), &mut host);
        assert_eq!(panel.state(), PanelState::AnimatingToHidden);

        assert!(panel.show_panel(ms(150), &mut host));
        assert_eq!(panel.animation().map(|a| a.transition()), Some(Transition::Show));
        run_to_completion(&mut panel, &mut host, 150);
        assert_eq!(panel.state(), PanelState::Shown);
        assert_eq!(host.deactivations(), 0);
    }

    #[test]
    fn deactivate_mid_drag_forces_hidden() {
        let mut host = TestHost::default();
        let mut panel = shown_panel(&mut host);

        panel.handle_pointer(sample(PointerPhase::Began, -10.0, 0), &mut host);
        panel.handle_pointer(sample(PointerPhase::Moved, -60.0, 10), &mut host);
        assert_eq!(panel.state(), PanelState::Dragging);
        panel.deactivate();

        assert_eq!(panel.state(), PanelState::Hidden);
        assert!(panel.drag_session().is_none());
        assert!(!panel.is_active());
        assert!(!panel.handle_pointer(sample(PointerPhase::Moved, -90.0, 20), &mut host));
    }

    #[test]
    fn deactivate_mid_animation_cancels_it() {
        let mut host = TestHost::with_parent();
        let mut panel = shown_panel(&mut host);
        drag_to(&mut panel, &mut host, -300.0);
        panel.tick(ms(140), &mut host);

        panel.deactivate();
        assert_eq!(panel.state(), PanelState::Hidden);
        assert!(panel.animation().is_none());
        assert_eq!(panel.tick(ms(2000), &mut host), None);
        assert_eq!(host.deactivations(), 0);
    }

    #[test]
    fn show_reactivates_and_restarts_from_off_screen() {
        let mut host = TestHost::default();
        let layout = PanelLayout {
            shown: Point::new(0.0, 0.0),
            current: Point::new(0.0, -HEIGHT),
            size: Size::new(200.0, HEIGHT),
        };
        let mut panel = DismissPanel::new(PanelTuning::default(), layout, None, &mut host);
        panel.deactivate();

        assert!(panel.show_panel(ms(0), &mut host));
        assert!(panel.is_active());
        assert_eq!(panel.animation().map(|a| a.from()), Some(-HEIGHT));
    }

    #[test]
    fn reactivating_a_panel_created_off_screen_snaps_it_back() {
        let mut host = TestHost::default();
        let layout = PanelLayout {
            shown: Point::new(0.0, 0.0),
            current: Point::new(0.0, -120.0),
            size: Size::new(200.0, HEIGHT),
        };
        let mut panel = DismissPanel::new(PanelTuning::default(), layout, None, &mut host);
        assert!(panel.show_panel(ms(0), &mut host));
        panel.tick(ms(60), &mut host);
        let mid = panel.position().y;
        assert!(mid > -HEIGHT && mid < 0.0, "mid-show position {mid}");

        panel.deactivate();
        assert_eq!(panel.position().y, mid);
        panel.activate(&mut host);

        assert_eq!(panel.state(), PanelState::Hidden);
        assert_eq!(panel.position(), panel.geometry().off_screen_position());
    }

    #[test]
    fn reactivating_an_initially_shown_panel_leaves_it_in_place() {
        let mut host = TestHost::default();
        let mut panel = shown_panel(&mut host);
        panel.handle_pointer(sample(PointerPhase::Began, -10.0, 0), &mut host);
        panel.handle_pointer(sample(PointerPhase::Moved, -100.0, 10), &mut host);
        panel.deactivate();
        let passes = host.layout_passes;

        panel.activate(&mut host);
        assert!(panel.is_active());
        assert_eq!(panel.state(), PanelState::Hidden);
        assert_abs_diff_eq!(panel.position().y, -90.0);
        assert_eq!(host.layout_passes, passes);
    }

    #[test]
    fn missing_parent_is_skipped() {
        let mut host = TestHost::default();
        let mut panel = shown_panel(&mut host);
        drag_to(&mut panel, &mut host, -400.0);
        assert_eq!(run_to_completion(&mut panel, &mut host, 120), Some(Transition::Dismiss));
        assert_eq!(panel.state(), PanelState::Hidden);
    }

    #[test]
    fn zero_height_panel_does_not_divide_by_zero() {
        let mut host = TestHost::with_parent();
        let layout = PanelLayout {
            shown: Point::new(0.0, 0.0),
            current: Point::new(0.0, 0.0),
            size: Size::new(200.0, 0.0),
        };
        let handle = Rect::new(0.0, -10.0, 200.0, 20.0);
        let mut panel = DismissPanel::new(PanelTuning::default(), layout, Some(handle), &mut host);

        panel.handle_pointer(sample(PointerPhase::Began, 0.0, 0), &mut host);
        panel.handle_pointer(sample(PointerPhase::Ended, -5.0, 0), &mut host);
        assert_eq!(panel.state(), PanelState::AnimatingToHidden);
        let duration = panel.animation().map(|a| a.duration());
        assert_eq!(duration, Some(panel.tuning().dismiss.min));

        run_to_completion(&mut panel, &mut host, 0);
        assert!(panel.show_panel(ms(1000), &mut host));
        assert_eq!(panel.tick(ms(1000), &mut host), Some(Transition::Show));
        assert_eq!(panel.position().y, 0.0);
    }

    #[test]
    fn every_animation_step_refreshes_layout() {
        let mut host = TestHost::default();
        let mut panel = shown_panel(&mut host);
        drag_to(&mut panel, &mut host, -100.0);
        let before = host.layout_passes;

        panel.tick(ms(130), &mut host);
        panel.tick(ms(140), &mut host);
        assert_eq!(host.layout_passes, before + 2);
    }

    proptest! {
        #[test]
        fn drag_never_leaves_the_allowed_range(moves in prop::collection::vec(-400.0f64..400.0, 1..40)) {
            let mut host = TestHost::default();
            let mut panel = shown_panel(&mut host);
            panel.handle_pointer(sample(PointerPhase::Began, -1.0, 0), &mut host);

            let mut y = -1.0;
            for (i, dy) in moves.iter().enumerate() {
                y += dy;
                panel.handle_pointer(sample(PointerPhase::Moved, y, 10 * (i as u64 + 1)), &mut host);
                let py = panel.position().y;
                prop_assert!((-HEIGHT..=0.0).contains(&py));
            }

            let end = 10 * (moves.len() as u64 + 1);
            panel.handle_pointer(sample(PointerPhase::Ended, y, end), &mut host);
            let mut t = end;
            while panel.animation().is_some() {
                t += 16;
                panel.tick(ms(t), &mut host);
                let py = panel.position().y;
                prop_assert!((-HEIGHT - 1e-9..=1e-9).contains(&py));
            }
            prop_assert!(matches!(panel.state(), PanelState::Shown | PanelState::Hidden));
        }

        #[test]
        fn dismiss_duration_respects_window(fling_ms in 0u64..500, to in -500.0f64..-160.0) {
            let mut host = TestHost::default();
            let mut panel = shown_panel(&mut host);
            panel.handle_pointer(sample(PointerPhase::Began, -1.0, 0), &mut host);
            panel.handle_pointer(sample(PointerPhase::Moved, to + 5.0, 100), &mut host);
            panel.handle_pointer(sample(PointerPhase::Ended, to, 100 + fling_ms), &mut host);

            let timing = panel.tuning().dismiss;
            let duration = panel.animation().map(|a| a.duration());
            prop_assert!(duration.is_some_and(|d| d >= timing.min && d <= timing.max));
        }
    }
}
