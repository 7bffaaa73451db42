//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::host::CellMapping;
use super::state::{ActiveView, AppState};
use crate::config::Action;
use crate::core::animation::Transition;
use crate::core::gesture::{PointerPhase, PointerSample};
use crate::core::host::ParentVisibility;

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    if state.active_view == ActiveView::Help {
        // Any key closes the popup; the help binding toggles it.
        state.active_view = ActiveView::Main;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    run_action(state, action);
}

pub fn run_action(state: &mut AppState, action: Action) {
    match action {
        Action::Quit => state.should_quit = true,
        Action::Help => state.active_view = ActiveView::Help,
        Action::ShowPanel => {
            // The dismissal hid the overlay; bring it back before showing.
            if !state.host.is_active() {
                state.host.set_active(true);
            }
            let now = state.clock.now();
            if state.panel.show_panel(now, &mut state.host) {
                state.status_message = None;
            } else {
                state.status_message = Some("Panel is already shown".to_string());
            }
        }
        Action::ToggleActive => {
            if state.panel.is_active() {
                state.panel.deactivate();
                state.status_message = Some("Panel disabled".to_string());
            } else {
                state.panel.activate(&mut state.host);
                state.status_message = Some("Panel enabled".to_string());
            }
        }
        Action::ToggleDebug => {
            let enabled = !state.panel.tuning().debug_logging;
            state.panel.set_debug_logging(enabled);
            state.config.panel.debug_logging = enabled;
            state.status_message = Some(format!(
                "Debug log {}",
                if enabled { "on" } else { "off" }
            ));
        }
    }
}

/// Process a mouse event.  The left button is the single pointer contact.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Main {
        return;
    }

    let phase = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerPhase::Began,
        MouseEventKind::Drag(MouseButton::Left) => PointerPhase::Moved,
        MouseEventKind::Up(MouseButton::Left) => PointerPhase::Ended,
        _ => return,
    };
    let sample = PointerSample::new(
        phase,
        CellMapping::cell_to_point(mouse.column, mouse.row),
        state.clock.now(),
    );
    if state.panel.handle_pointer(sample, &mut state.host) {
        tracing::trace!(?phase, column = mouse.column, row = mouse.row, "pointer consumed");
    }
}

/// The terminal lost focus: a drag in progress can never see its release.
pub fn handle_focus_lost(state: &mut AppState) {
    let sample = PointerSample::new(
        PointerPhase::Cancelled,
        state.panel.position(),
        state.clock.now(),
    );
    state.panel.handle_pointer(sample, &mut state.host);
}

/// Advance animations by one frame.
pub fn handle_frame(state: &mut AppState) {
    let now = state.clock.now();
    if let Some(done) = state.panel.tick(now, &mut state.host) {
        if done == Transition::Dismiss {
            state.status_message = Some(format!(
                "Dismissed. Press {} to bring it back",
                state.config.display_bindings(Action::ShowPanel)
            ));
        }
    }
}
