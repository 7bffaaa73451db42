//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::{Duration, Instant};

use ratatui::layout::Rect as CellRect;

use super::host::{CellMapping, SheetHost};
use crate::config::{AppConfig, HandleMode};
use crate::core::geometry::{Point, Rect};
use crate::core::panel::{DismissPanel, PanelLayout};

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Main,
    Help,
}

/// Rows at the top of the sheet that act as the drag grip.
pub const GRIP_ROWS: u16 = 2;

/// Clock shared by pointer samples and frame ticks.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Wall-clock time since start.
    Monotonic(Instant),
    /// Time that only moves when told to.
    #[cfg(test)]
    Manual(Duration),
}

impl Clock {
    pub fn start() -> Self {
        Clock::Monotonic(Instant::now())
    }

    pub fn now(&self) -> Duration {
        match self {
            Clock::Monotonic(started) => started.elapsed(),
            #[cfg(test)]
            Clock::Manual(now) => *now,
        }
    }

    /// Move a manual clock forward.  A monotonic clock ignores this.
    #[cfg(test)]
    pub fn advance(&mut self, by: Duration) {
        if let Clock::Manual(now) = self {
            *now += by;
        }
    }
}

/// Top-level application state.
pub struct AppState {
    pub panel: DismissPanel,
    pub host: SheetHost,
    pub config: AppConfig,
    pub clock: Clock,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    pub active_view: ActiveView,
}

impl AppState {
    /// Build the panel for `area`, the region above the status bar.
    pub fn new(area: CellRect, config: AppConfig) -> Self {
        let mut host = SheetHost::new(CellMapping::new(area, config.sheet_height));
        let panel = build_panel(&config, &mut host, !config.start_hidden);
        Self {
            panel,
            host,
            config,
            clock: Clock::start(),
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
        }
    }

    /// The terminal was resized: re-capture geometry for the new area.
    ///
    /// A panel that was fully shown stays shown; anything else starts over
    /// off-screen.  An in-flight gesture or animation is dropped.
    pub fn relayout(&mut self, area: CellRect) {
        let mapping = CellMapping::new(area, self.config.sheet_height);
        if mapping == self.host.mapping() {
            return;
        }
        let was_shown = self.panel.is_fully_shown();
        let was_active = self.panel.is_active();

        self.host.set_mapping(mapping);
        self.panel = build_panel(&self.config, &mut self.host, was_shown);
        if !was_active {
            self.panel.deactivate();
        }
        tracing::debug!(?area, was_shown, "panel re-initialized after resize");
    }
}

fn build_panel(config: &AppConfig, host: &mut SheetHost, shown: bool) -> DismissPanel {
    let size = host.mapping().sheet_size();
    let current = if shown {
        Point::default()
    } else {
        Point::new(0.0, -size.height)
    };
    let layout = PanelLayout {
        shown: Point::default(),
        current,
        size,
    };
    let handle = match config.handle {
        HandleMode::Grip => {
            let rows = f64::from(GRIP_ROWS).min(size.height);
            Some(Rect::new(0.0, -rows, size.width, rows))
        }
        HandleMode::Sheet => None,
    };
    DismissPanel::new(config.panel.clone(), layout, handle, host)
}
