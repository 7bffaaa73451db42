//! A swipe-to-dismiss bottom sheet for the terminal.
//!
//! Drag the sheet down with the mouse to dismiss it; press the show key to
//! bring it back.  Run with `--print-config` to see the effective settings.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::config::{Action, AppConfig};
use crate::ui::{layout::AppLayout, popup::HelpPopup, sheet::SheetWidget, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Swipe-to-dismiss bottom sheet")]
struct Cli {
    /// Config file to read (defaults to the XDG config location).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sheet height in rows.
    #[arg(long)]
    height: Option<u16>,

    /// Fraction of the sheet height a drag must cover to dismiss.
    #[arg(long)]
    threshold: Option<f64>,

    /// Start with the sheet off-screen.
    #[arg(long)]
    start_hidden: bool,

    /// Write diagnostics to this file instead of stderr.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,

    /// Save the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    /// Command-line flags win over the config file.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(height) = self.height {
            config.sheet_height = height.clamp(3, 200);
        }
        if let Some(threshold) = self.threshold {
            config.panel.dismiss_threshold = threshold.clamp(0.0, 1.0);
        }
        if self.start_hidden {
            config.start_hidden = true;
        }
    }
}

fn init_tracing(log: Option<&PathBuf>) -> Result<()> {
    match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pulldown_sheet=debug"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            // Drawing happens on stderr too, so only log when asked to.
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── drawing ──────────

const BACKGROUND: &[&str] = &[
    "The sheet at the bottom of the screen is a dismissible panel.",
    "",
    "Grab its grip with the left mouse button and pull it down.",
    "Let go past the threshold, or fling it, and it slides away.",
    "Let go early and it snaps back into place.",
];

fn draw(frame: &mut Frame, state: &AppState) {
    let layout = AppLayout::from_area(frame.area(), state.config.sheet_height);

    let content_style = if state.host.sheet_area().is_some() {
        Theme::dimmed_content_style()
    } else {
        Theme::content_style()
    };
    let background = Paragraph::new(
        BACKGROUND
            .iter()
            .map(|l| Line::raw(*l))
            .collect::<Vec<_>>(),
    )
    .style(content_style)
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .title(format!(" {} ", env!("CARGO_PKG_NAME")))
            .borders(Borders::ALL)
            .border_style(Theme::border_style()),
    );
    frame.render_widget(background, layout.backdrop_area);

    match state.host.sheet_area() {
        Some(area) => {
            let full_rows = state.host.mapping().sheet_size().height as u16;
            frame.render_widget(
                SheetWidget {
                    panel: &state.panel,
                    hidden_rows: full_rows.saturating_sub(area.height),
                },
                area,
            );
        }
        None => {
            // Mark the empty slot so the way back is obvious.
            let slot = layout.sheet_slot;
            let hint_row = Rect::new(
                slot.x,
                slot.bottom().saturating_sub(1),
                slot.width,
                slot.height.min(1),
            );
            let hint = Paragraph::new(format!(
                "sheet dismissed, press {} to bring it back",
                state.config.display_bindings(Action::ShowPanel)
            ))
            .alignment(Alignment::Center)
            .style(Theme::dimmed_content_style());
            frame.render_widget(hint, hint_row);
        }
    }

    let hint = state.config.status_bar_hint();
    let message = state.status_message.as_deref().unwrap_or(&hint);
    let status = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", state.panel.state().label()), Theme::state_badge_style()),
        Span::raw(" "),
        Span::raw(message),
    ]))
    .style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);

    if state.active_view == ActiveView::Help {
        frame.render_widget(HelpPopup { config: &state.config }, frame.area());
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_ref())?;

    let mut config = AppConfig::load(cli.config.as_deref());
    cli.apply(&mut config);

    if cli.print_config {
        print!("{}", config.serialise());
        return Ok(());
    }
    if cli.write_config {
        let path = config.save(cli.config.as_deref())?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(
        stderr_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let area = Rect::new(0, 0, size.width, size.height);
    let frame_interval = Duration::from_millis(config.frame_ms);
    let layout = AppLayout::from_area(area, config.sheet_height);
    let mut state = AppState::new(layout.content_area, config);
    tracing::info!(?area, state = state.panel.state().label(), "sheet ready");

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| draw(frame, &state))?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(width, height) => {
                        let area = Rect::new(0, 0, width, height);
                        let layout = AppLayout::from_area(area, state.config.sheet_height);
                        state.relayout(layout.content_area);
                    }
                    AppEvent::FocusLost => handler::handle_focus_lost(&mut state),
                }
            }

            _ = frames.tick() => handler::handle_frame(&mut state),
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    Ok(())
}
