//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── background ─────────────────────────────────────────────
    pub fn content_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn dimmed_content_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── sheet ──────────────────────────────────────────────────
    pub fn sheet_style() -> Style {
        Style::default().bg(Color::Rgb(30, 32, 40)).fg(Color::White)
    }

    pub fn grip_style(dragging: bool) -> Style {
        if dragging {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    pub fn sheet_title_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn state_badge_style() -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }
}
