//! User configuration: panel tuning, sheet layout and key bindings.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/pulldown-sheet/config.toml` (default
//! `~/.config/pulldown-sheet/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::core::panel::PanelTuning;

// ───────────────────────────────────────── errors ────────────

/// A config entry that could not be applied.  Loading never fails because
/// of these; the entry is skipped and reported.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("line {line}: unknown key `{key}`")]
    UnknownKey { line: usize, key: String },
    #[error("line {line}: invalid value `{value}` for `{key}`")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
    #[error("line {line}: cannot parse key `{bind}` for `{key}`")]
    InvalidBinding {
        line: usize,
        key: String,
        bind: String,
    },
}

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ShowPanel,
    ToggleActive,
    ToggleDebug,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::ShowPanel,
        Action::ToggleActive,
        Action::ToggleDebug,
        Action::Help,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::ShowPanel => "Show Panel",
            Action::ToggleActive => "Enable / Disable Panel",
            Action::ToggleDebug => "Toggle Debug Log",
            Action::Help => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ShowPanel => "show_panel",
            Action::ToggleActive => "toggle_active",
            Action::ToggleDebug => "toggle_debug",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
        .union(KeyModifiers::ALT)
        .union(KeyModifiers::SHIFT);

    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code
            && (self.modifiers & Self::MODIFIER_MASK) == (event.modifiers & Self::MODIFIER_MASK)
    }

    /// Display string for the UI (e.g. `"Ctrl+c"`, `"Space"`, `"↑"`).
    pub fn display(&self) -> String {
        self.render(true)
    }

    /// Config-file form (e.g. `"Ctrl+c"`, `"Space"`, `"Up"`).
    fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(name);
            }
        }
        let key = match (self.code, pretty) {
            (KeyCode::Char(' '), _) => "Space".to_string(),
            (KeyCode::Char(c), _) => c.to_string(),
            (KeyCode::Up, true) => "↑".into(),
            (KeyCode::Down, true) => "↓".into(),
            (KeyCode::Up, false) => "Up".into(),
            (KeyCode::Down, false) => "Down".into(),
            (KeyCode::Enter, _) => "Enter".into(),
            (KeyCode::Esc, _) => "Esc".into(),
            (KeyCode::Tab, _) => "Tab".into(),
            (KeyCode::F(n), _) => format!("F{n}"),
            (other, _) => format!("{other:?}"),
        };
        s.push_str(&key);
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Space"`, `"q"`, `"F1"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            _ => {
                // Keep the typed case so `?` and `S` survive.
                let mut chars = key_part.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                KeyCode::Char(c)
            }
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── layout ────────────

/// Which part of the sheet starts a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleMode {
    /// Only the grip rows at the top of the sheet.
    #[default]
    Grip,
    /// Anywhere on the sheet.
    Sheet,
}

impl HandleMode {
    pub fn label(self) -> &'static str {
        match self {
            HandleMode::Grip => "grip",
            HandleMode::Sheet => "sheet",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "grip" => Some(HandleMode::Grip),
            "sheet" => Some(HandleMode::Sheet),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub panel: PanelTuning,
    /// Sheet height in terminal rows.
    pub sheet_height: u16,
    pub handle: HandleMode,
    /// Start with the sheet off-screen.
    pub start_hidden: bool,
    /// Frame interval for animation ticks.
    pub frame_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            panel: PanelTuning::default(),
            sheet_height: 14,
            handle: HandleMode::default(),
            start_hidden: false,
            frame_ms: 16,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(ShowPanel, vec![KeyBind::new(Char('s'), n), KeyBind::new(Char(' '), n)]);
        m.insert(ToggleActive, vec![KeyBind::new(Char('a'), n)]);
        m.insert(ToggleDebug, vec![KeyBind::new(Char('d'), n)]);
        m.insert(Help, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Find the action bound to a key event.  The binding with the most
    /// modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, b)| b.matches(event))
            .max_by_key(|(_, b)| b.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// Format the binding list for a given action (e.g. `"s/Space"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Status-bar hint built from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "drag the sheet down to dismiss | {}: show | {}: enable/disable | {}: help",
            self.short_binding(Action::ShowPanel),
            self.short_binding(Action::ToggleActive),
            self.short_binding(Action::Help),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from `path` (or the default location), falling back to
    /// defaults.  Invalid entries are skipped with a warning.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        let Ok(contents) = std::fs::read_to_string(&path) else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        };

        let (config, errors) = Self::parse(&contents);
        for err in &errors {
            tracing::warn!(path = %path.display(), "{err}");
        }
        config
    }

    /// Persist current config to `path` (or the default location).
    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<PathBuf> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&path, self.serialise())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    pub fn parse(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Self::default();
        let mut errors = Vec::new();

        for (idx, line) in s.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            if let Some(action) = Action::from_config_key(key) {
                let mut parsed = Vec::new();
                for part in value.split(',') {
                    let part = part.trim().trim_matches('"');
                    match KeyBind::parse(part) {
                        Some(bind) => parsed.push(bind),
                        None => errors.push(ConfigError::InvalidBinding {
                            line: line_no,
                            key: key.to_string(),
                            bind: part.to_string(),
                        }),
                    }
                }
                if !parsed.is_empty() {
                    config.bindings.insert(action, parsed);
                }
                continue;
            }

            let invalid = || ConfigError::InvalidValue {
                line: line_no,
                key: key.to_string(),
                value: value.to_string(),
            };
            let panel = &mut config.panel;
            // Numeric values are clamped to keep the sheet usable.
            let applied = match key {
                "dismiss_threshold" => parse_f64(value).map(|v| panel.dismiss_threshold = v.clamp(0.0, 1.0)),
                "show_duration_ms" => parse_ms(value).map(|v| panel.show_duration = v),
                "reset_duration_ms" => parse_ms(value).map(|v| panel.reset_duration = v),
                "dismiss_scale" => parse_f64(value).map(|v| panel.dismiss.scale = v.clamp(0.01, 10.0)),
                "dismiss_min_ms" => parse_ms(value).map(|v| panel.dismiss.min = v),
                "dismiss_max_ms" => parse_ms(value).map(|v| panel.dismiss.max = v),
                "boost_after" => parse_f64(value).map(|v| panel.acceleration.boost_after = v.clamp(0.0, 1.0)),
                "snap_after" => parse_f64(value).map(|v| panel.acceleration.snap_after = v.clamp(0.0, 1.0)),
                "debug_logging" => parse_bool(value).map(|v| panel.debug_logging = v),
                "sheet_height" => value.parse::<u16>().ok().map(|v| config.sheet_height = v.clamp(3, 200)),
                "handle" => HandleMode::parse(value).map(|v| config.handle = v),
                "start_hidden" => parse_bool(value).map(|v| config.start_hidden = v),
                "frame_ms" => value.parse::<u64>().ok().map(|v| config.frame_ms = v.clamp(4, 100)),
                _ => {
                    errors.push(ConfigError::UnknownKey {
                        line: line_no,
                        key: key.to_string(),
                    });
                    continue;
                }
            };
            if applied.is_none() {
                errors.push(invalid());
            }
        }

        (config, errors)
    }

    pub fn serialise(&self) -> String {
        let p = &self.panel;
        let mut lines = vec![
            "# pulldown-sheet configuration".to_string(),
            String::new(),
            "# Panel behaviour".to_string(),
            format!("dismiss_threshold = {}", p.dismiss_threshold),
            format!("show_duration_ms = {}", p.show_duration.as_millis()),
            format!("reset_duration_ms = {}", p.reset_duration.as_millis()),
            format!("dismiss_scale = {}", p.dismiss.scale),
            format!("dismiss_min_ms = {}", p.dismiss.min.as_millis()),
            format!("dismiss_max_ms = {}", p.dismiss.max.as_millis()),
            format!("boost_after = {}", p.acceleration.boost_after),
            format!("snap_after = {}", p.acceleration.snap_after),
            format!("debug_logging = {}", p.debug_logging),
            String::new(),
            "# Sheet".to_string(),
            format!("sheet_height = {}", self.sheet_height),
            format!("handle = {}", self.handle.label()),
            format!("start_hidden = {}", self.start_hidden),
            format!("frame_ms = {}", self.frame_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn parse_f64(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_ms(value: &str) -> Option<Duration> {
    value
        .parse::<u64>()
        .ok()
        .map(|v| Duration::from_millis(v.min(10_000)))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/pulldown-sheet/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("pulldown-sheet").join("config.toml")
}
