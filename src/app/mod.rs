//! Application state types and entry glue.
//!
//! Defines the structs and enums that model the TUI state, the theme
//! configuration, and re-exports the event loop entry point (`run`).

pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::time::{Duration, Instant};

use crate::api::{UserId, UserRecord};
use keymap::Keymap;

/// How long a notification stays visible unless superseded.
pub const NOTICE_TTL: Duration = Duration::from_millis(3500);

/// Runtime configuration resolved from the CLI.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub theme_path: String,
    pub keybinds_path: String,
}

/// Which pane owns keyboard input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Table,
    Form,
    Modal,
}

/// Form field currently receiving text input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
}

/// State of the last list load; the table body renders a placeholder for
/// anything other than a non-empty `Loaded` list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient notification. There is at most one: showing a new notice
/// replaces the previous one and restarts the dismissal deadline.
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub deadline: Instant,
}

/// Modal dialog states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// Yes/No confirmation before a DELETE. `selected` 0 = Yes, 1 = No.
    DeleteConfirm { selected: usize },
}

/// Create/update form. Update mode is selected by `id` being populated.
#[derive(Clone, Debug, Default)]
pub struct FormState {
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub focus: Option<FormField>,
    pub name_error: Option<String>,
    pub email_error: Option<String>,
}

impl FormState {
    /// Clear all fields, the identifier and any inline errors.
    pub fn clear(&mut self) {
        self.id = None;
        self.name.clear();
        self.email.clear();
        self.focus = None;
        self.name_error = None;
        self.email_error = None;
    }
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Dark default theme (named terminal colors).
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "success" => theme.success = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or the special name "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-admin-tui theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::White => "#FFFFFF".to_string(),
                _ => "reset".to_string(),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("success", self.success);
        kv("error", self.error);

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the defaults and
    /// return them. If present, load from it; on parse errors, return `mocha`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        let _ = t.write_file(path);
        t
    }
}

/// Look a config file up under `$XDG_CONFIG_HOME/user-admin-tui/` (or
/// `~/.config/user-admin-tui/`), returning the path only if it exists.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("HOME").ok().map(|h| format!("{}/.config", h)))?;
    let path = format!("{}/user-admin-tui/{}", base, name);
    if std::path::Path::new(&path).exists() {
        Some(path)
    } else {
        None
    }
}

pub struct AppState {
    pub users: Vec<UserRecord>,
    pub load: LoadState,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub form: FormState,
    pub notice: Option<Notice>,
    pub modal: Option<ModalState>,
    pub theme: Theme,
    pub keymap: Keymap,
    pub api_url: String,
}

impl AppState {
    /// Create a fresh state; the first list load happens in the event loop.
    pub fn new(cfg: &Config) -> Self {
        Self {
            users: Vec::new(),
            load: LoadState::Loading,
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Table,
            form: FormState::default(),
            notice: None,
            modal: None,
            theme: Theme::load_or_init(&cfg.theme_path),
            keymap: Keymap::load_or_init(&cfg.keybinds_path),
            api_url: cfg.api_url.clone(),
        }
    }

    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.users.get(self.selected_index)
    }

    /// Keep the selection inside the list after a full replacement.
    pub fn clamp_selection(&mut self) {
        if self.users.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.users.len() {
            self.selected_index = self.users.len() - 1;
        }
    }

    /// Drop the notice once its deadline has passed. Called every loop tick.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if let Some(notice) = &self.notice {
            if notice.deadline <= now {
                self.notice = None;
            }
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
