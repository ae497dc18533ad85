//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map
//! keys to actions.
//!
//! Bindings only apply while the table owns input; the form and the confirm
//! dialog handle raw keys themselves.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions on the table screen. Multiple key combinations
/// can map to the same action (e.g. both 'j' and Down move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Re-fetch the user list.
    Refresh,
    /// Open the form empty for a new user.
    NewUser,
    /// Prefill the form from the selected row.
    EditSelection,
    /// Ask for confirmation, then delete the selected row.
    DeleteSelection,
    /// Clear the form fields and inline errors. No network.
    ResetForm,
    /// Move up in the table.
    MoveUp,
    /// Move down in the table.
    MoveDown,
    /// Jump one page up.
    PageUp,
    /// Jump one page down.
    PageDown,
    /// Ignore this key.
    Ignore,
}

/// Manages keybinding configuration and key-to-action resolution.
#[derive(Clone, Debug)]
pub struct Keymap {
    /// Canonical mapping from (modifiers, code) to action.
    bindings: std::collections::HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings: arrow keys and vim-style
    /// j/k for navigation, q (quit), r (refresh), n (new), e/Enter (edit),
    /// d/Delete (delete), c (clear form), PageUp/PageDown.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = std::collections::HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Enter), KeyAction::EditSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('c')), KeyAction::ResetForm);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        Self { bindings }
    }

    /// Load a keymap from a file, or create defaults if the file doesn't
    /// exist. Missing files are also looked up in the standard config
    /// location before a fresh default file is written to `path`.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::app::config_file_read_path("keybinds.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let km = Self::default();
        let _ = km.write_file(path);
        km
    }

    /// Load a keymap from a configuration file using the format
    /// `<Action> = <KeySpec>`. Starts from defaults and overrides with
    /// user-specified bindings.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        Some(map)
    }

    /// Write the current keymap to a configuration file.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-admin-tui keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str(
            "# KeySpec examples: q, Ctrl+r, Enter, Esc, Up, Down, PageUp, PageDown, Delete\n",
        );
        buf.push_str(
            "# Actions: Quit, Refresh, NewUser, EditSelection, DeleteSelection, ResetForm, MoveUp, MoveDown, PageUp, PageDown, Ignore\n\n",
        );

        // Emit a stable, readable subset of current bindings
        let dump = [
            ("q", KeyAction::Quit),
            ("Esc", KeyAction::Ignore),
            ("r", KeyAction::Refresh),
            ("n", KeyAction::NewUser),
            ("e", KeyAction::EditSelection),
            ("Enter", KeyAction::EditSelection),
            ("d", KeyAction::DeleteSelection),
            ("Delete", KeyAction::DeleteSelection),
            ("c", KeyAction::ResetForm),
            ("Up", KeyAction::MoveUp),
            ("Down", KeyAction::MoveDown),
            ("k", KeyAction::MoveUp),
            ("j", KeyAction::MoveDown),
            ("PageUp", KeyAction::PageUp),
            ("PageDown", KeyAction::PageDown),
        ];
        for (k, a) in dump {
            let _ = writeln!(&mut buf, "{} = {}", format_action(a), k);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event (modifiers + code) to its action, if bound.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Up" => Up,
        "Down" => Down,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let chars: Vec<char> = rest.chars().collect();
            if chars.len() == 1 {
                KeyCode::Char(chars[0])
            } else {
                return None;
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "Refresh" => Some(KeyAction::Refresh),
        "NewUser" => Some(KeyAction::NewUser),
        "EditSelection" => Some(KeyAction::EditSelection),
        "DeleteSelection" => Some(KeyAction::DeleteSelection),
        "ResetForm" => Some(KeyAction::ResetForm),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "PageUp" => Some(KeyAction::PageUp),
        "PageDown" => Some(KeyAction::PageDown),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::Refresh => "Refresh",
        KeyAction::NewUser => "NewUser",
        KeyAction::EditSelection => "EditSelection",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::ResetForm => "ResetForm",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::Ignore => "Ignore",
    }
}
