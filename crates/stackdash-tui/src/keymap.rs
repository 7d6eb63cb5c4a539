//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A named set of keys with the help text shown for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    keys: &'static [(KeyCode, KeyModifiers)],
    /// Key as shown in help.
    pub key: &'static str,
    /// Action as shown in help.
    pub desc: &'static str,
}

impl Binding {
    #[must_use]
    pub const fn new(
        keys: &'static [(KeyCode, KeyModifiers)],
        key: &'static str,
        desc: &'static str,
    ) -> Self {
        Self { keys, key, desc }
    }

    /// Whether the event is one of this binding's keys. Shift is ignored for
    /// character keys, since the character already reflects it.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let mut modifiers = event.modifiers;
        if matches!(event.code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        self.keys
            .iter()
            .any(|(code, mods)| *code == event.code && *mods == modifiers)
    }
}

const NONE: KeyModifiers = KeyModifiers::NONE;
const CTRL: KeyModifiers = KeyModifiers::CONTROL;

/// Application wide bindings.
pub mod global {
    use super::{Binding, KeyCode, CTRL, NONE};

    pub const QUIT: Binding = Binding::new(
        &[(KeyCode::Char('c'), CTRL), (KeyCode::Char('q'), NONE)],
        "q",
        "quit",
    );
    pub const HELP: Binding = Binding::new(&[(KeyCode::Char('?'), NONE)], "?", "help");
    pub const ESCAPE: Binding = Binding::new(&[(KeyCode::Esc, NONE)], "esc", "back");
    pub const MODULES: Binding = Binding::new(&[(KeyCode::Char('m'), NONE)], "m", "modules");
    pub const WORKSPACES: Binding =
        Binding::new(&[(KeyCode::Char('W'), NONE)], "W", "workspaces");
    pub const RUNS: Binding = Binding::new(&[(KeyCode::Char('R'), NONE)], "R", "runs");
    pub const TASKS: Binding = Binding::new(&[(KeyCode::Char('T'), NONE)], "T", "tasks");
    pub const LOGS: Binding = Binding::new(&[(KeyCode::Char('l'), NONE)], "l", "logs");

    #[must_use]
    pub fn all() -> Vec<Binding> {
        vec![QUIT, HELP, ESCAPE, MODULES, WORKSPACES, RUNS, TASKS, LOGS]
    }
}

/// Movement within and between panes.
pub mod navigation {
    use super::{Binding, KeyCode, NONE};
    use crossterm::event::KeyModifiers;

    pub const UP: Binding = Binding::new(
        &[(KeyCode::Up, NONE), (KeyCode::Char('k'), NONE)],
        "↑/k",
        "up",
    );
    pub const DOWN: Binding = Binding::new(
        &[(KeyCode::Down, NONE), (KeyCode::Char('j'), NONE)],
        "↓/j",
        "down",
    );
    pub const PAGE_UP: Binding = Binding::new(&[(KeyCode::PageUp, NONE)], "pgup", "page up");
    pub const PAGE_DOWN: Binding =
        Binding::new(&[(KeyCode::PageDown, NONE)], "pgdn", "page down");
    pub const HOME: Binding = Binding::new(
        &[(KeyCode::Home, NONE), (KeyCode::Char('g'), NONE)],
        "home/g",
        "go to top",
    );
    pub const END: Binding = Binding::new(
        &[(KeyCode::End, NONE), (KeyCode::Char('G'), NONE)],
        "end/G",
        "go to bottom",
    );
    pub const TAB_NEXT: Binding = Binding::new(&[(KeyCode::Tab, NONE)], "tab", "next tab");
    pub const TAB_PREV: Binding = Binding::new(
        &[(KeyCode::BackTab, KeyModifiers::SHIFT), (KeyCode::BackTab, NONE)],
        "shift+tab",
        "previous tab",
    );
    pub const NEXT_PANE: Binding = Binding::new(&[(KeyCode::Char(']'), NONE)], "]", "next pane");
    pub const PREV_PANE: Binding =
        Binding::new(&[(KeyCode::Char('['), NONE)], "[", "previous pane");
    pub const GROW_HEIGHT: Binding =
        Binding::new(&[(KeyCode::Char('+'), NONE)], "+", "grow height");
    pub const SHRINK_HEIGHT: Binding =
        Binding::new(&[(KeyCode::Char('-'), NONE)], "-", "shrink height");
    pub const GROW_WIDTH: Binding =
        Binding::new(&[(KeyCode::Char('>'), NONE)], ">", "grow width");
    pub const SHRINK_WIDTH: Binding =
        Binding::new(&[(KeyCode::Char('<'), NONE)], "<", "shrink width");

    #[must_use]
    pub fn all() -> Vec<Binding> {
        vec![
            UP,
            DOWN,
            PAGE_UP,
            PAGE_DOWN,
            HOME,
            END,
            TAB_NEXT,
            TAB_PREV,
            NEXT_PANE,
            PREV_PANE,
            GROW_HEIGHT,
            SHRINK_HEIGHT,
            GROW_WIDTH,
            SHRINK_WIDTH,
        ]
    }
}

/// Bindings of table based pages.
pub mod table {
    use super::{Binding, KeyCode, CTRL, NONE};

    pub const ENTER: Binding = Binding::new(&[(KeyCode::Enter, NONE)], "enter", "open");
    pub const FILTER: Binding = Binding::new(&[(KeyCode::Char('/'), NONE)], "/", "filter");
    pub const SELECT: Binding = Binding::new(&[(KeyCode::Char(' '), NONE)], "space", "select");
    pub const SELECT_ALL: Binding =
        Binding::new(&[(KeyCode::Char('a'), CTRL)], "ctrl+a", "select all");
    pub const RELOAD: Binding = Binding::new(&[(KeyCode::Char('r'), NONE)], "r", "reload");
    pub const CANCEL: Binding = Binding::new(&[(KeyCode::Char('c'), NONE)], "c", "cancel");
}

/// Actions the navigator performs itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Help,
    Escape,
    Modules,
    Workspaces,
    Runs,
    Tasks,
    Logs,
    NextPane,
    PrevPane,
    GrowHeight,
    ShrinkHeight,
    GrowWidth,
    ShrinkWidth,
    None,
}

/// Map a key event to a navigator action.
#[must_use]
pub fn map_key(key: KeyEvent) -> KeyAction {
    let actions = [
        (global::QUIT, KeyAction::Quit),
        (global::HELP, KeyAction::Help),
        (global::ESCAPE, KeyAction::Escape),
        (global::MODULES, KeyAction::Modules),
        (global::WORKSPACES, KeyAction::Workspaces),
        (global::RUNS, KeyAction::Runs),
        (global::TASKS, KeyAction::Tasks),
        (global::LOGS, KeyAction::Logs),
        (navigation::NEXT_PANE, KeyAction::NextPane),
        (navigation::PREV_PANE, KeyAction::PrevPane),
        (navigation::GROW_HEIGHT, KeyAction::GrowHeight),
        (navigation::SHRINK_HEIGHT, KeyAction::ShrinkHeight),
        (navigation::GROW_WIDTH, KeyAction::GrowWidth),
        (navigation::SHRINK_WIDTH, KeyAction::ShrinkWidth),
    ];
    actions
        .iter()
        .find(|(binding, _)| binding.matches(&key))
        .map_or(KeyAction::None, |(_, action)| *action)
}
