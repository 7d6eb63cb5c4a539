//! Messages that drive the update loop.

use std::fmt;

use crossterm::event::KeyEvent;
use stackdash_core::{Event, Payload, ResourceId};

use crate::page::{Page, PageKind, Position};
use crate::table::TableId;

/// Everything the navigator reacts to arrives as one of these.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Key press from the terminal.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize { width: u16, height: u16 },
    /// A pane or tab content area was resized. Sent to pane models only.
    PaneResize { width: u16, height: u16 },
    /// Request to show a page.
    Navigate(NavigationMsg),
    /// A resource was created, updated or deleted.
    Resource(Event),
    /// Full load of items for one table.
    BulkInsert { table: TableId, items: Vec<Payload> },
    /// User facing error, shown in the footer.
    Error(ErrorMsg),
    /// User facing information, shown in the footer.
    Info(String),
    /// Periodic redraw.
    Tick,
    Quit,
}

/// Navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationMsg {
    pub page: Page,
    /// Show the page without moving input focus to its pane.
    pub disable_focus: bool,
}

impl NavigationMsg {
    #[must_use]
    pub fn new(kind: PageKind) -> Self {
        Self {
            page: Page::new(kind),
            disable_focus: false,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: ResourceId) -> Self {
        self.page.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.page.position = position;
        self
    }

    #[must_use]
    pub fn disable_focus(mut self) -> Self {
        self.disable_focus = true;
        self
    }
}

impl From<NavigationMsg> for Msg {
    fn from(nav: NavigationMsg) -> Self {
        Self::Navigate(nav)
    }
}

/// An error with the action that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMsg {
    pub context: String,
    pub error: String,
}

impl ErrorMsg {
    pub fn new(context: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            context: context.into(),
            error: error.to_string(),
        }
    }
}

impl fmt::Display for ErrorMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}: {}", self.context, self.error)
    }
}

impl From<ErrorMsg> for Msg {
    fn from(err: ErrorMsg) -> Self {
        Self::Error(err)
    }
}
