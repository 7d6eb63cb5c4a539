//! Color theme.
//!
//! The theme is built once at startup, optionally from a JSON file, and then
//! passed by reference to everything that renders.

use std::path::Path;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use stackdash_core::{LogLevel, RunStatus, TaskStatus};

use crate::error::TuiError;

/// Color theme for the dashboard. Missing fields in a theme file keep their
/// default color.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub focused_border: Color,
    pub cursor_bg: Color,
    pub selected_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Magenta,
            secondary: Color::Blue,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            text: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
            focused_border: Color::Magenta,
            cursor_bg: Color::Blue,
            selected_bg: Color::Indexed(236),
        }
    }
}

impl Theme {
    /// Parse a theme from JSON, e.g. `{"primary": "cyan", "error": "#ff0000"}`.
    pub fn from_json(json: &str) -> Result<Self, TuiError> {
        serde_json::from_str(json).map_err(|e| TuiError::Theme(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, TuiError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[must_use]
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    #[must_use]
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    #[must_use]
    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    #[must_use]
    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Border of a pane, highlighted while it has focus.
    #[must_use]
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focused_border)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Style of a table row.
    #[must_use]
    pub fn row_style(&self, cursor: bool, selected: bool) -> Style {
        let style = self.text_style();
        match (cursor, selected) {
            (true, true) => style
                .bg(self.cursor_bg)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            (true, false) => style.bg(self.cursor_bg).add_modifier(Modifier::BOLD),
            (false, true) => style.bg(self.selected_bg).add_modifier(Modifier::ITALIC),
            (false, false) => style,
        }
    }

    #[must_use]
    pub fn active_tab_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn inactive_tab_style(&self) -> Style {
        self.muted_style()
    }

    #[must_use]
    pub fn log_level_style(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Error => self.error_style(),
            LogLevel::Warn => self.warning_style(),
            LogLevel::Info => Style::default().fg(self.secondary),
            LogLevel::Debug | LogLevel::Trace => self.muted_style(),
        }
    }

    #[must_use]
    pub fn task_status_style(&self, status: TaskStatus) -> Style {
        match status {
            TaskStatus::Exited => self.success_style(),
            TaskStatus::Errored => self.error_style(),
            TaskStatus::Running => Style::default().fg(self.secondary),
            TaskStatus::Canceled => self.warning_style(),
            TaskStatus::Pending | TaskStatus::Queued => self.muted_style(),
        }
    }

    #[must_use]
    pub fn run_status_style(&self, status: RunStatus) -> Style {
        match status {
            RunStatus::Applied | RunStatus::NoChanges => self.success_style(),
            RunStatus::Planned => Style::default().fg(self.secondary),
            RunStatus::Errored => self.error_style(),
            RunStatus::Planning | RunStatus::Applying => self.warning_style(),
            RunStatus::Pending => self.muted_style(),
        }
    }
}
