//! Dashboard footer: the latest notice and the running task count.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::messages::ErrorMsg;
use crate::styles::Theme;

/// A transient message shown until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(ErrorMsg),
    Info(String),
}

/// Render the footer panel.
pub fn render_footer(
    frame: &mut Frame,
    area: Rect,
    notice: Option<&Notice>,
    running: usize,
    theme: &Theme,
) {
    let counter = format!("{running} running");
    let width = u16::try_from(counter.len()).unwrap_or(u16::MAX);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(width)])
        .split(area);

    let line = match notice {
        Some(Notice::Error(err)) => Line::from(Span::styled(err.to_string(), theme.error_style())),
        Some(Notice::Info(info)) => Line::from(Span::styled(info.clone(), theme.text_style())),
        None => Line::default(),
    };
    frame.render_widget(Paragraph::new(line), chunks[0]);

    let style = if running > 0 {
        theme.success_style()
    } else {
        theme.muted_style()
    };
    frame.render_widget(Paragraph::new(Span::styled(counter, style)), chunks[1]);
}
