//! Dashboard header: short help on the left, logo on the right.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::help::short_help_view;
use crate::keymap::Binding;
use crate::styles::Theme;

const LOGO: [&str; 3] = ["▄▀▀ ▀█▀ ▄▀▄ ▄▀▀ █▄▀", "▄██  █  █▀█ ▀▄▄ █ █", "      ▀▀ dash ▀▀   "];

fn logo_width() -> u16 {
    let w = LOGO.iter().map(|l| l.width()).max().unwrap_or(0);
    u16::try_from(w).unwrap_or(u16::MAX)
}

/// Render the header panel.
pub fn render_header(frame: &mut Frame, area: Rect, bindings: &[Binding], theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(logo_width() + 1)])
        .split(area);

    let help = short_help_view(bindings, chunks[0].width);
    frame.render_widget(
        Paragraph::new(Text::from(help)).style(theme.muted_style()),
        chunks[0],
    );

    let logo: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::styled(*l, theme.header_style()))
        .collect();
    frame.render_widget(Paragraph::new(logo).alignment(Alignment::Right), chunks[1]);
}
