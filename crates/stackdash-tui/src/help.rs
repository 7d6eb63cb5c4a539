//! Key binding help: the short form in the header and the full overlay.

use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use crate::keymap::{global, navigation, Binding};
use crate::styles::Theme;

/// Rows in each column of the short help.
pub const SHORT_HELP_ROWS: usize = 3;

/// Gap after the widest entry of a short help column.
const COLUMN_GAP: usize = 3;

fn entry(b: &Binding) -> String {
    format!("{} {}", b.key, b.desc)
}

/// Lay bindings out in columns of three rows, each column as wide as its
/// widest entry plus a gap. Columns that would overflow `width` are dropped
/// along with every column after them.
#[must_use]
pub fn short_help_view(bindings: &[Binding], width: u16) -> String {
    let width = usize::from(width);
    let mut rows = vec![String::new(); SHORT_HELP_ROWS];
    let mut used = 0;
    for column in bindings.chunks(SHORT_HELP_ROWS) {
        let entries: Vec<String> = column.iter().map(entry).collect();
        let column_width = entries.iter().map(|e| e.width()).max().unwrap_or(0) + COLUMN_GAP;
        if used + column_width > width {
            break;
        }
        for (i, row) in rows.iter_mut().enumerate() {
            let text = entries.get(i).map_or("", String::as_str);
            row.push_str(text);
            row.push_str(&" ".repeat(column_width - text.width()));
        }
        used += column_width;
    }
    rows.join("\n")
}

fn section(title: &str, bindings: &[Binding], theme: &Theme, lines: &mut Vec<Line<'static>>) {
    if bindings.is_empty() {
        return;
    }
    lines.push(Line::styled(title.to_string(), theme.header_style()));
    let key_width = bindings.iter().map(|b| b.key.width()).max().unwrap_or(0);
    for b in bindings {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>key_width$}", b.key), theme.warning_style()),
            Span::raw("  "),
            Span::styled(b.desc.to_string(), theme.text_style()),
        ]));
    }
    lines.push(Line::default());
}

/// Every binding in reach: the focused model's, then the global and
/// navigation ones.
#[must_use]
pub fn full_help_view(model: &[Binding], theme: &Theme) -> Text<'static> {
    let mut lines = Vec::new();
    section("Model", model, theme, &mut lines);
    section("Global", &global::all(), theme, &mut lines);
    section("Navigation", &navigation::all(), theme, &mut lines);
    Text::from(lines)
}
