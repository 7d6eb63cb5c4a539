//! Column layout engine.
//!
//! Fixed columns always get their declared width. Whatever is left of the
//! available width is shared among flex columns in proportion to their
//! factors, floor divided, with the remainder handed out one cell at a time
//! to flex columns in declaration order. When there is at least one flex
//! column and the width covers every fixed column, the widths sum to exactly
//! the available width.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Marks text lost to truncation.
pub const ELLIPSIS: char = '…';

/// Signature of a truncation function: shorten `s` to at most `width`
/// display cells.
pub type TruncateFn = fn(&str, usize) -> String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Exactly this many cells.
    Fixed(u16),
    /// A share of the remaining cells. Must be positive.
    Flex(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Unique within a table.
    pub key: &'static str,
    pub title: &'static str,
    pub width: ColumnWidth,
    /// Defaults to [`truncate`].
    pub truncate: Option<TruncateFn>,
    pub align: Alignment,
}

impl Column {
    #[must_use]
    pub const fn fixed(key: &'static str, title: &'static str, width: u16) -> Self {
        Self {
            key,
            title,
            width: ColumnWidth::Fixed(width),
            truncate: None,
            align: Alignment::Left,
        }
    }

    #[must_use]
    pub const fn flex(key: &'static str, title: &'static str, factor: u16) -> Self {
        assert!(factor > 0, "flex factor must be positive");
        Self {
            key,
            title,
            width: ColumnWidth::Flex(factor),
            truncate: None,
            align: Alignment::Left,
        }
    }

    #[must_use]
    pub const fn truncate_with(mut self, f: TruncateFn) -> Self {
        self.truncate = Some(f);
        self
    }

    #[must_use]
    pub const fn align_right(mut self) -> Self {
        self.align = Alignment::Right;
        self
    }
}

/// Compute the rendered width of every column for the available `width`.
///
/// # Panics
///
/// If a column has a zero flex factor.
#[must_use]
pub fn layout(columns: &[Column], width: u16) -> Vec<u16> {
    let mut fixed: u32 = 0;
    let mut total_flex: u32 = 0;
    for col in columns {
        match col.width {
            ColumnWidth::Fixed(w) => fixed += u32::from(w),
            ColumnWidth::Flex(f) => {
                assert!(f > 0, "column {:?} has a zero flex factor", col.key);
                total_flex += u32::from(f);
            }
        }
    }

    let remaining = u32::from(width).saturating_sub(fixed);
    let mut widths: Vec<u32> = columns
        .iter()
        .map(|col| match col.width {
            ColumnWidth::Fixed(w) => u32::from(w),
            ColumnWidth::Flex(f) => remaining * u32::from(f) / total_flex,
        })
        .collect();

    if total_flex > 0 {
        let assigned: u32 = columns
            .iter()
            .zip(&widths)
            .filter(|(col, _)| matches!(col.width, ColumnWidth::Flex(_)))
            .map(|(_, w)| *w)
            .sum();
        let mut leftover = remaining - assigned;
        while leftover > 0 {
            for (col, w) in columns.iter().zip(widths.iter_mut()) {
                if leftover == 0 {
                    break;
                }
                if matches!(col.width, ColumnWidth::Flex(_)) {
                    *w += 1;
                    leftover -= 1;
                }
            }
        }
    }

    // Each width is bounded by `width` or by a declared u16 width.
    widths
        .into_iter()
        .map(|w| u16::try_from(w).unwrap_or(u16::MAX))
        .collect()
}

/// Keep the leading characters, marking the loss at the end.
#[must_use]
pub fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if used + cw > width - 1 {
            break;
        }
        out.push(c);
        used += cw;
    }
    out.push(ELLIPSIS);
    out
}

/// Keep the trailing characters, marking the loss at the start. Suits paths,
/// whose last segment is the most telling.
#[must_use]
pub fn truncate_left(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut kept = Vec::new();
    let mut used = 0;
    for c in s.chars().rev() {
        let cw = c.width().unwrap_or(0);
        if used + cw > width - 1 {
            break;
        }
        kept.push(c);
        used += cw;
    }
    let mut out = String::with_capacity(kept.len() + ELLIPSIS.len_utf8());
    out.push(ELLIPSIS);
    out.extend(kept.into_iter().rev());
    out
}

/// Render a cell to exactly `width` cells: the text truncated and aligned in
/// `width - 1` cells, followed by a one cell gutter.
#[must_use]
pub fn render_cell(col: &Column, text: &str, width: u16) -> String {
    let width = usize::from(width);
    if width == 0 {
        return String::new();
    }
    let inner = width - 1;
    let truncated = if text.width() > inner {
        (col.truncate.unwrap_or(truncate))(text, inner)
    } else {
        text.to_string()
    };
    let pad = " ".repeat(inner.saturating_sub(truncated.width()));
    match col.align {
        Alignment::Left => format!("{truncated}{pad} "),
        Alignment::Right => format!("{pad}{truncated} "),
    }
}
