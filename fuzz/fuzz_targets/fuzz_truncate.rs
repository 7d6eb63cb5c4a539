#![no_main]

use libfuzzer_sys::fuzz_target;
use unicode_width::UnicodeWidthChar;

use stackdash_tui::columns::{render_cell, truncate, truncate_left};
use stackdash_tui::Column;

fn cells(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

fuzz_target!(|data: &[u8]| {
    let Some((&width, rest)) = data.split_first() else {
        return;
    };
    let Ok(s) = std::str::from_utf8(rest) else {
        return;
    };
    let width = usize::from(width % 64);

    assert!(cells(&truncate(s, width)) <= width);
    assert!(cells(&truncate_left(s, width)) <= width);

    // Should not panic on any input.
    let col = Column::flex("text", "TEXT", 1);
    let _ = render_cell(&col, s, u16::from(data[0]));
});
