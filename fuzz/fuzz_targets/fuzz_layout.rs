#![no_main]

use libfuzzer_sys::fuzz_target;

use stackdash_tui::Column;
use stackdash_tui::columns::layout;

const KEYS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First two bytes are the width, then one byte per column: the high bit
    // picks flex, the rest is the width or factor.
    let width = u16::from_le_bytes([data[0], data[1]]);
    let columns: Vec<Column> = data[2..]
        .iter()
        .take(KEYS.len())
        .zip(KEYS)
        .map(|(b, key)| {
            if b & 0x80 != 0 {
                Column::flex(key, key, u16::from(b & 0x07) + 1)
            } else {
                Column::fixed(key, key, u16::from(*b))
            }
        })
        .collect();

    let widths = layout(&columns, width);
    assert_eq!(widths.len(), columns.len());

    let fixed: u32 = columns
        .iter()
        .map(|c| match c.width {
            stackdash_tui::columns::ColumnWidth::Fixed(w) => u32::from(w),
            stackdash_tui::columns::ColumnWidth::Flex(_) => 0,
        })
        .sum();
    let has_flex = data[2..].iter().take(KEYS.len()).any(|b| b & 0x80 != 0);
    if has_flex && u32::from(width) >= fixed {
        let total: u32 = widths.iter().map(|w| u32::from(*w)).sum();
        assert_eq!(total, u32::from(width));
    }
});
