//! Fixed sizes of the dashboard chrome and panes.

/// Rows taken by the short help and logo.
pub const HEADER_HEIGHT: u16 = 3;
/// Rows taken by the centered title rule.
pub const TITLE_HEIGHT: u16 = 1;
/// Rows taken by the rule above the footer.
pub const RULE_HEIGHT: u16 = 1;
/// Rows taken by the message footer.
pub const FOOTER_HEIGHT: u16 = 1;
/// Rows of chrome surrounding the pane area.
pub const CHROME_HEIGHT: u16 = HEADER_HEIGHT + TITLE_HEIGHT + RULE_HEIGHT + FOOTER_HEIGHT;

/// Cells taken by a pane border in each dimension.
pub const BORDER_SIZE: u16 = 2;

/// Rows taken by a tab set's headings and underline.
pub const TAB_HEADER_HEIGHT: u16 = 2;

pub const MIN_PANE_WIDTH: u16 = 20;
pub const MIN_PANE_HEIGHT: u16 = 4;
pub const DEFAULT_LEFT_PANE_WIDTH: u16 = 40;
pub const DEFAULT_TOP_RIGHT_PANE_HEIGHT: u16 = 15;

/// Cells a resize key moves a pane split by.
pub const RESIZE_STEP: i16 = 1;

/// Previously current pages remembered per pane.
pub const HISTORY_CAP: usize = 50;

const _: () = assert!(MIN_PANE_HEIGHT <= DEFAULT_TOP_RIGHT_PANE_HEIGHT);
const _: () = assert!(MIN_PANE_WIDTH <= DEFAULT_LEFT_PANE_WIDTH);
const _: () = assert!(MIN_PANE_HEIGHT > BORDER_SIZE);
