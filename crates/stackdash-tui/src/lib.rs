//! # stackdash-tui
//!
//! Terminal dashboard for infrastructure modules using ratatui with an Elm
//! style architecture: a navigator routes messages to cached page models,
//! which answer with commands the event loop runs off the update path.

pub mod app;
pub mod cache;
pub mod cmd;
pub mod columns;
pub mod dimensions;
pub mod error;
pub mod footer;
pub mod header;
pub mod help;
pub mod keymap;
pub mod messages;
pub mod model;
pub mod navigator;
pub mod page;
pub mod pages;
pub mod scroll;
pub mod styles;
pub mod table;
pub mod tabs;
pub mod time;

pub use app::App;
pub use cache::Cache;
pub use cmd::{Cmd, Job};
pub use columns::Column;
pub use error::TuiError;
pub use messages::{ErrorMsg, Msg, NavigationMsg};
pub use model::{BorderPosition, ChildModel, Maker};
pub use navigator::Navigator;
pub use page::{Page, PageKind, Position};
pub use pages::register_all;
pub use styles::Theme;
pub use table::{Table, TableId, TableItem};
pub use tabs::TabSet;
