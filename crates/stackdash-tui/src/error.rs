//! Errors raised while building and composing pane models.

use stackdash_core::DashError;

use crate::page::PageKind;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    /// A tab with this title already exists in the set.
    #[error("not allowed to create tabs with duplicate titles: {0:?}")]
    DuplicateTab(String),

    /// A maker could not build the model for a page.
    #[error("making {kind} page: {source}")]
    Make {
        kind: PageKind,
        #[source]
        source: DashError,
    },

    /// A theme file could not be read or parsed.
    #[error("loading theme: {0}")]
    Theme(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TuiError {
    pub fn make(kind: PageKind, source: DashError) -> Self {
        Self::Make { kind, source }
    }
}
