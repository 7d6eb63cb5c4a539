//! Error type shared by the core and service crates.

use crate::resource::{Kind, ResourceId};

/// Errors raised by resource stores and services.
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    /// No resource exists with the given id.
    #[error("{0} not found")]
    NotFound(ResourceId),

    /// A resource of this kind must have a parent but none was given.
    #[error("{0} requires a parent resource")]
    MissingParent(Kind),

    /// A state transition that the resource lifecycle does not allow.
    #[error("invalid state transition for {id}: {from} -> {to}")]
    InvalidState {
        id: ResourceId,
        from: String,
        to: String,
    },

    /// A string that does not encode a resource id.
    #[error("invalid resource id: {0:?}")]
    InvalidId(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
