//! # stackdash-core
//!
//! Resource identity, domain records and the change-event plumbing shared by
//! the services and the dashboard.

pub mod broker;
pub mod constants;
pub mod error;
pub mod event;
pub mod resource;

// Re-exports
pub use broker::Broker;
pub use constants::{exit_codes, ID_ENCODED_MAX_LEN, LOG_MESSAGE_CAP};
pub use error::DashError;
pub use event::{ChangeType, Event, Payload};
pub use resource::{
    Changes, Kind, LogLevel, LogMessage, Module, Resource, ResourceId, Run, RunStatus, Task,
    TaskStatus, Workspace,
};
