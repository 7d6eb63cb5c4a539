//! # stackdash-service
//!
//! Resource stores and the services the dashboard pages read from. Every
//! mutation is published as an [`Event`](stackdash_core::Event) through one
//! shared [`Broker`](stackdash_core::Broker).

pub mod logging;
pub mod module;
pub mod run;
pub mod services;
pub mod store;
pub mod task;
pub mod workspace;

pub use logging::{LogLayer, Logger};
pub use module::{Discovery, ModuleService};
pub use run::RunService;
pub use services::Services;
pub use store::Store;
pub use task::TaskService;
pub use workspace::WorkspaceService;
