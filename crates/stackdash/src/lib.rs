//! stackdash library: configuration, wiring and exit codes for the binary.

pub mod app;
pub mod config;
pub mod errors;
