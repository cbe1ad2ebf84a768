//! ui
//!
//! User-facing output: the structured logging capability.

pub mod log;

pub use log::{Level, Logger, Verbosity};
