//! Logging utilities.
//!
//! Centralizes logger initialization. Everything else in the crate logs
//! through the `log` facade only.

mod init;

pub use init::{DEFAULT_FILTER, LoggingConfig, init_logging};
