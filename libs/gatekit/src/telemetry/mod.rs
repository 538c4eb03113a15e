//! Logging bootstrap for binaries built on the gate.

pub mod config;
pub mod init;

pub use config::{LogFormat, LoggingConfig};
pub use init::{LoggingError, init_logging};
