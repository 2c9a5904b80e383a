//! Logger setup.
//!
//! Everything in loom logs through the `log` facade; this module only wires
//! up `env_logger` for applications that do not install their own backend.

mod init;

pub use init::{init_logging, LoggingConfig};
