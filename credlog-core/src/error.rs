use std::{collections::TryReserveError, io};

use thiserror::Error;

/// Errors raised by credlog.
///
/// None of these ever escape a logging call: message construction failures
/// are reported on stderr and write failures are counted. They are returned
/// only from setup and explicit flush/shutdown calls.
#[derive(Debug, Error)]
pub enum LogError {
    /// A `Display` implementation failed while building a message.
    #[error("unable to format log message")]
    Format,
    /// The message buffer could not be allocated.
    #[error("unable to allocate log message: {0}")]
    ResourceExhaustion(#[from] TryReserveError),
    /// A destination rejected a write or flush.
    #[error("unable to write log output: {0}")]
    Write(#[from] io::Error),
    /// The environment holds an unusable configuration value.
    #[error("invalid logger configuration: {0}")]
    Config(String),
    /// `log::set_boxed_logger` was already called in this process.
    #[error("a global logger is already installed")]
    LoggerInstalled,
}
