//! # credlog-core
//! Core utilities for credlog - event kinds, line rendering and log writers.

mod config;
mod error;
mod kind;
mod log_writer;
mod render;

pub use config::OutputConfig;
pub use error::LogError;
pub use kind::{KindStyle, LogKind, SPECIAL_SUFFIX};
pub use log_writer::{LogFile, LogStderr, LogStdout, LogWriter, MemoryWriter};
pub use render::{Destination, Renderer, parse_file_line};
