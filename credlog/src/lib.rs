//! # credlog
//! Multi-threaded logger for account checkers, with a colored terminal stream,
//! a plain stream for scripts and per-outcome result files.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! credlog = "0.1.0"
//! ```
//!
//! ```rust
//! use credlog::{LogKind, logger_config};
//!
//! let dispatcher = logger_config().build();
//! dispatcher.log(LogKind::ValidLogin, "alice:hunter2");
//! dispatcher.log(LogKind::InvalidLogin, "bob:123456");
//! dispatcher.shutdown().unwrap();
//! ```
//!
//! ## Multi-threaded logging
//! Every write happens under one lock, so lines from different workers never mix.
//! ```rust
//! use std::sync::Arc;
//! use credlog::{LogKind, logf, logger_config};
//!
//! let dispatcher = Arc::new(logger_config().plain_output(true).build());
//! let handles: Vec<_> = (0..5).map(|i| {
//!     let dispatcher = Arc::clone(&dispatcher);
//!     std::thread::spawn(move || {
//!         logf!(dispatcher, LogKind::LockedLogin, "user{i}:password{i}");
//!     })
//! }).collect();
//! for h in handles { h.join().unwrap(); }
//! ```
//!
//! ## Result files
//! Outcomes can also be appended to one file per outcome. Special-status logins
//! are written to both the special file and the valid file.
//! ```rust
//! use credlog::{LogKind, logger_config};
//!
//! let dispatcher = logger_config()
//!     .valid_only(true)
//!     .with_outcome_files("/tmp/credlog_doc")
//!     .expect("Unable to open result files")
//!     .build();
//! dispatcher.log(LogKind::ValidLoginSpecial, "carol:letmein");
//! dispatcher.shutdown().unwrap();
//! assert!(std::fs::read_to_string("/tmp/credlog_doc_valid")
//!     .unwrap()
//!     .ends_with("carol:letmein  --  Account is Members\n"));
//! ```
//!
//! ## `log` macros
//! [`ConfigBuilder::init_global`] installs the dispatcher as the `log` backend:
//! `info!`, `warn!` and `error!` become general info lines, `debug!` and
//! `trace!` become debug lines.

mod dispatcher;
mod message;
mod sinks;

pub use credlog_core::{
    Destination, LogError, LogFile, LogKind, LogStderr, LogStdout, LogWriter, MemoryWriter,
    OutputConfig, Renderer, SPECIAL_SUFFIX, parse_file_line,
};
pub use dispatcher::{Dispatcher, Stats};
pub use message::MessageBuilder;
pub use sinks::{OutcomeFiles, Sinks, WriterId};

use log::{LevelFilter, Log};
use std::{io, path::Path, sync::Arc};

/// Forwards `log` records to a dispatcher.
struct CredLogger {
    dispatcher: Arc<Dispatcher>,
    level: LevelFilter,
}

impl Log for CredLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let kind = match record.level() {
            log::Level::Debug | log::Level::Trace => LogKind::DebugInfo,
            _ => LogKind::GeneralInfo,
        };
        self.dispatcher.log_args(kind, *record.args());
    }

    fn flush(&self) {
        self.dispatcher.flush().ok();
    }
}

/// Guard that flushes every destination when dropped.
/// Hold this guard for the lifetime of your logging session.
pub struct LoggerGuard {
    dispatcher: Arc<Dispatcher>,
}

impl LoggerGuard {
    /// The installed dispatcher, for logging outcomes.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        self.dispatcher.flush().ok();
    }
}

/// Builder for configuring and initializing the logger.
pub struct ConfigBuilder {
    config: OutputConfig,
    sinks: Sinks,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            config: OutputConfig {
                colors: OutputConfig::detect_colors(&io::stderr()),
                ..Default::default()
            },
            sinks: Sinks::default(),
        }
    }
}

impl ConfigBuilder {
    /// Show debug events on the terminal.
    pub fn verbose(self, yes: bool) -> Self {
        Self {
            config: OutputConfig {
                verbose: yes,
                ..self.config
            },
            ..self
        }
    }
    /// Send events to the plain stream instead of the terminal.
    pub fn plain_output(self, yes: bool) -> Self {
        Self {
            config: OutputConfig {
                plain_output: yes,
                ..self.config
            },
            ..self
        }
    }
    /// Only show valid logins on the terminal or plain stream.
    pub fn valid_only(self, yes: bool) -> Self {
        Self {
            config: OutputConfig {
                valid_only: yes,
                ..self.config
            },
            ..self
        }
    }
    /// Force colors on or off.
    pub fn with_colors(self, yes: bool) -> Self {
        Self {
            config: OutputConfig {
                colors: yes,
                ..self.config
            },
            ..self
        }
    }
    /// Replaces all flags at once.
    pub fn with_config(self, config: OutputConfig) -> Self {
        Self { config, ..self }
    }
    /// Reads the verbose, plain-output and valid-only flags from `CREDLOG_*`
    /// environment variables. The color setting is kept.
    pub fn with_env(self) -> Result<Self, LogError> {
        let config = OutputConfig {
            colors: self.config.colors,
            ..OutputConfig::from_env()?
        };
        Ok(self.with_config(config))
    }
    /// Replaces the destinations.
    pub fn with_sinks(self, sinks: Sinks) -> Self {
        Self { sinks, ..self }
    }
    /// Opens the four result files next to `basename`.
    pub fn with_outcome_files<P: AsRef<Path>>(self, basename: P) -> Result<Self, io::Error> {
        Ok(Self {
            sinks: self.sinks.open_outcome_files(basename)?,
            ..self
        })
    }
    /// Maybe opens the four result files.
    pub fn maybe_with_outcome_files<P: AsRef<Path>>(
        self,
        basename: Option<P>,
    ) -> Result<Self, io::Error> {
        match basename {
            Some(basename) => self.with_outcome_files(basename),
            None => Ok(self),
        }
    }
    /// Builds a dispatcher owned by the caller.
    pub fn build(self) -> Dispatcher {
        Dispatcher::new(self.config, self.sinks)
    }
    /// Builds the dispatcher and installs it as the global `log` backend.
    /// Returns a guard that will flush every destination when dropped.
    pub fn init_global(self) -> Result<LoggerGuard, LogError> {
        let level = if self.config.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let dispatcher = Arc::new(self.build());
        log::set_boxed_logger(Box::new(CredLogger {
            dispatcher: Arc::clone(&dispatcher),
            level,
        }))
        .map_err(|_| LogError::LoggerInstalled)?;
        log::set_max_level(level);
        Ok(LoggerGuard { dispatcher })
    }
}

/// Returns a default ConfigBuilder for configuring the logger.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_flags() {
        let dispatcher = logger_config()
            .verbose(true)
            .plain_output(true)
            .valid_only(true)
            .with_colors(false)
            .build();
        assert_eq!(
            *dispatcher.config(),
            OutputConfig {
                verbose: true,
                plain_output: true,
                valid_only: true,
                colors: false,
            }
        );
        assert!(!dispatcher.files_enabled());
    }

    #[test]
    fn test_with_env_keeps_colors() {
        for colors in [false, true] {
            let builder = logger_config().with_colors(colors).with_env().unwrap();
            assert_eq!(builder.build().config().colors, colors);
        }
    }

    #[test]
    fn test_builder_outcome_files() {
        let dir = tempfile::tempdir().unwrap();
        let terminal = MemoryWriter::new();
        let dispatcher = logger_config()
            .with_colors(false)
            .with_sinks(Sinks::new(terminal.clone(), MemoryWriter::new()))
            .maybe_with_outcome_files(Some(dir.path().join("run")))
            .unwrap()
            .build();
        assert!(dispatcher.files_enabled());
        dispatcher.log(LogKind::InvalidLogin, "eve:pw");
        dispatcher.shutdown().unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("run_invalid")).unwrap(),
            "eve:pw\n"
        );
        assert!(terminal.contents().ends_with("] Login doesn't work: eve:pw\n"));

        let dispatcher = logger_config()
            .maybe_with_outcome_files(None::<&str>)
            .unwrap()
            .build();
        assert!(!dispatcher.files_enabled());
    }
}
