use std::{
    collections::TryReserveError,
    fmt::{self, Write as _},
    io::{self, Write as _},
};

use credlog_core::{LogError, LogKind};

use crate::dispatcher::Dispatcher;

/// Builds a log message from format arguments without panicking.
///
/// Allocation goes through `try_reserve`, so running out of memory and a
/// failing `Display` implementation both come back as a [`LogError`].
#[derive(Debug, Default)]
pub struct MessageBuilder {
    message: String,
    exhausted: Option<TryReserveError>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(args: fmt::Arguments<'_>) -> Result<String, LogError> {
        let mut builder = Self::new();
        builder.push(args)?;
        Ok(builder.finish())
    }

    pub fn push(&mut self, args: fmt::Arguments<'_>) -> Result<&mut Self, LogError> {
        let written = match args.as_str() {
            Some(literal) => self.write_str(literal),
            None => self.write_fmt(args),
        };
        if written.is_err() {
            self.message.clear();
            return Err(match self.exhausted.take() {
                Some(err) => LogError::ResourceExhaustion(err),
                None => LogError::Format,
            });
        }
        Ok(self)
    }

    pub fn finish(self) -> String {
        self.message
    }
}

impl fmt::Write for MessageBuilder {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Err(err) = self.message.try_reserve(s.len()) {
            self.exhausted = Some(err);
            return Err(fmt::Error);
        }
        self.message.push_str(s);
        Ok(())
    }
}

impl Dispatcher {
    /// Formats `args` and logs the result. If the message cannot be built a
    /// note goes to stderr and nothing is logged.
    pub fn log_args(&self, kind: LogKind, args: fmt::Arguments<'_>) {
        match MessageBuilder::build(args) {
            Ok(message) => self.log(kind, &message),
            Err(err) => {
                self.record_dropped();
                let _ = writeln!(io::stderr(), "credlog: dropped {kind:?} message: {err}");
            }
        }
    }
}

/// Formats a message and logs it through a [`Dispatcher`].
///
/// ```rust
/// use credlog::{Dispatcher, LogKind, MemoryWriter, OutputConfig, Sinks, logf};
///
/// let plain = MemoryWriter::new();
/// let config = OutputConfig { plain_output: true, ..Default::default() };
/// let dispatcher = Dispatcher::new(config, Sinks::new(MemoryWriter::new(), plain.clone()));
/// logf!(dispatcher, LogKind::InvalidLogin, "{}:{}", "alice", "bad");
/// assert_eq!(plain.contents(), "Invalid: alice:bad\n");
/// ```
#[macro_export]
macro_rules! logf {
    ($dispatcher:expr, $kind:expr, $($arg:tt)+) => {
        $dispatcher.log_args($kind, ::std::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use std::fmt::Display;

    use credlog_core::{MemoryWriter, OutputConfig};

    use super::*;
    use crate::Sinks;

    struct Broken;

    impl Display for Broken {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    fn plain_dispatcher() -> (Dispatcher, MemoryWriter) {
        let plain = MemoryWriter::new();
        let config = OutputConfig {
            plain_output: true,
            ..Default::default()
        };
        let sinks = Sinks::new(MemoryWriter::new(), plain.clone());
        (Dispatcher::new(config, sinks), plain)
    }

    #[test]
    fn test_build() {
        let message = MessageBuilder::build(format_args!("{}:{}", "alice", 42)).unwrap();
        assert_eq!(message, "alice:42");
        assert_eq!(MessageBuilder::build(format_args!("static")).unwrap(), "static");
    }

    #[test]
    fn test_build_incrementally() {
        let mut builder = MessageBuilder::new();
        builder
            .push(format_args!("{}", "bob"))
            .unwrap()
            .push(format_args!(":{}", "pw"))
            .unwrap();
        assert_eq!(builder.finish(), "bob:pw");
    }

    #[test]
    fn test_build_format_error() {
        let result = MessageBuilder::build(format_args!("{}:{}", "alice", Broken));
        assert!(matches!(result, Err(LogError::Format)));
    }

    #[test]
    fn test_failed_push_leaves_no_partial_message() {
        let mut builder = MessageBuilder::new();
        builder.push(format_args!("bob:")).unwrap();
        let result = builder.push(format_args!("{}:{}", "alice", Broken));
        assert!(matches!(result, Err(LogError::Format)));
        assert_eq!(builder.finish(), "");
    }

    #[test]
    fn test_allocation_failure() {
        let mut builder = MessageBuilder::new();
        builder.exhausted = String::new().try_reserve(usize::MAX).err();
        assert!(builder.exhausted.is_some());
        let result = builder.push(format_args!("{}", Broken));
        assert!(matches!(result, Err(LogError::ResourceExhaustion(_))));
        assert!(builder.exhausted.is_none());
        assert_eq!(builder.finish(), "");
    }

    #[test]
    fn test_logf() {
        let (dispatcher, plain) = plain_dispatcher();
        logf!(dispatcher, LogKind::InvalidLogin, "{}:{}", "alice", "bad");
        assert_eq!(plain.contents(), "Invalid: alice:bad\n");
    }

    #[test]
    fn test_logf_drops_broken_message() {
        let (dispatcher, plain) = plain_dispatcher();
        logf!(dispatcher, LogKind::ValidLogin, "{}:{}", "alice", Broken);
        assert!(plain.is_empty());
        assert_eq!(dispatcher.stats().dropped_messages, 1);
        logf!(dispatcher, LogKind::ValidLogin, "{}:{}", "alice", "pw");
        assert_eq!(plain.contents(), "Works: alice:pw\n");
    }
}
