use std::{io, path::Path};

use credlog_core::{Destination, LogFile, LogKind, LogStderr, LogStdout, LogWriter};

/// Handle to a writer registered in a [`Sinks`] set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriterId(usize);

/// The four per-outcome files. Roles may share a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeFiles {
    pub valid: WriterId,
    pub valid_special: WriterId,
    pub locked: WriterId,
    pub invalid: WriterId,
}

impl OutcomeFiles {
    /// Files receiving an event of `kind`, in write order.
    ///
    /// Special-status logins go to both the special file and the valid file,
    /// once if both roles share a writer.
    pub fn targets(&self, kind: LogKind) -> impl Iterator<Item = WriterId> {
        let (first, second) = match kind {
            LogKind::ValidLogin => (Some(self.valid), None),
            LogKind::ValidLoginSpecial if self.valid_special == self.valid => {
                (Some(self.valid), None)
            }
            LogKind::ValidLoginSpecial => (Some(self.valid_special), Some(self.valid)),
            LogKind::LockedLogin => (Some(self.locked), None),
            LogKind::InvalidLogin => (Some(self.invalid), None),
            LogKind::GeneralInfo | LogKind::DebugInfo => (None, None),
        };
        first.into_iter().chain(second)
    }
}

/// Every destination a dispatcher writes to.
pub struct Sinks {
    writers: Vec<Box<dyn LogWriter>>,
    terminal: WriterId,
    plain: WriterId,
    files: Option<OutcomeFiles>,
}

impl Default for Sinks {
    fn default() -> Self {
        Self::new(LogStderr, LogStdout)
    }
}

impl Sinks {
    /// Terminal and plain streams, no outcome files.
    pub fn new<T, P>(terminal: T, plain: P) -> Self
    where
        T: LogWriter + 'static,
        P: LogWriter + 'static,
    {
        let writers: Vec<Box<dyn LogWriter>> = vec![Box::new(terminal), Box::new(plain)];
        Self {
            writers,
            terminal: WriterId(0),
            plain: WriterId(1),
            files: None,
        }
    }

    /// Registers a writer for use in [`OutcomeFiles`].
    pub fn add_writer<W: LogWriter + 'static>(&mut self, writer: W) -> WriterId {
        self.writers.push(Box::new(writer));
        WriterId(self.writers.len() - 1)
    }

    /// Enables per-outcome files. Ids must come from [`Sinks::add_writer`] on this set.
    pub fn with_outcome_files(self, files: OutcomeFiles) -> Self {
        Self {
            files: Some(files),
            ..self
        }
    }

    /// Registers four distinct writers as the outcome files.
    pub fn with_outcome_writers<A, B, C, D>(
        mut self,
        valid: A,
        valid_special: B,
        locked: C,
        invalid: D,
    ) -> Self
    where
        A: LogWriter + 'static,
        B: LogWriter + 'static,
        C: LogWriter + 'static,
        D: LogWriter + 'static,
    {
        let files = OutcomeFiles {
            valid: self.add_writer(valid),
            valid_special: self.add_writer(valid_special),
            locked: self.add_writer(locked),
            invalid: self.add_writer(invalid),
        };
        self.with_outcome_files(files)
    }

    /// Opens `<basename>_valid`, `<basename>_special`, `<basename>_locked` and
    /// `<basename>_invalid` for appending.
    pub fn open_outcome_files<P: AsRef<Path>>(self, basename: P) -> Result<Self, io::Error> {
        let basename = basename.as_ref().as_os_str();
        let open = |suffix: &str| {
            let mut path = basename.to_owned();
            path.push(suffix);
            LogFile::new(path)
        };
        let valid = open("_valid")?;
        let valid_special = open("_special")?;
        let locked = open("_locked")?;
        let invalid = open("_invalid")?;
        Ok(self.with_outcome_writers(valid, valid_special, locked, invalid))
    }

    pub fn outcome_files(&self) -> Option<&OutcomeFiles> {
        self.files.as_ref()
    }

    /// Writer backing a human-facing stream. Files are addressed through [`OutcomeFiles`].
    pub(crate) fn stream(&self, destination: Destination) -> Option<WriterId> {
        match destination {
            Destination::Terminal => Some(self.terminal),
            Destination::Plain => Some(self.plain),
            Destination::File => None,
        }
    }

    pub(crate) fn writer(&mut self, id: WriterId) -> Option<&mut Box<dyn LogWriter>> {
        self.writers.get_mut(id.0)
    }

    pub(crate) fn writers_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn LogWriter>> {
        self.writers.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credlog_core::MemoryWriter;

    fn files() -> OutcomeFiles {
        OutcomeFiles {
            valid: WriterId(2),
            valid_special: WriterId(3),
            locked: WriterId(4),
            invalid: WriterId(5),
        }
    }

    #[test]
    fn test_targets() {
        let files = files();
        let targets = |kind| files.targets(kind).collect::<Vec<_>>();
        assert_eq!(targets(LogKind::ValidLogin), [WriterId(2)]);
        assert_eq!(targets(LogKind::ValidLoginSpecial), [WriterId(3), WriterId(2)]);
        assert_eq!(targets(LogKind::LockedLogin), [WriterId(4)]);
        assert_eq!(targets(LogKind::InvalidLogin), [WriterId(5)]);
        assert!(targets(LogKind::GeneralInfo).is_empty());
        assert!(targets(LogKind::DebugInfo).is_empty());
    }

    #[test]
    fn test_shared_valid_writer() {
        let files = OutcomeFiles {
            valid_special: WriterId(2),
            ..files()
        };
        assert_eq!(
            files.targets(LogKind::ValidLoginSpecial).collect::<Vec<_>>(),
            [WriterId(2)]
        );
    }

    #[test]
    fn test_add_writer_ids() {
        let mut sinks = Sinks::new(MemoryWriter::new(), MemoryWriter::new());
        assert!(sinks.outcome_files().is_none());
        let a = sinks.add_writer(MemoryWriter::new());
        let b = sinks.add_writer(MemoryWriter::new());
        assert_ne!(a, b);
        assert_ne!(Some(a), sinks.stream(Destination::Terminal));
        assert_ne!(Some(a), sinks.stream(Destination::Plain));
        assert_eq!(sinks.stream(Destination::File), None);
        assert!(sinks.writer(b).is_some());
        assert!(sinks.writer(WriterId(17)).is_none());
    }

    #[test]
    fn test_open_outcome_files() {
        let dir = tempfile::tempdir().unwrap();
        let sinks = Sinks::default()
            .open_outcome_files(dir.path().join("run"))
            .unwrap();
        assert!(sinks.outcome_files().is_some());
        for suffix in ["valid", "special", "locked", "invalid"] {
            assert!(dir.path().join(format!("run_{suffix}")).exists());
        }
    }
}
