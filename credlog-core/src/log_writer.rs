use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

/// A destination for rendered log text.
///
/// `write_text` receives whole lines; callers flush after every write so that
/// external readers see complete lines immediately.
pub trait LogWriter: Send {
    fn write_text(&mut self, text: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Append-only log file.
pub struct LogFile {
    file: BufWriter<File>,
}

impl LogFile {
    /// Opens `path` for appending, creating it if needed.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let file = File::options().create(true).append(true).open(path)?;
        Ok(Self::from_file(file))
    }

    /// Wraps a file that is already open for writing.
    pub fn from_file(file: File) -> Self {
        Self {
            file: BufWriter::new(file),
        }
    }
}

impl LogWriter for LogFile {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.file.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Standard output, the default plain stream.
#[derive(Default, Debug)]
pub struct LogStdout;

impl LogWriter for LogStdout {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        io::stdout().lock().write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Standard error, the default terminal stream.
#[derive(Default, Debug)]
pub struct LogStderr;

impl LogWriter for LogStderr {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        io::stderr().lock().write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// In-memory writer. Clones share the same buffer, so one clone can be handed
/// to a logger while another reads what was written.
#[derive(Default, Debug, Clone)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl LogWriter for MemoryWriter {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(text.as_bytes());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valid");
        let mut log_file = LogFile::new(&path).unwrap();
        log_file.write_text("alice:pw\n").unwrap();
        log_file.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "alice:pw\n");
        drop(log_file);

        // reopening appends
        let mut log_file = LogFile::new(&path).unwrap();
        log_file.write_text("bob:pw\n").unwrap();
        log_file.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "alice:pw\nbob:pw\n");
    }

    #[test]
    fn test_log_file_from_open_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut log_file = LogFile::from_file(file.reopen().unwrap());
        log_file.write_text("carol:pw\n").unwrap();
        log_file.flush().unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "carol:pw\n");
    }

    #[test]
    fn test_memory_writer() {
        let reader = MemoryWriter::new();
        let mut writer = reader.clone();
        assert!(reader.is_empty());
        writer.write_text("Works: a:b\n").unwrap();
        writer.write_text("Invalid: c:d\n").unwrap();
        assert_eq!(reader.lines(), ["Works: a:b", "Invalid: c:d"]);
    }

    #[test]
    fn test_std_streams() {
        let mut stdout = LogStdout;
        assert!(stdout.write_text("Works: a:b\n").is_ok());
        assert!(stdout.flush().is_ok());
        let mut stderr = LogStderr;
        assert!(stderr.write_text("[INFO][TS:0] hello\n").is_ok());
        assert!(stderr.flush().is_ok());
    }
}
