use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use chrono::Utc;
use credlog_core::{Destination, LogError, LogKind, OutputConfig, Renderer};

use crate::sinks::{OutcomeFiles, Sinks, WriterId};

/// Counters for events that could not be delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Writes or flushes rejected by a destination.
    pub write_failures: u64,
    /// Messages abandoned because they could not be built.
    pub dropped_messages: u64,
}

/// Routes events to their destinations and serializes the writes.
///
/// A single lock guards every destination, so lines from concurrent callers
/// never interleave, even across streams and files.
pub struct Dispatcher {
    config: OutputConfig,
    renderer: Renderer,
    files: Option<OutcomeFiles>,
    sinks: Mutex<Sinks>,
    write_failures: AtomicU64,
    dropped_messages: AtomicU64,
}

impl Dispatcher {
    pub fn new(config: OutputConfig, sinks: Sinks) -> Self {
        Self {
            config,
            renderer: Renderer::new(config.colors),
            files: sinks.outcome_files().copied(),
            sinks: Mutex::new(sinks),
            write_failures: AtomicU64::new(0),
            dropped_messages: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn files_enabled(&self) -> bool {
        self.files.is_some()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            write_failures: self.write_failures.load(Ordering::Relaxed),
            dropped_messages: self.dropped_messages.load(Ordering::Relaxed),
        }
    }

    /// Logs one event. `message` is the `identifier:secret` pair for outcomes
    /// and free text for diagnostics.
    pub fn log(&self, kind: LogKind, message: &str) {
        if kind == LogKind::DebugInfo {
            if self.config.verbose && !self.config.plain_output {
                self.emit(kind, message, Destination::Terminal);
            }
        } else if !self.config.valid_only || kind.is_valid() {
            self.emit(kind, message, self.human_destination());
        }

        if let Some(files) = self.files {
            for id in files.targets(kind) {
                let mut sinks = self.lock();
                self.render_and_write(&mut sinks, id, kind, message, Destination::File);
            }
        }
    }

    /// Logs an event given its numeric code. Unknown codes print an empty
    /// line on the human-facing stream and never reach the files.
    pub fn log_code(&self, code: i32, message: &str) {
        match LogKind::from_code(code) {
            Some(kind) => self.log(kind, message),
            None if self.config.valid_only => {}
            None => {
                let destination = self.human_destination();
                let mut sinks = self.lock();
                if let Some(id) = sinks.stream(destination) {
                    let text = self.renderer.render_unknown(destination);
                    self.write(&mut sinks, id, &text);
                }
            }
        }
    }

    /// Flushes every destination, returning the first error.
    pub fn flush(&self) -> Result<(), LogError> {
        let mut sinks = self.lock();
        let mut result = Ok(());
        for writer in sinks.writers_mut() {
            if let Err(err) = writer.flush()
                && result.is_ok()
            {
                result = Err(err.into());
            }
        }
        result
    }

    /// Flushes and closes every destination.
    pub fn shutdown(self) -> Result<(), LogError> {
        self.flush()
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped_messages.fetch_add(1, Ordering::Relaxed);
    }

    fn human_destination(&self) -> Destination {
        if self.config.plain_output {
            Destination::Plain
        } else {
            Destination::Terminal
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sinks> {
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, kind: LogKind, message: &str, destination: Destination) {
        let mut sinks = self.lock();
        if let Some(id) = sinks.stream(destination) {
            self.render_and_write(&mut sinks, id, kind, message, destination);
        }
    }

    fn render_and_write(
        &self,
        sinks: &mut Sinks,
        id: WriterId,
        kind: LogKind,
        message: &str,
        destination: Destination,
    ) {
        let text = self
            .renderer
            .render(kind, message, destination, Utc::now().timestamp());
        if !text.is_empty() {
            self.write(sinks, id, &text);
        }
    }

    fn write(&self, sinks: &mut Sinks, id: WriterId, text: &str) {
        let Some(writer) = sinks.writer(id) else {
            self.write_failures.fetch_add(1, Ordering::Relaxed);
            return;
        };
        if writer.write_text(text).and_then(|()| writer.flush()).is_err() {
            self.write_failures.fetch_add(1, Ordering::Relaxed);
        }
    }
}
