use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::writer::MakeWriter;

/// Sends diagnostics to stderr, and appends them to a log file when one is configured.
///
/// stdout is left to query results.
#[derive(Clone, Default)]
pub(crate) struct DiagnosticsSink {
    log_file: Option<Arc<Mutex<File>>>,
}

impl DiagnosticsSink {
    /// Open (or create) `path` for appending, so successive runs share one log.
    ///
    /// # Errors
    /// Returns the I/O error if the log file cannot be opened.
    pub(crate) fn open(path: Option<&Path>) -> io::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            log_file: Some(Arc::new(Mutex::new(file))),
        })
    }
}

impl<'a> MakeWriter<'a> for DiagnosticsSink {
    type Writer = DiagnosticsLine;

    fn make_writer(&'a self) -> Self::Writer {
        DiagnosticsLine {
            log_file: self.log_file.clone(),
        }
    }
}

/// Writer handed out per event by [`DiagnosticsSink`].
pub(crate) struct DiagnosticsLine {
    log_file: Option<Arc<Mutex<File>>>,
}

impl DiagnosticsLine {
    fn log_file(&self) -> Option<MutexGuard<'_, File>> {
        self.log_file
            .as_ref()
            .map(|file| file.lock().unwrap_or_else(std::sync::PoisonError::into_inner))
    }
}

impl Write for DiagnosticsLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().lock().write_all(buf)?;
        if let Some(mut file) = self.log_file() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().lock().flush()?;
        match self.log_file() {
            Some(mut file) => file.flush(),
            None => Ok(()),
        }
    }
}
