//! Output destinations shared by the render handlers.

use crate::error::{LogError, Result};
use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

type BoxedWriter = Box<dyn Write + Send>;

/// A named writer guarded by its own lock.
///
/// Each record is written with a single `write_all` under the lock, so
/// concurrent callers never interleave partial lines. After [`close`](Self::close)
/// writes succeed without doing anything.
pub struct Destination {
    name: String,
    terminal: bool,
    writer: Mutex<Option<BoxedWriter>>,
}

impl Destination {
    pub fn stdout() -> Self {
        let terminal = io::stdout().is_terminal();
        Self::with_terminal("stdout", Box::new(io::stdout()), terminal)
    }

    pub fn stderr() -> Self {
        let terminal = io::stderr().is_terminal();
        Self::with_terminal("stderr", Box::new(io::stderr()), terminal)
    }

    /// An opened log file.
    pub fn file(path: &Path, writer: BoxedWriter) -> Self {
        Self::with_terminal(path.display().to_string(), writer, false)
    }

    /// Any writer that is not a terminal.
    pub fn writer(name: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self::with_terminal(name, Box::new(writer), false)
    }

    /// A writer treated as a terminal regardless of what it is.
    pub fn terminal(name: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self::with_terminal(name, Box::new(writer), true)
    }

    fn with_terminal(name: impl Into<String>, writer: BoxedWriter, terminal: bool) -> Self {
        Self {
            name: name.into(),
            terminal,
            writer: Mutex::new(Some(writer)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    /// Write one fully rendered record.
    pub fn write_record(&self, bytes: &[u8]) -> Result<()> {
        let mut guard = self.lock();
        let Some(writer) = guard.as_mut() else {
            return Ok(());
        };
        writer
            .write_all(bytes)
            .and_then(|_| writer.flush())
            .map_err(|source| LogError::Write {
                destination: self.name.clone(),
                source,
            })
    }

    pub fn flush(&self) -> Result<()> {
        let mut guard = self.lock();
        match guard.as_mut() {
            Some(writer) => writer.flush().map_err(|source| LogError::Flush {
                destination: self.name.clone(),
                source,
            }),
            None => Ok(()),
        }
    }

    /// Flush and drop the writer, releasing any file descriptor.
    pub fn close(&self) -> Result<()> {
        let taken = self.lock().take();
        match taken {
            Some(mut writer) => writer.flush().map_err(|source| LogError::Flush {
                destination: self.name.clone(),
                source,
            }),
            None => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<BoxedWriter>> {
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("name", &self.name)
            .field("terminal", &self.terminal)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Cloneable in-memory writer for capturing console output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
