//! `std::fs` adapter.

use crate::{FileStat, FileSystem};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// The real operating-system filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl OsFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFs {
    fn metadata(&self, path: &Path) -> io::Result<FileStat> {
        let meta = fs::metadata(path)?;
        Ok(FileStat {
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
            len: meta.len(),
        })
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn open_append(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = %path.display(), "Opened file for append");
        Ok(Box::new(file))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}
