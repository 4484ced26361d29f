//! `toolbelt-fs` — the small filesystem capability the toolbelt packages write through.
//!
//! Provides:
//! - [`FileSystem`]: stat, recursive mkdir, open-for-append, remove
//! - [`OsFs`]: adapter over `std::fs`
//! - [`MemFs`]: shareable in-memory tree for tests

pub mod mem;
pub mod os;

pub use mem::MemFs;
pub use os::OsFs;

use std::fmt::Debug;
use std::io::{self, Write};
use std::path::Path;

/// The subset of file metadata callers inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_dir: bool,
    pub is_file: bool,
    pub len: u64,
}

/// Filesystem operations needed to prepare and append to files.
pub trait FileSystem: Send + Sync + Debug {
    /// Stat a path. Missing paths return `io::ErrorKind::NotFound`.
    fn metadata(&self, path: &Path) -> io::Result<FileStat>;

    /// Create `path` and every missing parent.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Open `path` for writing at its end, creating it if absent.
    /// Existing content is never truncated.
    fn open_append(&self, path: &Path) -> io::Result<Box<dyn Write + Send>>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.metadata(path).map(|m| m.is_dir).unwrap_or(false)
    }
}
