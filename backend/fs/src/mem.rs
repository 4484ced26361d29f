//! In-memory filesystem.
//!
//! Clones share one tree, so a file appended through a handle opened on one
//! clone is readable from every other clone. Relative paths are stored as
//! given; the empty path (the parent of a bare file name) always exists.

use crate::{FileStat, FileSystem};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

type FileData = Arc<Mutex<Vec<u8>>>;

#[derive(Debug)]
enum Node {
    Dir,
    File(FileData),
}

/// Shared in-memory directory tree.
#[derive(Debug, Clone)]
pub struct MemFs {
    nodes: Arc<Mutex<BTreeMap<PathBuf, Node>>>,
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemFs {
    /// An empty tree containing only `/`.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::from("/"), Node::Dir);
        Self {
            nodes: Arc::new(Mutex::new(nodes)),
        }
    }

    /// Full contents of a file as bytes.
    pub fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let nodes = self.lock();
        match nodes.get(&normalize(path)) {
            Some(Node::File(data)) => Ok(lock_data(data).clone()),
            Some(Node::Dir) => Err(is_a_directory(path)),
            None => Err(not_found(path)),
        }
    }

    /// Full contents of a file as UTF-8 text.
    pub fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Create or replace a file with `contents`. Parent must exist.
    pub fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.lock();
        ensure_parent(&nodes, &path)?;
        match nodes.get(&path) {
            Some(Node::Dir) => Err(is_a_directory(&path)),
            Some(Node::File(data)) => {
                *lock_data(data) = contents.to_vec();
                Ok(())
            }
            None => {
                nodes.insert(path, Node::File(Arc::new(Mutex::new(contents.to_vec()))));
                Ok(())
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Node>> {
        self.nodes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FileSystem for MemFs {
    fn metadata(&self, path: &Path) -> io::Result<FileStat> {
        let path = normalize(path);
        if path.as_os_str().is_empty() {
            return Ok(dir_stat());
        }
        match self.lock().get(&path) {
            Some(Node::Dir) => Ok(dir_stat()),
            Some(Node::File(data)) => Ok(FileStat {
                is_dir: false,
                is_file: true,
                len: lock_data(data).len() as u64,
            }),
            None => Err(not_found(&path)),
        }
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.lock();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            match nodes.get(&current) {
                Some(Node::Dir) => {}
                Some(Node::File(_)) => {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("{} exists and is not a directory", current.display()),
                    ));
                }
                None => {
                    nodes.insert(current.clone(), Node::Dir);
                }
            }
        }
        Ok(())
    }

    fn open_append(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let path = normalize(path);
        let mut nodes = self.lock();
        ensure_parent(&nodes, &path)?;
        let data = match nodes.get(&path) {
            Some(Node::Dir) => return Err(is_a_directory(&path)),
            Some(Node::File(data)) => data.clone(),
            None => {
                let data: FileData = Arc::new(Mutex::new(Vec::new()));
                nodes.insert(path, Node::File(data.clone()));
                data
            }
        };
        Ok(Box::new(MemFile { data }))
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let path = normalize(path);
        let mut nodes = self.lock();
        match nodes.get(&path) {
            Some(Node::File(_)) => {
                nodes.remove(&path);
                Ok(())
            }
            Some(Node::Dir) => Err(is_a_directory(&path)),
            None => Err(not_found(&path)),
        }
    }
}

/// Append handle into a [`MemFs`] file. Survives removal of the file, like
/// an unlinked descriptor.
struct MemFile {
    data: FileData,
}

impl Write for MemFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock_data(&self.data).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn lock_data(data: &FileData) -> MutexGuard<'_, Vec<u8>> {
    data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drop `.` components and resolve `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

fn ensure_parent(nodes: &BTreeMap<PathBuf, Node>, path: &Path) -> io::Result<()> {
    match path.parent() {
        None => Ok(()),
        Some(parent) if parent.as_os_str().is_empty() => Ok(()),
        Some(parent) => match nodes.get(parent) {
            Some(Node::Dir) => Ok(()),
            Some(Node::File(_)) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is not a directory", parent.display()),
            )),
            None => Err(not_found(parent)),
        },
    }
}

fn dir_stat() -> FileStat {
    FileStat {
        is_dir: true,
        is_file: false,
        len: 0,
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}

fn is_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::Other,
        format!("{} is a directory", path.display()),
    )
}
