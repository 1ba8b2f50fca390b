//! Atomic I/O operations with file locking

use crate::{Error, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename: the temp file lives in the target's
/// directory (same filesystem), is flushed to disk, and only then renamed
/// over the target. Any failure before the rename removes the temp file and
/// leaves the previous target untouched.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let result = write_temp(&temp_path, path, content)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::write(path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    path.with_file_name(temp_name)
}

fn write_temp(temp_path: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::write(temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|e| Error::lock(target, e))?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::write(temp_path, e))?;
    temp_file
        .sync_all()
        .map_err(|e| Error::write(temp_path, e))?;

    // Released on drop as well; unlocking here keeps Windows from refusing the rename.
    temp_file.unlock().map_err(|e| Error::lock(target, e))?;
    Ok(())
}

/// Read a file's bytes, or `None` when it does not exist.
pub fn read_bytes_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Read a file's bytes, treating a missing file as empty.
pub fn read_bytes_or_empty(path: &Path) -> Result<Vec<u8>> {
    Ok(read_bytes_if_exists(path)?.unwrap_or_default())
}

/// Read a UTF-8 text file.
///
/// Invalid UTF-8 is an error rather than being decoded lossily, so nothing
/// read here can be written back altered.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    String::from_utf8(bytes).map_err(|e| {
        Error::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.utf8_error()),
        )
    })
}

/// Write text content to a file atomically.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// An exclusive advisory lock held on a lock file until dropped.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Create the lock file if needed and block until the exclusive lock is held.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::io(path, e))?;
        file.lock_exclusive().map_err(|e| Error::lock(path, e))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path of the underlying lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
