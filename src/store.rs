//! Byte-level persistence for the collection.
//!
//! The core never touches files directly: it serializes to bytes and hands
//! them to a [`Store`]. [`FileStore`] is the real backend, [`MemoryStore`]
//! serves tests.

use std::cell::RefCell;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A place the serialized collection is read from and written to.
pub trait Store {
    /// Human-readable location, for messages.
    fn describe(&self) -> String;

    /// The stored bytes, or `None` if nothing was ever stored.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the stored bytes.
    fn write(&self, bytes: &[u8]) -> Result<()>;
}

/// JSON file on disk.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so an interrupted save never leaves a half-written file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for FileStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        }
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        tmp.write_all(bytes)
            .context("Failed to write temporary file")?;
        tmp.flush().context("Failed to flush temporary file")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    bytes: RefCell<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: RefCell::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.bytes.borrow().clone()
    }
}

impl Store for MemoryStore {
    fn describe(&self) -> String {
        "<memory>".to_string()
    }

    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.bytes.borrow().clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        *self.bytes.borrow_mut() = Some(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("products.json"));
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("nested/products.json"));
        store.write(b"[]").unwrap();
        assert_eq!(store.read().unwrap().unwrap(), b"[]");

        store.write(b"[1]").unwrap();
        assert_eq!(store.read().unwrap().unwrap(), b"[1]");
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.read().unwrap().is_none());
        store.write(b"null").unwrap();
        assert_eq!(store.contents().unwrap(), b"null");
        assert_eq!(
            MemoryStore::with_contents("[]").read().unwrap().unwrap(),
            b"[]"
        );
    }
}
