//! Byte-level persistence collaborator.
//!
//! The document core reads and writes whole files through this trait;
//! path resolution, extension normalization and save-as policy belong
//! to callers.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Whole-file read/write access.
pub trait Storage {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Filesystem-backed storage.
///
/// File handles are held only inside each call; drop releases them on
/// every exit path, including a write that fails partway through.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let mut file = File::open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        file.flush()
    }
}
