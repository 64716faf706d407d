use super::{file_len_to_usize, IoBackend};
use crate::error::BackendError;
use memmap2::{Mmap, MmapMut};
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::trace;

/// Whole-file access through a virtual memory mapping.
///
/// The file handle and the mapping are both dropped before returning, on the
/// error path as well. Zero-length files are handled without mapping since a
/// mapping cannot be empty.
#[derive(Debug, Default)]
pub struct MemoryMappedBackend;

impl MemoryMappedBackend {
    pub fn new() -> Self {
        Self
    }
}

impl IoBackend for MemoryMappedBackend {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| BackendError::open(path, e))?;

        // The mapping has a fixed extent, so size the file first.
        file.set_len(bytes.len() as u64)
            .map_err(|e| BackendError::io(path, e))?;
        if bytes.is_empty() {
            return Ok(());
        }

        // SAFETY: the file was just truncated and sized by this process and is
        // not shared with other writers while the mapping is alive.
        let mut map =
            unsafe { MmapMut::map_mut(&file) }.map_err(|e| BackendError::mapping(path, e))?;
        map.copy_from_slice(bytes);
        map.flush().map_err(|e| BackendError::io(path, e))?;
        trace!("mapped write of {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, BackendError> {
        let file = File::open(path).map_err(|e| BackendError::open(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| BackendError::io(path, e))?
            .len();
        let len = file_len_to_usize(path, len)?;
        if len == 0 {
            return Ok(Vec::new());
        }

        // SAFETY: read-only mapping; the file is not truncated concurrently
        // because all access to it is sequenced by the caller.
        let map = unsafe { Mmap::map(&file) }.map_err(|e| BackendError::mapping(path, e))?;

        // Touch both ends so the pages are actually faulted in before copying.
        let first = std::hint::black_box(map[0]);
        let last = std::hint::black_box(map[map.len() - 1]);
        trace!(
            "mapped {} bytes of {} (first={:#04x}, last={:#04x})",
            map.len(),
            path.display(),
            first,
            last
        );
        Ok(map.to_vec())
    }

    fn name(&self) -> &'static str {
        "Memory Mapped"
    }
}
