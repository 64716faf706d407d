use super::{file_len_to_usize, IoBackend};
use crate::error::{ensure_complete, BackendError, Transfer};
use std::path::Path;

/// Unbuffered access through the platform's own open/read/write calls.
///
/// Exactly one read or write call moves the payload, using a single
/// caller-sized buffer. On Unix the calls go through `nix`; the descriptor is
/// wrapped in an `OwnedFd` as soon as it is opened so every return path
/// closes it.
#[derive(Debug, Default)]
pub struct DirectRawBackend;

impl DirectRawBackend {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
mod platform {
    use super::*;
    use nix::errno::Errno;
    use nix::fcntl::{open, OFlag};
    use nix::sys::stat::{fstat, Mode};
    use nix::unistd;
    use std::io;
    use std::os::unix::io::{AsFd, AsRawFd, FromRawFd, OwnedFd};

    fn open_owned(path: &Path, flags: OFlag, mode: Mode) -> Result<OwnedFd, BackendError> {
        let raw = open(path, flags | OFlag::O_CLOEXEC, mode)
            .map_err(|e| BackendError::open(path, io::Error::from(e)))?;
        // SAFETY: `raw` was just returned by open(2) and is owned by nobody else.
        Ok(unsafe { OwnedFd::from_raw_fd(raw) })
    }

    /// Issue one read(2)/write(2) through `call`, retrying only on EINTR,
    /// and require it to move exactly `expected` bytes.
    pub(super) fn single_transfer<F>(
        operation: Transfer,
        path: &Path,
        expected: usize,
        mut call: F,
    ) -> Result<(), BackendError>
    where
        F: FnMut() -> nix::Result<usize>,
    {
        let moved = loop {
            match call() {
                Err(Errno::EINTR) => continue,
                other => break other,
            }
        }
        .map_err(|e| BackendError::io(path, io::Error::from(e)))?;
        ensure_complete(operation, path, expected, moved)
    }

    pub(super) fn write(path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
        let fd = open_owned(
            path,
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
            Mode::from_bits_truncate(0o644),
        )?;
        if bytes.is_empty() {
            return Ok(());
        }

        single_transfer(Transfer::Write, path, bytes.len(), || {
            unistd::write(fd.as_fd(), bytes)
        })
    }

    pub(super) fn read(path: &Path) -> Result<Vec<u8>, BackendError> {
        let fd = open_owned(path, OFlag::O_RDONLY, Mode::empty())?;
        let stat =
            fstat(fd.as_raw_fd()).map_err(|e| BackendError::io(path, io::Error::from(e)))?;
        let size = file_len_to_usize(path, stat.st_size.max(0) as u64)?;

        let mut buffer = vec![0u8; size];
        if size == 0 {
            return Ok(buffer);
        }

        single_transfer(Transfer::Read, path, size, || {
            unistd::read(fd.as_raw_fd(), &mut buffer)
        })?;
        Ok(buffer)
    }
}

#[cfg(not(unix))]
mod platform {
    use super::*;
    use std::fs::{File, OpenOptions};
    use std::io::{Read, Write};

    // std::fs::File issues ReadFile/WriteFile directly without buffering.
    pub(super) fn write(path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| BackendError::open(path, e))?;
        if bytes.is_empty() {
            return Ok(());
        }
        let written = file.write(bytes).map_err(|e| BackendError::io(path, e))?;
        ensure_complete(Transfer::Write, path, bytes.len(), written)
    }

    pub(super) fn read(path: &Path) -> Result<Vec<u8>, BackendError> {
        let mut file = File::open(path).map_err(|e| BackendError::open(path, e))?;
        let len = file.metadata().map_err(|e| BackendError::io(path, e))?.len();
        let size = file_len_to_usize(path, len)?;
        let mut buffer = vec![0u8; size];
        if size == 0 {
            return Ok(buffer);
        }
        let read = file.read(&mut buffer).map_err(|e| BackendError::io(path, e))?;
        ensure_complete(Transfer::Read, path, size, read)?;
        Ok(buffer)
    }
}

impl IoBackend for DirectRawBackend {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
        platform::write(path, bytes)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, BackendError> {
        platform::read(path)
    }

    fn name(&self) -> &'static str {
        "Direct Raw"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.bin");
        let backend = DirectRawBackend::new();

        let payload: Vec<u8> = (0..65_536u32).map(|i| (i * 7 % 256) as u8).collect();
        backend.write(&path, &payload).unwrap();
        assert_eq!(backend.read(&path).unwrap(), payload);
    }

    #[test]
    fn test_write_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(&path, vec![b'#'; 512]).unwrap();

        DirectRawBackend::new().write(&path, b"gridSize=4\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"gridSize=4\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_single_transfer_counts_bytes() {
        use nix::errno::Errno;

        let path = Path::new("raw.bin");

        let err = platform::single_transfer(Transfer::Write, path, 8, || Ok(3)).unwrap_err();
        assert!(matches!(
            err,
            BackendError::ShortTransfer {
                operation: Transfer::Write,
                expected: 8,
                actual: 3,
                ..
            }
        ));

        let err = platform::single_transfer(Transfer::Read, path, 4096, || Ok(0)).unwrap_err();
        assert!(matches!(
            err,
            BackendError::ShortTransfer {
                operation: Transfer::Read,
                actual: 0,
                ..
            }
        ));

        let err =
            platform::single_transfer(Transfer::Read, path, 8, || Err(Errno::EIO)).unwrap_err();
        assert!(matches!(err, BackendError::Io { .. }));

        platform::single_transfer(Transfer::Write, path, 8, || Ok(8)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_single_transfer_retries_interrupted_calls() {
        use nix::errno::Errno;

        let mut calls = 0;
        platform::single_transfer(Transfer::Read, Path::new("raw.bin"), 16, || {
            calls += 1;
            if calls < 3 {
                Err(Errno::EINTR)
            } else {
                Ok(16)
            }
        })
        .unwrap();
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_missing_file_is_open_failure() {
        let dir = tempdir().unwrap();
        let err = DirectRawBackend::new()
            .read(&dir.path().join("missing.bin"))
            .unwrap_err();
        assert!(matches!(err, BackendError::Open { .. }));
        assert!(err.is_not_found());
    }
}
