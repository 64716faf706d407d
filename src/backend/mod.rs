//! File I/O strategy abstraction.
//!
//! Every strategy implements [`IoBackend`]: write a whole payload to a path,
//! or read a whole file back. Callers pick a strategy with an
//! [`IoMethod`](crate::cli::IoMethod) and obtain it from [`BackendFactory`].
//!
//! All implementations follow the same resource rules: each OS handle or
//! mapping is owned by a value that releases it on drop, so early returns on
//! any failure path never leak, and a transfer that moves fewer bytes than
//! requested is reported as [`BackendError::ShortTransfer`].

use crate::cli::IoMethod;
use crate::error::{ensure_complete, BackendError, Transfer};
use std::io::{Read, Write};
use std::path::Path;

pub mod buffered_stdio;
pub mod direct_raw;
pub mod memory_mapped;
pub mod stream_io;

pub use buffered_stdio::BufferedStdioBackend;
pub use direct_raw::DirectRawBackend;
pub use memory_mapped::MemoryMappedBackend;
pub use stream_io::StreamIoBackend;

/// Whole-file read/write capability shared by all strategies
pub trait IoBackend {
    /// Replace the contents of `path` with `bytes`, creating it if needed.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), BackendError>;

    /// Return the full contents of `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>, BackendError>;

    /// Strategy name for logs and reports
    fn name(&self) -> &'static str;
}

/// Creates backend instances from a method selection
pub struct BackendFactory;

impl BackendFactory {
    pub fn create(method: IoMethod) -> Result<Box<dyn IoBackend>, anyhow::Error> {
        match method {
            IoMethod::MemoryMapped => Ok(Box::new(MemoryMappedBackend::new())),
            IoMethod::BufferedStdio => Ok(Box::new(BufferedStdioBackend::new())),
            IoMethod::StreamIo => Ok(Box::new(StreamIoBackend::new())),
            IoMethod::DirectRaw => Ok(Box::new(DirectRawBackend::new())),
            IoMethod::All => Err(anyhow::anyhow!(
                "'All' method should be expanded before backend creation"
            )),
        }
    }
}

/// Issue exactly one `write` call for the whole payload and check its count.
///
/// Shared by the strategies whose contract is "one bulk write". Generic over
/// the writer so a short write can be simulated in tests.
pub(crate) fn write_once<W: Write>(
    writer: &mut W,
    path: &Path,
    bytes: &[u8],
) -> Result<(), BackendError> {
    if bytes.is_empty() {
        return Ok(());
    }
    let written = writer
        .write(bytes)
        .map_err(|e| BackendError::io(path, e))?;
    ensure_complete(Transfer::Write, path, bytes.len(), written)
}

/// Issue exactly one `read` call into an exact-size buffer and check its count.
pub(crate) fn read_once<R: Read>(
    reader: &mut R,
    path: &Path,
    expected: usize,
) -> Result<Vec<u8>, BackendError> {
    let mut buffer = vec![0u8; expected];
    if expected == 0 {
        return Ok(buffer);
    }
    let read = reader
        .read(&mut buffer)
        .map_err(|e| BackendError::io(path, e))?;
    ensure_complete(Transfer::Read, path, expected, read)?;
    Ok(buffer)
}

/// Convert a platform file length to an in-memory size.
pub(crate) fn file_len_to_usize(path: &Path, len: u64) -> Result<usize, BackendError> {
    usize::try_from(len).map_err(|_| {
        BackendError::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("file of {} bytes does not fit in memory", len),
            ),
        )
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{self, Read, Write};

    /// Writer that accepts at most `limit` bytes per call
    pub struct ShortWriter {
        pub limit: usize,
        pub data: Vec<u8>,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.limit);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Reader that yields at most `limit` bytes per call
    pub struct ShortReader {
        pub limit: usize,
        pub data: Vec<u8>,
        pub pos: usize,
    }

    impl Read for ShortReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let remaining = &self.data[self.pos..];
            let n = buf.len().min(self.limit).min(remaining.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.pos += n;
            Ok(n)
        }
    }
}
