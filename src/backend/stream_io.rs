use super::{file_len_to_usize, IoBackend};
use crate::error::{ensure_complete, BackendError, Transfer};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// High-level stream access.
///
/// `write` streams the payload through the writer until all of it is
/// accepted; `read` slurps the whole stream into a growing buffer. Rust
/// streams never translate line endings, so the content is byte-exact.
#[derive(Debug, Default)]
pub struct StreamIoBackend;

impl StreamIoBackend {
    pub fn new() -> Self {
        Self
    }
}

impl IoBackend for StreamIoBackend {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
        let file = File::create(path).map_err(|e| BackendError::open(path, e))?;
        let mut stream = BufWriter::new(file);
        stream_out(&mut stream, path, bytes)?;

        // into_inner flushes; surface flush errors instead of losing them on drop.
        let file = stream
            .into_inner()
            .map_err(|e| BackendError::io(path, e.into_error()))?;
        file.sync_data().map_err(|e| BackendError::io(path, e))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, BackendError> {
        let file = File::open(path).map_err(|e| BackendError::open(path, e))?;
        let expected = file
            .metadata()
            .map_err(|e| BackendError::io(path, e))?
            .len();
        let expected = file_len_to_usize(path, expected)?;

        let mut stream = BufReader::new(file);
        let mut content = Vec::new();
        let read = stream
            .read_to_end(&mut content)
            .map_err(|e| BackendError::io(path, e))?;
        ensure_complete(Transfer::Read, path, expected, read)?;
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "Stream I/O"
    }
}

/// Push `bytes` through `stream`, tracking how much was accepted.
///
/// A stream that stops accepting data is a short write, not an I/O error.
fn stream_out<W: Write>(stream: &mut W, path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
    let mut accepted = 0;
    while accepted < bytes.len() {
        match stream.write(&bytes[accepted..]) {
            Ok(0) => break,
            Ok(n) => accepted += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(BackendError::io(path, e)),
        }
    }
    ensure_complete(Transfer::Write, path, bytes.len(), accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::ShortWriter;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stream.bin");
        let backend = StreamIoBackend::new();

        // CR/LF and NUL bytes must survive untouched.
        let payload = b"line one\r\nline two\n\0\x1a\xff".repeat(500);
        backend.write(&path, &payload).unwrap();
        assert_eq!(backend.read(&path).unwrap(), payload);
    }

    #[test]
    fn test_stream_out_accepts_partial_writes() {
        let mut writer = ShortWriter {
            limit: 5,
            data: Vec::new(),
        };
        stream_out(&mut writer, Path::new("x"), b"windowWidth=320\n").unwrap();
        assert_eq!(writer.data, b"windowWidth=320\n");
    }

    #[test]
    fn test_stream_out_detects_stalled_stream() {
        let mut writer = ShortWriter {
            limit: 0,
            data: Vec::new(),
        };
        let err = stream_out(&mut writer, Path::new("x"), b"abc").unwrap_err();
        assert!(matches!(
            err,
            BackendError::ShortTransfer {
                operation: Transfer::Write,
                expected: 3,
                actual: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file_is_open_failure() {
        let dir = tempdir().unwrap();
        let err = StreamIoBackend::new()
            .read(&dir.path().join("missing.txt"))
            .unwrap_err();
        assert!(matches!(err, BackendError::Open { .. }));
    }
}
