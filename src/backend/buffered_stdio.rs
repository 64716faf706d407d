use super::{file_len_to_usize, read_once, write_once, IoBackend};
use crate::error::BackendError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Buffered stream access with a single bulk transfer per call.
///
/// `write` hands the whole payload to one `write` call on a [`BufWriter`];
/// `read` measures the file by seeking to its end, allocates exactly that
/// much and issues one `read` call on a [`BufReader`]. Both verify the byte
/// count.
#[derive(Debug, Default)]
pub struct BufferedStdioBackend;

impl BufferedStdioBackend {
    pub fn new() -> Self {
        Self
    }
}

impl IoBackend for BufferedStdioBackend {
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
        let file = File::create(path).map_err(|e| BackendError::open(path, e))?;
        let mut writer = BufWriter::new(file);
        write_once(&mut writer, path, bytes)?;
        writer.flush().map_err(|e| BackendError::io(path, e))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, BackendError> {
        let file = File::open(path).map_err(|e| BackendError::open(path, e))?;
        let mut reader = BufReader::new(file);

        let size = reader
            .seek(SeekFrom::End(0))
            .map_err(|e| BackendError::io(path, e))?;
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| BackendError::io(path, e))?;

        let size = file_len_to_usize(path, size)?;
        read_once(&mut reader, path, size)
    }

    fn name(&self) -> &'static str {
        "Buffered Stdio"
    }
}
