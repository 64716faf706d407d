//! Benchmark input file generation.
//!
//! The fixture is plain zero filler written with ordinary buffered writes. Its
//! own I/O strategy is fixed and never part of what gets measured.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes a zero-filled file of a fixed size in fixed-size chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFileGenerator {
    total_size: usize,
    chunk_size: usize,
}

impl Default for DataFileGenerator {
    fn default() -> Self {
        Self {
            total_size: crate::defaults::DATA_FILE_SIZE,
            chunk_size: crate::defaults::CHUNK_SIZE,
        }
    }
}

impl DataFileGenerator {
    pub fn new(total_size: usize, chunk_size: usize) -> Result<Self> {
        crate::utils::validate_fixture_sizes(total_size, chunk_size)?;
        Ok(Self {
            total_size,
            chunk_size,
        })
    }

    /// Create or truncate `path` and fill it with exactly `total_size` zero bytes.
    ///
    /// The size is checked after the file is closed; a mismatch is an error so
    /// a benchmark never runs against an incomplete fixture.
    pub fn generate(&self, path: &Path) -> Result<()> {
        crate::utils::validate_fixture_sizes(self.total_size, self.chunk_size)?;

        let file = File::create(path)
            .with_context(|| format!("Failed to create data file {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        let chunk = vec![0u8; self.chunk_size];
        let full_chunks = self.total_size / self.chunk_size;
        let remainder = self.total_size % self.chunk_size;

        for _ in 0..full_chunks {
            writer
                .write_all(&chunk)
                .with_context(|| format!("Failed to write data file {}", path.display()))?;
        }
        if remainder > 0 {
            writer
                .write_all(&chunk[..remainder])
                .with_context(|| format!("Failed to write data file {}", path.display()))?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| e.into_error())
            .with_context(|| format!("Failed to flush data file {}", path.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to sync data file {}", path.display()))?;
        drop(file);

        let actual = std::fs::metadata(path)
            .with_context(|| format!("Failed to stat data file {}", path.display()))?
            .len();
        if actual != self.total_size as u64 {
            bail!(
                "Data file {} is {} bytes, expected {}",
                path.display(),
                actual,
                self.total_size
            );
        }

        debug!(
            "Generated {} ({} chunks of {} bytes)",
            path.display(),
            full_chunks + usize::from(remainder > 0),
            self.chunk_size
        );
        Ok(())
    }
}
