//! Error types for the I/O backend contract.
//!
//! Backends report failures through [`BackendError`]. Orchestration layers
//! (fixture generation, the benchmark runner, `main`) wrap these in
//! `anyhow::Error` with context, the same split the rest of the crate uses.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Direction of a transfer that came up short
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Read,
    Write,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transfer::Read => write!(f, "read"),
            Transfer::Write => write!(f, "write"),
        }
    }
}

/// Failure of a single backend `read` or `write`
#[derive(Debug, Error)]
pub enum BackendError {
    /// The file could not be opened or created
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The memory mapping could not be established
    #[error("failed to map {}: {source}", .path.display())]
    Mapping {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The platform transferred fewer bytes than requested
    #[error("short {operation} on {}: transferred {actual} of {expected} bytes", .path.display())]
    ShortTransfer {
        operation: Transfer,
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// Any other I/O failure after the file was opened
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BackendError {
    pub fn open(path: &Path, source: io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn mapping(path: &Path, source: io::Error) -> Self {
        Self::Mapping {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the underlying cause is a missing file
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Open { source, .. } | Self::Io { source, .. } => {
                source.kind() == io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

/// Fail with [`BackendError::ShortTransfer`] unless `actual == expected`.
pub fn ensure_complete(
    operation: Transfer,
    path: &Path,
    expected: usize,
    actual: usize,
) -> Result<(), BackendError> {
    if actual == expected {
        Ok(())
    } else {
        Err(BackendError::ShortTransfer {
            operation,
            path: path.to_path_buf(),
            expected,
            actual,
        })
    }
}
