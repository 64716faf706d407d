//! # File I/O Benchmark Library
//!
//! Compares four ways of moving whole files between disk and memory, and uses
//! the same four ways to persist a small key-value settings file.
//!
//! ## Supported I/O Methods
//!
//! - **Memory Mapped**: Map the file and copy through the mapping
//! - **Buffered Stdio**: A buffered stream with one bulk read or write
//! - **Stream I/O**: High-level stream, slurped to end on read
//! - **Direct Raw**: Unbuffered platform open/read/write calls
//!
//! ## Architecture Overview
//!
//! - `backend`: The `IoBackend` trait and one implementation per method
//! - `benchmark`: Fixture generation and the timed read loop
//! - `cli`: Command-line parsing and the `IoMethod` enumeration
//! - `config`: Settings model, text codec and the backend-backed store
//! - `fixture`: Writes the zero-filled benchmark data file
//! - `metrics`: Per-method timing collection with HDR histograms
//! - `results`: Report presentation and JSON output
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use file_io_benchmark::{BenchmarkConfig, BenchmarkRunner, ConfigStore, IoMethod};
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = ConfigStore::new("config.txt");
//!     let mut settings = store.load(IoMethod::MemoryMapped);
//!     settings.apply_grid_override(12);
//!     store.save(IoMethod::MemoryMapped, &settings)?;
//!
//!     let report = BenchmarkRunner::new(BenchmarkConfig::default()).run()?;
//!     println!("{} timings recorded", report.total_records());
//!     Ok(())
//! }
//! ```

/// Storage backends
///
/// One `IoBackend` implementation per I/O method. Every backend moves a whole
/// file in a single logical operation and reports short transfers as errors.
pub mod backend;

/// Core benchmarking functionality
///
/// Contains `BenchmarkRunner` and `BenchmarkConfig`, which generate the data
/// file and time repeated reads through every selected backend.
pub mod benchmark;

/// Command-line interface and configuration
pub mod cli;

/// Persistent application settings
///
/// The `Settings` model, its `key=value` text form, and `ConfigStore` which
/// loads and saves it through a chosen backend.
pub mod config;

pub mod error;

pub mod fixture;

pub mod logging;

/// Timing measurement and statistical analysis
pub mod metrics;

/// Result presentation and JSON output
pub mod results;

pub mod utils;

pub use backend::{BackendFactory, IoBackend};
pub use benchmark::{BenchmarkConfig, BenchmarkRunner};
pub use cli::{Args, IoMethod};
pub use config::{ConfigStore, Rgb, Settings};
pub use error::BackendError;
pub use results::{BenchmarkReport, MethodResults, ResultsManager};

/// The current version of the file I/O benchmark
///
/// Populated from Cargo.toml and recorded in JSON results.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Default settings file, relative to the working directory
    pub const CONFIG_FILE: &str = "config.txt";

    /// Default benchmark data file, relative to the working directory
    pub const DATA_FILE: &str = "data.bin";

    /// Default data file size (1 MiB)
    pub const DATA_FILE_SIZE: usize = 1024 * 1024;

    /// Write size used while generating the data file
    ///
    /// 1024 chunks of 1 KiB make up the default data file.
    pub const CHUNK_SIZE: usize = 1024;

    /// Timed reads per method
    pub const ITERATIONS: usize = 10;

    /// Untimed reads per method; off unless requested
    pub const WARMUP_ITERATIONS: usize = 0;
}
