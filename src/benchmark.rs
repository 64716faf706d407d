//! # Benchmark Engine Module
//!
//! This module contains the benchmarking engine that measures how long each
//! file I/O method takes to read the generated data file.
//!
//! ## Key Components
//!
//! - **BenchmarkRunner**: Generates the fixture and drives every method's timed reads
//! - **BenchmarkConfig**: Configuration structure that controls test parameters
//!
//! ## Test Execution Lifecycle
//!
//! 1. **Fixture**: A fresh data file is written, replacing any previous one
//! 2. **Warmup**: Optional untimed reads per method
//! 3. **Measurement**: `iterations` timed reads per method, strictly one after another
//! 4. **Aggregation**: Per-method mean and distribution statistics
//!
//! Methods always run in the same order (memory-mapped, buffered stdio,
//! stream, raw) so repeated runs are comparable. Nothing runs concurrently;
//! each read returns only after its handles and mappings are released.

use crate::{
    backend::{BackendFactory, IoBackend},
    cli::{Args, IoMethod},
    fixture::DataFileGenerator,
    metrics::TimingCollector,
    results::{BenchmarkReport, MethodResults},
    utils,
};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};

/// Percentiles reported for every method
pub const DEFAULT_PERCENTILES: [f64; 4] = [50.0, 95.0, 99.0, 99.9];

/// A helper struct to provide a consistent, single source of truth for
/// displaying the benchmark configuration.
struct BenchmarkConfigDisplay<'a> {
    config: &'a BenchmarkConfig,
    methods: &'a [IoMethod],
}

impl<'a> std::fmt::Display for BenchmarkConfigDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let methods: Vec<String> = self.methods.iter().map(|m| m.to_string()).collect();

        writeln!(
            f,
            "-----------------------------------------------------------------"
        )?;
        writeln!(
            f,
            "File read benchmark: {} file, {} iterations per method",
            utils::format_bytes(self.config.data_size),
            self.config.iterations
        )?;
        writeln!(f, "  Data File:          {}", self.config.data_file.display())?;
        writeln!(f, "  Chunk Size:         {} bytes", self.config.chunk_size)?;
        writeln!(f, "  Warmup Iterations:  {}", self.config.warmup_iterations)?;
        writeln!(f, "  Methods:            {}", methods.join(", "))?;
        write!(
            f,
            "-----------------------------------------------------------------"
        )
    }
}

/// Configuration for benchmark execution
#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    /// Methods to benchmark; normalized into the fixed order before running
    pub methods: Vec<IoMethod>,

    /// Timed reads per method
    pub iterations: usize,

    /// Untimed reads per method before measurement
    pub warmup_iterations: usize,

    /// Where the fixture is written and read
    pub data_file: PathBuf,

    /// Fixture size in bytes
    pub data_size: usize,

    /// Write size used while generating the fixture
    pub chunk_size: usize,

    /// Record a failed method and keep going instead of aborting the run
    pub continue_on_error: bool,

    /// Percentiles to calculate for each method's timings
    pub percentiles: Vec<f64>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            methods: IoMethod::ALL.to_vec(),
            iterations: crate::defaults::ITERATIONS,
            warmup_iterations: crate::defaults::WARMUP_ITERATIONS,
            data_file: PathBuf::from(crate::defaults::DATA_FILE),
            data_size: crate::defaults::DATA_FILE_SIZE,
            chunk_size: crate::defaults::CHUNK_SIZE,
            continue_on_error: false,
            percentiles: DEFAULT_PERCENTILES.to_vec(),
        }
    }
}

impl BenchmarkConfig {
    /// Create benchmark configuration from CLI arguments
    ///
    /// ## Validation
    /// - At least one timed iteration
    /// - Fixture and chunk sizes non-zero, chunk not larger than the fixture
    pub fn from_args(args: &Args) -> Result<Self> {
        utils::validate_iterations(args.iterations)?;
        utils::validate_fixture_sizes(args.data_size, args.chunk_size)?;

        Ok(Self {
            methods: IoMethod::expand_all(args.bench_methods.clone()),
            iterations: args.iterations,
            warmup_iterations: args.warmup_iterations,
            data_file: args.data_file.clone(),
            data_size: args.data_size,
            chunk_size: args.chunk_size,
            continue_on_error: args.continue_on_error,
            percentiles: DEFAULT_PERCENTILES.to_vec(),
        })
    }
}

/// Benchmark runner that coordinates the timed reads
///
/// ## Usage Pattern
///
/// ```rust,no_run
/// # use file_io_benchmark::benchmark::{BenchmarkConfig, BenchmarkRunner};
/// # fn main() -> anyhow::Result<()> {
/// let runner = BenchmarkRunner::new(BenchmarkConfig::default());
/// let report = runner.run()?;
/// for method in &report.methods {
///     println!("{}: {:.3} ms", method.method, method.mean_ms);
/// }
/// # Ok(())
/// # }
/// ```
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
}

impl BenchmarkRunner {
    pub fn new(config: BenchmarkConfig) -> Self {
        Self { config }
    }

    /// Run the benchmark and return every method's results
    ///
    /// ## Error Handling
    ///
    /// A fixture that cannot be generated aborts the run before any timing
    /// starts. A failing method aborts the run unless `continue_on_error` is
    /// set, in which case it is recorded as failed and the next method runs.
    pub fn run(&self) -> Result<BenchmarkReport> {
        let methods = IoMethod::expand_all(self.config.methods.clone());
        if methods.is_empty() {
            bail!("No I/O methods selected for benchmarking");
        }

        info!(
            "{}",
            BenchmarkConfigDisplay {
                config: &self.config,
                methods: &methods,
            }
        );

        self.prepare_fixture()?;

        println!(
            "=== Reading a {} file, {} iterations per method ===",
            utils::format_bytes(self.config.data_size),
            self.config.iterations
        );

        let mut results = Vec::with_capacity(methods.len());
        for method in methods {
            match self.run_method(method) {
                Ok(method_results) => results.push(method_results),
                Err(e) => {
                    error!("Benchmark failed for {}: {:#}", method, e);
                    if !self.config.continue_on_error {
                        return Err(e);
                    }
                    results.push(MethodResults::failed(method, &e));
                }
            }
        }

        Ok(BenchmarkReport {
            data_file: self.config.data_file.clone(),
            data_size: self.config.data_size,
            iterations: self.config.iterations,
            methods: results,
        })
    }

    /// Write a fresh fixture so every method starts from the same file state.
    fn prepare_fixture(&self) -> Result<()> {
        let generator = DataFileGenerator::new(self.config.data_size, self.config.chunk_size)?;
        generator.generate(&self.config.data_file).with_context(|| {
            format!(
                "Cannot benchmark without a data file at {}",
                self.config.data_file.display()
            )
        })?;
        info!(
            "Generated {} data file at {}",
            utils::format_bytes(self.config.data_size),
            self.config.data_file.display()
        );
        Ok(())
    }

    fn run_method(&self, method: IoMethod) -> Result<MethodResults> {
        let backend = BackendFactory::create(method)?;
        self.run_with_backend(method, backend.as_ref())
    }

    /// Time `iterations` reads of the fixture through `backend`.
    ///
    /// The fixture must already exist. Each read's byte count is checked
    /// against the fixture size so a bad read can never produce a timing.
    pub fn run_with_backend(
        &self,
        method: IoMethod,
        backend: &dyn IoBackend,
    ) -> Result<MethodResults> {
        let path = &self.config.data_file;

        if self.config.warmup_iterations > 0 {
            debug!(
                "Running warmup with {} iterations for {}",
                self.config.warmup_iterations,
                backend.name()
            );
            for _ in 0..self.config.warmup_iterations {
                let bytes = backend
                    .read(path)
                    .with_context(|| format!("{} warmup read failed", backend.name()))?;
                std::hint::black_box(bytes);
            }
        }

        let mut collector = TimingCollector::new()?;
        for i in 1..=self.config.iterations {
            let start = Instant::now();
            let bytes = backend.read(path);
            let elapsed = start.elapsed();

            let bytes = bytes.with_context(|| {
                format!("{} read failed on iteration {}", backend.name(), i)
            })?;
            if bytes.len() != self.config.data_size {
                bail!(
                    "{} returned {} bytes on iteration {}, expected {}",
                    backend.name(),
                    bytes.len(),
                    i,
                    self.config.data_size
                );
            }
            std::hint::black_box(&bytes);

            collector.record(elapsed)?;
            println!(
                "Method {}, iteration {}: {:.4} ms",
                method,
                i,
                elapsed.as_secs_f64() * 1_000.0
            );
        }

        let results = MethodResults::from_collector(
            method,
            collector,
            &self.config.percentiles,
            self.config.data_size,
        );
        println!(
            "Average time for method {}: {:.4} ms over {} runs\n",
            method,
            results.mean_ms,
            results.iterations_ms.len()
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BackendError, Transfer};
    use std::path::Path;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> BenchmarkConfig {
        BenchmarkConfig {
            data_file: dir.join("data.bin"),
            data_size: 64 * 1024,
            iterations: 3,
            ..Default::default()
        }
    }

    /// Backend whose reads always come back short
    struct TruncatingBackend;

    impl IoBackend for TruncatingBackend {
        fn write(&self, _path: &Path, _bytes: &[u8]) -> Result<(), BackendError> {
            Ok(())
        }

        fn read(&self, path: &Path) -> Result<Vec<u8>, BackendError> {
            Err(BackendError::ShortTransfer {
                operation: Transfer::Read,
                path: path.to_path_buf(),
                expected: 64 * 1024,
                actual: 10,
            })
        }

        fn name(&self) -> &'static str {
            "Truncating"
        }
    }

    /// Backend that claims success but returns the wrong amount of data
    struct WrongSizeBackend;

    impl IoBackend for WrongSizeBackend {
        fn write(&self, _path: &Path, _bytes: &[u8]) -> Result<(), BackendError> {
            Ok(())
        }

        fn read(&self, _path: &Path) -> Result<Vec<u8>, BackendError> {
            Ok(vec![0u8; 5])
        }

        fn name(&self) -> &'static str {
            "Wrong Size"
        }
    }

    #[test]
    fn test_benchmark_config_from_args() {
        let args = Args {
            bench_methods: vec![IoMethod::DirectRaw, IoMethod::MemoryMapped],
            iterations: 4,
            ..Default::default()
        };
        let config = BenchmarkConfig::from_args(&args).unwrap();

        assert_eq!(
            config.methods,
            vec![IoMethod::MemoryMapped, IoMethod::DirectRaw]
        );
        assert_eq!(config.iterations, 4);
        assert_eq!(config.data_size, 1024 * 1024);
        assert_eq!(config.percentiles, DEFAULT_PERCENTILES.to_vec());
    }

    #[test]
    fn test_benchmark_config_rejects_invalid_args() {
        let args = Args {
            iterations: 0,
            ..Default::default()
        };
        assert!(BenchmarkConfig::from_args(&args).is_err());

        let args = Args {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(BenchmarkConfig::from_args(&args).is_err());
    }

    #[test]
    fn test_run_records_every_iteration() {
        let dir = tempdir().unwrap();
        let runner = BenchmarkRunner::new(config_in(dir.path()));

        let report = runner.run().unwrap();

        assert_eq!(report.methods.len(), 4);
        assert_eq!(report.total_records(), 12);
        let order: Vec<_> = report.methods.iter().map(|m| m.method).collect();
        assert_eq!(order, IoMethod::ALL.to_vec());
        for method in &report.methods {
            assert!(method.is_success());
            assert_eq!(method.stats.total_samples, 3);
            assert_eq!(method.bytes_per_read, 64 * 1024);
        }
    }

    #[test]
    fn test_short_read_aborts_without_timings() {
        let dir = tempdir().unwrap();
        let runner = BenchmarkRunner::new(config_in(dir.path()));
        runner.prepare_fixture().unwrap();

        assert!(runner
            .run_with_backend(IoMethod::DirectRaw, &TruncatingBackend)
            .is_err());
        assert!(runner
            .run_with_backend(IoMethod::DirectRaw, &WrongSizeBackend)
            .is_err());
    }

    #[test]
    fn test_fixture_failure_aborts_run() {
        let dir = tempdir().unwrap();
        let config = BenchmarkConfig {
            data_file: dir.path().join("missing_dir").join("data.bin"),
            continue_on_error: true,
            ..config_in(dir.path())
        };

        assert!(BenchmarkRunner::new(config).run().is_err());
    }

    #[test]
    fn test_empty_method_list_rejected() {
        let dir = tempdir().unwrap();
        let config = BenchmarkConfig {
            methods: Vec::new(),
            ..config_in(dir.path())
        };
        assert!(BenchmarkRunner::new(config).run().is_err());
    }

    #[test]
    fn test_warmup_does_not_add_records() {
        let dir = tempdir().unwrap();
        let config = BenchmarkConfig {
            methods: vec![IoMethod::BufferedStdio],
            warmup_iterations: 5,
            ..config_in(dir.path())
        };

        let report = BenchmarkRunner::new(config).run().unwrap();
        assert_eq!(report.total_records(), 3);
    }
}
