use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File I/O Benchmark - compares memory-mapped, buffered, stream and raw file access
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Grid size override applied after the config is loaded (1..=30, otherwise ignored)
    #[clap(value_name = "GRID_SIZE", allow_negative_numbers = true)]
    pub grid_size: Option<i32>,

    /// I/O method used to load and save the config file (mmap, stdio, stream, raw or 1-4)
    #[clap(short = 'm', long, value_parser = parse_config_method, default_value = "stdio", help_heading = "Core Options")]
    pub method: IoMethod,

    /// I/O methods to benchmark (space-separated, or all)
    #[clap(short = 'b', long, value_enum, default_values_t = vec![IoMethod::All], num_args = 1.., help_heading = "Core Options")]
    pub bench_methods: Vec<IoMethod>,

    /// Timed reads per method
    #[clap(short = 'i', long, default_value_t = crate::defaults::ITERATIONS, help_heading = "Core Options")]
    pub iterations: usize,

    /// Untimed reads per method before measurement starts
    #[clap(short = 'w', long, default_value_t = crate::defaults::WARMUP_ITERATIONS, help_heading = "Core Options")]
    pub warmup_iterations: usize,

    /// Skip the data file benchmark and only load/save the config
    #[clap(long, default_value_t = false, help_heading = "Core Options")]
    pub skip_benchmark: bool,

    /// Path of the key-value config file
    #[clap(long, default_value = crate::defaults::CONFIG_FILE, help_heading = "Files")]
    pub config_file: PathBuf,

    /// Path of the generated benchmark data file
    #[clap(long, default_value = crate::defaults::DATA_FILE, help_heading = "Files")]
    pub data_file: PathBuf,

    /// Size of the generated data file in bytes
    #[clap(long, default_value_t = crate::defaults::DATA_FILE_SIZE, help_heading = "Files")]
    pub data_size: usize,

    /// Chunk size used while generating the data file
    #[clap(long, default_value_t = crate::defaults::CHUNK_SIZE, help_heading = "Files")]
    pub chunk_size: usize,

    /// Write results as JSON to this file
    #[clap(short = 'o', long, help_heading = "Output")]
    pub output_file: Option<PathBuf>,

    /// Also write log lines to this file
    #[clap(long, help_heading = "Output")]
    pub log_file: Option<PathBuf>,

    /// Continue benchmarking other methods when one fails
    #[clap(long, default_value_t = false, help_heading = "Output")]
    pub continue_on_error: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short = 'v', long, action = ArgAction::Count, help_heading = "Output")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[clap(short = 'q', long, default_value_t = false, conflicts_with = "verbose", help_heading = "Output")]
    pub quiet: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            grid_size: None,
            method: IoMethod::BufferedStdio,
            bench_methods: vec![IoMethod::All],
            iterations: crate::defaults::ITERATIONS,
            warmup_iterations: crate::defaults::WARMUP_ITERATIONS,
            skip_benchmark: false,
            config_file: PathBuf::from(crate::defaults::CONFIG_FILE),
            data_file: PathBuf::from(crate::defaults::DATA_FILE),
            data_size: crate::defaults::DATA_FILE_SIZE,
            chunk_size: crate::defaults::CHUNK_SIZE,
            output_file: None,
            log_file: None,
            continue_on_error: false,
            verbose: 0,
            quiet: false,
        }
    }
}

impl Args {
    /// Log filter directive derived from -v/-q
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Available file I/O methods
///
/// Declaration order is the fixed order in which methods are benchmarked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize)]
pub enum IoMethod {
    /// Memory-mapped file view
    #[value(name = "mmap", alias = "1")]
    MemoryMapped,

    /// Buffered stream with one bulk read/write
    #[value(name = "stdio", alias = "2")]
    BufferedStdio,

    /// High-level stream, slurped on read
    #[value(name = "stream", alias = "3")]
    StreamIo,

    /// Unbuffered platform read/write calls
    #[value(name = "raw", alias = "4")]
    DirectRaw,

    /// All available methods
    #[value(name = "all")]
    All,
}

impl std::fmt::Display for IoMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoMethod::MemoryMapped => write!(f, "Memory Mapped"),
            IoMethod::BufferedStdio => write!(f, "Buffered Stdio"),
            IoMethod::StreamIo => write!(f, "Stream I/O"),
            IoMethod::DirectRaw => write!(f, "Direct Raw"),
            IoMethod::All => write!(f, "All Methods"),
        }
    }
}

impl IoMethod {
    /// Every concrete method in benchmark order
    pub const ALL: [IoMethod; 4] = [
        IoMethod::MemoryMapped,
        IoMethod::BufferedStdio,
        IoMethod::StreamIo,
        IoMethod::DirectRaw,
    ];

    /// Expand "All", then sort into benchmark order and drop duplicates
    pub fn expand_all(methods: Vec<IoMethod>) -> Vec<IoMethod> {
        if methods.contains(&IoMethod::All) {
            return Self::ALL.to_vec();
        }
        let mut methods = methods;
        methods.sort();
        methods.dedup();
        methods
    }
}

/// Parse the config method; "all" names no single backend and is rejected.
fn parse_config_method(s: &str) -> Result<IoMethod, String> {
    match IoMethod::from_str(s.trim(), true)? {
        IoMethod::All => Err(
            "the config is loaded and saved with one method: use mmap, stdio, stream or raw (1-4)"
                .to_string(),
        ),
        method => Ok(method),
    }
}
