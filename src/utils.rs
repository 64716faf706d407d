//! # Utility Functions and Helper Module
//!
//! Formatting, validation and statistics helpers shared by the benchmark
//! runner and the results output.
//!
//! ## Key Functionality Categories
//!
//! - **Formatting**: Human-readable display of milliseconds, bytes, and rates
//! - **Validation**: Input parameter validation with clear error messages
//! - **Statistics**: Basic summary statistics over timing samples
//! - **Display Helpers**: Table formatting for the console summary
//!
//! ## Usage Examples
//!
//! ```rust
//! use file_io_benchmark::utils::*;
//!
//! assert_eq!(format_ms(1.5), "1.500 ms");
//!
//! let rate_str = format_rate(1048576.0);
//! assert_eq!(rate_str, "1.00 MB/s");
//!
//! assert!(validate_iterations(10).is_ok());
//! assert!(validate_iterations(0).is_err());
//! ```

use anyhow::Result;
use uuid::Uuid;

/// Largest fixture the generator will produce (1 GB)
const MAX_FIXTURE_SIZE: usize = 1024 * 1024 * 1024;

/// Generate a unique identifier for a benchmark run
///
/// Creates a UUID v4 string that tags the JSON results of one run so that
/// result files from repeated runs can be told apart.
pub fn generate_test_id() -> String {
    Uuid::new_v4().to_string()
}

/// Format fractional milliseconds with a fixed precision, e.g. "0.412 ms"
pub fn format_ms(ms: f64) -> String {
    format!("{:.3} ms", ms)
}

/// Format bytes in a human-readable way
///
/// Uses binary (1024-based) scaling which is standard for memory and storage.
///
/// ## Examples
///
/// ```rust
/// # use file_io_benchmark::utils::format_bytes;
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1536), "1.50 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: usize) -> String {
    format_bytes_f64(bytes as f64)
}

/// Format bytes (as f64) in a human-readable way
pub fn format_bytes_f64(bytes: f64) -> String {
    if bytes < 1024.0 {
        format!("{:.0} B", bytes)
    } else if bytes < 1024.0 * 1024.0 {
        format!("{:.2} KB", bytes / 1024.0)
    } else if bytes < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.2} MB", bytes / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format a rate (bytes per second) in a human-readable way
pub fn format_rate(bytes_per_second: f64) -> String {
    format!("{}/s", format_bytes_f64(bytes_per_second))
}

/// Calculate statistics from a slice of values
///
/// Returns `(mean, min, max, standard_deviation)`, using the population
/// standard deviation. An empty slice yields all zeros.
///
/// ## Examples
///
/// ```rust
/// # use file_io_benchmark::utils::calculate_stats;
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let (mean, min, max, _std_dev) = calculate_stats(&values);
/// assert_eq!(mean, 3.0);
/// assert_eq!(min, 1.0);
/// assert_eq!(max, 5.0);
/// ```
pub fn calculate_stats(values: &[f64]) -> (f64, f64, f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0, 0.0);
    }

    let sum: f64 = values.iter().sum();
    let count = values.len() as f64;
    let mean = sum / count;

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count;
    let std_dev = variance.sqrt();

    (mean, min, max, std_dev)
}

/// Validate the number of timed iterations per method
pub fn validate_iterations(iterations: usize) -> Result<()> {
    if iterations == 0 {
        anyhow::bail!("Iteration count must be at least 1");
    }
    if iterations > 1_000_000 {
        anyhow::bail!("Iteration count {} is too large (maximum 1000000)", iterations);
    }
    Ok(())
}

/// Validate fixture and chunk sizes
///
/// Both must be non-zero, the chunk cannot exceed the fixture, and the
/// fixture is capped at 1 GB to keep a run from exhausting the disk.
pub fn validate_fixture_sizes(total_size: usize, chunk_size: usize) -> Result<()> {
    if total_size == 0 {
        anyhow::bail!("Data file size must be greater than 0");
    }
    if total_size > MAX_FIXTURE_SIZE {
        anyhow::bail!("Data file size {} is too large (maximum 1GB)", total_size);
    }
    if chunk_size == 0 {
        anyhow::bail!("Chunk size must be greater than 0");
    }
    if chunk_size > total_size {
        anyhow::bail!(
            "Chunk size {} is larger than the data file size {}",
            chunk_size,
            total_size
        );
    }
    Ok(())
}

/// Print a table row with proper formatting
///
/// Columns are left-aligned and padded to the given widths; missing widths
/// default to 10.
pub fn print_table_row(columns: &[&str], widths: &[usize]) {
    print!("|");
    for (i, column) in columns.iter().enumerate() {
        let width = widths.get(i).copied().unwrap_or(10);
        print!(" {:width$} |", column, width = width);
    }
    println!();
}

/// Print a table separator
///
/// ```text
/// +------------------+--------------+
/// | Method           | Mean         |
/// +------------------+--------------+
/// ```
pub fn print_table_separator(widths: &[usize]) {
    print!("+");
    for &width in widths {
        print!("{}", "-".repeat(width + 2));
        print!("+");
    }
    println!();
}
