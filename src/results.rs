use crate::{
    cli::IoMethod,
    metrics::{TimingCollector, TimingStats},
    utils,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of benchmarking one I/O method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodResults {
    pub method: IoMethod,
    /// Per-iteration read time in milliseconds, in execution order
    pub iterations_ms: Vec<f64>,
    /// Arithmetic mean of `iterations_ms`
    pub mean_ms: f64,
    pub stats: TimingStats,
    /// Bytes returned by each read
    pub bytes_per_read: usize,
    pub throughput_bytes_per_sec: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Set when the method failed and the run continued without it
    pub error: Option<String>,
}

impl MethodResults {
    /// Build the results for a method from the collector that timed it.
    ///
    /// The reported mean is the collector's; the samples keep their
    /// recording order.
    pub fn from_collector(
        method: IoMethod,
        collector: TimingCollector,
        percentiles: &[f64],
        bytes_per_read: usize,
    ) -> Self {
        let mean_ms = collector.mean_ms();
        let stats = collector.stats(percentiles);
        let throughput_bytes_per_sec = if mean_ms > 0.0 {
            bytes_per_read as f64 / (mean_ms / 1_000.0)
        } else {
            0.0
        };

        Self {
            method,
            iterations_ms: collector.into_samples(),
            mean_ms,
            stats,
            bytes_per_read,
            throughput_bytes_per_sec,
            timestamp: chrono::Utc::now(),
            error: None,
        }
    }

    /// Record a method that could not complete its iterations
    pub fn failed(method: IoMethod, error: &anyhow::Error) -> Self {
        Self {
            method,
            iterations_ms: Vec::new(),
            mean_ms: 0.0,
            stats: TimingStats {
                min_ms: 0.0,
                max_ms: 0.0,
                median_ms: 0.0,
                std_dev_ms: 0.0,
                percentiles: Vec::new(),
                total_samples: 0,
            },
            bytes_per_read: 0,
            throughput_bytes_per_sec: 0.0,
            timestamp: chrono::Utc::now(),
            error: Some(format!("{:#}", error)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// All method results of one benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub data_file: PathBuf,
    pub data_size: usize,
    pub iterations: usize,
    pub methods: Vec<MethodResults>,
}

impl BenchmarkReport {
    /// Total number of individual timing records across methods
    pub fn total_records(&self) -> usize {
        self.methods.iter().map(|m| m.iterations_ms.len()).sum()
    }

    /// Successful method with the lowest mean read time
    pub fn fastest(&self) -> Option<&MethodResults> {
        self.methods
            .iter()
            .filter(|m| m.is_success() && !m.iterations_ms.is_empty())
            .min_by(|a, b| a.mean_ms.total_cmp(&b.mean_ms))
    }

    pub fn failures(&self) -> impl Iterator<Item = &MethodResults> {
        self.methods.iter().filter(|m| !m.is_success())
    }
}

/// System information for reproducibility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub architecture: String,
    pub cpu_cores: usize,
    pub benchmark_version: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            architecture: std::env::consts::ARCH.to_string(),
            cpu_cores: num_cpus::get(),
            benchmark_version: crate::VERSION.to_string(),
        }
    }
}

/// Benchmark metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct BenchmarkMetadata {
    pub version: String,
    pub run_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub system_info: SystemInfo,
}

/// Final results document written as JSON
#[derive(Debug, Serialize, Deserialize)]
pub struct FinalBenchmarkResults {
    pub metadata: BenchmarkMetadata,
    pub report: BenchmarkReport,
    pub fastest_method: Option<IoMethod>,
}

/// Presents a finished report and optionally persists it as JSON
pub struct ResultsManager {
    output_file: Option<PathBuf>,
    run_id: String,
}

impl ResultsManager {
    pub fn new(output_file: Option<&Path>) -> Self {
        Self {
            output_file: output_file.map(Path::to_path_buf),
            run_id: utils::generate_test_id(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Print the comparison table and write the JSON file if configured.
    pub fn finalize(&self, report: &BenchmarkReport) -> Result<()> {
        info!("Finalizing benchmark results");
        self.print_summary(report);

        if let Some(ref output_file) = self.output_file {
            self.write_final_results(output_file, report)?;
            info!("Results written to: {:?}", output_file);
        }
        Ok(())
    }

    fn print_summary(&self, report: &BenchmarkReport) {
        let widths = [16, 12, 12, 12, 12, 14];
        println!();
        utils::print_table_row(&["Method", "Mean", "Min", "Max", "P95", "Throughput"], &widths);
        utils::print_table_separator(&widths);

        for result in &report.methods {
            if let Some(ref error) = result.error {
                println!("{:<16} FAILED: {}", result.method.to_string(), error);
                continue;
            }
            let p95 = result
                .stats
                .percentiles
                .iter()
                .find(|p| (p.percentile - 95.0).abs() < 0.1)
                .map_or_else(|| "-".to_string(), |p| utils::format_ms(p.value_ms));
            let columns = [
                result.method.to_string(),
                utils::format_ms(result.mean_ms),
                utils::format_ms(result.stats.min_ms),
                utils::format_ms(result.stats.max_ms),
                p95,
                utils::format_rate(result.throughput_bytes_per_sec),
            ];
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            utils::print_table_row(&columns, &widths);
        }

        if let Some(fastest) = report.fastest() {
            println!("\nFastest method: {} ({})", fastest.method, utils::format_ms(fastest.mean_ms));
        }
    }

    fn write_final_results(&self, output_file: &Path, report: &BenchmarkReport) -> Result<()> {
        let final_results = FinalBenchmarkResults {
            metadata: BenchmarkMetadata {
                version: crate::VERSION.to_string(),
                run_id: self.run_id.clone(),
                timestamp: chrono::Utc::now(),
                system_info: SystemInfo::default(),
            },
            report: report.clone(),
            fastest_method: report.fastest().map(|m| m.method),
        };

        let json = serde_json::to_string_pretty(&final_results)?;
        std::fs::write(output_file, json)
            .with_context(|| format!("Failed to write results to {}", output_file.display()))?;
        debug!("Wrote {} method results", report.methods.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn timed(method: IoMethod, samples_us: &[u64], bytes_per_read: usize) -> MethodResults {
        let mut collector = TimingCollector::new().unwrap();
        for &us in samples_us {
            collector.record(Duration::from_micros(us)).unwrap();
        }
        MethodResults::from_collector(method, collector, &[50.0, 95.0], bytes_per_read)
    }

    fn report() -> BenchmarkReport {
        BenchmarkReport {
            data_file: PathBuf::from("data.bin"),
            data_size: 1024,
            iterations: 3,
            methods: vec![
                timed(IoMethod::MemoryMapped, &[1_000, 2_000, 3_000], 1024),
                timed(IoMethod::DirectRaw, &[500, 500, 500], 1024),
                MethodResults::failed(IoMethod::StreamIo, &anyhow::anyhow!("disk gone")),
            ],
        }
    }

    #[test]
    fn test_method_results_mean_and_throughput() {
        let result = timed(IoMethod::BufferedStdio, &[1_000, 2_000, 3_000], 2000);
        assert_eq!(result.iterations_ms, vec![1.0, 2.0, 3.0]);
        assert!((result.mean_ms - 2.0).abs() < 1e-12);
        assert!((result.throughput_bytes_per_sec - 1_000_000.0).abs() < 1e-6);
        assert_eq!(result.stats.total_samples, 3);
        assert_eq!(result.stats.percentiles.len(), 2);
        assert!(result.is_success());
    }

    #[test]
    fn test_report_fastest_and_failures() {
        let report = report();
        assert_eq!(report.total_records(), 6);
        assert_eq!(report.fastest().unwrap().method, IoMethod::DirectRaw);
        let failures: Vec<_> = report.failures().map(|m| m.method).collect();
        assert_eq!(failures, vec![IoMethod::StreamIo]);
    }

    #[test]
    fn test_finalize_writes_json() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("results.json");
        let manager = ResultsManager::new(Some(output.as_path()));

        manager.finalize(&report()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["fastest_method"], "DirectRaw");
        assert_eq!(json["metadata"]["run_id"], manager.run_id());
        assert_eq!(json["report"]["methods"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_system_info_default() {
        let info = SystemInfo::default();
        assert!(!info.os.is_empty());
        assert!(!info.architecture.is_empty());
        assert!(info.cpu_cores > 0);
    }
}
