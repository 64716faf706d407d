use anyhow::Result;
use file_io_benchmark::{cli::Args, BenchmarkConfig, BenchmarkRunner, IoMethod};
use tempfile::tempdir;

/// Full default run: 4 methods, 10 iterations each, on a 1 MiB fixture.
#[test]
fn default_run_records_forty_timings() -> Result<()> {
    let dir = tempdir()?;
    let args = Args {
        data_file: dir.path().join("data.bin"),
        ..Default::default()
    };

    let config = BenchmarkConfig::from_args(&args)?;
    let report = BenchmarkRunner::new(config).run()?;

    assert_eq!(report.methods.len(), 4);
    assert_eq!(report.total_records(), 40);
    assert_eq!(report.failures().count(), 0);

    let order: Vec<IoMethod> = report.methods.iter().map(|m| m.method).collect();
    assert_eq!(order, IoMethod::ALL.to_vec());

    for method in &report.methods {
        assert_eq!(method.iterations_ms.len(), 10);
        assert!(method.iterations_ms.iter().all(|&ms| ms >= 0.0));

        let average = method.iterations_ms.iter().sum::<f64>() / 10.0;
        let tolerance = 1e-9 * average.abs().max(f64::MIN_POSITIVE);
        assert!(
            (method.mean_ms - average).abs() <= tolerance,
            "{}: mean {} vs average {}",
            method.method,
            method.mean_ms,
            average
        );
    }

    assert_eq!(std::fs::metadata(dir.path().join("data.bin"))?.len(), 1_048_576);
    assert!(report.fastest().is_some());
    Ok(())
}

/// Selected methods run in the fixed order regardless of how they were given.
#[test]
fn selected_methods_run_in_fixed_order() -> Result<()> {
    let dir = tempdir()?;
    let args = Args {
        bench_methods: vec![IoMethod::DirectRaw, IoMethod::MemoryMapped, IoMethod::DirectRaw],
        iterations: 2,
        data_file: dir.path().join("data.bin"),
        data_size: 16 * 1024,
        ..Default::default()
    };

    let report = BenchmarkRunner::new(BenchmarkConfig::from_args(&args)?).run()?;

    let order: Vec<IoMethod> = report.methods.iter().map(|m| m.method).collect();
    assert_eq!(order, vec![IoMethod::MemoryMapped, IoMethod::DirectRaw]);
    assert_eq!(report.total_records(), 4);
    Ok(())
}

/// An unwritable fixture location aborts before any timing is produced.
#[test]
fn fixture_failure_aborts_the_run() -> Result<()> {
    let dir = tempdir()?;
    let args = Args {
        data_file: dir.path().join("no-such-dir").join("data.bin"),
        ..Default::default()
    };

    let result = BenchmarkRunner::new(BenchmarkConfig::from_args(&args)?).run();
    assert!(result.is_err());
    Ok(())
}

#[test]
fn stale_fixture_is_replaced() -> Result<()> {
    let dir = tempdir()?;
    let data_file = dir.path().join("data.bin");
    std::fs::write(&data_file, vec![0xAB; 5000])?;

    let args = Args {
        bench_methods: vec![IoMethod::StreamIo],
        iterations: 1,
        data_file: data_file.clone(),
        data_size: 4096,
        ..Default::default()
    };
    BenchmarkRunner::new(BenchmarkConfig::from_args(&args)?).run()?;

    assert_eq!(std::fs::read(&data_file)?, vec![0u8; 4096]);
    Ok(())
}
