//! # File I/O Benchmark - Main Entry Point
//!
//! Loads the persisted settings through the selected I/O method, benchmarks
//! whole-file reads across the four methods, and saves the settings back on
//! the way out.
//!
//! ## Startup Sequence
//!
//! 1. **Initialize logging**: Colorized stderr output, optional log file
//! 2. **Load settings**: A missing or corrupt config falls back to defaults
//! 3. **Apply override**: The positional grid size, if within range
//! 4. **Run benchmark**: Unless `--skip-benchmark` is given
//! 5. **Save settings**: Full overwrite with the same method used to load,
//!    also when the benchmark failed
//!
//! ## Error Handling
//!
//! Load failures never block startup. A failed fixture or a failed method
//! ends the run with an error unless `--continue-on-error` is set; the
//! settings are still saved first. A failed save is reported with the method
//! and the underlying cause.

use anyhow::{Context, Result};
use clap::Parser;
use file_io_benchmark::{
    benchmark::{BenchmarkConfig, BenchmarkRunner},
    cli::Args,
    config::{ConfigStore, Settings},
    logging,
    results::ResultsManager,
};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let args = Args::parse();

    // Held until exit so the file appender flushes.
    let _log_guard = logging::init_logging(&args)?;

    info!("Starting File I/O Benchmark v{}", file_io_benchmark::VERSION);
    info!("Configuration: {:?}", args);

    let store = ConfigStore::new(&args.config_file);
    let mut settings = load_settings(&store, &args);

    if let Some(grid_size) = args.grid_size {
        if settings.apply_grid_override(grid_size) {
            info!("Grid size overridden to {}", grid_size);
        } else {
            warn!(
                "Ignoring grid size {}: must be between 1 and {}",
                grid_size,
                file_io_benchmark::config::MAX_GRID
            );
        }
    }

    let benchmark = if args.skip_benchmark {
        info!("Skipping data file benchmark");
        Ok(())
    } else {
        run_benchmark(&args)
    };
    if let Err(ref e) = benchmark {
        error!("Benchmark aborted: {:#}", e);
    }

    log_settings(&settings);

    store
        .save(args.method, &settings)
        .with_context(|| {
            format!(
                "Failed to save settings to {} using {}",
                store.path().display(),
                args.method
            )
        })?;
    info!(
        "Saved settings to {} using {}",
        store.path().display(),
        args.method
    );

    benchmark
}

fn load_settings(store: &ConfigStore, args: &Args) -> Settings {
    match store.try_load(args.method) {
        Ok(settings) => {
            info!(
                "Loaded settings from {} using {}",
                store.path().display(),
                args.method
            );
            settings
        }
        Err(e) => {
            warn!("Using default settings: {:#}", e);
            Settings::default()
        }
    }
}

fn run_benchmark(args: &Args) -> Result<()> {
    let config = BenchmarkConfig::from_args(args)?;
    let results_manager = ResultsManager::new(args.output_file.as_deref());
    info!("Benchmark run id: {}", results_manager.run_id());

    let report = BenchmarkRunner::new(config).run()?;
    results_manager.finalize(&report)?;

    let failed = report.failures().count();
    if failed > 0 {
        warn!("{} of {} methods failed", failed, report.methods.len());
    }
    Ok(())
}

fn log_settings(settings: &Settings) {
    info!("Grid size:        {}", settings.grid_size);
    info!(
        "Window size:      {}x{}",
        settings.window_width, settings.window_height
    );
    info!("Background color: {}", settings.background_color);
    info!("Grid color:       {}", settings.grid_color);
}
