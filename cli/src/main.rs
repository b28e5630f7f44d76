//! CLI entrypoint for Mesh Barrier
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use barrier_application::{BarrierReporter, CompositeReporter, RunBarrierUseCase};
use barrier_infrastructure::{ConfigLoader, FileConfig, JsonlTranscriptReporter};
use barrier_presentation::{Cli, ConsoleReporter};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    }
}

/// Install the stderr subscriber, plus a file layer when `[log] file` is set.
///
/// The returned guard must live until exit so buffered lines are flushed.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = verbosity_filter(verbose);

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    // --no-config skips files only; environment overrides still apply
    let loaded = if cli.no_config {
        ConfigLoader::load_files(&[])
    } else {
        ConfigLoader::load(cli.config.as_deref())
    };
    let mut config = loaded.map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // CLI flags take precedence over every file and env source
    if let Some(workers) = cli.workers {
        config.barrier.workers = workers;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.barrier.timeout_ms = timeout_ms;
    }
    if let Some(capacity) = cli.capacity {
        config.barrier.channel_capacity = capacity;
    }
    if cli.no_color {
        config.output.color = false;
    }
    if let Some(path) = &cli.transcript {
        config.output.transcript = Some(path.clone());
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        print!("{}", config.to_toml_string()?);
        return Ok(ExitCode::SUCCESS);
    }

    let _guard = init_logging(cli.verbose, config.log.file.as_deref())?;
    info!("Starting Mesh Barrier");

    // === Dependency Injection ===
    let console = ConsoleReporter::new()
        .with_color(config.output.color)
        .with_quiet(cli.quiet);
    let console: Arc<dyn BarrierReporter> = Arc::new(console);
    let mut reporter = CompositeReporter::new(vec![console]);

    if let Some(path) = &config.output.transcript {
        match JsonlTranscriptReporter::new(path) {
            Some(transcript) => {
                info!("Writing transcript to {}", transcript.path().display());
                reporter.push(Arc::new(transcript));
            }
            None => warn!("Continuing without transcript"),
        }
    }
    let reporter: Arc<dyn BarrierReporter> = Arc::new(reporter);

    let use_case = RunBarrierUseCase::new(config.barrier.to_params()).with_reporter(reporter);
    let outcome = use_case.execute().await?;

    for (worker, result) in &outcome.workers {
        if let Err(e) = result {
            info!(%worker, "Worker ended with failure: {}", e);
        }
    }

    Ok(ExitCode::from(outcome.exit_code()))
}
