//! Batch classification of every area in an AOI file.

use std::path::{Path, PathBuf};

use clap::Args;
use publicspace::batch::{AoiOutcome, BatchDriver};

use crate::error::CliError;
use crate::runner::{CliRunner, SurfaceOverrides};

/// Arguments for `publicspace batch`.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// GeoJSON file with one polygon per area of interest
    #[arg(long)]
    pub aoi: PathBuf,

    /// Directory receiving data, per-area outputs and merged outputs
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Name used in output file names (default: AOI file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Number of areas classified at the same time (overrides config)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Use data already in the output directory instead of downloading
    #[arg(long)]
    pub no_download: bool,

    /// Tile cell size in map units (overrides config)
    #[arg(long)]
    pub cell_size: Option<f64>,

    /// Process the tile cells of each rule in parallel
    #[arg(long)]
    pub parallel_tiles: bool,
}

/// Batch name derived from the AOI file name.
pub fn default_name(aoi: &Path) -> String {
    aoi.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "aoi".to_string())
}

/// Run the batch command.
pub fn run(args: BatchArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("batch");

    let surface = runner.surface_config(SurfaceOverrides {
        cell_size: args.cell_size,
        parallel_tiles: args.parallel_tiles,
    })?;
    let download = runner.config().sources.download && !args.no_download;
    let classifier = runner.create_classifier(surface, download)?;

    let name = args.name.unwrap_or_else(|| default_name(&args.aoi));
    let workers = args.workers.unwrap_or(runner.config().batch.workers);
    if workers == 0 {
        return Err(CliError::InvalidArgument(
            "--workers must be at least 1".to_string(),
        ));
    }

    let driver = BatchDriver::new(&name, &args.output_dir).with_workers(workers);
    let report = driver.run(&classifier, &args.aoi)?;

    for result in &report.results {
        match &result.outcome {
            AoiOutcome::Completed(c) => println!(
                "✓ {} ({} features, {:.1} m²)",
                result.id, c.export.detailed, c.area
            ),
            AoiOutcome::Skipped => println!("- {} (skipped: results already exist)", result.id),
            AoiOutcome::Failed(e) => println!("✗ {}: {}", result.id, e),
        }
    }
    println!();
    println!(
        "{} completed, {} skipped, {} failed",
        report.completed(),
        report.skipped(),
        report.failed()
    );
    if let Some((path, count)) = &report.merged.detailed {
        println!("Merged detailed:  {} ({} features)", path.display(), count);
    }
    if let Some((path, count)) = &report.merged.aggregate {
        println!("Merged aggregate: {} ({} polygons)", path.display(), count);
    }

    Ok(())
}
