//! Single area classification.

use std::path::{Path, PathBuf};

use clap::Args;
use publicspace::classify::{load_sources, AoiPaths};
use publicspace::rules::RuleStatus;
use tracing::info;

use crate::error::CliError;
use crate::runner::{CliRunner, SurfaceOverrides};

/// Arguments for `publicspace classify`.
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Directory holding the BGT layer files
    #[arg(long)]
    pub bgt: PathBuf,

    /// Directory holding the TOP10NL layer files
    #[arg(long)]
    pub top10nl: PathBuf,

    /// Detailed output layer (GeoJSON)
    #[arg(long)]
    pub output: PathBuf,

    /// Aggregate output layer (default: <output>_geaggregeerd.geojson)
    #[arg(long)]
    pub aggregate: Option<PathBuf>,

    /// Tile cell size in map units (overrides config)
    #[arg(long)]
    pub cell_size: Option<f64>,

    /// Process the tile cells of each rule in parallel
    #[arg(long)]
    pub parallel_tiles: bool,
}

/// Default aggregate path next to the detailed output.
pub fn aggregate_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "publicspace".to_string());
    output.with_file_name(format!("{}_geaggregeerd.geojson", stem))
}

/// Run the classify command.
pub fn run(args: ClassifyArgs, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("classify");

    let surface = runner.surface_config(SurfaceOverrides {
        cell_size: args.cell_size,
        parallel_tiles: args.parallel_tiles,
    })?;
    let classifier = runner.create_classifier(surface, false)?;

    let paths = AoiPaths {
        aggregate: args.aggregate.unwrap_or_else(|| aggregate_path(&args.output)),
        data_bgt: args.bgt,
        data_top10nl: args.top10nl,
        detailed: args.output,
    };

    info!(bgt = %paths.data_bgt.display(), top10nl = %paths.data_top10nl.display(), "Loading sources");
    let sources = load_sources(&paths)?;
    let result = classifier.run(&sources, &paths.detailed, &paths.aggregate)?;

    println!("Rules:");
    for outcome in &result.report.outcomes {
        match &outcome.status {
            RuleStatus::Applied { selected, stats } => println!(
                "  {:>2}. {} ({} selected, {} fragments)",
                outcome.step, outcome.description, selected, stats.appended
            ),
            RuleStatus::Skipped(reason) => println!(
                "  {:>2}. {} (skipped: {})",
                outcome.step, outcome.description, reason
            ),
        }
    }
    println!();
    println!("Classified area: {:.1} m²", result.area);
    println!(
        "✓ Detailed:  {} ({} features)",
        paths.detailed.display(),
        result.export.detailed
    );
    println!(
        "✓ Aggregate: {} ({} polygons)",
        paths.aggregate.display(),
        result.export.aggregate
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_path_next_to_output() {
        assert_eq!(
            aggregate_path(Path::new("/out/utrecht.geojson")),
            PathBuf::from("/out/utrecht_geaggregeerd.geojson")
        );
    }
}
