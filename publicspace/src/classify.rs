//! One classification run for one area of interest.
//!
//! [`Classifier`] wires the pieces together: optionally download source data
//! through the configured [`DataProvider`]s, load the BGT and TOP10NL layers,
//! run the [`RuleSet`] over a fresh [`ClassifiedSurface`] and export both
//! views.
//!
//! ```ignore
//! use publicspace::classify::{AoiPaths, Classifier};
//! use publicspace::overlay::SurfaceConfig;
//!
//! let paths = AoiPaths::for_aoi("out".as_ref(), "zeeland_area0");
//! let classification = Classifier::new(SurfaceConfig::default()).run_paths(&paths)?;
//! println!("{} fragments", classification.report.fragments());
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use geo::MultiPolygon;
use thiserror::Error;

use crate::export::{ExportError, ExportSummary, Exporter};
use crate::log::{Logger, NoOpLogger};
use crate::overlay::{ClassifiedSurface, OverlayError, SurfaceConfig};
use crate::provider::{DataProvider, FetchRequest};
use crate::rules::{RuleSet, RuleSetError, RunReport};
use crate::source::{Dataset, DirectorySource, LayerCatalog, SourceError, SourceSet};
use crate::{log_error, log_info, log_warn};

/// Errors that abort a classification run.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The surface could not be created
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    /// A rule failed
    #[error(transparent)]
    Rules(#[from] RuleSetError),

    /// Loading a dataset failed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Writing the output layers failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// A data or output directory could not be created
    #[error("Failed to create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Input and output locations of one AOI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AoiPaths {
    /// Directory holding the BGT layer files
    pub data_bgt: PathBuf,
    /// Directory holding the TOP10NL layer files
    pub data_top10nl: PathBuf,
    /// Detailed output layer
    pub detailed: PathBuf,
    /// Aggregate output layer
    pub aggregate: PathBuf,
}

impl AoiPaths {
    /// Standard layout below `out_dir`: `{id}/BGT`, `{id}/TOP10NL`,
    /// `{id}.geojson` and `{id}_geaggregeerd.geojson`.
    pub fn for_aoi(out_dir: &Path, id: &str) -> Self {
        Self {
            data_bgt: out_dir.join(id).join("BGT"),
            data_top10nl: out_dir.join(id).join("TOP10NL"),
            detailed: out_dir.join(format!("{}.geojson", id)),
            aggregate: out_dir.join(format!("{}_geaggregeerd.geojson", id)),
        }
    }

    /// Both output layers exist.
    pub fn is_complete(&self) -> bool {
        self.detailed.exists() && self.aggregate.exists()
    }

    fn data_dir(&self, dataset: Dataset) -> &Path {
        match dataset {
            Dataset::Bgt => &self.data_bgt,
            Dataset::Top10nl => &self.data_top10nl,
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub report: RunReport,
    pub export: ExportSummary,
    /// Number of fragments on the surface before merging
    pub fragments: usize,
    /// Classified area in map units squared
    pub area: f64,
}

/// A provider bound to the dataset it downloads.
struct ProviderBinding {
    dataset: Dataset,
    provider: Arc<dyn DataProvider>,
    snapshot: bool,
}

/// Runs the rules for one AOI and exports the result.
pub struct Classifier {
    surface: SurfaceConfig,
    rules: RuleSet,
    exporter: Exporter,
    providers: Vec<ProviderBinding>,
    logger: Arc<dyn Logger>,
}

impl Classifier {
    /// Classifier with the default rules and exporter and no providers.
    pub fn new(surface: SurfaceConfig) -> Self {
        Self {
            surface,
            rules: RuleSet::default(),
            exporter: Exporter::default(),
            providers: Vec::new(),
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_exporter(mut self, exporter: Exporter) -> Self {
        self.exporter = exporter;
        self
    }

    /// Download `dataset` with `provider` before each AOI run.
    ///
    /// With `snapshot` set, the request asks for the data as of the run time.
    pub fn with_provider(
        mut self,
        dataset: Dataset,
        provider: Arc<dyn DataProvider>,
        snapshot: bool,
    ) -> Self {
        self.providers.push(ProviderBinding {
            dataset,
            provider,
            snapshot,
        });
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn surface_config(&self) -> &SurfaceConfig {
        &self.surface
    }

    pub fn has_providers(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Run the rules over a fresh surface.
    pub fn classify(
        &self,
        sources: &SourceSet,
    ) -> Result<(ClassifiedSurface, RunReport), ClassifyError> {
        let mut surface = ClassifiedSurface::new(self.surface)?;
        let report = self.rules.apply(sources, &mut surface)?;
        log_info!(
            self.logger,
            "Applied {} of {} rules, {} fragments",
            report.applied(),
            self.rules.len(),
            surface.len()
        );
        Ok((surface, report))
    }

    /// Classify `sources` and write both views.
    pub fn run(
        &self,
        sources: &SourceSet,
        detailed: &Path,
        aggregate: &Path,
    ) -> Result<Classification, ClassifyError> {
        let (surface, report) = self.classify(sources)?;
        let fragments = surface.len();
        let area = surface.total_area();

        log_info!(self.logger, "Exporting to {}", detailed.display());
        let export = self
            .exporter
            .export(surface.features(), detailed, aggregate)?;

        Ok(Classification {
            report,
            export,
            fragments,
            area,
        })
    }

    /// Classify from the data directories in `paths`.
    pub fn run_paths(&self, paths: &AoiPaths) -> Result<Classification, ClassifyError> {
        let sources = load_sources(paths)?;
        self.run(&sources, &paths.detailed, &paths.aggregate)
    }

    /// Download data for `mask` (when providers are configured), then
    /// classify from the data directories in `paths`.
    ///
    /// A provider failure is logged and leaves that dataset's layers absent.
    pub fn run_aoi(
        &self,
        mask: &MultiPolygon<f64>,
        paths: &AoiPaths,
    ) -> Result<Classification, ClassifyError> {
        for binding in &self.providers {
            self.fetch(binding, mask, paths.data_dir(binding.dataset))?;
        }
        self.run_paths(paths)
    }

    fn fetch(
        &self,
        binding: &ProviderBinding,
        mask: &MultiPolygon<f64>,
        output_dir: &Path,
    ) -> Result<(), ClassifyError> {
        std::fs::create_dir_all(output_dir).map_err(|source| ClassifyError::Directory {
            path: output_dir.to_path_buf(),
            source,
        })?;

        log_info!(self.logger, "Start downloading {}", binding.provider.name());
        let request = FetchRequest {
            output_dir: output_dir.to_path_buf(),
            mask: mask.clone(),
            snapshot: binding.snapshot.then(Utc::now),
        };

        match binding.provider.fetch(&request) {
            Ok(summary) => {
                log_info!(
                    self.logger,
                    "{}: {} collections written ({} features), {} empty",
                    binding.provider.name(),
                    summary.written.len(),
                    summary.features(),
                    summary.empty.len()
                );
                for collection in &summary.failed {
                    log_warn!(
                        self.logger,
                        "{}: {} unavailable, its layers are treated as absent",
                        binding.provider.name(),
                        collection
                    );
                }
            }
            Err(e) => {
                log_error!(
                    self.logger,
                    "{} download failed, continuing with local data: {}",
                    binding.provider.name(),
                    e
                );
            }
        }
        Ok(())
    }
}

/// Load both datasets from the data directories in `paths`.
///
/// Each layer is read once; rules then look layers up in memory.
pub fn load_sources(paths: &AoiPaths) -> Result<SourceSet, ClassifyError> {
    let bgt = DirectorySource::new(&paths.data_bgt, LayerCatalog::bgt()).load_all()?;
    let top10nl = DirectorySource::new(&paths.data_top10nl, LayerCatalog::top10nl()).load_all()?;

    Ok(SourceSet::new()
        .with_source(Dataset::Bgt, bgt)
        .with_source(Dataset::Top10nl, top10nl))
}
