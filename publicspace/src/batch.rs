//! Classifying many areas of interest.
//!
//! The [`BatchDriver`] reads AOI polygons from a GeoJSON file and classifies
//! each one independently on a rayon thread pool. Output for AOI `idx` lands
//! in `{out}/{name}_area{idx}.geojson` (plus the `_geaggregeerd` aggregate);
//! an AOI whose two outputs already exist is skipped, so an interrupted batch
//! can be restarted. A failing AOI is logged and the others carry on; this
//! includes an AOI polygon that cannot be repaired.
//!
//! After the pool finishes, the per-AOI outputs are merged into
//! `PublicSpace_{name}.geojson` and `PublicSpace_{name}_geaggregeerd.geojson`.

use std::path::{Path, PathBuf};

use geo::MultiPolygon;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::classify::{AoiPaths, Classification, Classifier};
use crate::export::{
    read_aggregate, read_detailed, write_aggregate, write_detailed, ExportError, DEFAULT_CRS,
};
use crate::merge::{merge_detailed_exploded, reaggregate};
use crate::overlay::repair;
use crate::source::file::read_records;
use crate::source::SourceError;

/// Errors that stop a batch as a whole.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The AOI file could not be read
    #[error("Failed to read areas of interest: {0}")]
    ReadAoi(#[from] SourceError),

    /// The AOI file holds no usable polygon
    #[error("No areas of interest in {0}")]
    NoAreas(PathBuf),

    /// The worker pool could not be started
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),

    /// A directory or previous output could not be prepared
    #[error("Failed to prepare {path}: {source}")]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a merged output failed
    #[error(transparent)]
    Merge(#[from] ExportError),
}

/// One area of interest to classify.
#[derive(Debug, Clone)]
pub struct AoiTask {
    /// Position of the polygon in the AOI file
    pub index: usize,
    /// Output identifier, `{name}_area{index}`
    pub id: String,
    /// Polygon as read from the AOI file, repaired when the task runs
    pub geometry: MultiPolygon<f64>,
    pub paths: AoiPaths,
}

/// What happened to one AOI.
#[derive(Debug, Clone, PartialEq)]
pub enum AoiOutcome {
    Completed(Classification),
    /// Both outputs existed already
    Skipped,
    /// The run failed; the message is the error
    Failed(String),
}

/// Outcome of one AOI in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct AoiResult {
    pub id: String,
    pub outcome: AoiOutcome,
}

/// Merged batch outputs and their feature counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedOutputs {
    pub detailed: Option<(PathBuf, usize)>,
    pub aggregate: Option<(PathBuf, usize)>,
}

/// Result of a batch, AOIs in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub results: Vec<AoiResult>,
    pub merged: MergedOutputs,
}

impl BatchReport {
    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, AoiOutcome::Completed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, AoiOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, AoiOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&AoiOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Runs a [`Classifier`] over every AOI in a file.
#[derive(Debug, Clone)]
pub struct BatchDriver {
    name: String,
    out_dir: PathBuf,
    workers: usize,
}

impl BatchDriver {
    /// Driver writing below `out_dir`, naming outputs after `name`.
    ///
    /// Uses one worker per available core.
    pub fn new(name: &str, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            out_dir: out_dir.into(),
            workers: crate::config::default_workers(),
        }
    }

    /// Number of AOIs classified at the same time (at least one).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Path of the merged detailed output.
    pub fn merged_detailed_path(&self) -> PathBuf {
        self.out_dir.join(format!("PublicSpace_{}.geojson", self.name))
    }

    /// Path of the merged aggregate output.
    pub fn merged_aggregate_path(&self) -> PathBuf {
        self.out_dir
            .join(format!("PublicSpace_{}_geaggregeerd.geojson", self.name))
    }

    /// One task per AOI polygon.
    pub fn tasks(&self, aois: Vec<(usize, MultiPolygon<f64>)>) -> Vec<AoiTask> {
        aois.into_iter()
            .map(|(index, geometry)| {
                let id = format!("{}_area{}", self.name, index);
                let paths = AoiPaths::for_aoi(&self.out_dir, &id);
                AoiTask {
                    index,
                    id,
                    geometry,
                    paths,
                }
            })
            .collect()
    }

    /// Classify every AOI in `aoi_file`, then merge the outputs.
    pub fn run(&self, classifier: &Classifier, aoi_file: &Path) -> Result<BatchReport, BatchError> {
        self.remove_merged_outputs()?;
        std::fs::create_dir_all(&self.out_dir).map_err(|source| BatchError::Prepare {
            path: self.out_dir.clone(),
            source,
        })?;

        let aois = read_aois(aoi_file)?;
        let tasks = self.tasks(aois);
        info!(
            aois = tasks.len(),
            workers = self.workers,
            out_dir = %self.out_dir.display(),
            "Starting batch"
        );

        let results = self.run_tasks(classifier, &tasks)?;
        let merged = self.merge_outputs(&tasks)?;

        let report = BatchReport { results, merged };
        info!(
            completed = report.completed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "All AOIs processed and merged"
        );
        Ok(report)
    }

    /// Run `tasks` on a dedicated pool; results come back in task order.
    pub fn run_tasks(
        &self,
        classifier: &Classifier,
        tasks: &[AoiTask],
    ) -> Result<Vec<AoiResult>, BatchError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("publicspace-aoi-{}", i))
            .build()
            .map_err(|e| BatchError::ThreadPool(e.to_string()))?;

        Ok(pool.install(|| {
            tasks
                .par_iter()
                .map(|task| AoiResult {
                    id: task.id.clone(),
                    outcome: run_task(classifier, task),
                })
                .collect()
        }))
    }

    /// Merge the per-AOI outputs that exist.
    ///
    /// A per-AOI file that cannot be read is logged and left out.
    pub fn merge_outputs(&self, tasks: &[AoiTask]) -> Result<MergedOutputs, BatchError> {
        let mut detailed = Vec::new();
        let mut aggregate = Vec::new();

        for task in tasks {
            if task.paths.detailed.exists() {
                match read_detailed(&task.paths.detailed) {
                    Ok(features) => detailed.extend(features),
                    Err(e) => warn!(aoi = %task.id, error = %e, "Skipping detailed output in merge"),
                }
            }
            if task.paths.aggregate.exists() {
                match read_aggregate(&task.paths.aggregate) {
                    Ok(polygons) => aggregate.extend(polygons),
                    Err(e) => warn!(aoi = %task.id, error = %e, "Skipping aggregate output in merge"),
                }
            }
        }

        let mut merged = MergedOutputs::default();

        if !detailed.is_empty() {
            let path = self.merged_detailed_path();
            let features = merge_detailed_exploded(&detailed).map_err(ExportError::from)?;
            write_detailed(&path, &features, Some(DEFAULT_CRS))?;
            info!(path = %path.display(), features = features.len(), "Merged detailed outputs");
            merged.detailed = Some((path, features.len()));
        }

        if !aggregate.is_empty() {
            let path = self.merged_aggregate_path();
            let polygons = reaggregate(&aggregate).map_err(ExportError::from)?;
            write_aggregate(&path, &polygons, Some(DEFAULT_CRS))?;
            info!(path = %path.display(), polygons = polygons.len(), "Merged aggregate outputs");
            merged.aggregate = Some((path, polygons.len()));
        }

        Ok(merged)
    }

    fn remove_merged_outputs(&self) -> Result<(), BatchError> {
        for path in [self.merged_detailed_path(), self.merged_aggregate_path()] {
            if path.exists() {
                std::fs::remove_file(&path).map_err(|source| BatchError::Prepare {
                    path: path.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

fn run_task(classifier: &Classifier, task: &AoiTask) -> AoiOutcome {
    if task.paths.is_complete() {
        info!(aoi = %task.id, "Skipping: results already exist");
        return AoiOutcome::Skipped;
    }

    let mask = match repair(&task.geometry, &task.id) {
        Ok(mask) if mask.0.is_empty() => {
            warn!(aoi = %task.id, "AOI polygon is empty after repair");
            return AoiOutcome::Failed("AOI polygon is empty after repair".to_string());
        }
        Ok(mask) => mask,
        Err(e) => {
            error!(aoi = %task.id, error = %e, "AOI failed");
            return AoiOutcome::Failed(e.to_string());
        }
    };

    match classifier.run_aoi(&mask, &task.paths) {
        Ok(classification) => {
            info!(
                aoi = %task.id,
                fragments = classification.fragments,
                area = classification.area,
                "Completed"
            );
            AoiOutcome::Completed(classification)
        }
        Err(e) => {
            error!(aoi = %task.id, error = %e, "AOI failed");
            AoiOutcome::Failed(e.to_string())
        }
    }
}

/// Read AOI polygons from a GeoJSON file.
///
/// Geometry is returned as read; each task repairs its own polygon so a bad
/// one fails only that AOI. Entries keep their position in the file.
pub fn read_aois(path: &Path) -> Result<Vec<(usize, MultiPolygon<f64>)>, BatchError> {
    let mut aois = Vec::new();
    for (index, record) in read_records(path)?.into_iter().enumerate() {
        if record.geometry.0.is_empty() {
            warn!(index, "AOI feature has no polygon, skipping");
            continue;
        }
        aois.push((index, record.geometry));
    }

    if aois.is_empty() {
        return Err(BatchError::NoAreas(path.to_path_buf()));
    }
    Ok(aois)
}
