//! Writing and reading the output layers.
//!
//! Both views are GeoJSON FeatureCollections. The detailed layer carries
//! `source`, `layer`, `source_id`, `reason`, `source_category` and `category`
//! per feature; the aggregate layer only `category`.

use std::path::{Path, PathBuf};

use geojson::JsonObject;
use serde_json::Value;
use thiserror::Error;

use crate::feature::{Category, Feature, Provenance};
use crate::merge::{aggregate_by_category, dissolve_detailed, explode, AggregatePolygon};
use crate::overlay::OverlayError;
use crate::source::file::{read_records, to_geojson_feature, write_collection};
use crate::source::{Record, SourceError};

/// CRS name recorded in output files (RD New).
pub const DEFAULT_CRS: &str = "urn:ogc:def:crs:EPSG::28992";

/// Errors raised while exporting or re-reading output layers.
#[derive(Debug, Error)]
pub enum ExportError {
    /// An output file could not be written; a partial file may remain
    #[error("Failed to write {path}: {source}")]
    SerializationFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be read back
    #[error(transparent)]
    Read(#[from] SourceError),

    /// A feature in an output file lacks a required property
    #[error("Invalid feature in {path}: {reason}")]
    InvalidFeature { path: PathBuf, reason: String },

    /// Building a view failed
    #[error(transparent)]
    Merge(#[from] OverlayError),
}

/// Feature counts of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub detailed: usize,
    pub aggregate: usize,
}

/// Builds both views from a surface and writes them.
#[derive(Debug, Clone)]
pub struct Exporter {
    crs: Option<String>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self {
            crs: Some(DEFAULT_CRS.to_string()),
        }
    }
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the CRS name written to the files.
    pub fn with_crs(mut self, crs: Option<&str>) -> Self {
        self.crs = crs.map(str::to_string);
        self
    }

    pub fn export(
        &self,
        features: &[Feature],
        detailed_path: &Path,
        aggregate_path: &Path,
    ) -> Result<ExportSummary, ExportError> {
        let detailed = dissolve_detailed(features)?;
        let aggregate = aggregate_by_category(features)?;

        write_detailed(detailed_path, &detailed, self.crs.as_deref())?;
        write_aggregate(aggregate_path, &aggregate, self.crs.as_deref())?;

        tracing::info!(
            detailed = detailed.len(),
            aggregate = aggregate.len(),
            path = %detailed_path.display(),
            "Exported classification"
        );

        Ok(ExportSummary {
            detailed: detailed.len(),
            aggregate: aggregate.len(),
        })
    }
}

/// Write detailed features as given.
pub fn write_detailed(path: &Path, features: &[Feature], crs: Option<&str>) -> Result<(), ExportError> {
    let collection = features
        .iter()
        .map(|f| to_geojson_feature(&f.geometry, detailed_properties(f)))
        .collect();
    write_collection(path, collection, &layer_name(path), crs).map_err(|source| {
        ExportError::SerializationFailure {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Write aggregate polygons as given.
pub fn write_aggregate(
    path: &Path,
    polygons: &[AggregatePolygon],
    crs: Option<&str>,
) -> Result<(), ExportError> {
    let collection = polygons
        .iter()
        .map(|p| {
            let mut properties = JsonObject::new();
            properties.insert("category".to_string(), Value::from(p.category.label()));
            to_geojson_feature(&geo::MultiPolygon::new(vec![p.geometry.clone()]), properties)
        })
        .collect();
    write_collection(path, collection, &layer_name(path), crs).map_err(|source| {
        ExportError::SerializationFailure {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Read a detailed layer written by [`write_detailed`].
pub fn read_detailed(path: &Path) -> Result<Vec<Feature>, ExportError> {
    read_records(path)?
        .into_iter()
        .map(|record| {
            let category = category_of(&record, path)?;
            let provenance = Provenance {
                source: required(&record, "source", path)?,
                layer: required(&record, "layer", path)?,
                source_id: optional(&record, "source_id"),
                reason: required(&record, "reason", path)?,
                source_category: optional(&record, "source_category"),
            };
            Ok(Feature::new(provenance, category, record.geometry))
        })
        .collect()
}

/// Read an aggregate layer written by [`write_aggregate`].
///
/// Multipolygons are split, so every entry is a single polygon.
pub fn read_aggregate(path: &Path) -> Result<Vec<AggregatePolygon>, ExportError> {
    let mut polygons = Vec::new();
    for record in read_records(path)? {
        let category = category_of(&record, path)?;
        polygons.extend(
            explode(record.geometry)
                .into_iter()
                .map(|geometry| AggregatePolygon { category, geometry }),
        );
    }
    Ok(polygons)
}

fn detailed_properties(feature: &Feature) -> JsonObject {
    let p = &feature.provenance;
    let mut properties = JsonObject::new();
    properties.insert("source".to_string(), Value::from(p.source.as_str()));
    properties.insert("layer".to_string(), Value::from(p.layer.as_str()));
    properties.insert("source_id".to_string(), Value::from(p.source_id.clone()));
    properties.insert("reason".to_string(), Value::from(p.reason.as_str()));
    properties.insert(
        "source_category".to_string(),
        Value::from(p.source_category.clone()),
    );
    properties.insert("category".to_string(), Value::from(feature.category.label()));
    properties
}

fn layer_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "publicspace".to_string())
}

fn category_of(record: &Record, path: &Path) -> Result<Category, ExportError> {
    let label = required(record, "category", path)?;
    label.parse().map_err(|e: crate::feature::UnknownCategory| ExportError::InvalidFeature {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn required(record: &Record, name: &str, path: &Path) -> Result<String, ExportError> {
    record.attribute(name).ok_or_else(|| ExportError::InvalidFeature {
        path: path.to_path_buf(),
        reason: format!("missing property '{}'", name),
    })
}

fn optional(record: &Record, name: &str) -> Option<String> {
    record.attribute(name)
}
