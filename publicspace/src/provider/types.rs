//! Provider types and traits

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use geo::MultiPolygon;
use thiserror::Error;

use crate::overlay::OverlayError;
use crate::source::SourceError;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Response could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The area of interest has no extent
    #[error("Invalid mask: {0}")]
    InvalidMask(String),

    /// Downloaded data could not be clipped to the area of interest
    #[error("Clipping {collection} failed: {reason}")]
    ClipFailed { collection: String, reason: String },

    /// Writing a downloaded collection failed
    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}

impl From<OverlayError> for ProviderError {
    fn from(err: OverlayError) -> Self {
        ProviderError::ClipFailed {
            collection: "mask".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<SourceError> for ProviderError {
    fn from(err: SourceError) -> Self {
        ProviderError::InvalidResponse(err.to_string())
    }
}

/// What to download and where to put it.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Directory receiving one `{collection}.geojson` per collection
    pub output_dir: PathBuf,
    /// Area of interest; requests use its bounding box, results are clipped to it
    pub mask: MultiPolygon<f64>,
    /// Temporal snapshot of the data, if the service supports it
    pub snapshot: Option<DateTime<Utc>>,
}

/// Per-collection results of a fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    /// Collections written, with their feature count after clipping
    pub written: Vec<(String, usize)>,
    /// Collections without features inside the area of interest
    pub empty: Vec<String>,
    /// Collections that could not be downloaded
    pub failed: Vec<String>,
}

impl FetchSummary {
    pub fn features(&self) -> usize {
        self.written.iter().map(|(_, n)| n).sum()
    }
}

/// Downloads source data for an area of interest.
///
/// A collection that fails to download is reported in
/// [`FetchSummary::failed`] and simply not written, so the layer shows up
/// as absent when the data is loaded.
pub trait DataProvider: Send + Sync {
    /// Short name for log messages.
    fn name(&self) -> &str;

    fn fetch(&self, request: &FetchRequest) -> Result<FetchSummary, ProviderError>;
}
