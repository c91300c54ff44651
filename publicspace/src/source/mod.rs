//! Source layers and the geometry source seam.
//!
//! Rules read their candidates from a [`GeometrySource`]. A source answers a
//! layer lookup with `Ok(Some(layer))`, or `Ok(None)` when the layer is absent
//! for this AOI. Absence is an ordinary outcome, not an error: the rule that
//! needed the layer is skipped.
//!
//! # Implementations
//!
//! - [`DirectorySource`] reads GeoJSON files from a directory, using a
//!   [`LayerCatalog`] to map logical layer names to file names.
//! - [`InMemorySource`] holds preloaded layers (also used in tests).
//!
//! [`SourceSet`] bundles one source per [`Dataset`].

mod catalog;
mod directory;
pub mod file;
mod memory;
mod record;
mod set;

pub use catalog::LayerCatalog;
pub use directory::DirectorySource;
pub use memory::InMemorySource;
pub use record::{attribute_text, merge_bounds, Record, SourceLayer};
pub use set::{Dataset, SourceSet};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading source layers.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A layer file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A layer file is not valid GeoJSON
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Provider of source layers for one dataset.
pub trait GeometrySource: Send + Sync {
    /// Look up a layer by its logical name.
    ///
    /// Returns `Ok(None)` when the layer is absent.
    fn layer(&self, name: &str) -> Result<Option<SourceLayer>, SourceError>;

    /// Logical names of the layers this source may provide.
    fn layer_names(&self) -> Vec<String>;
}
