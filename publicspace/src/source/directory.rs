//! Directory-of-GeoJSON geometry source.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::catalog::LayerCatalog;
use super::file::read_records;
use super::memory::InMemorySource;
use super::record::SourceLayer;
use super::{GeometrySource, SourceError};

/// Reads layers from GeoJSON files in one directory.
///
/// A layer file that does not exist is skipped with a warning: the download
/// step doesn't write files for collections without features in the AOI.
/// When none of a layer's files exist, the layer is absent.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    catalog: LayerCatalog,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, catalog: LayerCatalog) -> Self {
        Self {
            root: root.into(),
            catalog,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read every catalog layer once and keep the present ones in memory.
    pub fn load_all(&self) -> Result<InMemorySource, SourceError> {
        debug!(path = %self.root.display(), "Loading dataset");
        let mut loaded = InMemorySource::new();
        for name in self.catalog.names() {
            if let Some(layer) = self.layer(name)? {
                loaded.insert(layer);
            }
        }
        Ok(loaded)
    }
}

impl GeometrySource for DirectorySource {
    fn layer(&self, name: &str) -> Result<Option<SourceLayer>, SourceError> {
        let Some(files) = self.catalog.files(name) else {
            return Ok(None);
        };

        let mut records = Vec::new();
        let mut found = false;
        for file in files {
            let path = self.root.join(file);
            if !path.exists() {
                warn!(
                    layer = name,
                    path = %path.display(),
                    "Layer file not found; the dataset may be empty for this area"
                );
                continue;
            }
            found = true;
            records.extend(read_records(&path)?);
        }

        if !found {
            return Ok(None);
        }
        debug!(layer = name, records = records.len(), "Loaded layer");
        Ok(Some(SourceLayer::new(name, records)))
    }

    fn layer_names(&self) -> Vec<String> {
        self.catalog.names().map(|n| n.to_string()).collect()
    }
}
