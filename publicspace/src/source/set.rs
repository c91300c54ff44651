//! Sources grouped by dataset.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::record::SourceLayer;
use super::{GeometrySource, SourceError};

/// Source datasets the rules draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    /// Basisregistratie Grootschalige Topografie
    Bgt,
    /// TOP10NL topographic base map
    Top10nl,
}

impl Dataset {
    /// Identifier written to the `source` provenance field.
    pub fn id(&self) -> &'static str {
        match self {
            Dataset::Bgt => "bgt",
            Dataset::Top10nl => "top10nl",
        }
    }

    /// Display name used in log messages and reason texts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Dataset::Bgt => "BGT",
            Dataset::Top10nl => "TOP10NL",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One geometry source per dataset.
#[derive(Clone, Default)]
pub struct SourceSet {
    sources: BTreeMap<Dataset, Arc<dyn GeometrySource>>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, dataset: Dataset, source: impl GeometrySource + 'static) -> Self {
        self.sources.insert(dataset, Arc::new(source));
        self
    }

    pub fn with_shared_source(mut self, dataset: Dataset, source: Arc<dyn GeometrySource>) -> Self {
        self.sources.insert(dataset, source);
        self
    }

    /// Look up a layer; a dataset without a source behaves as if every layer
    /// were absent.
    pub fn layer(&self, dataset: Dataset, name: &str) -> Result<Option<SourceLayer>, SourceError> {
        match self.sources.get(&dataset) {
            Some(source) => source.layer(name),
            None => Ok(None),
        }
    }

    pub fn has_dataset(&self, dataset: Dataset) -> bool {
        self.sources.contains_key(&dataset)
    }
}

impl fmt::Debug for SourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSet")
            .field("datasets", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}
