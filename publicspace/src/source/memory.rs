//! Preloaded in-memory geometry source.

use std::collections::BTreeMap;

use super::record::SourceLayer;
use super::{GeometrySource, SourceError};

/// Geometry source backed by layers held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    layers: BTreeMap<String, SourceLayer>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a layer, keyed by its name.
    pub fn with_layer(mut self, layer: SourceLayer) -> Self {
        self.insert(layer);
        self
    }

    pub fn insert(&mut self, layer: SourceLayer) {
        self.layers.insert(layer.name.clone(), layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl GeometrySource for InMemorySource {
    fn layer(&self, name: &str) -> Result<Option<SourceLayer>, SourceError> {
        Ok(self.layers.get(name).cloned())
    }

    fn layer_names(&self) -> Vec<String> {
        self.layers.keys().cloned().collect()
    }
}
