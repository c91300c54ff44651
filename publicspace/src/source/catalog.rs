//! Mapping from logical layer names to files.

use std::collections::BTreeMap;

/// Maps each logical layer name to one or more file names.
///
/// Layers spread over several files (TOP10NL stores single and multi-part
/// functional areas separately) are concatenated on load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerCatalog {
    layers: BTreeMap<String, Vec<String>>,
}

impl LayerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer stored in a single file.
    pub fn with_layer(self, name: &str, file: &str) -> Self {
        self.with_layer_files(name, &[file])
    }

    /// Register a layer stored across several files.
    pub fn with_layer_files(mut self, name: &str, files: &[&str]) -> Self {
        self.layers.insert(
            name.to_string(),
            files.iter().map(|f| f.to_string()).collect(),
        );
        self
    }

    /// Files backing a layer, `None` for an unknown layer.
    pub fn files(&self, name: &str) -> Option<&[String]> {
        self.layers.get(name).map(|v| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(|k| k.as_str())
    }

    /// BGT layers as written by the OGC API download (one file per collection).
    pub fn bgt() -> Self {
        Self::new()
            .with_layer("onbegroeidterreindeel", "onbegroeidterreindeel.geojson")
            .with_layer("begroeidterreindeel", "begroeidterreindeel.geojson")
            .with_layer("pand", "pand.geojson")
            .with_layer("wegdeel", "wegdeel.geojson")
            .with_layer("waterdeel", "waterdeel.geojson")
            .with_layer("ondersteunend_waterdeel", "ondersteunendwaterdeel.geojson")
            .with_layer("ondersteunend_wegdeel", "ondersteunendwegdeel.geojson")
            .with_layer("overigbouwwerk", "overigbouwwerk.geojson")
            .with_layer("scheiding", "scheiding_vlak.geojson")
            .with_layer("kunstwerkdeel", "kunstwerkdeel_vlak.geojson")
            .with_layer("overbruggingsdeel", "overbruggingsdeel.geojson")
    }

    /// TOP10NL layers used by the rules.
    pub fn top10nl() -> Self {
        Self::new().with_layer_files(
            "functioneelgebied",
            &[
                "functioneel_gebied_vlak.geojson",
                "functioneel_gebied_multivlak.geojson",
            ],
        )
    }
}
