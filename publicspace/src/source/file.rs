//! GeoJSON files: reading records and writing feature collections.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use geo::{Geometry, MultiPolygon};
use geojson::{Feature as GeoJsonFeature, FeatureCollection, GeoJson, JsonObject};
use serde_json::Value;

use super::record::Record;
use super::SourceError;

/// Extract the polygonal part of a geometry.
///
/// Polygons and multipolygons are kept; every other geometry type yields
/// `None` so that it can be filtered out.
pub fn polygonal(geometry: Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => Some(MultiPolygon::new(vec![p])),
        Geometry::MultiPolygon(mp) => Some(mp),
        Geometry::Rect(r) => Some(MultiPolygon::new(vec![r.to_polygon()])),
        _ => None,
    }
}

/// Parse a GeoJSON document into records, dropping non-polygonal features.
pub fn parse_records(text: &str, origin: &Path) -> Result<Vec<Record>, SourceError> {
    let geojson = text.parse::<GeoJson>().map_err(|e| SourceError::Parse {
        path: origin.to_path_buf(),
        reason: e.to_string(),
    })?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![GeoJsonFeature {
            bbox: None,
            geometry: Some(g),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };

    feature_records(features, origin)
}

/// Convert GeoJSON features to records, keeping only polygonal geometry.
///
/// Features without geometry are skipped.
pub fn feature_records(features: Vec<GeoJsonFeature>, origin: &Path) -> Result<Vec<Record>, SourceError> {
    let mut records = Vec::with_capacity(features.len());
    for feature in features {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        let geometry =
            Geometry::<f64>::try_from(geometry).map_err(|e| SourceError::Parse {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;
        if let Some(geometry) = polygonal(geometry) {
            records.push(Record::new(geometry, feature.properties.unwrap_or_default()));
        }
    }

    Ok(records)
}

/// Read a GeoJSON file into records.
pub fn read_records(path: &Path) -> Result<Vec<Record>, SourceError> {
    let text = fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_records(&text, path)
}

/// Build a GeoJSON feature from a geometry and its properties.
pub fn to_geojson_feature(geometry: &MultiPolygon<f64>, properties: JsonObject) -> GeoJsonFeature {
    GeoJsonFeature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(geometry))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Write a feature collection to disk, creating parent directories.
///
/// `name` and `crs` are stored as foreign members of the collection.
pub fn write_collection(
    path: &Path,
    features: Vec<GeoJsonFeature>,
    name: &str,
    crs: Option<&str>,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut members = JsonObject::new();
    members.insert("name".to_string(), Value::from(name));
    if let Some(crs) = crs {
        members.insert("crs".to_string(), crs_member(crs));
    }

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(members),
    };

    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &collection)?;
    writer.flush()
}

/// Write records (geometry plus original attributes) as a GeoJSON file.
pub fn write_records(
    path: &Path,
    records: &[Record],
    name: &str,
    crs: Option<&str>,
) -> std::io::Result<()> {
    let features = records
        .iter()
        .map(|r| to_geojson_feature(&r.geometry, r.attributes.clone()))
        .collect();
    write_collection(path, features, name, crs)
}

/// Named-CRS member as written by GDAL for GeoJSON files.
fn crs_member(crs: &str) -> Value {
    serde_json::json!({
        "type": "name",
        "properties": { "name": crs }
    })
}
