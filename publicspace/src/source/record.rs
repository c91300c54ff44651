//! Input records and layers.

use geo::{BoundingRect, MultiPolygon, Rect};
use serde_json::{Map, Value};

/// One feature read from a source layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub geometry: MultiPolygon<f64>,
    pub attributes: Map<String, Value>,
}

impl Record {
    pub fn new(geometry: MultiPolygon<f64>, attributes: Map<String, Value>) -> Self {
        Self {
            geometry,
            attributes,
        }
    }

    /// Builder-style helper for setting a string attribute.
    pub fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// Text value of an attribute.
    ///
    /// Returns `None` for a missing key or a JSON null.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).and_then(attribute_text)
    }
}

/// Text form of an attribute value, used for predicate matching and provenance.
///
/// Strings are returned as-is; numbers and booleans use their JSON text.
pub fn attribute_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A named collection of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceLayer {
    pub name: String,
    pub records: Vec<Record>,
}

impl SourceLayer {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bounding box of all record geometry, `None` when there is none.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        merge_bounds(self.records.iter().filter_map(|r| r.geometry.bounding_rect()))
    }
}

/// Smallest rectangle containing all given rectangles.
pub fn merge_bounds(rects: impl IntoIterator<Item = Rect<f64>>) -> Option<Rect<f64>> {
    rects.into_iter().reduce(|a, b| {
        Rect::new(
            geo::coord! {
                x: a.min().x.min(b.min().x),
                y: a.min().y.min(b.min().y),
            },
            geo::coord! {
                x: a.max().x.max(b.max().x),
                y: a.max().y.max(b.max().y),
            },
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use serde_json::json;

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]])
    }

    #[test]
    fn test_attribute_text_conversions() {
        let record = Record::new(square(0.0, 0.0, 1.0), Map::new())
            .with_attribute("name", "erf")
            .with_attribute("count", 3)
            .with_attribute("flag", true)
            .with_attribute("empty", Value::Null);

        assert_eq!(record.attribute("name").as_deref(), Some("erf"));
        assert_eq!(record.attribute("count").as_deref(), Some("3"));
        assert_eq!(record.attribute("flag").as_deref(), Some("true"));
        assert_eq!(record.attribute("empty"), None);
        assert_eq!(record.attribute("missing"), None);
    }

    #[test]
    fn test_attribute_text_for_nested_values() {
        assert_eq!(attribute_text(&json!([1, 2])).as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_layer_bounds() {
        let layer = SourceLayer::new(
            "pand",
            vec![
                Record::new(square(0.0, 0.0, 10.0), Map::new()),
                Record::new(square(50.0, -5.0, 10.0), Map::new()),
            ],
        );
        let bounds = layer.bounds().unwrap();
        assert_eq!(bounds.min().x, 0.0);
        assert_eq!(bounds.min().y, -5.0);
        assert_eq!(bounds.max().x, 60.0);
        assert_eq!(bounds.max().y, 10.0);
    }

    #[test]
    fn test_empty_layer_has_no_bounds() {
        let layer = SourceLayer::new("pand", Vec::new());
        assert!(layer.is_empty());
        assert!(layer.bounds().is_none());
    }
}
