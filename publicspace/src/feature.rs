//! Classified features and their provenance.
//!
//! A [`Feature`] is one polygonal piece of the classified surface. Its
//! [`Provenance`] records which dataset, layer and source feature it came from
//! and why it received its [`Category`].

use std::fmt;
use std::str::FromStr;

use geo::{Area, MultiPolygon};

/// Classification outcome for a piece of land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Publicly accessible space (roads, water, public green).
    Public,
    /// Private or restricted space (buildings, yards, railways).
    Private,
}

impl Category {
    /// Label written to output layers and used in reason texts.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Public => "publiek",
            Category::Private => "privaat",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a category label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category '{0}' (expected 'publiek' or 'privaat')")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "publiek" | "public" => Ok(Category::Public),
            "privaat" | "private" => Ok(Category::Private),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Why a feature was classified the way it was.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Provenance {
    /// Dataset identifier (`bgt`, `top10nl`).
    pub source: String,
    /// Layer name within the dataset.
    pub layer: String,
    /// Identifier of the source feature, when the source carries one.
    pub source_id: Option<String>,
    /// Human-readable classification justification. Never empty.
    pub reason: String,
    /// Value of the attribute that drove the rule, if the rule names one.
    pub source_category: Option<String>,
}

/// One classified polygon or multipolygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub provenance: Provenance,
    pub category: Category,
    pub geometry: MultiPolygon<f64>,
}

impl Feature {
    pub fn new(provenance: Provenance, category: Category, geometry: MultiPolygon<f64>) -> Self {
        Self {
            provenance,
            category,
            geometry,
        }
    }

    /// Planar area of the feature geometry.
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Public.label(), "publiek");
        assert_eq!(Category::Private.label(), "privaat");
        assert_eq!(Category::Private.to_string(), "privaat");
    }

    #[test]
    fn test_category_parse_accepts_dutch_and_english() {
        assert_eq!("publiek".parse::<Category>().unwrap(), Category::Public);
        assert_eq!("Private".parse::<Category>().unwrap(), Category::Private);
        assert_eq!(" privaat ".parse::<Category>().unwrap(), Category::Private);
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        let err = "semi".parse::<Category>().unwrap_err();
        assert!(err.to_string().contains("semi"));
    }

    #[test]
    fn test_feature_area() {
        let geometry = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 5.0),
            (x: 0.0, y: 5.0),
        ]]);
        let feature = Feature::new(
            Provenance {
                source: "bgt".to_string(),
                layer: "pand".to_string(),
                source_id: Some("P1".to_string()),
                reason: "test".to_string(),
                source_category: None,
            },
            Category::Private,
            geometry,
        );
        assert!((feature.area() - 50.0).abs() < 1e-9);
    }
}
