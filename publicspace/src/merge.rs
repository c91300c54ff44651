//! Reconciling tile fragments into output views.
//!
//! The surface holds one fragment per candidate per tile cell. Two views are
//! built from it:
//!
//! - the detailed view: fragments with the same provenance and category are
//!   unioned back into one feature ([`dissolve_detailed`])
//! - the aggregate view: everything of one category is unioned and split
//!   into single polygons ([`aggregate_by_category`])
//!
//! Both views keep the total area of the surface.

use std::collections::{BTreeMap, HashMap};

use geo::{Area, MultiPolygon, Polygon};

use crate::feature::{Category, Feature, Provenance};
use crate::overlay::{repair, union_all, OverlayError};

/// One polygon of the aggregate view.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePolygon {
    pub category: Category,
    pub geometry: Polygon<f64>,
}

impl AggregatePolygon {
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }
}

/// Grouping key for the detailed view; missing values group as "".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProvenanceKey {
    source: String,
    layer: String,
    source_id: String,
    reason: String,
    source_category: String,
    category: Category,
}

impl ProvenanceKey {
    fn of(provenance: &Provenance, category: Category) -> Self {
        Self {
            source: provenance.source.clone(),
            layer: provenance.layer.clone(),
            source_id: provenance.source_id.clone().unwrap_or_default(),
            reason: provenance.reason.clone(),
            source_category: provenance.source_category.clone().unwrap_or_default(),
            category,
        }
    }
}

/// Union fragments that share provenance and category.
///
/// Groups come out in order of first appearance and keep the provenance of
/// their first fragment. Running this on its own output changes nothing.
pub fn dissolve_detailed(features: &[Feature]) -> Result<Vec<Feature>, OverlayError> {
    let mut positions: HashMap<ProvenanceKey, usize> = HashMap::new();
    let mut groups: Vec<(Provenance, Category, Vec<MultiPolygon<f64>>)> = Vec::new();

    for feature in features {
        let key = ProvenanceKey::of(&feature.provenance, feature.category);
        match positions.get(&key) {
            Some(&position) => groups[position].2.push(feature.geometry.clone()),
            None => {
                positions.insert(key, groups.len());
                groups.push((
                    feature.provenance.clone(),
                    feature.category,
                    vec![feature.geometry.clone()],
                ));
            }
        }
    }

    groups
        .into_iter()
        .map(|(provenance, category, geometries)| {
            let context = format!("{}/{}", provenance.source, provenance.layer);
            let geometry = union_all(geometries, &context)?;
            Ok(Feature::new(provenance, category, geometry))
        })
        .collect()
}

/// Union everything per category and split into single polygons.
///
/// Categories are ordered by label (`privaat` before `publiek`).
pub fn aggregate_by_category(features: &[Feature]) -> Result<Vec<AggregatePolygon>, OverlayError> {
    let mut by_label: BTreeMap<&'static str, (Category, Vec<MultiPolygon<f64>>)> = BTreeMap::new();
    for feature in features {
        by_label
            .entry(feature.category.label())
            .or_insert_with(|| (feature.category, Vec::new()))
            .1
            .push(feature.geometry.clone());
    }

    let mut aggregates = Vec::new();
    for (label, (category, geometries)) in by_label {
        let union = union_all(geometries, label)?;
        aggregates.extend(explode(union).into_iter().map(|geometry| AggregatePolygon {
            category,
            geometry,
        }));
    }
    Ok(aggregates)
}

/// Split a multipolygon into its parts.
pub fn explode(geometry: MultiPolygon<f64>) -> Vec<Polygon<f64>> {
    geometry.0
}

/// Detailed view for merging several AOIs.
///
/// Dissolves by provenance, repairs the result and splits every feature into
/// single-polygon features.
pub fn merge_detailed_exploded(features: &[Feature]) -> Result<Vec<Feature>, OverlayError> {
    let mut merged = Vec::new();
    for feature in dissolve_detailed(features)? {
        let context = format!("{}/{}", feature.provenance.source, feature.provenance.layer);
        let repaired = repair(&feature.geometry, &context)?;
        for polygon in explode(repaired) {
            merged.push(Feature::new(
                feature.provenance.clone(),
                feature.category,
                MultiPolygon::new(vec![polygon]),
            ));
        }
    }
    Ok(merged)
}

/// Aggregate view for merging several AOIs.
pub fn reaggregate(polygons: &[AggregatePolygon]) -> Result<Vec<AggregatePolygon>, OverlayError> {
    let features: Vec<Feature> = polygons
        .iter()
        .map(|p| {
            Feature::new(
                Provenance {
                    source: String::new(),
                    layer: String::new(),
                    source_id: None,
                    reason: p.category.label().to_string(),
                    source_category: None,
                },
                p.category,
                MultiPolygon::new(vec![p.geometry.clone()]),
            )
        })
        .collect();
    aggregate_by_category(&features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
        ]])
    }

    fn fragment(id: Option<&str>, category: Category, geometry: MultiPolygon<f64>) -> Feature {
        Feature::new(
            Provenance {
                source: "bgt".to_string(),
                layer: "wegdeel".to_string(),
                source_id: id.map(str::to_string),
                reason: "reden".to_string(),
                source_category: None,
            },
            category,
            geometry,
        )
    }

    fn total(features: &[Feature]) -> f64 {
        features.iter().map(Feature::area).sum()
    }

    #[test]
    fn test_dissolve_rejoins_tile_fragments() {
        let features = vec![
            fragment(Some("W1"), Category::Public, square(0.0, 0.0, 10.0)),
            fragment(Some("W2"), Category::Public, square(50.0, 0.0, 5.0)),
            fragment(Some("W1"), Category::Public, square(10.0, 0.0, 10.0)),
        ];
        let dissolved = dissolve_detailed(&features).unwrap();

        assert_eq!(dissolved.len(), 2);
        assert_eq!(dissolved[0].provenance.source_id.as_deref(), Some("W1"));
        assert_eq!(dissolved[0].geometry.0.len(), 1);
        assert!((dissolved[0].area() - 200.0).abs() < 1e-6);
        assert!((total(&dissolved) - total(&features)).abs() < 1e-6);
    }

    #[test]
    fn test_dissolve_groups_missing_values_together() {
        let features = vec![
            fragment(None, Category::Public, square(0.0, 0.0, 1.0)),
            fragment(None, Category::Public, square(5.0, 0.0, 1.0)),
        ];
        let dissolved = dissolve_detailed(&features).unwrap();
        assert_eq!(dissolved.len(), 1);
        assert_eq!(dissolved[0].provenance.source_id, None);
        assert_eq!(dissolved[0].geometry.0.len(), 2);
    }

    #[test]
    fn test_dissolve_separates_categories() {
        let features = vec![
            fragment(Some("X"), Category::Public, square(0.0, 0.0, 1.0)),
            fragment(Some("X"), Category::Private, square(1.0, 0.0, 1.0)),
        ];
        assert_eq!(dissolve_detailed(&features).unwrap().len(), 2);
    }

    #[test]
    fn test_dissolve_is_idempotent() {
        let features = vec![
            fragment(Some("W1"), Category::Public, square(0.0, 0.0, 10.0)),
            fragment(Some("W1"), Category::Public, square(10.0, 0.0, 10.0)),
            fragment(Some("W2"), Category::Private, square(30.0, 0.0, 10.0)),
        ];
        let once = dissolve_detailed(&features).unwrap();
        let twice = dissolve_detailed(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_aggregate_explodes_per_category() {
        let features = vec![
            fragment(Some("A"), Category::Public, square(0.0, 0.0, 10.0)),
            fragment(Some("B"), Category::Public, square(10.0, 0.0, 10.0)),
            fragment(Some("C"), Category::Public, square(100.0, 0.0, 10.0)),
            fragment(Some("D"), Category::Private, square(0.0, 10.0, 10.0)),
        ];
        let aggregates = aggregate_by_category(&features).unwrap();

        assert_eq!(aggregates.len(), 3);
        assert_eq!(aggregates[0].category, Category::Private);
        let public: Vec<_> = aggregates
            .iter()
            .filter(|a| a.category == Category::Public)
            .collect();
        assert_eq!(public.len(), 2);
        let area: f64 = aggregates.iter().map(AggregatePolygon::area).sum();
        assert!((area - total(&features)).abs() < 1e-6);
    }

    #[test]
    fn test_merge_detailed_exploded() {
        let features = vec![
            fragment(Some("W1"), Category::Public, square(0.0, 0.0, 10.0)),
            fragment(Some("W1"), Category::Public, square(40.0, 0.0, 10.0)),
        ];
        let merged = merge_detailed_exploded(&features).unwrap();
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|f| f.geometry.0.len() == 1));
    }

    #[test]
    fn test_reaggregate_joins_across_inputs() {
        let polygons = vec![
            AggregatePolygon {
                category: Category::Public,
                geometry: square(0.0, 0.0, 10.0).0.remove(0),
            },
            AggregatePolygon {
                category: Category::Public,
                geometry: square(10.0, 0.0, 10.0).0.remove(0),
            },
        ];
        let merged = reaggregate(&polygons).unwrap();
        assert_eq!(merged.len(), 1);
        assert!((merged[0].area() - 200.0).abs() < 1e-6);
    }
}
