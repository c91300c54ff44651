//! The classified surface and its tiled `add` operation.

use std::fmt;
use std::str::FromStr;

use geo::{Area, BooleanOps, BoundingRect, MultiPolygon, Rect};
use rayon::prelude::*;

use super::error::OverlayError;
use super::index::FragmentIndex;
use super::ops::{drop_slivers, guarded, repair, union_all, AREA_TOLERANCE};
use crate::feature::{Category, Feature, Provenance};
use crate::grid::{TileCell, TileGrid, DEFAULT_CELL_SIZE};
use crate::source::{merge_bounds, Record};

/// How the cells of one `add` call are processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TileStrategy {
    /// One cell after another against the live surface.
    #[default]
    Sequential,
    /// All cells at once against a snapshot taken at the start of the call.
    Parallel,
}

impl TileStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileStrategy::Sequential => "sequential",
            TileStrategy::Parallel => "parallel",
        }
    }
}

impl fmt::Display for TileStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TileStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(TileStrategy::Sequential),
            "parallel" => Ok(TileStrategy::Parallel),
            other => Err(format!(
                "unknown tile strategy '{}' (expected 'sequential' or 'parallel')",
                other
            )),
        }
    }
}

/// Settings for a [`ClassifiedSurface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    /// Tile cell edge length in map units
    pub cell_size: f64,
    pub strategy: TileStrategy,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            strategy: TileStrategy::Sequential,
        }
    }
}

/// What to attach to the fragments produced by one `add` call.
#[derive(Debug, Clone, Copy)]
pub struct AddSpec<'a> {
    /// Dataset identifier written to `source`
    pub source: &'a str,
    /// Output layer name
    pub layer: &'a str,
    /// Attribute holding the source feature identifier
    pub source_id_attribute: &'a str,
    pub reason: &'a str,
    pub category: Category,
    /// Attribute copied into `source_category`, if any
    pub source_category_attribute: Option<&'a str>,
}

/// Counters for one `add` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddStats {
    /// Records offered to the surface
    pub candidates: usize,
    /// Tile cells visited (zero when the surface was empty)
    pub cells: usize,
    /// Fragments appended
    pub appended: usize,
    /// Candidate pieces dropped because nothing was left after
    /// repair or after removing the claimed area
    pub discarded: usize,
}

/// A repaired candidate with its provenance.
struct Candidate {
    geometry: MultiPolygon<f64>,
    bounds: Rect<f64>,
    provenance: Provenance,
}

/// Remainders computed for a single cell.
#[derive(Default)]
struct CellOutcome {
    /// `(candidate position, remainder)` in candidate order
    fragments: Vec<(usize, MultiPolygon<f64>)>,
    discarded: usize,
}

/// The growing, non-overlapping classified surface of one AOI run.
///
/// Features are only ever appended. A feature added by an earlier `add`
/// call keeps its geometry: later candidates are cut back to the area that
/// is still unclaimed.
#[derive(Debug)]
pub struct ClassifiedSurface {
    config: SurfaceConfig,
    features: Vec<Feature>,
    index: FragmentIndex,
}

impl ClassifiedSurface {
    /// Create an empty surface.
    ///
    /// Fails when the configured cell size is not a positive, finite number.
    pub fn new(config: SurfaceConfig) -> Result<Self, OverlayError> {
        TileGrid::covering(None, config.cell_size)?;
        Ok(Self {
            config,
            features: Vec::new(),
            index: FragmentIndex::new(),
        })
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn into_features(self) -> Vec<Feature> {
        self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Sum of all fragment areas.
    pub fn total_area(&self) -> f64 {
        self.features.iter().map(Feature::area).sum()
    }

    /// Sum of fragment areas for one category.
    pub fn category_area(&self, category: Category) -> f64 {
        self.features
            .iter()
            .filter(|f| f.category == category)
            .map(Feature::area)
            .sum()
    }

    /// Merge candidates into the surface.
    ///
    /// Each candidate is repaired. On an empty surface the repaired
    /// candidates are appended as they are. Otherwise the candidates are cut
    /// into tile cells, and each piece keeps only what is not already
    /// claimed by the surface.
    pub fn add(&mut self, candidates: &[Record], spec: &AddSpec<'_>) -> Result<AddStats, OverlayError> {
        if spec.reason.trim().is_empty() {
            return Err(OverlayError::EmptyReason {
                layer: spec.layer.to_string(),
            });
        }

        let context = format!("{}/{}", spec.source, spec.layer);
        let mut stats = AddStats {
            candidates: candidates.len(),
            ..AddStats::default()
        };

        let mut prepared = Vec::with_capacity(candidates.len());
        for record in candidates {
            let geometry = repair(&record.geometry, &context)?;
            match geometry.bounding_rect() {
                Some(bounds) if !geometry.0.is_empty() => prepared.push(Candidate {
                    geometry,
                    bounds,
                    provenance: provenance(record, spec),
                }),
                _ => stats.discarded += 1,
            }
        }

        if self.features.is_empty() {
            for candidate in prepared {
                self.append(candidate.provenance, spec.category, candidate.geometry);
                stats.appended += 1;
            }
            return Ok(stats);
        }

        let grid = TileGrid::covering(
            merge_bounds(prepared.iter().map(|c| c.bounds)),
            self.config.cell_size,
        )?;

        match self.config.strategy {
            TileStrategy::Sequential => {
                for cell in grid.cells() {
                    stats.cells += 1;
                    let outcome = self.cell_remainders(&cell, &prepared, &context)?;
                    stats.discarded += outcome.discarded;
                    for (position, geometry) in outcome.fragments {
                        self.append(prepared[position].provenance.clone(), spec.category, geometry);
                        stats.appended += 1;
                    }
                }
            }
            TileStrategy::Parallel => {
                let cells: Vec<TileCell> = grid.cells().collect();
                let outcomes = cells
                    .par_iter()
                    .map(|cell| self.cell_remainders(cell, &prepared, &context))
                    .collect::<Result<Vec<_>, _>>()?;

                stats.cells = cells.len();
                for outcome in outcomes {
                    stats.discarded += outcome.discarded;
                    for (position, geometry) in outcome.fragments {
                        self.append(prepared[position].provenance.clone(), spec.category, geometry);
                        stats.appended += 1;
                    }
                }
            }
        }

        tracing::debug!(
            layer = spec.layer,
            candidates = stats.candidates,
            cells = stats.cells,
            appended = stats.appended,
            discarded = stats.discarded,
            "Merged candidates into surface"
        );

        Ok(stats)
    }

    /// Pairs of fragments that overlap by more than `tolerance`.
    ///
    /// An empty result means the non-overlap invariant holds.
    pub fn overlapping_pairs(&self, tolerance: f64) -> Result<Vec<(usize, usize)>, OverlayError> {
        let mut pairs = Vec::new();
        for (i, feature) in self.features.iter().enumerate() {
            let Some(bounds) = feature.geometry.bounding_rect() else {
                continue;
            };
            for j in self.index.query(&bounds) {
                if j <= i {
                    continue;
                }
                let other = &self.features[j].geometry;
                let shared = guarded("intersection", "overlap check", || {
                    feature.geometry.intersection(other)
                })?;
                if shared.unsigned_area() > tolerance {
                    pairs.push((i, j));
                }
            }
        }
        Ok(pairs)
    }

    fn append(&mut self, provenance: Provenance, category: Category, geometry: MultiPolygon<f64>) {
        let position = self.features.len();
        if let Some(bounds) = geometry.bounding_rect() {
            self.index.insert(position, &bounds);
        }
        self.features.push(Feature::new(provenance, category, geometry));
    }

    /// Clip every candidate touching `cell` to it and remove the claimed area.
    fn cell_remainders(
        &self,
        cell: &TileCell,
        candidates: &[Candidate],
        context: &str,
    ) -> Result<CellOutcome, OverlayError> {
        let mut outcome = CellOutcome::default();
        let hits: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| cell.touches(&c.bounds))
            .map(|(position, _)| position)
            .collect();
        if hits.is_empty() {
            return Ok(outcome);
        }

        let covered = self.covered_area(cell, context)?;
        let cell_polygon = cell.to_polygon();

        for position in hits {
            let candidate = &candidates[position];
            let clipped = if within(&candidate.bounds, &cell.rect) {
                candidate.geometry.clone()
            } else {
                drop_slivers(guarded("intersection", context, || {
                    candidate.geometry.intersection(&cell_polygon)
                })?)
            };
            if clipped.0.is_empty() {
                continue;
            }

            let remainder = if covered.0.is_empty() {
                clipped
            } else {
                drop_slivers(guarded("difference", context, || clipped.difference(&covered))?)
            };

            if remainder.0.is_empty() || remainder.unsigned_area() <= AREA_TOLERANCE {
                outcome.discarded += 1;
            } else {
                outcome.fragments.push((position, remainder));
            }
        }

        Ok(outcome)
    }

    /// Union of the surface restricted to `cell`; empty when nothing is there.
    fn covered_area(&self, cell: &TileCell, context: &str) -> Result<MultiPolygon<f64>, OverlayError> {
        let cell_polygon = cell.to_polygon();
        let mut pieces = Vec::new();

        for position in self.index.query(&cell.rect) {
            let geometry = &self.features[position].geometry;
            let piece = match geometry.bounding_rect() {
                Some(bounds) if within(&bounds, &cell.rect) => geometry.clone(),
                _ => drop_slivers(guarded("intersection", context, || {
                    geometry.intersection(&cell_polygon)
                })?),
            };
            if !piece.0.is_empty() {
                pieces.push(piece);
            }
        }

        union_all(pieces, context)
    }
}

fn provenance(record: &Record, spec: &AddSpec<'_>) -> Provenance {
    Provenance {
        source: spec.source.to_string(),
        layer: spec.layer.to_string(),
        source_id: record.attribute(spec.source_id_attribute),
        reason: spec.reason.to_string(),
        source_category: spec
            .source_category_attribute
            .and_then(|name| record.attribute(name)),
    }
}

fn within(inner: &Rect<f64>, outer: &Rect<f64>) -> bool {
    inner.min().x >= outer.min().x
        && inner.min().y >= outer.min().y
        && inner.max().x <= outer.max().x
        && inner.max().y <= outer.max().y
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use serde_json::Map;

    fn rect_record(x0: f64, y0: f64, x1: f64, y1: f64, id: &str) -> Record {
        Record::new(
            MultiPolygon::new(vec![polygon![
                (x: x0, y: y0),
                (x: x1, y: y0),
                (x: x1, y: y1),
                (x: x0, y: y1),
            ]]),
            Map::new(),
        )
        .with_attribute("lokaal_id", id)
        .with_attribute("type", "sloot")
    }

    fn spec(layer: &'static str, category: Category) -> AddSpec<'static> {
        AddSpec {
            source: "bgt",
            layer,
            source_id_attribute: "lokaal_id",
            reason: "test reason",
            category,
            source_category_attribute: None,
        }
    }

    fn surface(cell_size: f64, strategy: TileStrategy) -> ClassifiedSurface {
        ClassifiedSurface::new(SurfaceConfig {
            cell_size,
            strategy,
        })
        .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_cell_size() {
        let err = ClassifiedSurface::new(SurfaceConfig {
            cell_size: 0.0,
            strategy: TileStrategy::Sequential,
        })
        .unwrap_err();
        assert!(matches!(err, OverlayError::Grid(_)));
    }

    #[test]
    fn test_first_add_appends_without_cropping() {
        let mut surface = surface(10.0, TileStrategy::Sequential);
        let stats = surface
            .add(&[rect_record(0.0, 0.0, 35.0, 35.0, "a")], &spec("pand", Category::Private))
            .unwrap();

        assert_eq!(stats.appended, 1);
        assert_eq!(stats.cells, 0);
        assert_eq!(surface.len(), 1);
        assert!((surface.total_area() - 1225.0).abs() < 1e-6);
    }

    #[test]
    fn test_later_add_only_claims_remainder() {
        let mut surface = surface(1000.0, TileStrategy::Sequential);
        surface
            .add(&[rect_record(0.0, 0.0, 10.0, 10.0, "a")], &spec("pand", Category::Private))
            .unwrap();
        let stats = surface
            .add(&[rect_record(5.0, 0.0, 15.0, 10.0, "b")], &spec("wegdeel", Category::Public))
            .unwrap();

        assert_eq!(stats.appended, 1);
        assert!((surface.category_area(Category::Private) - 100.0).abs() < 1e-6);
        assert!((surface.category_area(Category::Public) - 50.0).abs() < 1e-6);
        assert!(surface.overlapping_pairs(1e-6).unwrap().is_empty());
    }

    #[test]
    fn test_self_intersecting_candidate_is_repaired_before_difference() {
        let mut surface = surface(1000.0, TileStrategy::Sequential);
        surface
            .add(&[rect_record(100.0, 100.0, 110.0, 110.0, "seed")], &spec("pand", Category::Private))
            .unwrap();
        let bow_tie = Record::new(
            MultiPolygon::new(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 10.0),
                (x: 10.0, y: 0.0),
                (x: 0.0, y: 10.0),
            ]]),
            Map::new(),
        )
        .with_attribute("lokaal_id", "W1");

        let stats = surface.add(&[bow_tie], &spec("wegdeel", Category::Public)).unwrap();

        assert_eq!(stats.appended, 1);
        assert_eq!(stats.discarded, 0);
        assert!((surface.category_area(Category::Public) - 50.0).abs() < 1e-6);
        assert!((surface.category_area(Category::Private) - 100.0).abs() < 1e-6);
        assert!(surface.overlapping_pairs(1e-6).unwrap().is_empty());
    }

    #[test]
    fn test_fully_covered_candidate_is_discarded() {
        let mut surface = surface(1000.0, TileStrategy::Sequential);
        surface
            .add(&[rect_record(0.0, 0.0, 10.0, 10.0, "a")], &spec("pand", Category::Private))
            .unwrap();
        let stats = surface
            .add(&[rect_record(2.0, 2.0, 8.0, 8.0, "b")], &spec("wegdeel", Category::Public))
            .unwrap();

        assert_eq!(stats.appended, 0);
        assert_eq!(stats.discarded, 1);
        assert_eq!(surface.len(), 1);
    }

    #[test]
    fn test_candidate_is_split_per_cell() {
        let mut surface = surface(10.0, TileStrategy::Sequential);
        surface
            .add(&[rect_record(100.0, 100.0, 101.0, 101.0, "seed")], &spec("pand", Category::Private))
            .unwrap();
        let stats = surface
            .add(&[rect_record(0.0, 0.0, 20.0, 10.0, "b")], &spec("wegdeel", Category::Public))
            .unwrap();

        assert_eq!(stats.appended, 2);
        assert!((surface.category_area(Category::Public) - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_provenance_is_attached() {
        let mut surface = surface(1000.0, TileStrategy::Sequential);
        let spec = AddSpec {
            source_category_attribute: Some("type"),
            ..spec("waterdeel", Category::Public)
        };
        surface.add(&[rect_record(0.0, 0.0, 1.0, 1.0, "W1")], &spec).unwrap();

        let feature = &surface.features()[0];
        assert_eq!(feature.provenance.source, "bgt");
        assert_eq!(feature.provenance.layer, "waterdeel");
        assert_eq!(feature.provenance.source_id.as_deref(), Some("W1"));
        assert_eq!(feature.provenance.source_category.as_deref(), Some("sloot"));
        assert_eq!(feature.category, Category::Public);
    }

    #[test]
    fn test_empty_reason_is_rejected() {
        let mut surface = surface(1000.0, TileStrategy::Sequential);
        let spec = AddSpec {
            reason: "  ",
            ..spec("pand", Category::Private)
        };
        let err = surface.add(&[rect_record(0.0, 0.0, 1.0, 1.0, "a")], &spec).unwrap_err();
        assert_eq!(
            err,
            OverlayError::EmptyReason {
                layer: "pand".to_string()
            }
        );
    }

    #[test]
    fn test_strategies_agree() {
        let seed = vec![rect_record(3.0, 3.0, 17.0, 9.0, "a")];
        let candidates = vec![
            rect_record(0.0, 0.0, 25.0, 12.0, "b"),
            rect_record(30.0, 0.0, 32.0, 2.0, "c"),
        ];

        let mut results = Vec::new();
        for strategy in [TileStrategy::Sequential, TileStrategy::Parallel] {
            let mut surface = surface(5.0, strategy);
            surface.add(&seed, &spec("pand", Category::Private)).unwrap();
            let stats = surface.add(&candidates, &spec("wegdeel", Category::Public)).unwrap();
            results.push((stats, surface.into_features()));
        }

        let (seq_stats, seq) = &results[0];
        let (par_stats, par) = &results[1];
        assert_eq!(seq_stats, par_stats);
        assert_eq!(seq.len(), par.len());
        for (a, b) in seq.iter().zip(par.iter()) {
            assert_eq!(a.provenance, b.provenance);
            assert!((a.area() - b.area()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("Parallel".parse::<TileStrategy>().unwrap(), TileStrategy::Parallel);
        assert_eq!("sequential".parse::<TileStrategy>().unwrap(), TileStrategy::Sequential);
        assert!("random".parse::<TileStrategy>().is_err());
        assert_eq!(TileStrategy::Parallel.to_string(), "parallel");
    }
}
