//! Integration tests for the classification engine.
//!
//! These tests verify the complete classification workflow including:
//! - Rule precedence through the non-overlapping surface
//! - Reading source layers from disk and exporting both views
//! - Independence of the result from the tile cell size and strategy
//! - Tolerance of absent layers
//! - Complementary rule pairs partitioning a layer

use geo::{polygon, Area, BooleanOps, MultiPolygon};
use serde_json::Map;
use tempfile::TempDir;

use publicspace::classify::{AoiPaths, Classifier};
use publicspace::export::{read_aggregate, read_detailed};
use publicspace::feature::{Category, Feature};
use publicspace::merge::dissolve_detailed;
use publicspace::overlay::{ClassifiedSurface, SurfaceConfig, TileStrategy};
use publicspace::rules::{Predicate, Rule, RuleSet, PUBLIC_VEGETATION};
use publicspace::source::file::write_records;
use publicspace::source::{Dataset, InMemorySource, Record, SourceLayer, SourceSet};

const EPS: f64 = 1e-6;

// =============================================================================
// Test Helpers
// =============================================================================

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: x0, y: y0),
        (x: x1, y: y0),
        (x: x1, y: y1),
        (x: x0, y: y1),
    ]])
}

fn triangle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: a.0, y: a.1),
        (x: b.0, y: b.1),
        (x: c.0, y: c.1),
    ]])
}

fn record(id: &str, geometry: MultiPolygon<f64>) -> Record {
    Record::new(geometry, Map::new()).with_attribute("lokaal_id", id)
}

fn area_of(features: &[Feature], category: Category) -> f64 {
    features
        .iter()
        .filter(|f| f.category == category)
        .map(Feature::area)
        .sum()
}

fn assert_no_overlap(features: &[Feature]) {
    for (i, a) in features.iter().enumerate() {
        for b in &features[i + 1..] {
            let shared = a.geometry.intersection(&b.geometry).unsigned_area();
            assert!(shared < EPS, "fragments overlap by {}", shared);
        }
    }
}

/// A small BGT dataset with overlapping layers and slanted edges.
fn mixed_bgt() -> InMemorySource {
    InMemorySource::new()
        .with_layer(SourceLayer::new(
            "pand",
            vec![
                record("P1", rect(2.0, 2.0, 9.5, 7.5)),
                record("P2", triangle((14.0, 1.0), (22.0, 3.0), (16.0, 9.0))),
            ],
        ))
        .with_layer(SourceLayer::new(
            "wegdeel",
            vec![
                record("W1", rect(0.0, 6.0, 25.0, 11.0)).with_attribute("functie", "rijbaan lokale weg"),
                record("W2", rect(0.0, 0.0, 3.0, 25.0)).with_attribute("functie", "spoorbaan"),
            ],
        ))
        .with_layer(SourceLayer::new(
            "begroeidterreindeel",
            vec![
                record("B1", triangle((0.0, 0.0), (24.0, 4.0), (8.0, 24.0)))
                    .with_attribute("fysiek_voorkomen", "grasland overig"),
                record("B2", rect(18.0, 12.0, 24.0, 24.0))
                    .with_attribute("fysiek_voorkomen", "grasland agrarisch"),
            ],
        ))
        .with_layer(SourceLayer::new(
            "waterdeel",
            vec![record("WA1", rect(5.0, 15.0, 21.0, 19.5)).with_attribute("type", "watergang")],
        ))
}

fn run_surface(sources: &SourceSet, config: SurfaceConfig) -> ClassifiedSurface {
    let mut surface = ClassifiedSurface::new(config).unwrap();
    RuleSet::default().apply(sources, &mut surface).unwrap();
    surface
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn test_earlier_rule_keeps_overlap() {
    // A: 10x10 private, B: 5x10 public overlapping A by 2x10
    let sources = SourceSet::new().with_source(
        Dataset::Bgt,
        InMemorySource::new()
            .with_layer(SourceLayer::new("pand", vec![record("A", rect(0.0, 0.0, 10.0, 10.0))]))
            .with_layer(SourceLayer::new(
                "wegdeel",
                vec![record("B", rect(8.0, 0.0, 13.0, 10.0)).with_attribute("functie", "voetpad")],
            )),
    );

    let surface = run_surface(&sources, SurfaceConfig::default());

    assert!((surface.category_area(Category::Private) - 100.0).abs() < EPS);
    assert!((surface.category_area(Category::Public) - 30.0).abs() < EPS);
    assert_no_overlap(surface.features());
}

#[test]
fn test_later_rule_never_reclaims_area() {
    let surface = run_surface(
        &SourceSet::new().with_source(Dataset::Bgt, mixed_bgt()),
        SurfaceConfig::default(),
    );
    assert_no_overlap(surface.features());

    // The railway only keeps what buildings and public green left over
    let railway: f64 = surface
        .features()
        .iter()
        .filter(|f| f.provenance.source_id.as_deref() == Some("W2"))
        .map(Feature::area)
        .sum();
    let expected = rect(0.0, 0.0, 3.0, 25.0)
        .difference(&rect(2.0, 2.0, 9.5, 7.5))
        .difference(&triangle((0.0, 0.0), (24.0, 4.0), (8.0, 24.0)))
        .unsigned_area();
    assert!(expected > 0.0);
    assert!((railway - expected).abs() < 1e-4);
}

// =============================================================================
// End to end through the file system
// =============================================================================

#[test]
fn test_pand_and_wegdeel_end_to_end() {
    let dir = TempDir::new().unwrap();
    let paths = AoiPaths::for_aoi(dir.path(), "test_area0");
    std::fs::create_dir_all(&paths.data_bgt).unwrap();

    write_records(
        &paths.data_bgt.join("pand.geojson"),
        &[record("P1", rect(0.0, 0.0, 10.0, 10.0))],
        "pand",
        None,
    )
    .unwrap();
    write_records(
        &paths.data_bgt.join("wegdeel.geojson"),
        &[record("P2", rect(20.0, 0.0, 30.0, 5.0)).with_attribute("functie", "rijbaan autosnelweg")],
        "wegdeel",
        None,
    )
    .unwrap();

    let result = Classifier::new(SurfaceConfig::default())
        .run_paths(&paths)
        .unwrap();
    assert!(paths.is_complete());
    assert_eq!(result.export.detailed, 2);

    let detailed = read_detailed(&paths.detailed).unwrap();
    assert_eq!(detailed.len(), 2);

    let pand = detailed
        .iter()
        .find(|f| f.provenance.source_id.as_deref() == Some("P1"))
        .unwrap();
    assert_eq!(pand.category, Category::Private);
    assert_eq!(pand.provenance.layer, "pand");
    assert!(pand.provenance.reason.contains("pand"));
    assert_eq!(pand.provenance.source_category, None);

    let weg = detailed
        .iter()
        .find(|f| f.provenance.source_id.as_deref() == Some("P2"))
        .unwrap();
    assert_eq!(weg.category, Category::Public);
    assert!(weg.provenance.reason.contains("wegdeel"));
    assert_eq!(
        weg.provenance.source_category.as_deref(),
        Some("rijbaan autosnelweg")
    );

    let aggregate = read_aggregate(&paths.aggregate).unwrap();
    assert_eq!(aggregate.len(), 2);
    let mut areas: Vec<f64> = aggregate.iter().map(|p| p.area()).collect();
    areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((areas[0] - 50.0).abs() < EPS);
    assert!((areas[1] - 100.0).abs() < EPS);
}

// =============================================================================
// Tiling
// =============================================================================

#[test]
fn test_cell_size_does_not_change_result() {
    let sources = SourceSet::new().with_source(Dataset::Bgt, mixed_bgt());

    let coarse = run_surface(&sources, SurfaceConfig::default());
    let fine = run_surface(
        &sources,
        SurfaceConfig {
            cell_size: 1.0,
            strategy: TileStrategy::Sequential,
        },
    );

    for category in [Category::Public, Category::Private] {
        let a = coarse.category_area(category);
        let b = fine.category_area(category);
        assert!((a - b).abs() < 1e-4, "{}: {} vs {}", category, a, b);
    }
    assert!(fine.len() > coarse.len());
    assert_no_overlap(fine.features());

    // Dissolving removes the tile fragmentation
    let coarse_groups = dissolve_detailed(coarse.features()).unwrap();
    let fine_groups = dissolve_detailed(fine.features()).unwrap();
    assert_eq!(coarse_groups.len(), fine_groups.len());
}

#[test]
fn test_sequential_and_parallel_agree() {
    let sources = SourceSet::new().with_source(Dataset::Bgt, mixed_bgt());
    let config = |strategy| SurfaceConfig {
        cell_size: 4.0,
        strategy,
    };

    let sequential = run_surface(&sources, config(TileStrategy::Sequential));
    let parallel = run_surface(&sources, config(TileStrategy::Parallel));

    assert_eq!(sequential.features(), parallel.features());
}

// =============================================================================
// Absent layers
// =============================================================================

#[test]
fn test_absent_layers_are_skipped() {
    let sources = SourceSet::new().with_source(
        Dataset::Bgt,
        InMemorySource::new().with_layer(SourceLayer::new(
            "waterdeel",
            vec![record("WA1", rect(0.0, 0.0, 4.0, 4.0)).with_attribute("type", "zee")],
        )),
    );

    let mut surface = ClassifiedSurface::new(SurfaceConfig::default()).unwrap();
    let report = RuleSet::default().apply(&sources, &mut surface).unwrap();

    assert_eq!(report.outcomes.len(), 17);
    assert_eq!(report.applied(), 1);
    assert_eq!(report.skipped(), 16);
    assert_eq!(surface.len(), 1);
    assert_eq!(surface.features()[0].provenance.layer, "waterdeel");
}

#[test]
fn test_no_data_at_all_still_exports() {
    let dir = TempDir::new().unwrap();
    let paths = AoiPaths::for_aoi(dir.path(), "empty");

    let result = Classifier::new(SurfaceConfig::default())
        .run_paths(&paths)
        .unwrap();

    assert_eq!(result.report.applied(), 0);
    assert_eq!(result.export.detailed, 0);
    assert!(read_detailed(&paths.detailed).unwrap().is_empty());
}

// =============================================================================
// Complementary rules
// =============================================================================

#[test]
fn test_complementary_rules_partition_layer() {
    let values = ["grasland overig", "loofbos", "grasland agrarisch", "fruitteelt"];
    let records: Vec<Record> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = i as f64 * 10.0;
            record(&format!("B{}", i), rect(x, 0.0, x + 5.0, 5.0))
                .with_attribute("fysiek_voorkomen", *v)
        })
        .chain(std::iter::once(record("B-none", rect(50.0, 0.0, 53.0, 3.0))))
        .collect();
    let layer_area: f64 = records.iter().map(|r| r.geometry.unsigned_area()).sum();

    let public = Rule::new(Dataset::Bgt, "begroeidterreindeel", Category::Public, "openbaar groen")
        .with_predicate(Predicate::is_in("fysiek_voorkomen", PUBLIC_VEGETATION));
    let private = Rule::new(Dataset::Bgt, "begroeidterreindeel", Category::Private, "overig groen")
        .with_predicate(Predicate::not_in("fysiek_voorkomen", PUBLIC_VEGETATION));

    let sources = SourceSet::new().with_source(
        Dataset::Bgt,
        InMemorySource::new().with_layer(SourceLayer::new("begroeidterreindeel", records.clone())),
    );
    let mut surface = ClassifiedSurface::new(SurfaceConfig::default()).unwrap();
    RuleSet::new(vec![public, private])
        .apply(&sources, &mut surface)
        .unwrap();

    assert_eq!(surface.len(), records.len());
    assert!((surface.total_area() - layer_area).abs() < EPS);
    assert!((surface.category_area(Category::Public) - 50.0).abs() < EPS);
}
