//! Tests for tile grid generation

use super::*;
use geo::{coord, Rect};
use proptest::prelude::*;

fn rect(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Rect<f64> {
    Rect::new(coord! { x: xmin, y: ymin }, coord! { x: xmax, y: ymax })
}

#[test]
fn test_exact_multiple_yields_exact_cells() {
    let grid = TileGrid::new(rect(0.0, 0.0, 2000.0, 1000.0), 1000.0).unwrap();
    assert_eq!(grid.cols(), 2);
    assert_eq!(grid.rows(), 1);
    assert_eq!(grid.len(), 2);
}

#[test]
fn test_partial_cells_extend_past_high_side() {
    let grid = TileGrid::new(rect(100.0, 200.0, 1150.0, 250.0), 1000.0).unwrap();
    assert_eq!(grid.cols(), 2);
    assert_eq!(grid.rows(), 1);

    let last = grid.cells().last().unwrap();
    assert_eq!(last.rect.max().x, 2100.0);
    assert_eq!(last.rect.max().y, 1200.0);
}

#[test]
fn test_degenerate_bounds_yield_one_cell() {
    let grid = TileGrid::new(rect(5.0, 5.0, 5.0, 5.0), 1000.0).unwrap();
    assert_eq!(grid.len(), 1);

    let cell = grid.cells().next().unwrap();
    assert_eq!(cell.rect.min(), coord! { x: 5.0, y: 5.0 });
}

#[test]
fn test_zero_width_bounds_yield_column() {
    let grid = TileGrid::new(rect(0.0, 0.0, 0.0, 2500.0), 1000.0).unwrap();
    assert_eq!(grid.cols(), 1);
    assert_eq!(grid.rows(), 3);
}

#[test]
fn test_no_bounds_yields_empty_grid() {
    let grid = TileGrid::covering(None, 1000.0).unwrap();
    assert!(grid.is_empty());
    assert_eq!(grid.cells().count(), 0);
}

#[test]
fn test_invalid_cell_size() {
    for size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let result = TileGrid::new(rect(0.0, 0.0, 1.0, 1.0), size);
        assert!(matches!(result, Err(GridError::InvalidCellSize(_))));
    }
    assert!(TileGrid::covering(None, 0.0).is_err());
}

#[test]
fn test_non_finite_bounds_rejected() {
    let result = TileGrid::new(rect(0.0, 0.0, f64::INFINITY, 1.0), 10.0);
    assert!(matches!(result, Err(GridError::InvalidBounds { .. })));
}

#[test]
fn test_cells_are_column_major() {
    let grid = TileGrid::new(rect(0.0, 0.0, 20.0, 20.0), 10.0).unwrap();
    let order: Vec<(u32, u32)> = grid.cells().map(|c| (c.col, c.row)).collect();
    assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
}

#[test]
fn test_iterator_is_restartable() {
    let grid = TileGrid::new(rect(0.0, 0.0, 30.0, 30.0), 10.0).unwrap();
    let mut first = grid.cells();
    first.next();
    let resumed = first.clone();

    assert_eq!(first.len(), 8);
    assert_eq!(resumed.count(), 8);
    assert_eq!(grid.cells().count(), 9);
    assert_eq!((&grid).into_iter().count(), 9);
}

#[test]
fn test_cell_touches() {
    let grid = TileGrid::new(rect(0.0, 0.0, 10.0, 10.0), 10.0).unwrap();
    let cell = grid.cell(0, 0);
    assert!(cell.touches(&rect(5.0, 5.0, 15.0, 15.0)));
    assert!(cell.touches(&rect(10.0, 0.0, 20.0, 10.0)));
    assert!(!cell.touches(&rect(10.5, 0.0, 20.0, 10.0)));
}

proptest! {
    /// Property: every point of the bounding box lies inside some cell.
    #[test]
    fn prop_cells_cover_bounds(
        xmin in -10_000.0f64..10_000.0,
        ymin in -10_000.0f64..10_000.0,
        width in 0.0f64..5_000.0,
        height in 0.0f64..5_000.0,
        cell_size in 1.0f64..2_000.0,
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
    ) {
        let bounds = rect(xmin, ymin, xmin + width, ymin + height);
        let grid = TileGrid::new(bounds, cell_size).unwrap();
        let point = coord! { x: xmin + fx * width, y: ymin + fy * height };

        let covered = grid.cells().any(|cell| {
            let (min, max) = (cell.rect.min(), cell.rect.max());
            let eps = 1e-6;
            point.x >= min.x - eps
                && point.x <= max.x + eps
                && point.y >= min.y - eps
                && point.y <= max.y + eps
        });
        prop_assert!(covered);
        prop_assert_eq!(grid.cells().count(), grid.len());
    }
}
