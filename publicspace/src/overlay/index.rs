//! Bounding-box index over accumulated fragments.

use geo::Rect;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

type Entry = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// R-tree of fragment bounding boxes, keyed by fragment position.
///
/// Only used to narrow down which fragments can touch a cell. It never
/// decides anything on its own: callers still intersect the geometry.
#[derive(Debug, Default)]
pub struct FragmentIndex {
    tree: RTree<Entry>,
}

impl FragmentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: usize, rect: &Rect<f64>) {
        self.tree.insert(entry(position, rect));
    }

    /// Positions of fragments whose bounding box touches `rect`, ascending.
    pub fn query(&self, rect: &Rect<f64>) -> Vec<usize> {
        let envelope = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|e| e.data)
            .collect();
        hits.sort_unstable();
        hits
    }
}

fn entry(position: usize, rect: &Rect<f64>) -> Entry {
    GeomWithData::new(
        Rectangle::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
        position,
    )
}
