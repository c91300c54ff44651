//! Tile grid generation.
//!
//! Overlay operations against a large accumulated surface get expensive fast.
//! The accumulator therefore processes each candidate layer one square cell at
//! a time; this module produces those cells.
//!
//! # Example
//!
//! ```
//! use geo::{coord, Rect};
//! use publicspace::grid::TileGrid;
//!
//! let bounds = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 2500.0, y: 900.0 });
//! let grid = TileGrid::new(bounds, 1000.0).unwrap();
//!
//! assert_eq!(grid.cols(), 3);
//! assert_eq!(grid.rows(), 1);
//! assert_eq!(grid.cells().count(), 3);
//! ```

mod types;

pub use types::{GridError, TileCell, TileCells, TileGrid, DEFAULT_CELL_SIZE};

#[cfg(test)]
mod tests;
