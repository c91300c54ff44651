//! Tile grid type definitions

use geo::{coord, Coord, Polygon, Rect};
use thiserror::Error;

/// Default cell edge length in map units (metres in RD New).
pub const DEFAULT_CELL_SIZE: f64 = 1000.0;

/// Errors that can occur while building a tile grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Cell size is zero, negative, or not a finite number
    #[error("Invalid cell size: {0} (must be a positive, finite number)")]
    InvalidCellSize(f64),
    /// Bounding box contains a non-finite coordinate
    #[error("Invalid bounds: ({xmin}, {ymin}, {xmax}, {ymax})")]
    InvalidBounds {
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
    },
}

/// A single square cell of a [`TileGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileCell {
    /// Column index, 0 at the west edge of the grid
    pub col: u32,
    /// Row index, 0 at the south edge of the grid
    pub row: u32,
    /// Cell extent in map units
    pub rect: Rect<f64>,
}

impl TileCell {
    /// Cell outline as a polygon, for clipping.
    #[inline]
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.rect.to_polygon()
    }

    /// Returns true when the given rectangle shares any point with this cell.
    #[inline]
    pub fn touches(&self, other: &Rect<f64>) -> bool {
        let (a, b) = (self.rect, other);
        a.min().x <= b.max().x
            && b.min().x <= a.max().x
            && a.min().y <= b.max().y
            && b.min().y <= a.max().y
    }
}

/// Fixed-size tessellation of a bounding box.
///
/// Cells start at the south-west corner of the box and extend past the
/// north-east corner when the box is not a whole number of cells wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGrid {
    origin: Coord<f64>,
    cell_size: f64,
    cols: u32,
    rows: u32,
}

impl TileGrid {
    /// Build a grid covering `bounds`.
    ///
    /// A degenerate (zero width or height) box still produces one cell.
    pub fn new(bounds: Rect<f64>, cell_size: f64) -> Result<Self, GridError> {
        validate_cell_size(cell_size)?;
        let (min, max) = (bounds.min(), bounds.max());
        if ![min.x, min.y, max.x, max.y].iter().all(|v| v.is_finite()) {
            return Err(GridError::InvalidBounds {
                xmin: min.x,
                ymin: min.y,
                xmax: max.x,
                ymax: max.y,
            });
        }

        Ok(Self {
            origin: min,
            cell_size,
            cols: span_count(max.x - min.x, cell_size),
            rows: span_count(max.y - min.y, cell_size),
        })
    }

    /// Build a grid for an optional bounding box.
    ///
    /// `None` (an empty dataset) yields a grid without cells.
    pub fn covering(bounds: Option<Rect<f64>>, cell_size: f64) -> Result<Self, GridError> {
        match bounds {
            Some(rect) => Self::new(rect, cell_size),
            None => {
                validate_cell_size(cell_size)?;
                Ok(Self {
                    origin: coord! { x: 0.0, y: 0.0 },
                    cell_size,
                    cols: 0,
                    rows: 0,
                })
            }
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cell at the given column and row.
    pub fn cell(&self, col: u32, row: u32) -> TileCell {
        let min = coord! {
            x: self.origin.x + col as f64 * self.cell_size,
            y: self.origin.y + row as f64 * self.cell_size,
        };
        // Computed from the next index so neighbouring cells share edges exactly.
        let max = coord! {
            x: self.origin.x + (col + 1) as f64 * self.cell_size,
            y: self.origin.y + (row + 1) as f64 * self.cell_size,
        };
        TileCell {
            col,
            row,
            rect: Rect::new(min, max),
        }
    }

    /// Returns an iterator over all cells.
    ///
    /// Cells are yielded column by column (all rows of column 0, then column 1,
    /// etc.). The iterator is lazy and can be restarted by calling `cells()`
    /// again or cloning it.
    #[inline]
    pub fn cells(&self) -> TileCells {
        TileCells {
            grid: *self,
            current: 0,
        }
    }
}

impl IntoIterator for &TileGrid {
    type Item = TileCell;
    type IntoIter = TileCells;

    fn into_iter(self) -> Self::IntoIter {
        self.cells()
    }
}

/// Iterator over the cells of a [`TileGrid`].
#[derive(Debug, Clone)]
pub struct TileCells {
    grid: TileGrid,
    current: usize,
}

impl Iterator for TileCells {
    type Item = TileCell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.grid.len() {
            return None;
        }

        let rows = self.grid.rows as usize;
        let col = (self.current / rows) as u32;
        let row = (self.current % rows) as u32;
        self.current += 1;

        Some(self.grid.cell(col, row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileCells {
    fn len(&self) -> usize {
        self.grid.len() - self.current
    }
}

fn validate_cell_size(cell_size: f64) -> Result<(), GridError> {
    if cell_size.is_finite() && cell_size > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidCellSize(cell_size))
    }
}

/// Number of cells needed along one axis; never less than one.
fn span_count(span: f64, cell_size: f64) -> u32 {
    let count = (span / cell_size).ceil();
    if count < 1.0 {
        1
    } else if count >= u32::MAX as f64 {
        u32::MAX
    } else {
        count as u32
    }
}
