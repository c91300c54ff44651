//! Spatial accumulation of classified features.
//!
//! [`ClassifiedSurface`] is the heart of the engine. Rules feed it candidate
//! records one layer at a time; it appends only the parts of each candidate
//! that no earlier feature has claimed, so the first rule to claim an area
//! wins.
//!
//! Candidates are processed per [`TileCell`](crate::grid::TileCell): for each
//! cell the already-claimed area inside the cell is unioned once, and every
//! candidate piece in the cell is differenced against it. This keeps each
//! overlay operation small no matter how large the surface grows.
//!
//! All geometry passes through [`repair`] before it takes part in a set
//! operation, and every boolean operation is [`guarded`].

mod accumulator;
mod error;
mod index;
mod ops;

pub use accumulator::{AddSpec, AddStats, ClassifiedSurface, SurfaceConfig, TileStrategy};
pub use error::OverlayError;
pub use ops::{drop_slivers, guarded, repair, union_all, AREA_TOLERANCE};
