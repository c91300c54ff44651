//! Error types for overlay operations.

use thiserror::Error;

use crate::grid::GridError;

/// Errors raised while merging candidates into the classified surface.
///
/// Any of these aborts the classification run for the current AOI.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    /// A geometry could not be made valid
    #[error("Geometry repair failed for {context}: {reason}")]
    GeometryRepairFailure { context: String, reason: String },

    /// A boolean operation failed or produced unusable output
    #[error("Overlay {operation} failed for {context}: {reason}")]
    InvalidOverlayOperation {
        operation: &'static str,
        context: String,
        reason: String,
    },

    /// A feature would be appended without a justification
    #[error("Empty reason for layer '{layer}'")]
    EmptyReason { layer: String },

    /// Tile grid could not be built for the candidate bounds
    #[error(transparent)]
    Grid(#[from] GridError),
}
