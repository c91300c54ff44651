//! Guarded polygon set operations.
//!
//! All boolean operations go through [`guarded`], which turns a panic inside
//! the overlay engine, or output containing non-finite coordinates, into an
//! [`OverlayError::InvalidOverlayOperation`].

use std::panic::{self, AssertUnwindSafe};

use geo::{Area, BooleanOps, CoordsIter, MultiPolygon, Polygon};

use super::error::OverlayError;

/// Parts with an area at or below this value are treated as empty.
pub const AREA_TOLERANCE: f64 = 1e-9;

/// Run a boolean operation, converting engine failures into errors.
pub fn guarded<F>(operation: &'static str, context: &str, op: F) -> Result<MultiPolygon<f64>, OverlayError>
where
    F: FnOnce() -> MultiPolygon<f64>,
{
    let result = panic::catch_unwind(AssertUnwindSafe(op)).map_err(|payload| {
        OverlayError::InvalidOverlayOperation {
            operation,
            context: context.to_string(),
            reason: panic_message(payload.as_ref()),
        }
    })?;

    if !is_finite(&result) {
        return Err(OverlayError::InvalidOverlayOperation {
            operation,
            context: context.to_string(),
            reason: "result contains non-finite coordinates".to_string(),
        });
    }
    Ok(result)
}

/// Make a geometry valid.
///
/// Every part is re-noded on its own (a union with the empty set), then the
/// parts are unioned together so overlapping parts merge instead of
/// cancelling out. Zero-area parts are dropped.
pub fn repair(geometry: &MultiPolygon<f64>, context: &str) -> Result<MultiPolygon<f64>, OverlayError> {
    if !is_finite(geometry) {
        return Err(OverlayError::GeometryRepairFailure {
            context: context.to_string(),
            reason: "geometry contains non-finite coordinates".to_string(),
        });
    }

    let empty = MultiPolygon::<f64>::new(Vec::new());
    let mut parts = Vec::with_capacity(geometry.0.len());
    for polygon in geometry {
        let renoded = guarded("repair", context, || polygon.union(&empty)).map_err(|err| {
            OverlayError::GeometryRepairFailure {
                context: context.to_string(),
                reason: err.to_string(),
            }
        })?;
        if !renoded.0.is_empty() {
            parts.push(renoded);
        }
    }

    let repaired = match parts.len() {
        0 => empty,
        1 => parts.remove(0),
        _ => union_all(parts, context).map_err(|err| OverlayError::GeometryRepairFailure {
            context: context.to_string(),
            reason: err.to_string(),
        })?,
    };
    Ok(drop_slivers(repaired))
}

/// Remove parts whose area is within [`AREA_TOLERANCE`].
pub fn drop_slivers(geometry: MultiPolygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon::new(
        geometry
            .into_iter()
            .filter(|p: &Polygon<f64>| p.unsigned_area() > AREA_TOLERANCE)
            .collect(),
    )
}

/// Union of many geometries.
///
/// Reduces pairwise in a balanced tree so intermediate results stay small.
pub fn union_all(
    geometries: impl IntoIterator<Item = MultiPolygon<f64>>,
    context: &str,
) -> Result<MultiPolygon<f64>, OverlayError> {
    let mut level: Vec<MultiPolygon<f64>> = geometries.into_iter().collect();
    if level.is_empty() {
        return Ok(MultiPolygon::new(Vec::new()));
    }

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut pending = level.into_iter();
        while let Some(a) = pending.next() {
            match pending.next() {
                Some(b) => next.push(guarded("union", context, || a.union(&b))?),
                None => next.push(a),
            }
        }
        level = next;
    }

    Ok(level.pop().unwrap_or_else(|| MultiPolygon::new(Vec::new())))
}

fn is_finite(geometry: &MultiPolygon<f64>) -> bool {
    geometry.coords_iter().all(|c| c.x.is_finite() && c.y.is_finite())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "overlay engine panicked".to_string()
    }
}
