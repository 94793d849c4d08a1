mod circle;

pub use circle::Circle;

use crate::error::{GeometryError, Result};
use crate::math::Point2;

/// An input polyline or polygon boundary.
///
/// Whether the last point connects back to the first is decided per call,
/// not per ring.
pub type Ring = Vec<Point2>;

/// Checks that every coordinate of every ring is finite.
///
/// # Errors
///
/// Returns [`GeometryError::NonFinite`] for the first NaN or infinite
/// coordinate found.
pub fn validate_rings(rings: &[Ring]) -> Result<()> {
    for pt in rings.iter().flatten() {
        for (what, value) in [("ring x coordinate", pt.x), ("ring y coordinate", pt.y)] {
            if !value.is_finite() {
                return Err(GeometryError::NonFinite { what, value }.into());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CirclipError;

    #[test]
    fn finite_rings_pass() {
        let rings = vec![vec![Point2::new(0.0, 1.0), Point2::new(-3.0, 1e300)], vec![]];
        assert!(validate_rings(&rings).is_ok());
    }

    #[test]
    fn nan_coordinate_is_rejected() {
        let rings = vec![vec![Point2::new(0.0, 1.0)], vec![Point2::new(f64::NAN, 0.0)]];
        let err = validate_rings(&rings).unwrap_err();
        assert!(matches!(
            err,
            CirclipError::Geometry(GeometryError::NonFinite { what: "ring x coordinate", .. })
        ));
    }
}
