//! Exact-sign 2D orientation predicate.
//!
//! [`perp_dot_sign`] evaluates the determinant of two difference vectors
//! through a filter cascade: plain `f64`, an error-bounded two-product
//! refinement, and finally exact expansion arithmetic for the rare inputs
//! whose coordinate differences are themselves inexact.

use std::cmp::Ordering;

use super::expansion::{
    cross_product, estimate, expansion_sign, expansion_sum, two_product_lo, two_sum_lo,
    two_two_sum, EPSILON,
};
use super::Point2;

/// Relative error bound of the naive determinant when the matrix entries
/// are rounded differences.
const PERP_ERR_BOUND_1: f64 = (EPSILON * 16.0 + 3.0) * EPSILON;

/// Relative error bound of the error-free determinant of rounded
/// differences.
const PERP_ERR_BOUND_2: f64 = (EPSILON * 12.0 + 2.0) * EPSILON;

/// Orientation of an ordered pair of directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The second direction is counter-clockwise from the first.
    CounterClockwise,
    /// The second direction is clockwise from the first.
    Clockwise,
    /// The directions are parallel or antiparallel (or degenerate).
    Collinear,
}

impl Orientation {
    /// Classifies a value returned by [`perp_dot_sign`].
    #[must_use]
    pub fn from_sign(sign: f64) -> Self {
        if sign > 0.0 {
            Self::CounterClockwise
        } else if sign < 0.0 {
            Self::Clockwise
        } else {
            Self::Collinear
        }
    }
}

/// Sign of the perp dot product `(a2 - a1) x (b2 - b1)`.
///
/// The returned value is an approximation of the determinant whose sign
/// always matches the exact result, and which is exactly zero iff the
/// exact determinant is zero. Its magnitude carries no other meaning.
#[must_use]
pub fn perp_dot_sign(a1: &Point2, a2: &Point2, b1: &Point2, b2: &Point2) -> f64 {
    let adx = a2.x - a1.x;
    let ady = a2.y - a1.y;
    let bdx = b2.x - b1.x;
    let bdy = b2.y - b1.y;

    let axby = adx * bdy;
    let aybx = ady * bdx;
    let determinant = axby - aybx;

    // Diagonal products of different signs (or a zero one) cannot cancel.
    if axby == 0.0 || aybx == 0.0 || (axby > 0.0) != (aybx > 0.0) {
        return determinant;
    }

    let det_sum = (axby + aybx).abs();
    if determinant.abs() >= det_sum * PERP_ERR_BOUND_1 {
        return determinant;
    }

    let axby_lo = two_product_lo(adx, bdy, axby);
    let aybx_lo = two_product_lo(ady, bdx, aybx);
    let sum = two_two_sum(axby, axby_lo, -aybx, -aybx_lo);
    let determinant = estimate(&sum);

    let differences_exact = two_sum_lo(a2.x, -a1.x, adx) == 0.0
        && two_sum_lo(a2.y, -a1.y, ady) == 0.0
        && two_sum_lo(b2.x, -b1.x, bdx) == 0.0
        && two_sum_lo(b2.y, -b1.y, bdy) == 0.0;

    if differences_exact || determinant.abs() >= det_sum * PERP_ERR_BOUND_2 {
        return determinant;
    }

    expansion_sign(&perp_dot_exact(a1, a2, b1, b2))
}

/// Exact expansion of `(a2 - a1) x (b2 - b1)`, expanded into products of
/// the raw coordinates so that no difference is ever rounded.
#[must_use]
pub fn perp_dot_exact(a1: &Point2, a2: &Point2, b1: &Point2, b2: &Point2) -> Vec<f64> {
    // a2x * (b2y - b1y) - a1x * (b2y - b1y)
    let x_terms = expansion_sum(
        &cross_product(a2.x, a2.x, b1.y, b2.y),
        &cross_product(a1.x, a1.x, b2.y, b1.y),
    );
    // -(a2y * (b2x - b1x) - a1y * (b2x - b1x))
    let y_terms = expansion_sum(
        &cross_product(a2.y, a2.y, b2.x, b1.x),
        &cross_product(a1.y, a1.y, b1.x, b2.x),
    );
    expansion_sum(&x_terms, &y_terms)
}

/// Orientation of `c` relative to the directed line from `a` to `b`.
#[must_use]
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> Orientation {
    Orientation::from_sign(perp_dot_sign(a, b, a, c))
}

/// Maps a value returned by [`perp_dot_sign`] to an [`Ordering`].
#[must_use]
pub fn sign_ordering(sign: f64) -> Ordering {
    sign.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
}
