//! Angular sort keys around a point.

use std::cmp::Ordering;

use super::orient::{perp_dot_sign, sign_ordering};
use super::Point2;

/// Width of one full turn in pseudo-angle units.
pub const PSEUDO_TURN: f64 = 8.0;

/// Largest deviation of `pseudo_atan2(y, x) * PI / 4` from `atan2(y, x)`,
/// in radians (about 4.075 degrees).
pub const PSEUDO_ATAN2_MAX_ERROR: f64 = 0.071_114_637_602_452;

/// Division-based substitute for `atan2(y, x)`, monotonic in the true angle.
///
/// Returns a value in `(-4, 4]` (rounding may reach `-4` for directions a
/// hair below `-x`): `0` along `+x`, `2` along `+y`, `4` along `-x` and
/// `-2` along `-y`. Multiplied by `PI / 4` it stays within
/// [`PSEUDO_ATAN2_MAX_ERROR`] of `atan2`. The largest error occurs near
/// `n * 90 +- 27.6` degrees.
#[must_use]
pub fn pseudo_atan2(y: f64, x: f64) -> f64 {
    let lower_left = x < -y;
    let near_x_axis = (x > y) != lower_left;

    let base = if near_x_axis {
        y / x
    } else if y == 0.0 {
        y
    } else {
        2.0 - x / y
    };

    let mut angle = base;
    if lower_left {
        angle -= 4.0;
        if y >= 0.0 {
            angle += 8.0;
        }
    }
    angle
}

/// Quadrant of `a` around `pivot`, numbered clockwise from lower left.
fn quadrant(pivot: &Point2, a: &Point2) -> u8 {
    (u8::from(a.x > pivot.x) * 3) ^ u8::from(a.y > pivot.y)
}

/// Exact comparison of the directions from `pivot` to `a` and to `b`.
///
/// Directions are ordered clockwise, starting at straight down. Quadrants
/// are compared first, and ties within a quadrant are broken by
/// [`perp_dot_sign`], so no angle is ever rounded. Directions that are
/// exactly parallel compare equal.
#[must_use]
pub fn compare_angles(pivot: &Point2, a: &Point2, b: &Point2) -> Ordering {
    quadrant(pivot, a)
        .cmp(&quadrant(pivot, b))
        .then_with(|| sign_ordering(perp_dot_sign(pivot, a, pivot, b)))
}
