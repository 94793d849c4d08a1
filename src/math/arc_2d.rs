//! 2D circular arc utilities.
//!
//! Arcs are given by a center, a radius, start and end angles in radians
//! (as returned by `atan2`) and a direction flag. `counterclockwise = true`
//! sweeps towards increasing angle.

use std::f64::consts::TAU;

use super::Point2;

/// Signed sweep of an arc from `start` to `end` in the given direction.
///
/// The result lies in `[0, 2PI]` for counterclockwise arcs and in
/// `[-2PI, 0]` for clockwise ones. A difference of at least a full turn in
/// the travel direction yields a full turn; otherwise the sweep is the
/// angular distance travelled to reach `end`.
#[must_use]
pub fn arc_sweep(start: f64, end: f64, counterclockwise: bool) -> f64 {
    let delta = end - start;
    if counterclockwise {
        if delta >= TAU {
            TAU
        } else {
            delta.rem_euclid(TAU)
        }
    } else if delta <= -TAU {
        -TAU
    } else {
        -(-delta).rem_euclid(TAU)
    }
}

/// Evaluates a point on an arc at parameter `t` in `[0, 1]`.
#[must_use]
pub fn arc_point_at(center: &Point2, radius: f64, start_angle: f64, sweep: f64, t: f64) -> Point2 {
    let angle = start_angle + sweep * t;
    Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Number of chords needed so that the sagitta of each chord stays within
/// `tolerance`, clamped to `[min_segments, max_segments]`.
#[must_use]
pub fn arc_subdivision_count(
    radius: f64,
    abs_sweep: f64,
    tolerance: f64,
    min_segments: usize,
    max_segments: usize,
) -> usize {
    if radius <= tolerance || abs_sweep <= 0.0 {
        return min_segments.max(1);
    }
    // Sagitta s = r * (1 - cos(theta / 2)) for a chord spanning theta.
    let max_step = 2.0 * (1.0 - tolerance / radius).acos();
    if max_step <= 0.0 || max_step.is_nan() {
        return max_segments.max(1);
    }
    let n = (abs_sweep / max_step).ceil();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = n as usize;
    n.clamp(min_segments.max(1), max_segments.max(1))
}

/// Flattens an arc into points, excluding the start point and including
/// the end point.
#[must_use]
pub fn flatten_arc(center: &Point2, radius: f64, start_angle: f64, sweep: f64, segments: usize) -> Vec<Point2> {
    #[allow(clippy::cast_precision_loss)]
    let step = 1.0 / segments as f64;
    (1..=segments)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 * step;
            arc_point_at(center, radius, start_angle, sweep, t)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOL: f64 = 1e-10;

    #[test]
    fn quarter_turn_both_directions() {
        assert_abs_diff_eq!(arc_sweep(0.0, FRAC_PI_2, true), FRAC_PI_2, epsilon = TOL);
        assert_abs_diff_eq!(arc_sweep(0.0, FRAC_PI_2, false), FRAC_PI_2 - TAU, epsilon = TOL);
        assert_abs_diff_eq!(arc_sweep(FRAC_PI_2, 0.0, false), -FRAC_PI_2, epsilon = TOL);
    }

    #[test]
    fn sweep_across_the_seam() {
        // From just below -x counterclockwise to just above it is a short hop
        // the long way round.
        let start = 0.9 * PI;
        let end = -0.9 * PI;
        assert_abs_diff_eq!(arc_sweep(start, end, true), 0.2 * PI, epsilon = TOL);
        assert_abs_diff_eq!(arc_sweep(start, end, false), -1.8 * PI, epsilon = TOL);
    }

    #[test]
    fn full_turns() {
        assert_abs_diff_eq!(arc_sweep(0.0, TAU, true), TAU, epsilon = TOL);
        assert_abs_diff_eq!(arc_sweep(PI, -PI, false), -TAU, epsilon = TOL);
        assert_abs_diff_eq!(arc_sweep(1.0, 1.0, true), 0.0, epsilon = TOL);
    }

    #[test]
    fn point_on_arc() {
        let c = Point2::new(1.0, 2.0);
        let p = arc_point_at(&c, 2.0, 0.0, PI, 0.5);
        assert_abs_diff_eq!(p.x, 1.0, epsilon = TOL);
        assert_abs_diff_eq!(p.y, 4.0, epsilon = TOL);
    }

    #[test]
    fn subdivision_respects_tolerance_and_bounds() {
        let n = arc_subdivision_count(1.0, TAU, 0.01, 4, 256);
        let step = TAU / n as f64;
        assert!(1.0 - (step / 2.0).cos() <= 0.01 + TOL);
        assert!(n >= 4);

        assert_eq!(arc_subdivision_count(1.0, 1e-6, 0.01, 4, 256), 4);
        assert_eq!(arc_subdivision_count(1e6, TAU, 1e-9, 4, 256), 256);
        assert_eq!(arc_subdivision_count(0.001, TAU, 0.01, 4, 256), 4);
    }

    #[test]
    fn flatten_ends_on_end_point() {
        let c = Point2::origin();
        let pts = flatten_arc(&c, 1.0, 0.0, FRAC_PI_2, 8);
        assert_eq!(pts.len(), 8);
        let last = pts.last().unwrap();
        assert_abs_diff_eq!(last.x, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(last.y, 1.0, epsilon = TOL);
        assert!(pts.iter().all(|p| ((p.x * p.x + p.y * p.y).sqrt() - 1.0).abs() < TOL));
    }
}
