//! Even-odd membership of a point on the circle in the original rings.

use crate::error::Result;
use crate::math::{perp_dot_sign, Point2};
use crate::topology::{CrossingId, PartKind};

use super::intersect::Clip;

/// Signs of the symbolic offset applied to a test point on the circle.
///
/// The offset runs roughly along the clockwise tangent at `point`, so the
/// test answers for the circle just clockwise of it. Where a tangent
/// component vanishes, at the four axis points, the circle bends inwards
/// and that component points towards `center`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn tangent_signs(point: &Point2, center: &Point2) -> (f64, f64) {
    let towards = |from: f64, to: f64| if from < to { 1.0 } else { -1.0 };
    let edge_sign_x = if point.y == center.y {
        towards(point.x, center.x)
    } else if point.y < center.y {
        -1.0
    } else {
        1.0
    };
    let edge_sign_y = if point.x == center.x {
        towards(point.y, center.y)
    } else if point.x < center.x {
        1.0
    } else {
        -1.0
    };
    (edge_sign_x, edge_sign_y)
}

/// Winding number of closed paths around `point`, displaced symbolically
/// by `(edge_sign_x, edge_sign_y)`.
///
/// Uses a horizontal ray towards `+x`. A zero coordinate difference takes
/// the sign of the displacement, and a segment through `point` itself is
/// resolved against the clockwise tangent of the circle around `center`.
#[must_use]
pub fn winding_number(
    paths: &[Vec<Point2>],
    point: &Point2,
    edge_sign_x: f64,
    edge_sign_y: f64,
    center: &Point2,
) -> i64 {
    let nonzero = |v: f64, sign: f64| if v == 0.0 { -sign } else { v };
    let tangent_a = Point2::new(center.y, -center.x);
    let tangent_b = Point2::new(point.y, -point.x);

    let mut winding = 0;
    for path in paths {
        let Some(&last) = path.last() else {
            continue;
        };
        let mut p = last;
        for &p1 in path {
            let dy = nonzero(p.y - point.y, edge_sign_y);
            let dy1 = nonzero(p1.y - point.y, edge_sign_y);
            let dx = nonzero(p.x - point.x, edge_sign_x);
            let dx1 = nonzero(p1.x - point.x, edge_sign_x);

            if (dy < 0.0) != (dy1 < 0.0) && (dx >= 0.0 || dx1 > 0.0) {
                let step = if p1.y > p.y { 1 } else { -1 };
                if dx >= 0.0 && dx1 > 0.0 {
                    winding += step;
                } else {
                    let mut side = perp_dot_sign(point, &p, point, &p1);
                    if side == 0.0 {
                        side = -perp_dot_sign(&p1, &p, &tangent_a, &tangent_b);
                    }
                    if side != 0.0 && (side > 0.0) == (p1.y > p.y) {
                        winding += step;
                    }
                }
            }
            p = p1;
        }
    }
    winding
}

/// Traces every closed ring with its crossings inserted on their segments,
/// each crossing drawn at the position `resolve` gives it.
pub(crate) fn paths_with_crossings(
    clip: &Clip<'_>,
    resolve: impl Fn(CrossingId) -> Result<Point2>,
) -> Result<Vec<Vec<Point2>>> {
    let mut paths = Vec::with_capacity(clip.rings.len());

    for (ring, parts) in clip.rings.iter().zip(&clip.parts_by_ring) {
        let len = ring.len();
        if len < 2 {
            continue;
        }

        // Crossings created on the segment ending at vertex i. Enters are
        // pushed first: on a shared segment the enter comes first.
        let mut before: Vec<Vec<CrossingId>> = vec![Vec::new(); len];
        for &id in parts {
            let part = clip.store.part(id)?;
            if let (PartKind::Polyline { first, .. }, Some(enter)) = (part.kind, part.enter) {
                before[first % len].push(enter);
            }
        }
        for &id in parts {
            let part = clip.store.part(id)?;
            if let (PartKind::Polyline { after_last, .. }, Some(exit)) = (part.kind, part.exit) {
                before[after_last % len].push(exit);
            }
        }

        let mut path = Vec::with_capacity(len + parts.len() * 2);
        for (vertex, crossings) in ring.iter().zip(&before) {
            for &crossing in crossings {
                path.push(resolve(crossing)?);
            }
            path.push(*vertex);
        }
        paths.push(path);
    }

    Ok(paths)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Circle;
    use crate::operations::clip::IntersectCircle;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square(h: f64) -> Vec<Point2> {
        vec![p(-h, -h), p(h, -h), p(h, h), p(-h, h)]
    }

    #[test]
    fn square_winding_in_and_out() {
        let paths = vec![square(1.0)];
        let origin = Point2::origin();
        assert_eq!(winding_number(&paths, &p(0.2, 0.3), 1.0, -1.0, &origin), 1);
        assert_eq!(winding_number(&paths, &p(2.0, 0.3), 1.0, -1.0, &origin), 0);
        assert_eq!(winding_number(&paths, &p(-2.0, 0.3), 1.0, -1.0, &origin), 0);
    }

    #[test]
    fn clockwise_square_winds_negative() {
        let mut ring = square(1.0);
        ring.reverse();
        let paths = vec![ring];
        assert_eq!(winding_number(&paths, &p(0.0, 0.0), 1.0, -1.0, &Point2::origin()), -1);
    }

    #[test]
    fn nested_rings_sum() {
        let paths = vec![square(2.0), square(1.0)];
        let origin = Point2::origin();
        assert_eq!(winding_number(&paths, &p(0.0, 0.5), 1.0, -1.0, &origin), 2);
        assert_eq!(winding_number(&paths, &p(1.5, 0.0), 1.0, -1.0, &origin), 1);
    }

    #[test]
    fn point_on_vertex_follows_displacement() {
        // The point sits on the square's left edge; displaced to +x it is
        // inside, displaced to -x it is outside.
        let paths = vec![square(1.0)];
        let origin = Point2::origin();
        let on_edge = p(-1.0, 0.0);
        let path_with_point = vec![vec![p(-1.0, -1.0), p(1.0, -1.0), p(1.0, 1.0), p(-1.0, 1.0), on_edge]];
        assert_eq!(winding_number(&paths, &on_edge, 1.0, -1.0, &origin).abs(), 1);
        assert_eq!(winding_number(&paths, &on_edge, -1.0, -1.0, &origin), 0);
        assert_eq!(winding_number(&path_with_point, &on_edge, 1.0, -1.0, &origin).abs(), 1);
        assert_eq!(winding_number(&path_with_point, &on_edge, -1.0, 1.0, &origin), 0);
    }

    #[test]
    fn tangent_signs_follow_quadrant() {
        let c = Point2::origin();
        assert_eq!(tangent_signs(&p(1.0, 1.0), &c), (1.0, -1.0));
        assert_eq!(tangent_signs(&p(-1.0, 1.0), &c), (1.0, 1.0));
        assert_eq!(tangent_signs(&p(-1.0, -1.0), &c), (-1.0, 1.0));
        assert_eq!(tangent_signs(&p(1.0, -1.0), &c), (-1.0, -1.0));
    }

    #[test]
    fn tangent_signs_bend_inwards_on_axes() {
        let c = p(2.0, 3.0);
        // Bottom: moving left, the circle rises.
        assert_eq!(tangent_signs(&p(2.0, 2.0), &c), (-1.0, 1.0));
        // Right: moving down, the circle draws left.
        assert_eq!(tangent_signs(&p(3.0, 3.0), &c), (-1.0, -1.0));
        // Top: moving right, the circle falls.
        assert_eq!(tangent_signs(&p(2.0, 4.0), &c), (1.0, -1.0));
        // Left: moving up, the circle draws right.
        assert_eq!(tangent_signs(&p(1.0, 3.0), &c), (1.0, 1.0));
    }

    #[test]
    fn tangent_edge_at_bottom_counts_from_inside() {
        // The bottom edge of the circumscribed square touches the unit
        // circle at (0, -1); just clockwise of it lies inside the square.
        let bottom = p(0.0, -1.0);
        let paths = vec![vec![p(-1.0, -1.0), bottom, bottom, p(1.0, -1.0), p(1.0, 1.0), p(-1.0, 1.0)]];
        let origin = Point2::origin();
        let (ex, ey) = tangent_signs(&bottom, &origin);
        assert_eq!(winding_number(&paths, &bottom, ex, ey, &origin), 1);

        // A triangle hanging below the same tangency stays outside.
        let below = vec![vec![p(-2.0, -1.0), bottom, bottom, p(1.0, -1.0), p(0.0, -2.0)]];
        assert_eq!(winding_number(&below, &bottom, ex, ey, &origin), 0);
    }

    #[test]
    fn tangent_edge_at_right_counts_from_inside() {
        let right = p(1.0, 0.0);
        let paths = vec![vec![p(1.0, -1.0), right, right, p(1.0, 1.0), p(-1.0, 1.0), p(-1.0, -1.0)]];
        let origin = Point2::origin();
        let (ex, ey) = tangent_signs(&right, &origin);
        assert_eq!(winding_number(&paths, &right, ex, ey, &origin), 1);
    }

    #[test]
    fn crossings_are_inserted_on_their_segments() {
        let rings = vec![square(0.9)];
        let circle = Circle::new(Point2::origin(), 1.0).unwrap();
        let clip = IntersectCircle::new(circle, &rings, true).execute().unwrap();
        let paths = paths_with_crossings(&clip, |id| Ok(clip.store.crossing(id)?.position)).unwrap();

        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert_eq!(path.len(), 12);
        // Left edge, walked downwards into vertex 0.
        assert!((path[0].x + 0.9).abs() < 1e-12 && path[0].y > 0.0);
        assert!((path[1].x + 0.9).abs() < 1e-12 && path[1].y < 0.0);
        assert_eq!(path[2], rings[0][0]);
    }

    #[test]
    fn crossing_point_just_clockwise_is_outside_square() {
        // The left-edge exit sits on the square boundary; just clockwise of
        // it along the circle lies outside the square.
        let rings = vec![square(0.9)];
        let circle = Circle::new(Point2::origin(), 1.0).unwrap();
        let clip = IntersectCircle::new(circle, &rings, true).execute().unwrap();
        let paths = paths_with_crossings(&clip, |id| Ok(clip.store.crossing(id)?.position)).unwrap();

        let exit = paths[0][1];
        let (ex, ey) = tangent_signs(&exit, circle.center());
        assert_eq!(winding_number(&paths, &exit, ex, ey, circle.center()), 0);

        // The enter at the top of the left edge: just clockwise is still
        // outside, just counter-clockwise would be inside.
        let enter = paths[0][0];
        let (ex, ey) = tangent_signs(&enter, circle.center());
        assert_eq!(winding_number(&paths, &enter, ex, ey, circle.center()) & 1, 1);
    }
}
