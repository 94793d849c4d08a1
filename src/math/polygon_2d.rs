use super::{Point2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Rotates a closed polygon so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output for tests.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Canonical form of a closed polygon: counter-clockwise, starting at its
/// leftmost-bottom vertex. Two polygons tracing the same boundary in
/// either direction have equal canonical forms.
#[must_use]
pub fn canonical_polygon(points: &[Point2]) -> Vec<Point2> {
    let mut ccw = points.to_vec();
    if signed_area(&ccw) < 0.0 {
        ccw.reverse();
    }
    rotate_to_canonical_start(&ccw)
}

/// Clips a polygon against a convex counter-clockwise polygon
/// (Sutherland-Hodgman).
#[must_use]
pub fn clip_convex(subject: &[Point2], convex: &[Point2]) -> Vec<Point2> {
    let mut output = subject.to_vec();
    let n = convex.len();
    for i in 0..n {
        if output.is_empty() {
            break;
        }
        let a = convex[i];
        let b = convex[(i + 1) % n];
        let edge = b - a;
        let side = |p: &Point2| edge.x * (p.y - a.y) - edge.y * (p.x - a.x);

        let input = std::mem::take(&mut output);
        let mut prev = input[input.len() - 1];
        for &cur in &input {
            let (sp, sc) = (side(&prev), side(&cur));
            if sc >= 0.0 {
                if sp < 0.0 {
                    output.push(prev + (cur - prev) * (sp / (sp - sc)));
                }
                output.push(cur);
            } else if sp >= 0.0 {
                output.push(prev + (cur - prev) * (sp / (sp - sc)));
            }
            prev = cur;
        }
    }
    output
}
