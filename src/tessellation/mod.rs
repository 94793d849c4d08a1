//! Drawing sinks for clipped boundaries.
//!
//! Assembly reports its result as a sequence of path commands, in the shape
//! of a 2D canvas API. [`PathRecorder`] keeps the commands and flattens them
//! into polygons for measurement.

use crate::math::arc_2d::{arc_subdivision_count, arc_sweep, flatten_arc};
use crate::math::polygon_2d::signed_area;
use crate::math::{Point2, Vector2};

/// Rule deciding which regions enclosed by the subpaths are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    /// Filled where the winding number is nonzero.
    NonZero,
    /// Filled where the winding number is odd.
    EvenOdd,
}

/// Receiver of path drawing commands.
pub trait PathSink {
    /// Starts a new subpath at `p`.
    fn move_to(&mut self, p: Point2);

    /// Adds a straight segment to `p`.
    fn line_to(&mut self, p: Point2);

    /// Adds a circular arc, with an implicit segment from the current point
    /// to the arc start.
    ///
    /// Angles are in radians as returned by `atan2`; `counterclockwise`
    /// sweeps towards increasing angle.
    fn arc(&mut self, center: Point2, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool);

    /// Fills the subpaths drawn so far.
    fn fill(&mut self, rule: FillRule);

    /// Strokes the subpaths drawn so far.
    fn stroke(&mut self);
}

/// A recorded drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point2),
    LineTo(Point2),
    Arc {
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    },
    Fill(FillRule),
    Stroke,
}

/// Parameters controlling tessellation quality.
#[derive(Debug, Clone, Copy)]
pub struct TessellationParams {
    /// Maximum allowed deviation from the true geometry.
    pub tolerance: f64,
    /// Minimum number of segments for curves.
    pub min_segments: usize,
    /// Maximum number of segments for curves.
    pub max_segments: usize,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            min_segments: 4,
            max_segments: 256,
        }
    }
}

impl TessellationParams {
    /// Sets the maximum deviation of a flattened arc from the circle.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the segment count bounds for a flattened arc.
    #[must_use]
    pub fn with_segments(mut self, min_segments: usize, max_segments: usize) -> Self {
        self.min_segments = min_segments;
        self.max_segments = max_segments;
        self
    }
}

/// A sink that records every command it receives.
#[derive(Debug, Clone, Default)]
pub struct PathRecorder {
    commands: Vec<PathCommand>,
}

impl PathRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded commands in order.
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Returns the number of subpaths started.
    #[must_use]
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }

    /// Flattens the recorded subpaths into closed polygons, one per
    /// `move_to`. Arcs are replaced by chords within `params.tolerance`.
    #[must_use]
    pub fn to_polygons(&self, params: &TessellationParams) -> Vec<Vec<Point2>> {
        let mut polygons: Vec<Vec<Point2>> = Vec::new();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => polygons.push(vec![p]),
                PathCommand::LineTo(p) => {
                    if let Some(current) = polygons.last_mut() {
                        current.push(p);
                    }
                }
                PathCommand::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                    counterclockwise,
                } => {
                    let sweep = arc_sweep(start_angle, end_angle, counterclockwise);
                    let segments = arc_subdivision_count(
                        radius,
                        sweep.abs(),
                        params.tolerance,
                        params.min_segments,
                        params.max_segments,
                    );
                    let start = Point2::new(
                        center.x + radius * start_angle.cos(),
                        center.y + radius * start_angle.sin(),
                    );
                    let arc = flatten_arc(&center, radius, start_angle, sweep, segments);
                    match polygons.last_mut() {
                        Some(current) => {
                            current.push(start);
                            current.extend(arc);
                        }
                        None => {
                            let mut current = vec![start];
                            current.extend(arc);
                            polygons.push(current);
                        }
                    }
                }
                PathCommand::Fill(_) | PathCommand::Stroke => {}
            }
        }
        polygons
    }

    /// Even-odd filled area of the recorded subpaths, assuming they do not
    /// overlap one another except by nesting.
    #[must_use]
    pub fn area(&self, params: &TessellationParams) -> f64 {
        let mut polygons: Vec<(f64, Vec<Point2>)> = self
            .to_polygons(params)
            .into_iter()
            .map(|p| (signed_area(&p).abs(), p))
            .collect();
        // Nesting depth decides the sign: holes subtract.
        polygons.sort_by(|a, b| b.0.total_cmp(&a.0));
        let mut total = 0.0;
        for (i, (area, polygon)) in polygons.iter().enumerate() {
            let Some(probe) = interior_probe(polygon) else {
                continue;
            };
            let depth = polygons[..i]
                .iter()
                .filter(|(_, outer)| contains(outer, &probe))
                .count();
            if depth % 2 == 0 {
                total += area;
            } else {
                total -= area;
            }
        }
        total
    }
}

impl PathSink for PathRecorder {
    fn move_to(&mut self, p: Point2) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    fn line_to(&mut self, p: Point2) {
        self.commands.push(PathCommand::LineTo(p));
    }

    fn arc(&mut self, center: Point2, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool) {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            counterclockwise,
        });
    }

    fn fill(&mut self, rule: FillRule) {
        self.commands.push(PathCommand::Fill(rule));
    }

    fn stroke(&mut self) {
        self.commands.push(PathCommand::Stroke);
    }
}

/// A point just inside `polygon`, next to the midpoint of its first edge
/// of nonzero length.
fn interior_probe(polygon: &[Point2]) -> Option<Point2> {
    let n = polygon.len();
    if n < 3 {
        return None;
    }
    let orientation = signed_area(polygon).signum();
    (0..n).find_map(|i| {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let edge = b - a;
        let len = edge.norm();
        if len == 0.0 {
            return None;
        }
        // Left normal points inward on a counter-clockwise polygon.
        let inward = Vector2::new(-edge.y, edge.x) * (orientation / len);
        Some(nalgebra::center(&a, &b) + inward * (len * 1e-6))
    })
}

/// Even-odd point-in-polygon test.
fn contains(polygon: &[Point2], p: &Point2) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn fine() -> TessellationParams {
        TessellationParams::default().with_tolerance(1e-7).with_segments(4, 100_000)
    }

    fn square(recorder: &mut PathRecorder, h: f64) {
        recorder.move_to(Point2::new(-h, -h));
        recorder.line_to(Point2::new(h, -h));
        recorder.line_to(Point2::new(h, h));
        recorder.line_to(Point2::new(-h, h));
    }

    #[test]
    fn records_commands_in_order() {
        let mut recorder = PathRecorder::new();
        recorder.move_to(Point2::new(1.0, 0.0));
        recorder.arc(Point2::origin(), 1.0, 0.0, PI, true);
        recorder.fill(FillRule::EvenOdd);
        recorder.stroke();
        assert_eq!(recorder.commands().len(), 4);
        assert_eq!(recorder.commands()[0], PathCommand::MoveTo(Point2::new(1.0, 0.0)));
        assert_eq!(recorder.commands()[2], PathCommand::Fill(FillRule::EvenOdd));
        assert_eq!(recorder.commands()[3], PathCommand::Stroke);
        assert_eq!(recorder.subpath_count(), 1);
    }

    #[test]
    fn full_circle_area() {
        let mut recorder = PathRecorder::new();
        recorder.move_to(Point2::new(1.0, 0.0));
        recorder.arc(Point2::origin(), 1.0, 0.0, TAU, true);
        assert_abs_diff_eq!(recorder.area(&fine()), PI, epsilon = 1e-5);
    }

    #[test]
    fn half_disc_clockwise_arc() {
        // Upper half disc drawn along the diameter then back clockwise.
        let mut recorder = PathRecorder::new();
        recorder.move_to(Point2::new(-1.0, 0.0));
        recorder.line_to(Point2::new(1.0, 0.0));
        recorder.arc(Point2::origin(), 1.0, 0.0, PI, true);
        assert_abs_diff_eq!(recorder.area(&fine()), FRAC_PI_2, epsilon = 1e-5);

        let mut reversed = PathRecorder::new();
        reversed.move_to(Point2::new(1.0, 0.0));
        reversed.line_to(Point2::new(-1.0, 0.0));
        reversed.arc(Point2::origin(), 1.0, PI, 0.0, false);
        let polygons = reversed.to_polygons(&fine());
        assert!(signed_area(&polygons[0]) < 0.0);
        assert_abs_diff_eq!(reversed.area(&fine()), FRAC_PI_2, epsilon = 1e-5);
    }

    #[test]
    fn nested_subpaths_subtract() {
        let mut recorder = PathRecorder::new();
        square(&mut recorder, 2.0);
        square(&mut recorder, 1.0);
        assert_abs_diff_eq!(recorder.area(&fine()), 12.0, epsilon = 1e-12);
    }

    #[test]
    fn arc_without_move_starts_polygon() {
        let mut recorder = PathRecorder::new();
        recorder.arc(Point2::origin(), 2.0, 0.0, TAU, true);
        let polygons = recorder.to_polygons(&TessellationParams::default());
        assert_eq!(polygons.len(), 1);
        assert_abs_diff_eq!(polygons[0][0].x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn coarse_params_bound_segments() {
        let mut recorder = PathRecorder::new();
        recorder.move_to(Point2::new(1.0, 0.0));
        recorder.arc(Point2::origin(), 1.0, 0.0, TAU, true);
        let params = TessellationParams::default().with_segments(4, 8);
        let polygons = recorder.to_polygons(&params);
        // Move point, arc start and eight chord ends.
        assert_eq!(polygons[0].len(), 10);
    }
}
