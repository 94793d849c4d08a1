//! Clipping of rings against a circle.
//!
//! [`IntersectCircle`] splits rings into the runs of vertices inside the
//! circle. [`AssembleClip`] joins those runs with circle arcs into the
//! clipped boundary and draws it to a [`PathSink`].

mod assemble;
mod group;
mod intersect;
mod link;
mod rotation;
mod trace;
mod winding;

pub use assemble::{AssembleClip, Assembly};
pub use intersect::{Clip, IntersectCircle};
pub use winding::{tangent_signs, winding_number};

use crate::error::Result;
use crate::geometry::{Circle, Ring};
use crate::tessellation::PathSink;

/// Angular tolerance, in pseudo-angle units, below which crossings merge.
///
/// Chosen empirically for coordinates of moderate magnitude; very large or
/// very small inputs may need it scaled.
pub const DEFAULT_ANGLE_EPSILON: f64 = 0.001;

/// Options for assembling a clipped boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipOptions {
    /// Crossings whose pseudo-angles differ by less than this are treated
    /// as one point of the circle.
    pub angle_epsilon: f64,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            angle_epsilon: DEFAULT_ANGLE_EPSILON,
        }
    }
}

impl ClipOptions {
    /// Sets the crossing merge tolerance.
    #[must_use]
    pub fn with_angle_epsilon(mut self, angle_epsilon: f64) -> Self {
        self.angle_epsilon = angle_epsilon;
        self
    }
}

/// Clips `rings` against `circle` and draws the result to `sink`.
///
/// # Errors
///
/// Returns an error if an input coordinate is not finite, or if assembly
/// finds the parts inconsistent.
pub fn clip_circle(
    circle: Circle,
    rings: &[Ring],
    closed: bool,
    options: ClipOptions,
    sink: &mut impl PathSink,
) -> Result<Assembly> {
    let clip = IntersectCircle::new(circle, rings, closed).execute()?;
    AssembleClip::new(&clip, options).execute(sink)
}
