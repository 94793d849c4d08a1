pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod tessellation;
pub mod topology;

pub use error::{CirclipError, Result};
pub use geometry::{Circle, Ring};
pub use math::{compare_angles, perp_dot_sign, pseudo_atan2, Point2};
pub use operations::clip::{clip_circle, AssembleClip, Assembly, ClipOptions, IntersectCircle};
pub use tessellation::{FillRule, PathRecorder, PathSink};
