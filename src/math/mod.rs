pub mod angle;
pub mod arc_2d;
pub mod expansion;
pub mod orient;
pub mod polygon_2d;

pub use angle::{compare_angles, pseudo_atan2};
pub use orient::{perp_dot_sign, Orientation};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
