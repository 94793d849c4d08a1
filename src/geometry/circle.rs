use crate::error::{GeometryError, Result};
use crate::math::angle::pseudo_atan2;
use crate::math::{Point2, Vector2};

/// The clipping circle.
///
/// A non-positive radius is accepted and describes an empty disc: nothing
/// lies inside it and clipping against it produces no output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point2,
    radius: f64,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if the center or radius is NaN
    /// or infinite.
    pub fn new(center: Point2, radius: f64) -> Result<Self> {
        for (what, value) in [("center x", center.x), ("center y", center.y), ("radius", radius)] {
            if !value.is_finite() {
                return Err(GeometryError::NonFinite { what, value }.into());
            }
        }
        Ok(Self { center, radius })
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns `true` if the disc has no interior.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.radius <= 0.0
    }

    /// Returns `true` if `p` lies strictly inside the circle.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        (p - self.center).norm_squared() < self.radius * self.radius
    }

    /// Returns the angle of `p` around the center in radians, as `atan2`.
    #[must_use]
    pub fn angle_at(&self, p: &Point2) -> f64 {
        (p.y - self.center.y).atan2(p.x - self.center.x)
    }

    /// Returns the pseudo-angle of `p` around the center.
    #[must_use]
    pub fn pseudo_angle_at(&self, p: &Point2) -> f64 {
        pseudo_atan2(p.y - self.center.y, p.x - self.center.x)
    }

    /// Returns the point on the circle at `angle` radians.
    #[must_use]
    pub fn point_at(&self, angle: f64) -> Point2 {
        self.center + Vector2::new(angle.cos(), angle.sin()) * self.radius
    }

    /// Reflects the center through `p`: a point on the outward normal at `p`
    /// when `p` lies on the circle.
    #[must_use]
    pub fn outward(&self, p: &Point2) -> Point2 {
        Point2::new(p.x * 2.0 - self.center.x, p.y * 2.0 - self.center.y)
    }
}
