use crate::math::Point2;

use super::PartId;

slotmap::new_key_type! {
    /// Unique identifier for a crossing point in the clip store.
    pub struct CrossingId;
}

/// Which way the boundary passes through a crossing point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The ring moves from outside to inside the circle here.
    Enter,
    /// The ring moves from inside to outside the circle here.
    Exit,
    /// Placeholder for the circle boundary at a crossing, not yet joined
    /// to a circle arc.
    Outward,
}

/// A point on the circle where a ring, or a circle arc, starts or ends.
#[derive(Debug, Clone)]
pub struct Crossing {
    /// Position on the circle.
    pub position: Point2,
    /// Pseudo-angle around the circle center, the primary sort key.
    pub angle: f64,
    /// Direction of travel through this point.
    pub role: Role,
    /// The part this crossing bounds.
    pub part: Option<PartId>,
}

impl Crossing {
    /// Creates a crossing bounding `part`.
    #[must_use]
    pub fn new(position: Point2, angle: f64, role: Role, part: PartId) -> Self {
        Self {
            position,
            angle,
            role,
            part: Some(part),
        }
    }

    /// Creates an unattached circle boundary placeholder.
    #[must_use]
    pub fn outward(position: Point2, angle: f64) -> Self {
        Self {
            position,
            angle,
            role: Role::Outward,
            part: None,
        }
    }
}
