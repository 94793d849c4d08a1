use crate::math::Point2;

use super::CrossingId;

/// Rotation-system links of one crossing, rebuilt on every assembly.
#[derive(Debug, Clone, Default)]
pub struct Links {
    /// Representative this crossing was merged into, if not itself.
    pub group: Option<CrossingId>,
    /// For a representative: every crossing merged into it, itself included.
    pub overlaps: Vec<CrossingId>,
    /// Previous entry in the rotation list around the representative.
    pub prev: Option<CrossingId>,
    /// Next entry in the rotation list around the representative.
    pub next: Option<CrossingId>,
    /// Point whose direction from the representative orders this entry.
    pub other: Option<Point2>,
    /// For a representative: the circle boundary placeholder that the next
    /// outgoing arc attaches to.
    pub outer_edge: Option<CrossingId>,
}

/// Traversal bookkeeping of one crossing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tally {
    /// For a representative: number of ring crossings merged into it.
    pub parity_count: usize,
    /// For a representative: rotation entries carrying a part and not yet
    /// visited.
    pub count: usize,
    /// For a representative: length of its rotation list.
    pub rotation_len: usize,
    /// Whether traversal has consumed this entry.
    pub visited: bool,
}
