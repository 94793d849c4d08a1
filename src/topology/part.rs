use super::CrossingId;

slotmap::new_key_type! {
    /// Unique identifier for a polyline part in the clip store.
    pub struct PartId;
}

/// What a part follows between its two crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// A run of ring vertices inside the circle.
    ///
    /// `first..after_last` indexes the inside vertices, wrapping around
    /// the end of a closed ring. `first == after_last` marks a segment that
    /// passes through the circle with no vertex inside it, and
    /// `after_last == ring length` with `first == 0` marks a whole ring.
    Polyline {
        /// Index of the ring in the clipped ring set.
        ring: usize,
        /// Index of the first inside vertex.
        first: usize,
        /// Index one past the last inside vertex.
        after_last: usize,
    },
    /// An arc of the circle boundary between two crossings.
    Arc,
}

/// A piece of the clipped boundary between an enter and an exit crossing.
#[derive(Debug, Clone)]
pub struct PolylinePart {
    /// The vertex run or circle arc.
    pub kind: PartKind,
    /// Crossing where the part starts, if it starts on the circle.
    pub enter: Option<CrossingId>,
    /// Crossing where the part ends, if it ends on the circle.
    pub exit: Option<CrossingId>,
}

impl PolylinePart {
    /// Creates a part over ring vertices, not yet bounded by crossings.
    #[must_use]
    pub fn polyline(ring: usize, first: usize, after_last: usize) -> Self {
        Self {
            kind: PartKind::Polyline {
                ring,
                first,
                after_last,
            },
            enter: None,
            exit: None,
        }
    }

    /// Creates a circle arc from `enter` to `exit`.
    #[must_use]
    pub fn arc(enter: CrossingId, exit: CrossingId) -> Self {
        Self {
            kind: PartKind::Arc,
            enter: Some(enter),
            exit: Some(exit),
        }
    }

    /// Returns `true` for a circle arc.
    #[must_use]
    pub fn is_arc(&self) -> bool {
        matches!(self.kind, PartKind::Arc)
    }

    /// Returns `true` for a vertex run with no crossing at either end.
    #[must_use]
    pub fn is_whole_ring(&self) -> bool {
        !self.is_arc() && self.enter.is_none() && self.exit.is_none()
    }

    /// Sets the end of the vertex range; no effect on arcs.
    pub fn set_after_last(&mut self, value: usize) {
        if let PartKind::Polyline { after_last, .. } = &mut self.kind {
            *after_last = value;
        }
    }
}
