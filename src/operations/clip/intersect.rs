use tracing::debug;

use crate::error::Result;
use crate::geometry::{validate_rings, Circle, Ring};
use crate::math::{pseudo_atan2, Point2, Vector2};
use crate::topology::{ClipStore, Crossing, CrossingId, PartId, PartKind, PolylinePart, Role};

/// Splits rings into the runs of vertices inside a circle.
///
/// Every ring segment with at least one end outside the circle is tested
/// against it. Each run of inside vertices becomes a part bounded by an
/// enter crossing and an exit crossing; a segment passing through the
/// circle gives a part with no vertices. A ring lying wholly inside gives
/// one part with no crossings, and a ring wholly outside gives none.
#[derive(Debug)]
pub struct IntersectCircle<'a> {
    circle: Circle,
    rings: &'a [Ring],
    closed: bool,
}

impl<'a> IntersectCircle<'a> {
    /// Creates a new intersection operation.
    ///
    /// With `closed` set, every ring's last point connects back to its first.
    #[must_use]
    pub fn new(circle: Circle, rings: &'a [Ring], closed: bool) -> Self {
        Self {
            circle,
            rings,
            closed,
        }
    }

    /// Executes the scan.
    ///
    /// # Errors
    ///
    /// Returns an error if a ring coordinate is not finite.
    pub fn execute(&self) -> Result<Clip<'a>> {
        validate_rings(self.rings)?;

        let mut store = ClipStore::new();
        let mut parts_by_ring = Vec::with_capacity(self.rings.len());

        for (index, ring) in self.rings.iter().enumerate() {
            let parts = if ring.len() < 2 || self.circle.is_empty() {
                Vec::new()
            } else {
                self.scan_ring(&mut store, index, ring)?
            };
            parts_by_ring.push(parts);
        }

        let clip = Clip {
            circle: self.circle,
            rings: self.rings,
            closed: self.closed,
            store,
            parts_by_ring,
        };
        debug!(
            rings = self.rings.len(),
            parts = clip.part_count(),
            crossings = clip.store.crossing_count(),
            closed = self.closed,
            "intersected rings with circle"
        );
        Ok(clip)
    }

    fn scan_ring(&self, store: &mut ClipStore, ring_index: usize, ring: &[Point2]) -> Result<Vec<PartId>> {
        let len = ring.len();
        let center = self.circle.center();
        let r2 = self.circle.radius() * self.circle.radius();

        // Closed rings visit the last point first so that the wrapping
        // segment is scanned.
        let (start, rest) = if self.closed { (len - 1, 0..len) } else { (0, 1..len) };

        let mut parts = Vec::new();
        // Low two bits: whether the current and previous points are inside.
        // Bit 3 marks that no previous point exists yet, for one iteration.
        let mut inside: u8 = 4;
        let mut prev = ring[start];
        let mut current: Option<PartId> = None;
        let mut leading: Option<PartId> = None;

        for pos in std::iter::once(start).chain(rest) {
            let pt = ring[pos];
            let c = pt - center;
            inside = ((inside << 1) | u8::from(c.norm_squared() < r2)) & 0b1011;

            if inside < 3 {
                let seg = prev - pt;
                let d = seg.norm_squared();
                let area = seg.x * c.y - seg.y * c.x;
                let discriminant = r2 * d - area * area;

                if d > 0.0 && discriminant >= 0.0 {
                    let dot = seg.dot(&c);
                    let delta = discriminant.sqrt();
                    let mut entered = false;

                    if inside & 2 == 0 {
                        let t = (dot - delta) / d;
                        if inside & 1 != 0 || (-1.0..=0.0).contains(&t) {
                            let part = store.add_part(PolylinePart::polyline(ring_index, pos, pos));
                            let enter = add_crossing(store, &pt, &c, &seg, t, Role::Enter, part);
                            store.part_mut(part)?.enter = Some(enter);
                            parts.push(part);
                            current = Some(part);
                            entered = true;
                        }
                    }

                    if inside & 1 == 0 && (inside & 2 != 0 || entered) {
                        let mut u = (dot + delta) / d;
                        if inside & 2 == 0 {
                            // The enter root may sit on an endpoint; keep
                            // the paired exit on the segment.
                            u = u.clamp(-1.0, 0.0);
                        }

                        let part = match current.or(leading) {
                            Some(part) => part,
                            None => {
                                let part = store.add_part(PolylinePart::polyline(ring_index, 0, pos));
                                leading = Some(part);
                                if !self.closed {
                                    parts.push(part);
                                }
                                part
                            }
                        };

                        let exit = add_crossing(store, &pt, &c, &seg, u, Role::Exit, part);
                        let data = store.part_mut(part)?;
                        data.exit = Some(exit);
                        data.set_after_last(pos);
                    }
                }
            }
            prev = pt;
        }

        match (current, leading) {
            (None, None) => {
                if inside & 3 != 0 {
                    parts.push(store.add_part(PolylinePart::polyline(ring_index, 0, len)));
                }
            }
            (None, Some(lead)) if self.closed => {
                // An exit with no enter anywhere on a closed ring: nothing to
                // pair it with.
                if let Some(exit) = store.remove_part(lead).and_then(|p| p.exit) {
                    store.remove_crossing(exit);
                }
            }
            (Some(last), Some(lead)) if self.closed => {
                // The run through the ring's start point wraps around: join
                // the leading exit onto the last part.
                if let Some(lead) = store.remove_part(lead) {
                    if let (Some(exit), PartKind::Polyline { after_last, .. }) = (lead.exit, lead.kind) {
                        store.crossing_mut(exit)?.part = Some(last);
                        let data = store.part_mut(last)?;
                        data.exit = Some(exit);
                        data.set_after_last(after_last);
                    }
                }
            }
            (Some(last), _) if !self.closed => {
                let data = store.part_mut(last)?;
                if data.exit.is_none() {
                    data.set_after_last(len);
                }
            }
            _ => {}
        }

        Ok(parts)
    }
}

/// Adds the crossing at `pt - t * seg`, where `c` is `pt` relative to the
/// circle center.
fn add_crossing(
    store: &mut ClipStore,
    pt: &Point2,
    c: &Vector2,
    seg: &Vector2,
    t: f64,
    role: Role,
    part: PartId,
) -> CrossingId {
    let offset = seg * t;
    let position = pt - offset;
    let angle = pseudo_atan2(c.y - offset.y, c.x - offset.x);
    store.add_crossing(Crossing::new(position, angle, role, part))
}

/// The parts of a set of rings clipped by a circle.
#[derive(Debug, Clone)]
pub struct Clip<'a> {
    pub(crate) circle: Circle,
    pub(crate) rings: &'a [Ring],
    pub(crate) closed: bool,
    pub(crate) store: ClipStore,
    pub(crate) parts_by_ring: Vec<Vec<PartId>>,
}

impl<'a> Clip<'a> {
    /// Returns the clipping circle.
    #[must_use]
    pub fn circle(&self) -> &Circle {
        &self.circle
    }

    /// Returns the clipped rings.
    #[must_use]
    pub fn rings(&self) -> &'a [Ring] {
        self.rings
    }

    /// Returns whether the rings were treated as closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the store owning the parts and crossings.
    #[must_use]
    pub fn store(&self) -> &ClipStore {
        &self.store
    }

    /// Returns the parts of each ring, in ring order.
    #[must_use]
    pub fn parts_by_ring(&self) -> &[Vec<PartId>] {
        &self.parts_by_ring
    }

    /// Returns the total number of parts over all rings.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts_by_ring.iter().map(Vec::len).sum()
    }

    /// Returns the number of crossings over all rings.
    #[must_use]
    pub fn crossing_count(&self) -> usize {
        self.store.crossing_count()
    }
}
