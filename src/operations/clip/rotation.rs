use slotmap::SecondaryMap;
use tracing::trace;

use crate::error::{Result, TopologyError};
use crate::math::{compare_angles, Point2};
use crate::topology::{ClipStore, Crossing, CrossingId, Links, PartKind, Role, Tally};

use super::group::representative;
use super::intersect::Clip;

/// Side tables of the rotation system, keyed by crossing.
#[derive(Debug, Clone, Default)]
pub struct RotationSystem {
    /// Group, overlap and rotation-list links.
    pub links: SecondaryMap<CrossingId, Links>,
    /// Traversal bookkeeping.
    pub tally: SecondaryMap<CrossingId, Tally>,
}

impl RotationSystem {
    /// Links `a` and `b` as neighbors, `a` before `b`.
    pub fn link(&mut self, a: CrossingId, b: CrossingId) {
        if let Some(entry) = self.links.get_mut(a) {
            entry.next = Some(b);
        }
        if let Some(entry) = self.links.get_mut(b) {
            entry.prev = Some(a);
        }
    }

    /// Returns the rotation list around `rep`, starting at its outer edge.
    #[must_use]
    pub fn rotation(&self, rep: CrossingId) -> Vec<CrossingId> {
        let Some(start) = self.links.get(rep).and_then(|l| l.outer_edge) else {
            return Vec::new();
        };
        let limit = self.tally.get(rep).map_or(0, |t| t.rotation_len);
        let mut list = vec![start];
        let mut at = start;
        while let Some(next) = self.links.get(at).and_then(|l| l.next) {
            if next == start || list.len() > limit {
                break;
            }
            list.push(next);
            at = next;
        }
        list
    }
}

/// Builds the rotation list around every representative.
///
/// Each member is placed by the direction from the representative to its
/// `other` point: the inside ring vertex next to it, or for a segment
/// passing straight through the circle, the crossing at its opposite end.
/// An outward placeholder for the circle boundary joins every list.
///
/// # Errors
///
/// Returns an error if a crossing or part is missing, or a pass-through
/// part lacks its opposite crossing.
pub fn build_rotations(
    clip: &Clip<'_>,
    store: &mut ClipStore,
    reps: &[CrossingId],
    system: &mut RotationSystem,
) -> Result<()> {
    for &rep in reps {
        let rep_data = store.crossing(rep)?.clone();
        let members = system.links.get(rep).map(|l| l.overlaps.clone()).unwrap_or_default();

        let mut entries: Vec<(CrossingId, Point2)> = Vec::with_capacity(members.len() + 1);
        for &member in &members {
            let other = other_point(clip, store, &system.links, member)?;
            entries.push((member, other));
        }

        let outer = store.add_crossing(Crossing::outward(rep_data.position, rep_data.angle));
        let outward = clip.circle.outward(&rep_data.position);
        system.links.insert(
            outer,
            Links {
                group: Some(rep),
                ..Links::default()
            },
        );
        system.tally.insert(outer, Tally::default());
        entries.push((outer, outward));

        entries.sort_by(|a, b| compare_angles(&rep_data.position, &a.1, &b.1));

        for &(id, other) in &entries {
            if let Some(entry) = system.links.get_mut(id) {
                entry.other = Some(other);
            }
        }
        for (i, &(id, _)) in entries.iter().enumerate() {
            let next = entries[(i + 1) % entries.len()].0;
            system.link(id, next);
        }

        if let Some(entry) = system.links.get_mut(rep) {
            entry.outer_edge = Some(outer);
        }
        if let Some(tally) = system.tally.get_mut(rep) {
            tally.parity_count = members.len();
            tally.rotation_len = entries.len();
        }
        trace!(members = members.len(), angle = rep_data.angle, "built rotation list");
    }
    Ok(())
}

/// Point fixing the direction of `member`'s segment at its crossing.
fn other_point(
    clip: &Clip<'_>,
    store: &ClipStore,
    links: &SecondaryMap<CrossingId, Links>,
    member: CrossingId,
) -> Result<Point2> {
    let crossing = store.crossing(member)?;
    let part_id = crossing
        .part
        .ok_or_else(|| TopologyError::InvalidTopology("crossing without a part".into()))?;
    let part = store.part(part_id)?;

    let PartKind::Polyline {
        ring,
        first,
        after_last,
    } = part.kind
    else {
        return Err(TopologyError::InvalidTopology("ring crossing on a circle arc".into()).into());
    };

    if first == after_last {
        let opposite = match crossing.role {
            Role::Enter => part.exit,
            _ => part.enter,
        }
        .ok_or_else(|| TopologyError::InvalidTopology("pass-through part missing a crossing".into()))?;
        return Ok(store.crossing(representative(links, opposite))?.position);
    }

    let ring = clip
        .rings
        .get(ring)
        .ok_or(TopologyError::EntityNotFound("ring"))?;
    let len = ring.len();
    let index = match crossing.role {
        Role::Enter => first % len,
        _ => (after_last + len - 1) % len,
    };
    Ok(ring[index])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Ring};
    use crate::operations::clip::group::group_crossings;
    use crate::operations::clip::IntersectCircle;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn build(rings: &[Ring], epsilon: f64) -> (Clip<'_>, ClipStore, Vec<CrossingId>, RotationSystem) {
        let circle = Circle::new(Point2::origin(), 1.0).unwrap();
        let clip = IntersectCircle::new(circle, rings, true).execute().unwrap();
        let mut store = clip.store().clone();
        let mut system = RotationSystem::default();
        let mut sorted: Vec<CrossingId> = clip
            .parts_by_ring()
            .iter()
            .flatten()
            .flat_map(|&id| {
                let part = store.part(id).unwrap();
                [part.enter, part.exit]
            })
            .flatten()
            .collect();
        let reps = group_crossings(&store, &mut sorted, &mut system.links, epsilon).unwrap();
        for &id in &sorted {
            system.tally.insert(id, Tally::default());
        }
        build_rotations(&clip, &mut store, &reps, &mut system).unwrap();
        (clip, store, reps, system)
    }

    #[test]
    fn single_members_get_one_placeholder() {
        let rings = vec![vec![p(0.0, 0.0), p(2.0, 0.0), p(0.0, 0.5)]];
        let (_, store, reps, system) = build(&rings, 0.001);
        assert_eq!(reps.len(), 2);
        for &rep in &reps {
            let rotation = system.rotation(rep);
            assert_eq!(rotation.len(), 2);
            assert_eq!(system.tally[rep].parity_count, 1);
            assert_eq!(system.tally[rep].rotation_len, 2);
            let outer = system.links[rep].outer_edge.unwrap();
            assert_eq!(store.crossing(outer).unwrap().role, Role::Outward);
            assert_eq!(system.links[outer].group, Some(rep));
        }
    }

    #[test]
    fn other_points_are_adjacent_inside_vertices() {
        // Exit at (1, 0) came from vertex A, enter is followed by vertex C.
        let rings = vec![vec![p(0.0, 0.0), p(2.0, 0.0), p(0.0, 0.5)]];
        let (_, store, reps, system) = build(&rings, 0.001);
        for &rep in &reps {
            let crossing = store.crossing(rep).unwrap();
            let other = system.links[rep].other.unwrap();
            match crossing.role {
                Role::Exit => assert_eq!(other, p(0.0, 0.0)),
                Role::Enter => assert_eq!(other, p(0.0, 0.5)),
                Role::Outward => unreachable!(),
            }
        }
    }

    #[test]
    fn pass_through_uses_opposite_crossing() {
        let h = 0.9;
        let rings = vec![vec![p(-h, -h), p(h, -h), p(h, h), p(-h, h)]];
        let (_, store, reps, system) = build(&rings, 0.001);
        assert_eq!(reps.len(), 8);
        for &rep in &reps {
            let part = store.part(store.crossing(rep).unwrap().part.unwrap()).unwrap();
            let opposite = if part.enter == Some(rep) { part.exit } else { part.enter };
            let expected = store.crossing(opposite.unwrap()).unwrap().position;
            assert_eq!(system.links[rep].other, Some(expected));
        }
    }

    #[test]
    fn merged_group_is_sorted_clockwise() {
        // A thin notch from above dips into the circle; its two crossings
        // merge into one group.
        let rings = vec![vec![p(0.0002, 2.0), p(0.0, 0.5), p(-0.0001, 0.5), p(-0.0002, 2.0)]];
        let (_, store, reps, system) = build(&rings, 0.001);
        assert_eq!(reps.len(), 1);
        let rep = reps[0];
        assert_eq!(store.crossing(rep).unwrap().role, Role::Enter);
        assert_eq!(system.tally[rep].parity_count, 2);

        let exit = system.links[rep].overlaps[1];
        assert_eq!(store.crossing(exit).unwrap().role, Role::Exit);
        assert_eq!(system.links[rep].other, Some(p(0.0, 0.5)));
        assert_eq!(system.links[exit].other, Some(p(-0.0001, 0.5)));

        // Clockwise from straight down: the enter's segment, then the
        // exit's segment further left, then the outward normal.
        let outer = system.links[rep].outer_edge.unwrap();
        assert_eq!(system.rotation(rep), vec![outer, rep, exit]);
        for id in [outer, rep, exit] {
            let prev = system.links[id].prev.unwrap();
            assert_eq!(system.links[prev].next, Some(id));
        }
    }
}
