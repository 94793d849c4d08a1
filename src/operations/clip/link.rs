use tracing::trace;

use crate::error::{Result, TopologyError};
use crate::topology::{ClipStore, Crossing, CrossingId, Links, PolylinePart, Role, Tally};

use super::rotation::RotationSystem;

/// Attaches circle arcs between consecutive representatives.
///
/// `initial_parity` tells whether the circle just clockwise of the first
/// representative lies inside the rings. Passing a representative flips the
/// parity once per ring crossing merged into it, and an arc joins each pair
/// of consecutive representatives wherever the parity is on.
///
/// A representative with an arc on one side gets its outer edge turned into
/// the arc's end. One with arcs on both sides gets a second placeholder
/// inserted before the outer edge, so each arc has its own slot.
///
/// Returns the number of arcs created.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidTopology`] if the parity does not come
/// back to its initial value after a full turn, or an error if a
/// representative lacks its outer edge.
pub fn link_outer_edges(
    store: &mut ClipStore,
    reps: &[CrossingId],
    system: &mut RotationSystem,
    initial_parity: bool,
) -> Result<usize> {
    let n = reps.len();

    // arc_on[i]: the arc from representative i - 1 up to i is kept.
    let mut arc_on = Vec::with_capacity(n);
    let mut parity = initial_parity;
    for &rep in reps {
        arc_on.push(parity);
        let crossings = system.tally.get(rep).map_or(0, |t| t.parity_count);
        parity ^= crossings % 2 == 1;
    }
    if parity != initial_parity {
        return Err(TopologyError::InvalidTopology("circle parity does not close after a full turn".into()).into());
    }

    // Incoming and outgoing arc slot of each representative.
    let mut slots: Vec<(Option<CrossingId>, Option<CrossingId>)> = Vec::with_capacity(n);
    for (i, &rep) in reps.iter().enumerate() {
        let outer = system
            .links
            .get(rep)
            .and_then(|l| l.outer_edge)
            .ok_or(TopologyError::EntityNotFound("outer edge"))?;

        let slot = match (arc_on[i], arc_on[(i + 1) % n]) {
            (true, true) => {
                store.crossing_mut(outer)?.role = Role::Exit;
                let second = insert_before(store, system, rep, outer)?;
                (Some(outer), Some(second))
            }
            (true, false) => {
                store.crossing_mut(outer)?.role = Role::Exit;
                (Some(outer), None)
            }
            (false, true) => {
                store.crossing_mut(outer)?.role = Role::Enter;
                (None, Some(outer))
            }
            (false, false) => {
                if let Some(tally) = system.tally.get_mut(outer) {
                    tally.visited = true;
                }
                (None, None)
            }
        };

        let attached = usize::from(slot.0.is_some()) + usize::from(slot.1.is_some());
        if let Some(tally) = system.tally.get_mut(rep) {
            tally.count = tally.parity_count + attached;
        }
        slots.push(slot);
    }

    let mut arcs = 0;
    for i in 0..n {
        if !arc_on[i] {
            continue;
        }
        if let (Some(enter), Some(exit)) = (slots[(i + n - 1) % n].1, slots[i].0) {
            let part = store.add_part(PolylinePart::arc(enter, exit));
            store.crossing_mut(enter)?.part = Some(part);
            store.crossing_mut(exit)?.part = Some(part);
            arcs += 1;
        }
    }

    trace!(representatives = n, arcs, initial_parity, "linked outer edges");
    Ok(arcs)
}

/// Adds an enter placeholder just before `outer` in the rotation list
/// around `rep`.
fn insert_before(
    store: &mut ClipStore,
    system: &mut RotationSystem,
    rep: CrossingId,
    outer: CrossingId,
) -> Result<CrossingId> {
    let data = store.crossing(outer)?.clone();
    let id = store.add_crossing(Crossing {
        role: Role::Enter,
        part: None,
        ..data
    });

    let (prev, other) = system
        .links
        .get(outer)
        .map(|l| (l.prev, l.other))
        .ok_or(TopologyError::EntityNotFound("crossing links"))?;
    system.links.insert(
        id,
        Links {
            group: Some(rep),
            other,
            ..Links::default()
        },
    );
    system.tally.insert(id, Tally::default());

    if let Some(prev) = prev {
        system.link(prev, id);
    }
    system.link(id, outer);
    if let Some(tally) = system.tally.get_mut(rep) {
        tally.rotation_len += 1;
    }
    Ok(id)
}
