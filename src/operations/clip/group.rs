use slotmap::SecondaryMap;
use tracing::trace;

use crate::error::Result;
use crate::math::angle::PSEUDO_TURN;
use crate::topology::{ClipStore, CrossingId, Links};

/// Sorts crossings by pseudo-angle and merges runs closer than `epsilon`.
///
/// Each crossing is compared with its current group representative, not
/// with its sorted neighbor, so a group never spans more than `epsilon`
/// from its representative. The last group is folded into the first when
/// they are close across the seam of the angle range.
///
/// Fills `links` with `group` and `overlaps` and returns the
/// representatives in sorted order.
///
/// # Errors
///
/// Returns an error if a crossing is missing from the store.
pub fn group_crossings(
    store: &ClipStore,
    sorted: &mut [CrossingId],
    links: &mut SecondaryMap<CrossingId, Links>,
    epsilon: f64,
) -> Result<Vec<CrossingId>> {
    let mut keyed = Vec::with_capacity(sorted.len());
    for &id in sorted.iter() {
        keyed.push((store.crossing(id)?.angle, id));
    }
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (slot, &(_, id)) in sorted.iter_mut().zip(&keyed) {
        *slot = id;
    }

    let Some(&(first_angle, first)) = keyed.first() else {
        return Ok(Vec::new());
    };

    for &(_, id) in &keyed {
        links.insert(id, Links::default());
    }

    let mut reps = vec![first];
    let mut rep = first;
    let mut rep_angle = first_angle;
    push_member(links, first, first);

    for &(angle, id) in &keyed[1..] {
        if angle - rep_angle < epsilon {
            push_member(links, rep, id);
            if let Some(entry) = links.get_mut(id) {
                entry.group = Some(rep);
            }
        } else {
            rep = id;
            rep_angle = angle;
            reps.push(id);
            push_member(links, id, id);
        }
    }

    if rep != first && first_angle + PSEUDO_TURN - rep_angle < epsilon {
        let members = links.get_mut(rep).map(|l| std::mem::take(&mut l.overlaps)).unwrap_or_default();
        for &member in &members {
            if let Some(entry) = links.get_mut(member) {
                entry.group = Some(first);
            }
            push_member(links, first, member);
        }
        reps.pop();
        trace!(merged = members.len(), "folded last crossing group into first across the seam");
    }

    Ok(reps)
}

fn push_member(links: &mut SecondaryMap<CrossingId, Links>, rep: CrossingId, member: CrossingId) {
    if let Some(entry) = links.get_mut(rep) {
        entry.overlaps.push(member);
    }
}

/// Representative of the group containing `id`.
#[must_use]
pub fn representative(links: &SecondaryMap<CrossingId, Links>, id: CrossingId) -> CrossingId {
    links.get(id).and_then(|l| l.group).unwrap_or(id)
}
