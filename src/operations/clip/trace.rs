use std::f64::consts::TAU;

use tracing::trace;

use crate::error::{Result, TopologyError};
use crate::tessellation::PathSink;
use crate::topology::{ClipStore, CrossingId, PartKind, Role};

use super::group::representative;
use super::intersect::Clip;
use super::rotation::RotationSystem;

/// Walks the linked parts into closed subpaths drawn to `sink`.
///
/// A subpath starts at the first unvisited rotation entry. Leaving an enter
/// crossing follows its part forwards, leaving an exit follows it
/// backwards. On arrival at a group with entries left, the walk turns to
/// the next unvisited entry of the rotation list; a subpath closes once its
/// group runs out.
///
/// Returns the number of subpaths drawn.
///
/// # Errors
///
/// Returns [`TopologyError::RotationExhausted`] if a group claims entries
/// left but its rotation list has none unvisited, or
/// [`TopologyError::InvalidTopology`] if an entry lacks the part it leaves
/// by.
pub fn trace_boundary(
    clip: &Clip<'_>,
    store: &ClipStore,
    reps: &[CrossingId],
    system: &mut RotationSystem,
    sink: &mut impl PathSink,
) -> Result<usize> {
    let mut subpaths = 0;
    // Entries only ever become visited, so the scan never moves back.
    let order: Vec<CrossingId> = reps.iter().flat_map(|&rep| system.rotation(rep)).collect();
    let mut cursor = 0;

    while let Some(start) = next_start(&order, &mut cursor, system) {
        sink.move_to(store.crossing(start)?.position);
        let mut at = start;
        loop {
            visit(system, at);
            let arrival = emit_part(clip, store, system, at, sink)?;
            visit(system, arrival);

            let rep = representative(&system.links, arrival);
            let remaining = system.tally.get(rep).map_or(0, |t| t.count);
            if remaining == 0 {
                break;
            }
            at = next_unvisited(store, system, rep, arrival, remaining)?;
        }
        subpaths += 1;
    }

    trace!(subpaths, "traced clipped boundary");
    Ok(subpaths)
}

/// First unvisited entry at or after `cursor` in the representatives'
/// rotation lists, taken in angle order.
fn next_start(order: &[CrossingId], cursor: &mut usize, system: &RotationSystem) -> Option<CrossingId> {
    while let Some(&id) = order.get(*cursor) {
        if system.tally.get(id).is_some_and(|t| !t.visited) {
            return Some(id);
        }
        *cursor += 1;
    }
    None
}

fn visit(system: &mut RotationSystem, id: CrossingId) {
    if let Some(tally) = system.tally.get_mut(id) {
        tally.visited = true;
    }
    let rep = representative(&system.links, id);
    if let Some(tally) = system.tally.get_mut(rep) {
        tally.count = tally.count.saturating_sub(1);
    }
}

fn next_unvisited(
    store: &ClipStore,
    system: &RotationSystem,
    rep: CrossingId,
    arrival: CrossingId,
    remaining: usize,
) -> Result<CrossingId> {
    let limit = system.tally.get(rep).map_or(0, |t| t.rotation_len);
    let mut at = arrival;
    for _ in 0..limit {
        let Some(next) = system.links.get(at).and_then(|l| l.next) else {
            break;
        };
        if system.tally.get(next).is_some_and(|t| !t.visited) {
            return Ok(next);
        }
        at = next;
    }

    let position = store.crossing(rep)?.position;
    Err(TopologyError::RotationExhausted {
        x: position.x,
        y: position.y,
        remaining,
    }
    .into())
}

/// Draws the part leaving `from` and returns the crossing it arrives at.
fn emit_part(
    clip: &Clip<'_>,
    store: &ClipStore,
    system: &RotationSystem,
    from: CrossingId,
    sink: &mut impl PathSink,
) -> Result<CrossingId> {
    let crossing = store.crossing(from)?;
    let forward = match crossing.role {
        Role::Enter => true,
        Role::Exit => false,
        Role::Outward => {
            return Err(TopologyError::InvalidTopology("traversal left through a bare outer edge".into()).into());
        }
    };
    let part = store.part(
        crossing
            .part
            .ok_or_else(|| TopologyError::InvalidTopology("crossing without a part".into()))?,
    )?;
    let arrival = if forward { part.exit } else { part.enter }
        .ok_or_else(|| TopologyError::InvalidTopology("part missing its far crossing".into()))?;
    let end = store.crossing(arrival)?.position;

    match part.kind {
        PartKind::Polyline {
            ring,
            first,
            after_last,
        } => {
            let ring = clip
                .rings
                .get(ring)
                .ok_or(TopologyError::EntityNotFound("ring"))?;
            let len = ring.len();
            let (first, after_last) = (first % len, after_last % len);
            let run = (after_last + len - first) % len;
            for k in 0..run {
                let index = if forward {
                    (first + k) % len
                } else {
                    (after_last + len - 1 - k) % len
                };
                sink.line_to(ring[index]);
            }
            sink.line_to(end);
        }
        PartKind::Arc => {
            let circle = &clip.circle;
            let start_angle = circle.angle_at(&crossing.position);
            let mut end_angle = circle.angle_at(&end);
            if representative(&system.links, from) == representative(&system.links, arrival) {
                end_angle = if forward { start_angle + TAU } else { start_angle - TAU };
            }
            sink.arc(*circle.center(), circle.radius(), start_angle, end_angle, forward);
        }
    }
    Ok(arrival)
}
