use std::f64::consts::TAU;

use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::math::Point2;
use crate::tessellation::{FillRule, PathSink};
use crate::topology::{ClipStore, Crossing, CrossingId, PartKind, Tally};

use super::group::{group_crossings, representative};
use super::intersect::Clip;
use super::link::link_outer_edges;
use super::rotation::{build_rotations, RotationSystem};
use super::trace::trace_boundary;
use super::winding::{paths_with_crossings, tangent_signs, winding_number};
use super::ClipOptions;

/// Joins the parts of a clip into the clipped boundary and draws it.
///
/// Closed rings produce closed subpaths made of inside ring runs and circle
/// arcs, filled with the even-odd rule and then stroked. Open rings produce
/// one stroked polyline per part.
#[derive(Debug)]
pub struct AssembleClip<'c, 'a> {
    clip: &'c Clip<'a>,
    options: ClipOptions,
}

impl<'c, 'a> AssembleClip<'c, 'a> {
    /// Creates a new assembly operation.
    #[must_use]
    pub fn new(clip: &'c Clip<'a>, options: ClipOptions) -> Self {
        Self { clip, options }
    }

    /// Executes the assembly, drawing to `sink`.
    ///
    /// The clip itself is left untouched; circle arcs and their placeholders
    /// live in the returned [`Assembly`].
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if the parts do not form a consistent
    /// boundary. Degenerate inputs never fail.
    pub fn execute(&self, sink: &mut impl PathSink) -> Result<Assembly> {
        let clip = self.clip;
        let mut store = clip.store.clone();
        let mut crossings = collect_crossings(clip)?;
        let mut system = RotationSystem::default();

        if !clip.closed {
            crossings.sort_by(|a, b| angle_of(&store, *a).total_cmp(&angle_of(&store, *b)));
            let subpath_count = stroke_open(clip, &store, sink)?;
            debug!(
                crossings = crossings.len(),
                subpaths = subpath_count,
                "assembled open polylines"
            );
            return Ok(Assembly {
                store,
                crossings,
                representatives: Vec::new(),
                system,
                initial_parity: false,
                arc_count: 0,
                subpath_count,
            });
        }

        let reps = group_crossings(&store, &mut crossings, &mut system.links, self.options.angle_epsilon)?;
        for &id in &crossings {
            system.tally.insert(id, Tally::default());
        }
        build_rotations(clip, &mut store, &reps, &mut system)?;

        let paths = paths_with_crossings(clip, |id| {
            Ok(store.crossing(representative(&system.links, id))?.position)
        })?;
        let center = *clip.circle.center();
        let radius = clip.circle.radius();
        let probe = match reps.first() {
            Some(&first) => store.crossing(first)?.position,
            None => Point2::new(center.x + radius, center.y),
        };
        let (edge_sign_x, edge_sign_y) = tangent_signs(&probe, &center);
        let initial_parity = winding_number(&paths, &probe, edge_sign_x, edge_sign_y, &center) & 1 == 1;

        let arc_count = link_outer_edges(&mut store, &reps, &mut system, initial_parity)?;
        let mut subpath_count = trace_boundary(clip, &store, &reps, &mut system, sink)?;
        subpath_count += emit_whole_rings(clip, &store, sink)?;

        if reps.is_empty() && initial_parity && !clip.circle.is_empty() {
            sink.move_to(probe);
            sink.arc(center, radius, 0.0, TAU, true);
            subpath_count += 1;
        }

        if subpath_count > 0 {
            sink.fill(FillRule::EvenOdd);
            sink.stroke();
        }

        debug!(
            crossings = crossings.len(),
            groups = reps.len(),
            arcs = arc_count,
            initial_parity,
            subpaths = subpath_count,
            "assembled clipped boundary"
        );

        Ok(Assembly {
            store,
            crossings,
            representatives: reps,
            system,
            initial_parity,
            arc_count,
            subpath_count,
        })
    }
}

/// Every crossing bounding a part, in ring order.
fn collect_crossings(clip: &Clip<'_>) -> Result<Vec<CrossingId>> {
    let mut crossings = Vec::with_capacity(clip.store.crossing_count());
    for &id in clip.parts_by_ring.iter().flatten() {
        let part = clip.store.part(id)?;
        crossings.extend(part.enter);
        crossings.extend(part.exit);
    }
    Ok(crossings)
}

fn angle_of(store: &ClipStore, id: CrossingId) -> f64 {
    store.crossing(id).map_or(f64::NAN, |c| c.angle)
}

/// Draws the closed rings that lie wholly inside the circle.
fn emit_whole_rings(clip: &Clip<'_>, store: &ClipStore, sink: &mut impl PathSink) -> Result<usize> {
    let mut count = 0;
    for (ring, parts) in clip.rings.iter().zip(&clip.parts_by_ring) {
        for &id in parts {
            if !store.part(id)?.is_whole_ring() {
                continue;
            }
            let Some((first, rest)) = ring.split_first() else {
                continue;
            };
            sink.move_to(*first);
            for &p in rest {
                sink.line_to(p);
            }
            count += 1;
        }
    }
    Ok(count)
}

/// Strokes each part of open rings from its start to its end.
fn stroke_open(clip: &Clip<'_>, store: &ClipStore, sink: &mut impl PathSink) -> Result<usize> {
    let mut count = 0;
    for (ring, parts) in clip.rings.iter().zip(&clip.parts_by_ring) {
        for &id in parts {
            let part = store.part(id)?;
            let PartKind::Polyline {
                first, after_last, ..
            } = part.kind
            else {
                continue;
            };
            let run = ring
                .get(first..after_last)
                .ok_or_else(|| TopologyError::InvalidTopology("open part outside its ring".into()))?;

            let mut points = Vec::with_capacity(run.len() + 2);
            if let Some(enter) = part.enter {
                points.push(store.crossing(enter)?.position);
            }
            points.extend_from_slice(run);
            if let Some(exit) = part.exit {
                points.push(store.crossing(exit)?.position);
            }

            if let [start, rest @ ..] = points.as_slice() {
                if rest.is_empty() {
                    continue;
                }
                sink.move_to(*start);
                for &p in rest {
                    sink.line_to(p);
                }
                count += 1;
            }
        }
    }
    if count > 0 {
        sink.stroke();
    }
    Ok(count)
}

/// The crossings and rotation system left by an assembly, kept for
/// inspection.
#[derive(Debug, Clone)]
pub struct Assembly {
    store: ClipStore,
    crossings: Vec<CrossingId>,
    representatives: Vec<CrossingId>,
    system: RotationSystem,
    initial_parity: bool,
    arc_count: usize,
    subpath_count: usize,
}

impl Assembly {
    /// Returns the store, including circle arcs and their placeholders.
    #[must_use]
    pub fn store(&self) -> &ClipStore {
        &self.store
    }

    /// Returns the ring crossings sorted by pseudo-angle.
    #[must_use]
    pub fn crossings(&self) -> &[CrossingId] {
        &self.crossings
    }

    /// Returns the group representatives in angle order.
    #[must_use]
    pub fn representatives(&self) -> &[CrossingId] {
        &self.representatives
    }

    /// Returns a crossing by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the crossing does not exist.
    pub fn crossing(&self, id: CrossingId) -> Result<&Crossing> {
        Ok(self.store.crossing(id)?)
    }

    /// Returns the representative of the group holding `id`.
    #[must_use]
    pub fn group_of(&self, id: CrossingId) -> CrossingId {
        representative(&self.system.links, id)
    }

    /// Returns the crossings merged into a representative, itself included.
    #[must_use]
    pub fn overlaps(&self, rep: CrossingId) -> &[CrossingId] {
        self.system
            .links
            .get(rep)
            .map(|l| l.overlaps.as_slice())
            .unwrap_or_default()
    }

    /// Returns the rotation list around a representative, starting at its
    /// outer edge.
    #[must_use]
    pub fn rotation(&self, rep: CrossingId) -> Vec<CrossingId> {
        self.system.rotation(rep)
    }

    /// Returns the traversal bookkeeping of a crossing or placeholder.
    #[must_use]
    pub fn tally(&self, id: CrossingId) -> Option<Tally> {
        self.system.tally.get(id).copied()
    }

    /// Whether the circle just clockwise of the first representative lies
    /// inside the rings; for a clip without crossings, whether the whole
    /// circle does.
    #[must_use]
    pub fn initial_parity(&self) -> bool {
        self.initial_parity
    }

    /// Returns the number of circle arcs created.
    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.arc_count
    }

    /// Returns the number of subpaths drawn.
    #[must_use]
    pub fn subpath_count(&self) -> usize {
        self.subpath_count
    }
}
