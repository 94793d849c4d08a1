pub mod crossing;
pub mod links;
pub mod part;

pub use crossing::{Crossing, CrossingId, Role};
pub use links::{Links, Tally};
pub use part::{PartId, PartKind, PolylinePart};

use crate::error::TopologyError;
use slotmap::SlotMap;

/// Arena that owns the crossings and parts of one clip.
///
/// Crossings and parts reference each other via typed IDs (generational
/// indices), so the cyclic crossing/part relations need no shared
/// ownership.
#[derive(Debug, Clone, Default)]
pub struct ClipStore {
    crossings: SlotMap<CrossingId, Crossing>,
    parts: SlotMap<PartId, PolylinePart>,
}

impl ClipStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Crossing operations ---

    /// Inserts a crossing and returns its ID.
    pub fn add_crossing(&mut self, data: Crossing) -> CrossingId {
        self.crossings.insert(data)
    }

    /// Returns a reference to the crossing, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn crossing(&self, id: CrossingId) -> Result<&Crossing, TopologyError> {
        self.crossings
            .get(id)
            .ok_or(TopologyError::EntityNotFound("crossing"))
    }

    /// Returns a mutable reference to the crossing, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn crossing_mut(&mut self, id: CrossingId) -> Result<&mut Crossing, TopologyError> {
        self.crossings
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("crossing"))
    }

    /// Removes a crossing, returning its data if it was present.
    pub fn remove_crossing(&mut self, id: CrossingId) -> Option<Crossing> {
        self.crossings.remove(id)
    }

    /// Returns the number of crossings in the store.
    #[must_use]
    pub fn crossing_count(&self) -> usize {
        self.crossings.len()
    }

    // --- Part operations ---

    /// Inserts a part and returns its ID.
    pub fn add_part(&mut self, data: PolylinePart) -> PartId {
        self.parts.insert(data)
    }

    /// Returns a reference to the part, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn part(&self, id: PartId) -> Result<&PolylinePart, TopologyError> {
        self.parts.get(id).ok_or(TopologyError::EntityNotFound("part"))
    }

    /// Returns a mutable reference to the part, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn part_mut(&mut self, id: PartId) -> Result<&mut PolylinePart, TopologyError> {
        self.parts
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("part"))
    }

    /// Removes a part, returning its data if it was present.
    pub fn remove_part(&mut self, id: PartId) -> Option<PolylinePart> {
        self.parts.remove(id)
    }

    /// Returns the number of parts in the store.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Iterates over all parts.
    pub fn parts(&self) -> impl Iterator<Item = (PartId, &PolylinePart)> {
        self.parts.iter()
    }
}
