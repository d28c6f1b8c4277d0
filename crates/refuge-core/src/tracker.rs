//! Shelter capacity tracker.
//!
//! Owns the shelter collection and is its only mutation surface:
//!
//! - [`CapacityTracker::check_in`] reserves one spot, guarded by availability
//! - [`CapacityTracker::replace_all`] swaps in a fresh snapshot wholesale
//!
//! A refresh does not reconcile with earlier check-ins. Whichever of the two
//! runs last decides the state; callers serialize them through one owner.

use crate::error::{Error, Result};
use crate::shelter::{Shelter, ShelterId};
use std::collections::HashMap;

/// Result of a successful check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInReceipt {
    pub shelter_id: ShelterId,
    pub occupancy: u32,
    pub capacity: u32,
    pub available_spots: u32,
}

/// Aggregate figures over the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub capacity: u64,
    pub occupancy: u64,
    pub available: u64,
}

/// Tracks capacity and occupancy for a collection of shelters.
#[derive(Debug, Clone, Default)]
pub struct CapacityTracker {
    shelters: Vec<Shelter>,
    index: HashMap<ShelterId, usize>,
    generation: u64,
}

impl CapacityTracker {
    /// Create an empty tracker (generation 0, nothing loaded).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tracked collection with `shelters`.
    ///
    /// Ids missing from `shelters` stop being trackable. If an id appears twice
    /// the later entry wins, keeping the position of the first.
    pub fn replace_all(&mut self, shelters: Vec<Shelter>) {
        let mut deduped: Vec<Shelter> = Vec::with_capacity(shelters.len());
        let mut index = HashMap::with_capacity(shelters.len());

        for shelter in shelters {
            match index.get(&shelter.id) {
                Some(&pos) => deduped[pos] = shelter,
                None => {
                    index.insert(shelter.id, deduped.len());
                    deduped.push(shelter);
                }
            }
        }

        self.shelters = deduped;
        self.index = index;
        self.generation += 1;
    }

    /// Reserve one spot in shelter `id`.
    pub fn check_in(&mut self, id: ShelterId) -> Result<CheckInReceipt> {
        let pos = *self.index.get(&id).ok_or(Error::ShelterNotFound(id))?;
        let shelter = &mut self.shelters[pos];
        shelter.check_in()?;

        Ok(CheckInReceipt {
            shelter_id: id,
            occupancy: shelter.occupancy(),
            capacity: shelter.capacity(),
            available_spots: shelter.available_spots(),
        })
    }

    pub fn get(&self, id: ShelterId) -> Option<&Shelter> {
        self.index.get(&id).map(|&pos| &self.shelters[pos])
    }

    /// Shelters in the order of the last snapshot.
    pub fn shelters(&self) -> &[Shelter] {
        &self.shelters
    }

    pub fn len(&self) -> usize {
        self.shelters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shelters.is_empty()
    }

    /// Number of snapshots applied so far. Zero means nothing was ever loaded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loaded(&self) -> bool {
        self.generation > 0
    }

    pub fn totals(&self) -> Totals {
        self.shelters.iter().fold(Totals::default(), |mut t, s| {
            t.capacity += u64::from(s.capacity());
            t.occupancy += u64::from(s.occupancy());
            t.available += u64::from(s.available_spots());
            t
        })
    }
}
