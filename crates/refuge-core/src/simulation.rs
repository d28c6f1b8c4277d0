//! Simulated occupancy for running without a shelter API.
//!
//! Each tick moves every shelter's occupancy by a random step in
//! `[-MAX_STEP, MAX_STEP]`, clamped to `[0, capacity]`. Seeded, so a given
//! seed always produces the same walk.

use crate::shelter::Shelter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest change in occupancy per tick.
pub const MAX_STEP: i64 = 2;

/// Bounded random walk over shelter occupancy.
#[derive(Debug, Clone)]
pub struct OccupancySimulator {
    rng: StdRng,
}

impl OccupancySimulator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Walk every shelter one step in place.
    pub fn step(&mut self, shelters: &mut [Shelter]) {
        for shelter in shelters {
            let delta = self.rng.gen_range(-MAX_STEP..=MAX_STEP);
            shelter.clamp_occupancy(i64::from(shelter.occupancy()) + delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::mock_shelters;

    #[test]
    fn steps_are_bounded() {
        let mut sim = OccupancySimulator::new(7);
        let mut shelters = mock_shelters();

        for _ in 0..500 {
            let before: Vec<u32> = shelters.iter().map(Shelter::occupancy).collect();
            sim.step(&mut shelters);
            for (shelter, prev) in shelters.iter().zip(before) {
                let diff = (i64::from(shelter.occupancy()) - i64::from(prev)).abs();
                assert!(diff <= MAX_STEP);
                assert!(shelter.occupancy() <= shelter.capacity());
            }
        }
    }

    #[test]
    fn same_seed_same_walk() {
        let mut a = mock_shelters();
        let mut b = mock_shelters();
        OccupancySimulator::new(42).step(&mut a);
        OccupancySimulator::new(42).step(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn step_keeps_ids_and_capacity() {
        let start = mock_shelters();
        let mut next = start.clone();
        OccupancySimulator::new(1).step(&mut next);

        assert_eq!(start.len(), next.len());
        for (a, b) in start.iter().zip(&next) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.capacity(), b.capacity());
        }
    }

    #[test]
    fn zero_occupancy_never_goes_negative() {
        let mut sim = OccupancySimulator::new(3);
        let mut shelters = vec![Shelter::new(1, "empty", 5, 0).unwrap()];
        for _ in 0..100 {
            sim.step(&mut shelters);
            assert!(shelters[0].occupancy() <= 5);
        }
    }
}
