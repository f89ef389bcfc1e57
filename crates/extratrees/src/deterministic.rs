//! Deterministic utilities for reproducible training
//!
//! Provides the LCG random source and the Fisher-Yates shuffle that drive
//! row and feature subsampling. Identical seeds give identical streams on
//! every platform.

use std::num::Wrapping;

/// Linear Congruential Generator for deterministic pseudo-randomness
/// Uses the classic ANSI C / glibc `rand()` constants
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LcgRng {
    state: Wrapping<u32>,
}

impl LcgRng {
    // LCG constants (compatible with glibc)
    const MULTIPLIER: u32 = 1103515245;
    const INCREMENT: u32 = 12345;

    pub fn new(seed: u32) -> Self {
        Self {
            state: Wrapping(seed),
        }
    }

    /// Advance the generator and return the raw new state.
    ///
    /// The full 32-bit state is returned unfiltered, low-order bits included.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        self.state.0
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// Current generator state
    pub fn state(&self) -> u32 {
        self.state.0
    }
}

/// In-place Fisher-Yates permutation, front to back.
///
/// Consumes exactly `len - 1` draws; slices of length 0 or 1 are untouched
/// and consume none.
pub fn shuffle_indices<T>(indices: &mut [T], rng: &mut LcgRng) {
    let n = indices.len();
    for i in 0..n.saturating_sub(1) {
        let j = i + rng.next_range((n - i) as u32) as usize;
        indices.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_determinism() {
        let mut rng1 = LcgRng::new(42);
        let mut rng2 = LcgRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_lcg_known_values() {
        let mut rng = LcgRng::new(0);
        assert_eq!(rng.next_u32(), 12345);
        assert_eq!(
            rng.next_u32(),
            12345u32.wrapping_mul(1103515245).wrapping_add(12345)
        );
        assert_eq!(rng.state(), 12345u32.wrapping_mul(1103515245).wrapping_add(12345));
    }

    #[test]
    fn test_lcg_range() {
        let mut rng = LcgRng::new(42);
        for _ in 0..100 {
            let val = rng.next_range(10);
            assert!(val < 10);
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = LcgRng::new(7);
        let mut indices: Vec<i16> = (0..50).collect();
        shuffle_indices(&mut indices, &mut rng);

        let mut sorted = indices.clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).collect::<Vec<i16>>());
    }

    #[test]
    fn test_shuffle_draw_count() {
        let mut rng = LcgRng::new(99);
        let mut reference = rng.clone();
        let mut indices = [0i16, 1, 2, 3, 4];
        shuffle_indices(&mut indices, &mut rng);

        for _ in 0..4 {
            reference.next_u32();
        }
        assert_eq!(rng, reference);
    }

    #[test]
    fn test_shuffle_trivial_lengths() {
        let mut rng = LcgRng::new(5);
        let before = rng.clone();

        let mut empty: [i16; 0] = [];
        shuffle_indices(&mut empty, &mut rng);
        let mut single = [3i16];
        shuffle_indices(&mut single, &mut rng);

        assert_eq!(single, [3]);
        assert_eq!(rng, before);
    }
}
