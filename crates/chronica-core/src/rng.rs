//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests, a scripted
//! implementation is injected.

use rand::Rng;

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Production RNG backed by the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngDice;

impl DeterministicRng for ThreadRngDice {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        rand::rng().random_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_rng_dice_stays_in_range() {
        let mut rng = ThreadRngDice;
        for _ in 0..100 {
            let value = rng.next_u32_range(1, 6);
            assert!((1..=6).contains(&value));
        }
    }
}
