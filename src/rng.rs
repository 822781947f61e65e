//! Multiply-with-carry pseudo-random 32-bit key source.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::Key;

/// MWC multiplier. Fixed odd constant; the generator's period depends on
/// it, so it is not configurable.
const MWC_A: u64 = 4_284_966_893;

const SEED_X1: u32 = 0x038a_caf3;
const SEED_CARRY: u32 = 0xa2cc_5886;

/// Multiply-with-carry generator: two state words plus a carry word.
/// Every draw mutates all three, so a run is reproducible from the seed
/// alone. Single-threaded by construction -- each owner gets its own
/// state, there is no shared global.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mwc {
    x0: u32,
    x1: u32,
    carry: u32,
}

impl Mwc {
    /// Seed deterministically. `x1` and the carry start from fixed
    /// constants; only `x0` varies with the seed.
    pub fn seed(seed: u32) -> Self {
        Self {
            x0: seed,
            x1: SEED_X1,
            carry: SEED_CARRY,
        }
    }

    /// Seed from the wall clock (UNIX seconds, truncated to 32 bits).
    /// Returns the chosen seed so the caller can report it and make the
    /// run reproducible.
    pub fn from_time() -> (Self, u32) {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(1);
        (Self::seed(seed), seed)
    }

    /// Draw the next 32-bit value and advance the state.
    #[inline]
    pub fn next_u32(&mut self) -> Key {
        let y = self.x0 as u64 * MWC_A + self.carry as u64;
        self.x0 = self.x1;
        self.x1 = y as u32;
        self.carry = (y >> 32) as u32;
        self.x1
    }
}

#[cfg(test)]
mod tests {
    use super::Mwc;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Mwc::seed(42);
        let mut b = Mwc::seed(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Mwc::seed(1);
        let mut b = Mwc::seed(2);
        let a_draws: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let b_draws: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(a_draws, b_draws);
    }

    #[test]
    fn first_draw_follows_the_recurrence() {
        // y = x0 * A + carry; the draw returns the low word of y.
        let mut rng = Mwc::seed(7);
        let y = 7u64 * 4_284_966_893 + 0xa2cc_5886u64;
        assert_eq!(rng.next_u32(), y as u32);
    }

    #[test]
    fn every_draw_mutates_state() {
        let mut rng = Mwc::seed(99);
        let before = rng.clone();
        rng.next_u32();
        assert_ne!(rng, before);
    }

    #[test]
    fn stream_is_not_constant() {
        let mut rng = Mwc::seed(0);
        let first = rng.next_u32();
        assert!((0..100).any(|_| rng.next_u32() != first));
    }
}
