//! Deterministic PRNG for every random decision in the restaurant.
//!
//! Uses the SplitMix64 algorithm: fast, 8 bytes of state, and trivially
//! serializable. Order sizes, chore selection, seat choice, tips and
//! leave delays all draw from one injected [`SimRng`].

use crate::fixed::Fixed64;

/// SplitMix64 pseudo-random number generator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform integer in `[low, high)`. Returns `low` when the range is empty.
    pub fn range(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        let span = u64::from(high - low);
        low + (self.next_u64() % span) as u32
    }

    /// Uniform index into a collection of `len` elements. `None` when empty.
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.next_u64() % len as u64) as usize)
    }

    /// Returns `true` with the given probability (Fixed64 in [0, 1]).
    ///
    /// - probability <= 0 always returns false
    /// - probability >= 1 always returns true
    pub fn chance(&mut self, probability: Fixed64) -> bool {
        if probability <= Fixed64::ZERO {
            return false;
        }
        if probability >= Fixed64::from_num(1) {
            return true;
        }
        // For p in (0,1) the raw Q32.32 bits are the fraction scaled to
        // [0, 2^32); compare against a uniform u32.
        let upper = self.next_u64() >> 32;
        upper < probability.to_bits() as u64
    }

    /// Get the internal state (for hashing).
    pub fn state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn range_stays_in_bounds() {
        let mut rng = SimRng::new(7);
        let mut seen = [false; 5];
        for _ in 0..500 {
            let v = rng.range(1, 6);
            assert!((1..6).contains(&v));
            seen[(v - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every order size should appear");
    }

    #[test]
    fn empty_range_returns_low() {
        let mut rng = SimRng::new(7);
        assert_eq!(rng.range(3, 3), 3);
        assert_eq!(rng.range(4, 1), 4);
    }

    #[test]
    fn pick_empty_is_none() {
        let mut rng = SimRng::new(1);
        assert_eq!(rng.pick(0), None);
        assert!(rng.pick(3).is_some_and(|i| i < 3));
    }

    #[test]
    fn chance_extremes() {
        let mut rng = SimRng::new(999);
        for _ in 0..100 {
            assert!(!rng.chance(Fixed64::ZERO));
            assert!(rng.chance(Fixed64::from_num(1)));
        }
    }

    #[test]
    fn chance_half_roughly_balanced() {
        let mut rng = SimRng::new(12345);
        let half = Fixed64::from_num(0.5);
        let hits = (0..10_000).filter(|_| rng.chance(half)).count();
        assert!((4000..=6000).contains(&hits), "expected ~5000, got {hits}");
    }

    #[test]
    fn serialization_round_trip() {
        let mut rng = SimRng::new(42);
        for _ in 0..50 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: SimRng = serde_json::from_str(&json).unwrap();
        for _ in 0..10 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
