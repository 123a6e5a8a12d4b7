//! Simulation strategy and state types.
//!
//! The restaurant is parameterized by a [`SimulationStrategy`] that determines
//! how time advances. Both strategies run the same phase pipeline; they differ
//! only in how many frames are run per `advance()` call.

use crate::fixed::{Fixed64, Ticks};

// ---------------------------------------------------------------------------
// Simulation strategy
// ---------------------------------------------------------------------------

/// How the restaurant advances time. Chosen at construction.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum SimulationStrategy {
    /// Exactly one frame per `advance()` call, regardless of `dt`.
    /// Deterministic by construction.
    Tick,

    /// Real-time mode. The host calls `advance(dt)` with elapsed seconds;
    /// time accumulates and as many fixed frames run as fit, carrying the
    /// remainder forward.
    Delta {
        /// Length of one simulation frame, in seconds.
        fixed_timestep: Fixed64,
    },
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable simulation state tracked by the restaurant.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SimState {
    /// Frame counter. Incremented by 1 for each step.
    pub tick: Ticks,

    /// Total simulated seconds.
    pub elapsed: Fixed64,

    /// Unconsumed seconds in delta mode.
    pub accumulator: Fixed64,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Advance result
// ---------------------------------------------------------------------------

/// Result of a `Restaurant::advance()` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceResult {
    /// Number of frames actually executed.
    pub steps_run: u64,
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A deterministic hash of simulation state for replay checks.
///
/// Uses FNV-1a (64-bit) for speed and simplicity. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_fixed64(&mut self, v: Fixed64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_state_starts_at_zero() {
        let state = SimState::new();
        assert_eq!(state.tick, 0);
        assert_eq!(state.elapsed, Fixed64::ZERO);
        assert_eq!(state.accumulator, Fixed64::ZERO);
    }

    #[test]
    fn state_hash_order_matters() {
        let mut h1 = StateHash::new();
        h1.write_u32(1);
        h1.write_u32(2);

        let mut h2 = StateHash::new();
        h2.write_u32(2);
        h2.write_u32(1);

        assert_ne!(h1.finish(), h2.finish());
    }

    #[test]
    fn state_hash_sees_fixed_bits() {
        let mut h1 = StateHash::new();
        h1.write_fixed64(Fixed64::from_num(0.25));
        let mut h2 = StateHash::new();
        h2.write_fixed64(Fixed64::from_num(0.5));
        assert_ne!(h1.finish(), h2.finish());
    }
}
