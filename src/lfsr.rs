//! 16-bit Galois LFSR backing the `rand` builtin.
//!
//! Each compiled function owns one of these; there is no shared generator.
//! Taps 15, 13, 12 and 10 (mask `0xB400`) give the maximal period of 65535.

use serde::{Deserialize, Serialize};

use crate::numeric::Numeric;

/// Seed used by [`Lfsr::default`].
pub const DEFAULT_SEED: u16 = 0xACE1;

const TAPS: u16 = 0xB400;

/// Pseudo-random generator state.
///
/// A zero state is a fixed point and produces zeros forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lfsr {
    state: u16,
}

impl Lfsr {
    pub const fn new(seed: u16) -> Self {
        Lfsr { state: seed }
    }

    /// Current register contents, suitable for saving and restoring.
    pub fn state(&self) -> u16 {
        self.state
    }

    /// Advance one step and return the post-shift register.
    #[inline]
    pub fn step(&mut self) -> u16 {
        let lsb = self.state & 1;
        self.state >>= 1;
        if lsb != 0 {
            self.state ^= TAPS;
        }
        self.state
    }

    /// Advance one step and scale the result into `T`.
    #[inline]
    pub fn next_value<T: Numeric>(&mut self) -> T {
        T::from_lfsr(self.step())
    }
}

impl Default for Lfsr {
    fn default() -> Self {
        Lfsr::new(DEFAULT_SEED)
    }
}
