//! Numeric types a program can be evaluated in.

use num_traits::Float;
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Floating-point type usable as the value type of a compiled program.
///
/// Arithmetic and the math builtins come from [`Float`]; literal parsing
/// comes from [`FromStr`]. `max`/`min` follow [`Float::max`] and
/// [`Float::min`], so a NaN operand yields the other operand.
pub trait Numeric: Float + FromStr + Debug + Display + Send + Sync + 'static {
    /// Scale a post-shift LFSR register into this type's range.
    ///
    /// Floating-point types map the register onto `[0, 1]` by dividing by
    /// `0xFFFF`.
    fn from_lfsr(state: u16) -> Self;
}

impl Numeric for f32 {
    fn from_lfsr(state: u16) -> f32 {
        f32::from(state) / f32::from(u16::MAX)
    }
}

impl Numeric for f64 {
    fn from_lfsr(state: u16) -> f64 {
        f64::from(state) / f64::from(u16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfsr_scaling_bounds() {
        assert_eq!(f64::from_lfsr(0), 0.0);
        assert_eq!(f64::from_lfsr(0xFFFF), 1.0);
        assert_eq!(f32::from_lfsr(0xFFFF), 1.0);
    }

    #[test]
    fn test_lfsr_scaling_midpoint() {
        let v = f64::from_lfsr(0xE270);
        assert!((v - 0.884_534_981_307_698_1).abs() < 1e-12);
    }
}
