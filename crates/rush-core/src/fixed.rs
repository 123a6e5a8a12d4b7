use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// All simulation time is measured in `Fixed64` seconds.
pub type Fixed64 = I32F32;

/// Frames are the atomic unit of simulation time.
pub type Ticks = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never in sim loop.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display, never in sim loop.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Round to the nearest integer, ties to even.
///
/// Prices and payouts round this way everywhere so that displayed amounts
/// match between the simulation and any front end.
pub fn round_half_even(v: Fixed64) -> i64 {
    let floor = v.floor();
    let frac = v - floor;
    let base = floor.to_num::<i64>();
    let half = Fixed64::from_num(0.5);
    if frac > half {
        base + 1
    } else if frac < half {
        base
    } else if base % 2 == 0 {
        base
    } else {
        base + 1
    }
}

/// `num / den` for non-negative integers, rounded to nearest with ties to
/// even. Returns 0 when `den` is not positive.
pub fn div_round_half_even(num: i128, den: i128) -> i128 {
    if den <= 0 {
        return 0;
    }
    let q = num.div_euclid(den);
    let twice_r = 2 * num.rem_euclid(den);
    if twice_r > den || (twice_r == den && q % 2 != 0) {
        q + 1
    } else {
        q
    }
}

/// `base * factor^exponent`, computed with repeated saturating multiplies so
/// the result is identical on every platform.
pub fn pow_scaled(base: Fixed64, factor: Fixed64, exponent: u32) -> Fixed64 {
    let mut value = base;
    for _ in 0..exponent {
        value = value.saturating_mul(factor);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_even_ties() {
        assert_eq!(round_half_even(f64_to_fixed64(7.5)), 8);
        assert_eq!(round_half_even(f64_to_fixed64(562.5)), 562);
        assert_eq!(round_half_even(f64_to_fixed64(0.5)), 0);
        assert_eq!(round_half_even(f64_to_fixed64(1.5)), 2);
    }

    #[test]
    fn round_half_even_non_ties() {
        assert_eq!(round_half_even(f64_to_fixed64(16.875)), 17);
        assert_eq!(round_half_even(f64_to_fixed64(0.34)), 0);
        assert_eq!(round_half_even(f64_to_fixed64(-1.25)), -1);
        assert_eq!(round_half_even(f64_to_fixed64(-1.75)), -2);
    }

    #[test]
    fn pow_scaled_matches_exact_powers() {
        let v = pow_scaled(f64_to_fixed64(250.0), f64_to_fixed64(1.5), 3);
        assert_eq!(fixed64_to_f64(v), 843.75);
        let same = pow_scaled(f64_to_fixed64(5.0), f64_to_fixed64(1.25), 0);
        assert_eq!(fixed64_to_f64(same), 5.0);
    }

    #[test]
    fn pow_scaled_saturates() {
        let v = pow_scaled(f64_to_fixed64(1000.0), f64_to_fixed64(10.0), 40);
        assert_eq!(v, Fixed64::MAX);
    }

    #[test]
    fn fixed64_determinism() {
        let a = f64_to_fixed64(1.0 / 60.0);
        let b = f64_to_fixed64(1.0 / 60.0);
        assert_eq!(a * f64_to_fixed64(60.0), b * f64_to_fixed64(60.0));
    }

    #[test]
    fn integer_division_rounds_ties_to_even() {
        assert_eq!(div_round_half_even(5, 2), 2);
        assert_eq!(div_round_half_even(7, 2), 4);
        assert_eq!(div_round_half_even(8, 3), 3);
        assert_eq!(div_round_half_even(7, 3), 2);
        assert_eq!(div_round_half_even(1125, 50), 22);
        assert_eq!(div_round_half_even(10, 0), 0);
    }
}
