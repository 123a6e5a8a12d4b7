//! Throughput rate model.
//!
//! Pure functions from a level to an interval, a capacity or a price. Every
//! station, machine, actor and table gets its live numbers from here; nothing
//! else in the crate evaluates a rate formula. Levels that divide are clamped
//! to at least 1.

use crate::fixed::{Fixed64, div_round_half_even, pow_scaled, round_half_even};

fn level_divisor(level: u32) -> Fixed64 {
    Fixed64::from_num(level.max(1))
}

// ---------------------------------------------------------------------------
// Intervals and capacities
// ---------------------------------------------------------------------------

/// `base / L`
pub fn production_interval(base: Fixed64, level: u32) -> Fixed64 {
    base / level_divisor(level)
}

/// `base * L`
pub fn production_capacity(base: u32, level: u32) -> u32 {
    base.saturating_mul(level.max(1))
}

/// `base / L`
pub fn serve_interval(base: Fixed64, level: u32) -> Fixed64 {
    base / level_divisor(level)
}

/// `max(base * 3 - L, floor)`. Unclamped, the formula reaches zero and goes
/// negative at high levels, which would spawn a consumer every frame.
pub fn spawn_interval(base: Fixed64, level: u32, floor: Fixed64) -> Fixed64 {
    let raw = base.saturating_mul(Fixed64::from_num(3)) - Fixed64::from_num(level);
    raw.max(floor)
}

/// `base + step * L`
pub fn stack_capacity(base: u32, step: u32, level: u32) -> u32 {
    base.saturating_add(step.saturating_mul(level))
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// `round(round(base * growth^L) / unit) * unit`, both roundings half-to-even.
pub fn price(base: Fixed64, growth: Fixed64, level: u32, rounding_unit: u32) -> u64 {
    let unit = rounding_unit.max(1);
    let raw = round_half_even(pow_scaled(base, growth, level)).max(0);
    let steps = div_round_half_even(i128::from(raw), i128::from(unit));
    steps as u64 * u64::from(unit)
}

/// Money minted per unit sold: `round(base * growth^profit)`.
pub fn sell_price(base: Fixed64, growth: Fixed64, profit_level: u32) -> u32 {
    round_half_even(pow_scaled(base, growth, profit_level)).clamp(0, i64::from(u32::MAX)) as u32
}

/// An exponential price curve rounded to a clean denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCurve {
    pub base: Fixed64,
    pub growth: Fixed64,
    pub rounding_unit: u32,
}

impl PriceCurve {
    pub fn at(&self, level: u32) -> u64 {
        price(self.base, self.growth, level, self.rounding_unit)
    }
}

// ---------------------------------------------------------------------------
// Actors and tables
// ---------------------------------------------------------------------------

/// `base + step * L`, for how many units an actor carries.
pub fn carry_capacity(base: u32, step: u32, level: u32) -> u32 {
    stack_capacity(base, step, level)
}

/// `base + step * L`, walking speed in units per second.
pub fn walk_speed(base: Fixed64, step: Fixed64, level: u32) -> Fixed64 {
    base + step * Fixed64::from_num(level)
}

/// Seconds a full table needs to finish eating:
/// `max(base - (L - 1), 1) * seats`.
pub fn eat_time(base: Fixed64, level: u32, seats: u32) -> Fixed64 {
    let per_seat = (base - Fixed64::from_num(level.max(1) - 1)).max(Fixed64::from_num(1));
    per_seat * Fixed64::from_num(seats.max(1))
}

/// `base + step * (L - 1)`, capped at 1.
pub fn tip_chance(base: Fixed64, step: Fixed64, level: u32) -> Fixed64 {
    (base + step * Fixed64::from_num(level.max(1) - 1)).min(Fixed64::from_num(1))
}

/// Half-open range of tip amounts: `[low, high + profit)`.
pub fn tip_range(low: u32, high: u32, profit_level: u32) -> (u32, u32) {
    (low, high.saturating_add(profit_level).max(low + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(v: f64) -> Fixed64 {
        Fixed64::from_num(v)
    }

    #[test]
    fn production_interval_divides() {
        assert_eq!(production_interval(fx(1.5), 1), fx(1.5));
        assert_eq!(production_interval(fx(1.5), 3), fx(0.5));
        assert_eq!(production_interval(fx(1.5), 0), fx(1.5));
    }

    #[test]
    fn capacities_scale() {
        assert_eq!(production_capacity(6, 2), 12);
        assert_eq!(stack_capacity(30, 5, 2), 40);
        assert_eq!(carry_capacity(5, 3, 0), 5);
    }

    #[test]
    fn spawn_interval_is_clamped() {
        let floor = fx(0.25);
        assert_eq!(spawn_interval(fx(1.5), 1, floor), fx(3.5));
        assert_eq!(spawn_interval(fx(1.5), 4, floor), fx(0.5));
        assert_eq!(spawn_interval(fx(1.5), 5, floor), floor);
        assert_eq!(spawn_interval(fx(1.5), 50, floor), floor);
    }

    #[test]
    fn upgrade_prices_match_game_table() {
        let prices: Vec<_> = (0..4).map(|l| price(fx(250.0), fx(1.5), l, 50)).collect();
        assert_eq!(prices, vec![250, 400, 550, 850]);
    }

    #[test]
    fn unlock_prices_round_to_five() {
        assert_eq!(price(fx(75.0), fx(1.1), 0, 5), 75);
        assert_eq!(price(fx(75.0), fx(1.1), 1, 5), 80);
        assert_eq!(price(fx(75.0), fx(1.1), 5, 5) % 5, 0);
    }

    #[test]
    fn small_bases_round_down_to_zero() {
        assert_eq!(price(fx(5.0), fx(1.5), 2, 50), 0);
        assert_eq!(price(fx(5.0), fx(1.5), 3, 50), 0);
    }

    #[test]
    fn sell_price_grows_with_profit() {
        assert_eq!(sell_price(fx(5.0), fx(1.25), 0), 5);
        assert_eq!(sell_price(fx(5.0), fx(1.25), 1), 6);
        assert_eq!(sell_price(fx(15.0), fx(1.25), 2), 23);
    }

    #[test]
    fn seating_rates() {
        assert_eq!(eat_time(fx(5.0), 1, 2), fx(10.0));
        assert_eq!(eat_time(fx(5.0), 3, 2), fx(6.0));
        assert_eq!(eat_time(fx(5.0), 20, 2), fx(2.0));
        assert_eq!(tip_chance(fx(0.4), fx(0.1), 1), fx(0.4));
        assert_eq!(tip_chance(fx(0.4), fx(0.1), 30), fx(1.0));
        assert_eq!(tip_range(2, 5, 3), (2, 8));
    }

    #[test]
    fn walk_speed_steps() {
        assert_eq!(walk_speed(fx(3.0), fx(0.25), 2), fx(3.5));
    }
}
