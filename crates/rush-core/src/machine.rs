//! Food machines: fill their output pile up to a level-scaled capacity.

use crate::config::MachineConfig;
use crate::fixed::{Fixed64, f64_to_fixed64};
use crate::id::PileId;
use crate::item::Kind;
use crate::pile::SourcePile;
use crate::pool::UnitPool;
use crate::rate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineRates {
    pub interval: Fixed64,
    pub capacity: u32,
}

impl MachineRates {
    pub fn derive(config: &MachineConfig, unlock_level: u32) -> Self {
        Self {
            interval: rate::production_interval(f64_to_fixed64(config.base_interval), unlock_level),
            capacity: rate::production_capacity(config.base_capacity, unlock_level),
        }
    }
}

#[derive(Debug)]
pub struct FoodMachine {
    pub unlock_level: u32,
    pub pile: PileId,
    rates: MachineRates,
    timer: Fixed64,
}

impl FoodMachine {
    pub fn new(unlock_level: u32, pile: PileId, rates: MachineRates) -> Self {
        Self {
            unlock_level,
            pile,
            rates,
            timer: Fixed64::ZERO,
        }
    }

    pub fn rates(&self) -> MachineRates {
        self.rates
    }

    pub fn set_rates(&mut self, rates: MachineRates) {
        self.rates = rates;
    }

    /// Returns `true` when a unit was produced this frame.
    pub fn tick(&mut self, dt: Fixed64, pile: &mut SourcePile, pool: &mut UnitPool) -> bool {
        if self.unlock_level == 0 || pile.count() >= self.rates.capacity {
            return false;
        }
        self.timer += dt;
        if self.timer < self.rates.interval {
            return false;
        }
        self.timer = Fixed64::ZERO;
        pile.add(pool.acquire(Kind::Food));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{Vec2, Zone};
    use crate::pile::GridLayout;

    fn pile() -> SourcePile {
        SourcePile::new(
            Kind::Food,
            GridLayout::default(),
            Fixed64::from_num(0.03),
            Zone::around(Vec2::default(), Fixed64::from_num(1)),
        )
    }

    #[test]
    fn fills_to_capacity_then_stops() {
        let cfg = MachineConfig::default();
        let mut machine = FoodMachine::new(1, PileId::default(), MachineRates::derive(&cfg, 1));
        let mut out = pile();
        let mut pool = UnitPool::new();
        let dt = Fixed64::from_num(0.5);
        for _ in 0..100 {
            machine.tick(dt, &mut out, &mut pool);
        }
        assert_eq!(out.count(), 6);
    }

    #[test]
    fn higher_level_is_faster_and_bigger() {
        let cfg = MachineConfig::default();
        let l1 = MachineRates::derive(&cfg, 1);
        let l2 = MachineRates::derive(&cfg, 2);
        assert!(l2.interval < l1.interval);
        assert_eq!(l2.capacity, 12);
    }

    #[test]
    fn locked_machine_is_idle() {
        let cfg = MachineConfig::default();
        let mut machine = FoodMachine::new(0, PileId::default(), MachineRates::derive(&cfg, 0));
        let mut out = pile();
        let mut pool = UnitPool::new();
        for _ in 0..10 {
            assert!(!machine.tick(Fixed64::from_num(2), &mut out, &mut pool));
        }
        assert!(out.is_empty());
    }
}
