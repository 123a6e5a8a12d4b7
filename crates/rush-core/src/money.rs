//! Money piles: where stations and tables leave payment.
//!
//! Visible money is capped; anything past the cap is only counted in
//! `hidden_amount` and goes straight into the ledger when the next collection
//! cycle starts. While the pile is tall, collection runs in bursts.

use crate::fixed::Fixed64;
use crate::item::Kind;
use crate::ledger::Ledger;
use crate::movement::Zone;
use crate::pile::{GridLayout, SourcePile};
use crate::pool::UnitPool;

/// Tuning shared by every money pile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoneyRules {
    pub max_visible: u32,
    /// Units popped per frame while bursting.
    pub collect_multiplier: u32,
    /// Visible count above which collection bursts.
    pub burst_threshold: u32,
    /// Seconds between single-unit pops outside a burst.
    pub collect_interval: Fixed64,
}

impl Default for MoneyRules {
    fn default() -> Self {
        Self {
            max_visible: 120,
            collect_multiplier: 2,
            burst_threshold: 8,
            collect_interval: Fixed64::from_num(0.03),
        }
    }
}

#[derive(Debug)]
pub struct MoneyPile {
    pile: SourcePile,
    rules: MoneyRules,
    hidden_amount: u64,
    collecting: bool,
    timer: Fixed64,
}

impl MoneyPile {
    pub fn new(rules: MoneyRules, layout: GridLayout, zone: Zone) -> Self {
        Self {
            pile: SourcePile::new(Kind::Money, layout, rules.collect_interval, zone),
            rules,
            hidden_amount: 0,
            collecting: false,
            timer: Fixed64::ZERO,
        }
    }

    pub fn zone(&self) -> Zone {
        self.pile.zone
    }

    pub fn visible(&self) -> u32 {
        self.pile.count()
    }

    pub fn hidden_amount(&self) -> u64 {
        self.hidden_amount
    }

    /// Visible plus hidden.
    pub fn total(&self) -> u64 {
        u64::from(self.visible()) + self.hidden_amount
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting
    }

    /// Add one unit of money. Past the visible cap it is only counted.
    pub fn add_money(&mut self, pool: &mut UnitPool) {
        if self.visible() < self.rules.max_visible {
            self.pile.add(pool.acquire(Kind::Money));
        } else {
            self.hidden_amount += 1;
        }
    }

    /// Units popped per collection step.
    pub fn collect_rate(&self) -> u32 {
        if self.visible() > self.rules.burst_threshold {
            self.rules.collect_multiplier
        } else {
            1
        }
    }

    /// Advance collection by one frame. Returns the money credited to the
    /// ledger this frame.
    pub fn tick_collect(
        &mut self,
        dt: Fixed64,
        collector_present: bool,
        ledger: &mut dyn Ledger,
        pool: &mut UnitPool,
    ) -> u64 {
        if !collector_present {
            self.collecting = false;
            self.timer = Fixed64::ZERO;
            return 0;
        }

        let mut credited = 0;
        if !self.collecting {
            if self.total() == 0 {
                return 0;
            }
            self.collecting = true;
            // The first unit pops on arrival.
            self.timer = self.rules.collect_interval;
            credited += std::mem::take(&mut self.hidden_amount);
        }

        let rate = self.collect_rate();
        let pops = if rate > 1 {
            rate
        } else {
            self.timer += dt;
            if self.timer >= self.rules.collect_interval {
                self.timer = Fixed64::ZERO;
                1
            } else {
                0
            }
        };
        for _ in 0..pops {
            let Some(unit) = self.pile.pop() else {
                break;
            };
            pool.release(unit);
            credited += 1;
        }

        if self.pile.is_empty() {
            self.collecting = false;
        }
        if credited > 0 {
            ledger.adjust_money(i64::try_from(credited).unwrap_or(i64::MAX));
        }
        credited
    }

    /// Return every visible unit to the pool without crediting it.
    pub fn clear(&mut self, pool: &mut UnitPool) {
        pool.release_all(self.pile.drain());
        self.hidden_amount = 0;
        self.collecting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RestaurantLedger;
    use crate::movement::Vec2;
    use crate::rate::PriceCurve;

    fn money_pile(max_visible: u32) -> MoneyPile {
        MoneyPile::new(
            MoneyRules {
                max_visible,
                ..MoneyRules::default()
            },
            GridLayout::default(),
            Zone::around(Vec2::default(), Fixed64::from_num(1)),
        )
    }

    fn ledger() -> RestaurantLedger {
        RestaurantLedger::new(
            0,
            PriceCurve {
                base: Fixed64::from_num(250),
                growth: Fixed64::from_num(1.5),
                rounding_unit: 50,
            },
        )
    }

    #[test]
    fn overflow_goes_hidden() {
        let mut pool = UnitPool::new();
        let mut pile = money_pile(3);
        for _ in 0..5 {
            pile.add_money(&mut pool);
        }
        assert_eq!(pile.visible(), 3);
        assert_eq!(pile.hidden_amount(), 2);
        assert_eq!(pool.active_count(Kind::Money), 3);
    }

    #[test]
    fn hidden_amount_reconciled_at_cycle_start() {
        let mut pool = UnitPool::new();
        let mut ledger = ledger();
        let mut pile = money_pile(3);
        for _ in 0..10 {
            pile.add_money(&mut pool);
        }
        let dt = Fixed64::from_num(0.01);
        let first = pile.tick_collect(dt, true, &mut ledger, &mut pool);
        assert_eq!(first, 8);
        assert_eq!(pile.hidden_amount(), 0);
        assert_eq!(pile.visible(), 2);
        assert_eq!(ledger.money(), 8);
    }

    #[test]
    fn tall_pile_collects_in_bursts() {
        let mut pool = UnitPool::new();
        let mut ledger = ledger();
        let mut pile = money_pile(120);
        for _ in 0..10 {
            pile.add_money(&mut pool);
        }
        assert_eq!(pile.collect_rate(), 2);
        let dt = Fixed64::from_num(0.001);
        assert_eq!(pile.tick_collect(dt, true, &mut ledger, &mut pool), 2);
        assert_eq!(pile.visible(), 8);
        assert_eq!(pile.collect_rate(), 1);
        assert_eq!(pile.tick_collect(dt, true, &mut ledger, &mut pool), 1);
        assert_eq!(pile.tick_collect(dt, true, &mut ledger, &mut pool), 0);
        assert_eq!(pile.visible(), 7);
    }

    #[test]
    fn first_unit_pops_on_arrival_then_waits_the_interval() {
        let mut pool = UnitPool::new();
        let mut ledger = ledger();
        let mut pile = money_pile(120);
        for _ in 0..3 {
            pile.add_money(&mut pool);
        }
        let dt = Fixed64::from_num(0.011);
        assert_eq!(pile.tick_collect(dt, true, &mut ledger, &mut pool), 1);
        assert_eq!(pile.tick_collect(dt, true, &mut ledger, &mut pool), 0);
        assert_eq!(pile.tick_collect(dt, true, &mut ledger, &mut pool), 0);
        assert_eq!(pile.tick_collect(dt, true, &mut ledger, &mut pool), 1);
        assert_eq!(ledger.money(), 2);
    }

    #[test]
    fn collects_everything_while_present() {
        let mut pool = UnitPool::new();
        let mut ledger = ledger();
        let mut pile = money_pile(120);
        for _ in 0..20 {
            pile.add_money(&mut pool);
        }
        let dt = Fixed64::from_num(1.0 / 60.0);
        for _ in 0..200 {
            pile.tick_collect(dt, true, &mut ledger, &mut pool);
        }
        assert_eq!(pile.visible(), 0);
        assert_eq!(ledger.money(), 20);
        assert!(!pile.is_collecting());
        assert_eq!(pool.active_count(Kind::Money), 0);
    }

    #[test]
    fn leaving_stops_collection() {
        let mut pool = UnitPool::new();
        let mut ledger = ledger();
        let mut pile = money_pile(120);
        for _ in 0..3 {
            pile.add_money(&mut pool);
        }
        let dt = Fixed64::from_num(0.05);
        pile.tick_collect(dt, true, &mut ledger, &mut pool);
        assert!(pile.is_collecting());
        assert_eq!(pile.tick_collect(dt, false, &mut ledger, &mut pool), 0);
        assert!(!pile.is_collecting());
        assert_eq!(pile.visible(), 2);
    }
}
