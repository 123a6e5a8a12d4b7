//! Unlock progression.
//!
//! Fixtures are bought in a fixed order by standing in the buyer zone. Money
//! drains from the ledger in small installments; once the running total
//! reaches the price, the next fixture gains a level and the price curve
//! moves on.

use crate::fixed::{Fixed64, div_round_half_even};
use crate::id::{MachineId, SeatingId, StationId};
use crate::ledger::Ledger;
use crate::movement::Zone;
use crate::rate::PriceCurve;

/// Something that can be bought from the unlock buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unlockable {
    Station(StationId),
    Machine(MachineId),
    Seating(SeatingId),
}

#[derive(Debug, Clone)]
pub struct UnlockPlan {
    pub zone: Zone,
    order: Vec<Unlockable>,
    unlock_count: u32,
    paid: u64,
    pricing: PriceCurve,
    pay_interval: Fixed64,
    pay_duration: Fixed64,
    timer: Fixed64,
}

impl UnlockPlan {
    pub fn new(
        zone: Zone,
        order: Vec<Unlockable>,
        pricing: PriceCurve,
        pay_interval: Fixed64,
        pay_duration: Fixed64,
    ) -> Self {
        Self {
            zone,
            order,
            unlock_count: 0,
            paid: 0,
            pricing,
            pay_interval,
            pay_duration,
            timer: Fixed64::ZERO,
        }
    }

    /// Resume from persisted progress.
    pub fn with_progress(mut self, unlock_count: u32, paid: u64) -> Self {
        self.unlock_count = unlock_count;
        self.paid = paid;
        self
    }

    pub fn unlock_count(&self) -> u32 {
        self.unlock_count
    }

    pub fn paid(&self) -> u64 {
        self.paid
    }

    /// The fixture the buyer is currently selling.
    pub fn next(&self) -> Option<Unlockable> {
        self.order.get(self.unlock_count as usize).copied()
    }

    pub fn price(&self) -> u64 {
        self.pricing.at(self.unlock_count)
    }

    /// `max(1, round(min(money, price * interval / duration)))`, never more
    /// than what is still owed. Integer math on the raw fixed-point bits, so
    /// any balance the ledger can hold is safe.
    fn installment(&self, money: i64) -> u64 {
        let owed = self.price().saturating_sub(self.paid);
        let share = div_round_half_even(
            i128::from(self.price()) * i128::from(self.pay_interval.to_bits()),
            i128::from(self.pay_duration.to_bits()),
        );
        let pay = share.min(i128::from(money)).max(1);
        u64::try_from(pay).unwrap_or(u64::MAX).min(owed)
    }

    /// Pay one installment per interval while the buyer is occupied. Returns
    /// the fixture that was just paid off.
    pub fn tick_payment(
        &mut self,
        dt: Fixed64,
        buyer_present: bool,
        ledger: &mut dyn Ledger,
    ) -> Option<Unlockable> {
        if !buyer_present {
            self.timer = Fixed64::ZERO;
            return None;
        }
        let target = self.next()?;
        self.timer += dt;
        if self.timer < self.pay_interval {
            return None;
        }
        self.timer = Fixed64::ZERO;

        let money = ledger.money();
        if money > 0 && self.paid < self.price() {
            let pay = self.installment(money);
            ledger.adjust_money(-(pay as i64));
            self.paid += pay;
        }
        if self.paid < self.price() {
            return None;
        }
        self.paid = 0;
        self.unlock_count += 1;
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RestaurantLedger;
    use crate::movement::Vec2;
    use slotmap::SlotMap;

    fn plan(targets: Vec<Unlockable>) -> UnlockPlan {
        UnlockPlan::new(
            Zone::around(Vec2::default(), Fixed64::from_num(1)),
            targets,
            PriceCurve {
                base: Fixed64::from_num(75),
                growth: Fixed64::from_num(1.1),
                rounding_unit: 5,
            },
            Fixed64::from_num(0.03),
            Fixed64::from_num(3),
        )
    }

    fn ledger(money: i64) -> RestaurantLedger {
        RestaurantLedger::new(
            money,
            PriceCurve {
                base: Fixed64::from_num(250),
                growth: Fixed64::from_num(1.5),
                rounding_unit: 50,
            },
        )
    }

    fn stations(n: usize) -> Vec<Unlockable> {
        let mut map: SlotMap<StationId, ()> = SlotMap::with_key();
        (0..n).map(|_| Unlockable::Station(map.insert(()))).collect()
    }

    #[test]
    fn pays_in_installments_until_unlocked() {
        let targets = stations(2);
        let mut p = plan(targets.clone());
        let mut l = ledger(1000);
        let dt = Fixed64::from_num(0.03);
        let mut unlocked = None;
        for _ in 0..200 {
            if let Some(t) = p.tick_payment(dt, true, &mut l) {
                unlocked = Some(t);
                break;
            }
        }
        assert_eq!(unlocked, Some(targets[0]));
        assert_eq!(l.money(), 1000 - 75);
        assert_eq!(p.unlock_count(), 1);
        assert_eq!(p.price(), 80);
        assert_eq!(p.next(), Some(targets[1]));
    }

    #[test]
    fn poor_player_pays_what_they_have() {
        let mut p = plan(stations(1));
        let mut l = ledger(3);
        let dt = Fixed64::from_num(0.03);
        for _ in 0..50 {
            assert_eq!(p.tick_payment(dt, true, &mut l), None);
        }
        assert_eq!(l.money(), 0);
        assert_eq!(p.paid(), 3);
    }

    #[test]
    fn nothing_left_to_buy() {
        let mut p = plan(Vec::new());
        let mut l = ledger(1000);
        assert_eq!(p.tick_payment(Fixed64::from_num(1), true, &mut l), None);
        assert_eq!(l.money(), 1000);
    }

    #[test]
    fn leaving_resets_the_interval() {
        let mut p = plan(stations(1));
        let mut l = ledger(1000);
        let dt = Fixed64::from_num(0.02);
        p.tick_payment(dt, true, &mut l);
        p.tick_payment(dt, false, &mut l);
        p.tick_payment(dt, true, &mut l);
        assert_eq!(l.money(), 1000);
    }

    #[test]
    fn large_balances_pay_the_usual_installment() {
        let targets = stations(1);
        let mut p = plan(targets.clone());
        let mut l = ledger(3_000_000_000);
        let dt = Fixed64::from_num(0.03);
        assert_eq!(p.tick_payment(dt, true, &mut l), None);
        // 75 * 0.03 / 3.0 = 0.75, rounds to 1.
        assert_eq!(p.paid(), 1);
        assert_eq!(l.money(), 3_000_000_000 - 1);

        let mut unlocked = None;
        for _ in 0..200 {
            if let Some(t) = p.tick_payment(dt, true, &mut l) {
                unlocked = Some(t);
                break;
            }
        }
        assert_eq!(unlocked, Some(targets[0]));
        assert_eq!(l.money(), 3_000_000_000 - 75);
    }

    #[test]
    fn expensive_unlocks_never_overflow() {
        let mut p = UnlockPlan::new(
            Zone::around(Vec2::default(), Fixed64::from_num(1)),
            stations(1),
            PriceCurve {
                base: Fixed64::from_num(2_000_000_000),
                growth: Fixed64::from_num(1.5),
                rounding_unit: 5,
            },
            Fixed64::from_num(0.03),
            Fixed64::from_num(3),
        )
        .with_progress(4, 0);
        let mut l = ledger(i64::MAX);
        p.tick_payment(Fixed64::from_num(0.03), true, &mut l);
        assert!(p.paid() > 0);
        assert_eq!(i128::from(l.money()), i128::from(i64::MAX) - i128::from(p.paid()));
    }
}
