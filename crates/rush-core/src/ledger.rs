//! Money balance and persistent upgrade levels.
//!
//! The simulation never owns progression directly: it reads levels and moves
//! money through the [`Ledger`] trait, and the only way a level changes is
//! [`Ledger::purchase_upgrade`]. Each successful purchase bumps
//! [`Ledger::revision`], which the restaurant polls once per frame to decide
//! whether rates must be re-derived.

use crate::rate::PriceCurve;

/// Upgrade categories bought from the upgrade screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Upgrade {
    EmployeeSpeed,
    EmployeeCapacity,
    EmployeeAmount,
    PlayerSpeed,
    PlayerCapacity,
    Profit,
}

impl Upgrade {
    pub const ALL: [Upgrade; 6] = [
        Upgrade::EmployeeSpeed,
        Upgrade::EmployeeCapacity,
        Upgrade::EmployeeAmount,
        Upgrade::PlayerSpeed,
        Upgrade::PlayerCapacity,
        Upgrade::Profit,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("cannot afford {upgrade:?}: costs {price}, balance is {balance}")]
    InsufficientFunds {
        upgrade: Upgrade,
        price: u64,
        balance: i64,
    },
}

/// Progression collaborator consumed by the simulation.
pub trait Ledger: std::fmt::Debug {
    fn upgrade_level(&self, upgrade: Upgrade) -> u32;

    /// Price of the next level of `upgrade`.
    fn upgrade_price(&self, upgrade: Upgrade) -> u64;

    /// Deduct the price, increment the level and bump the revision.
    /// Returns the new level.
    fn purchase_upgrade(&mut self, upgrade: Upgrade) -> Result<u32, LedgerError>;

    fn adjust_money(&mut self, delta: i64);

    fn money(&self) -> i64;

    /// Incremented on every level change.
    fn revision(&self) -> u64;
}

/// In-memory ledger.
#[derive(Debug, Clone)]
pub struct RestaurantLedger {
    money: i64,
    levels: [u32; 6],
    pricing: PriceCurve,
    revision: u64,
}

impl RestaurantLedger {
    pub fn new(starting_money: i64, pricing: PriceCurve) -> Self {
        Self {
            money: starting_money,
            levels: [0; 6],
            pricing,
            revision: 0,
        }
    }

    /// Start from previously persisted levels.
    pub fn with_levels(mut self, levels: &[(Upgrade, u32)]) -> Self {
        for &(upgrade, level) in levels {
            self.levels[upgrade.index()] = level;
        }
        self.revision += 1;
        self
    }
}

impl Ledger for RestaurantLedger {
    fn upgrade_level(&self, upgrade: Upgrade) -> u32 {
        self.levels[upgrade.index()]
    }

    fn upgrade_price(&self, upgrade: Upgrade) -> u64 {
        self.pricing.at(self.upgrade_level(upgrade))
    }

    fn purchase_upgrade(&mut self, upgrade: Upgrade) -> Result<u32, LedgerError> {
        let price = self.upgrade_price(upgrade);
        let cost = i64::try_from(price).unwrap_or(i64::MAX);
        if self.money < cost {
            return Err(LedgerError::InsufficientFunds {
                upgrade,
                price,
                balance: self.money,
            });
        }
        self.money -= cost;
        let level = &mut self.levels[upgrade.index()];
        *level += 1;
        self.revision += 1;
        Ok(*level)
    }

    fn adjust_money(&mut self, delta: i64) {
        self.money = self.money.saturating_add(delta);
    }

    fn money(&self) -> i64 {
        self.money
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Fixed64;

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

    #[test]
    fn purchase_deducts_and_levels_up() {
        let mut l = ledger(1000);
        assert_eq!(l.upgrade_price(Upgrade::Profit), 250);
        assert_eq!(l.purchase_upgrade(Upgrade::Profit), Ok(1));
        assert_eq!(l.money(), 750);
        assert_eq!(l.upgrade_price(Upgrade::Profit), 400);
        assert_eq!(l.revision(), 1);
    }

    #[test]
    fn purchase_without_funds_changes_nothing() {
        let mut l = ledger(100);
        let err = l.purchase_upgrade(Upgrade::PlayerSpeed).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                upgrade: Upgrade::PlayerSpeed,
                price: 250,
                balance: 100
            }
        );
        assert_eq!(l.money(), 100);
        assert_eq!(l.upgrade_level(Upgrade::PlayerSpeed), 0);
        assert_eq!(l.revision(), 0);
    }

    #[test]
    fn levels_are_independent() {
        let mut l = ledger(10_000).with_levels(&[(Upgrade::EmployeeAmount, 2)]);
        l.purchase_upgrade(Upgrade::EmployeeCapacity).unwrap();
        assert_eq!(l.upgrade_level(Upgrade::EmployeeAmount), 2);
        assert_eq!(l.upgrade_level(Upgrade::EmployeeCapacity), 1);
        assert_eq!(l.upgrade_level(Upgrade::Profit), 0);
    }
}
