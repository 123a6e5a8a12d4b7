//! Capacity-bounded sink stacks.
//!
//! Stations keep their stock in a [`SinkStack`]: actors deposit into it, the
//! station dispenses from the top. The maximum capacity is owned by the
//! station and rewritten whenever its rates are re-derived.

use crate::carried::CarriedStack;
use crate::fixed::Fixed64;
use crate::item::{Kind, Slot, Unit};
use crate::movement::Zone;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A rejected push. The unit is handed back untouched.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("stack is full at {capacity} units")]
    Full { unit: Unit, capacity: u32 },

    #[error("stack holds {held:?}, cannot take {offered:?}")]
    KindMismatch {
        unit: Unit,
        held: Kind,
        offered: Kind,
    },
}

impl PushError {
    /// Recover the rejected unit.
    pub fn into_unit(self) -> Unit {
        match self {
            PushError::Full { unit, .. } | PushError::KindMismatch { unit, .. } => unit,
        }
    }
}

// ---------------------------------------------------------------------------
// Sink stack
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SinkStack {
    kind: Kind,
    units: Vec<Unit>,
    max_capacity: u32,
    offset: Fixed64,
    intake_interval: Fixed64,
    intake_timer: Fixed64,
    enabled: bool,
    pub zone: Zone,
}

impl SinkStack {
    pub fn new(kind: Kind, max_capacity: u32, offset: Fixed64, intake_interval: Fixed64, zone: Zone) -> Self {
        Self {
            kind,
            units: Vec::new(),
            max_capacity,
            offset,
            intake_interval,
            intake_timer: Fixed64::ZERO,
            enabled: true,
            zone,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn count(&self) -> u32 {
        self.units.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    /// Units still accepted before the stack is full.
    pub fn headroom(&self) -> u32 {
        self.max_capacity.saturating_sub(self.count())
    }

    pub fn is_full(&self) -> bool {
        self.count() >= self.max_capacity
    }

    /// Lowering the capacity below the current count keeps the excess; the
    /// stack just reports full until it drains.
    pub fn set_max_capacity(&mut self, max_capacity: u32) {
        self.max_capacity = max_capacity;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn add(&mut self, mut unit: Unit) -> Result<(), PushError> {
        if unit.kind() != self.kind {
            let offered = unit.kind();
            return Err(PushError::KindMismatch {
                unit,
                held: self.kind,
                offered,
            });
        }
        if self.is_full() {
            return Err(PushError::Full {
                unit,
                capacity: self.max_capacity,
            });
        }
        unit.slot = Slot::vertical(self.offset * Fixed64::from_num(self.units.len()));
        self.units.push(unit);
        Ok(())
    }

    pub fn remove_top(&mut self) -> Option<Unit> {
        self.units.pop()
    }

    /// Passive intake from an adjacent actor. Every intake interval, moves
    /// one unit off `carried` if its kind matches and there is room.
    /// Returns `true` when a unit moved.
    pub fn tick_intake(&mut self, dt: Fixed64, carried: Option<&mut CarriedStack>) -> bool {
        let Some(carried) = carried else {
            self.intake_timer = Fixed64::ZERO;
            return false;
        };
        self.intake_timer += dt;
        if self.intake_timer < self.intake_interval {
            return false;
        }
        self.intake_timer = Fixed64::ZERO;
        if carried.kind() != Some(self.kind) || self.is_full() {
            return false;
        }
        let Some(unit) = carried.remove_top() else {
            return false;
        };
        match self.add(unit) {
            Ok(()) => true,
            Err(err) => {
                // Unreachable after the guards above; keep the unit with the actor.
                let _ = carried.add(err.into_unit());
                false
            }
        }
    }

    /// Iterate units bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Vec2;
    use crate::pool::UnitPool;

    fn stack(kind: Kind, capacity: u32) -> SinkStack {
        SinkStack::new(
            kind,
            capacity,
            Fixed64::from_num(0.35),
            Fixed64::from_num(0.05),
            Zone::around(Vec2::default(), Fixed64::from_num(1)),
        )
    }

    #[test]
    fn rejects_when_full_and_returns_unit() {
        let mut pool = UnitPool::new();
        let mut s = stack(Kind::Food, 2);
        s.add(pool.acquire(Kind::Food)).unwrap();
        s.add(pool.acquire(Kind::Food)).unwrap();
        assert!(s.is_full());
        let err = s.add(pool.acquire(Kind::Food)).unwrap_err();
        assert!(matches!(err, PushError::Full { capacity: 2, .. }));
        assert_eq!(err.into_unit().kind(), Kind::Food);
        assert_eq!(s.count(), 2);
    }

    #[test]
    fn rejects_wrong_kind() {
        let mut pool = UnitPool::new();
        let mut s = stack(Kind::Package, 5);
        let err = s.add(pool.acquire(Kind::Food)).unwrap_err();
        assert!(matches!(err, PushError::KindMismatch { .. }));
        assert!(s.is_empty());
    }

    #[test]
    fn vertical_offset_per_index() {
        let mut pool = UnitPool::new();
        let mut s = stack(Kind::Food, 5);
        for _ in 0..3 {
            s.add(pool.acquire(Kind::Food)).unwrap();
        }
        let ys: Vec<_> = s.iter().map(|u| u.slot.y).collect();
        assert_eq!(ys[0], Fixed64::ZERO);
        assert_eq!(ys[2], Fixed64::from_num(0.35) * Fixed64::from_num(2));
    }

    #[test]
    fn shrinking_capacity_keeps_units() {
        let mut pool = UnitPool::new();
        let mut s = stack(Kind::Food, 4);
        for _ in 0..3 {
            s.add(pool.acquire(Kind::Food)).unwrap();
        }
        s.set_max_capacity(2);
        assert!(s.is_full());
        assert_eq!(s.count(), 3);
        assert_eq!(s.headroom(), 0);
    }

    #[test]
    fn intake_moves_one_unit_per_interval() {
        let mut pool = UnitPool::new();
        let mut s = stack(Kind::Food, 10);
        let mut carried = CarriedStack::default();
        for _ in 0..3 {
            carried.add(pool.acquire(Kind::Food)).unwrap();
        }
        let dt = Fixed64::from_num(0.03);
        assert!(!s.tick_intake(dt, Some(&mut carried)));
        assert!(s.tick_intake(dt, Some(&mut carried)));
        assert_eq!(s.count(), 1);
        assert_eq!(carried.height(), 2);
    }

    #[test]
    fn intake_ignores_other_kinds() {
        let mut pool = UnitPool::new();
        let mut s = stack(Kind::Food, 10);
        let mut carried = CarriedStack::default();
        carried.add(pool.acquire(Kind::Trash)).unwrap();
        for _ in 0..10 {
            s.tick_intake(Fixed64::from_num(0.05), Some(&mut carried));
        }
        assert!(s.is_empty());
        assert_eq!(carried.height(), 1);
    }
}
