//! The stack an actor carries around.
//!
//! A carried stack has no capacity of its own; the owning actor's capacity
//! is passed in by whoever fills it. Its kind is locked by the first unit and
//! released again when the last unit leaves.

use crate::fixed::Fixed64;
use crate::item::{Kind, KindOffsets, Slot, Unit};
use crate::stack::PushError;

#[derive(Debug, Default)]
pub struct CarriedStack {
    units: Vec<Unit>,
    kind: Option<Kind>,
    offsets: KindOffsets,
}

impl CarriedStack {
    pub fn new(offsets: KindOffsets) -> Self {
        Self {
            units: Vec::new(),
            kind: None,
            offsets,
        }
    }

    /// Kind of the units held, `None` when empty.
    pub fn kind(&self) -> Option<Kind> {
        self.kind
    }

    pub fn height(&self) -> u32 {
        self.units.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Whether a unit of `kind` may be added by an actor of `capacity`.
    pub fn accepts(&self, kind: Kind, capacity: u32) -> bool {
        self.kind.is_none_or(|k| k == kind) && self.height() < capacity
    }

    /// Push a unit, locking the kind if this is the first one.
    pub fn add(&mut self, mut unit: Unit) -> Result<(), PushError> {
        match self.kind {
            Some(held) if held != unit.kind() => {
                let offered = unit.kind();
                return Err(PushError::KindMismatch {
                    unit,
                    held,
                    offered,
                });
            }
            _ => {}
        }
        self.kind = Some(unit.kind());
        let offset = self.offsets.get(unit.kind());
        unit.slot = Slot::vertical(offset * Fixed64::from_num(self.units.len()));
        self.units.push(unit);
        Ok(())
    }

    pub fn remove_top(&mut self) -> Option<Unit> {
        let unit = self.units.pop();
        if self.units.is_empty() {
            self.kind = None;
        }
        unit
    }

    /// Empty the stack, yielding the units top first.
    pub fn drain(&mut self) -> impl Iterator<Item = Unit> + '_ {
        self.kind = None;
        self.units.drain(..).rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::UnitPool;

    #[test]
    fn first_unit_locks_kind() {
        let mut pool = UnitPool::new();
        let mut carried = CarriedStack::default();
        assert_eq!(carried.kind(), None);
        carried.add(pool.acquire(Kind::Trash)).unwrap();
        assert_eq!(carried.kind(), Some(Kind::Trash));

        let err = carried.add(pool.acquire(Kind::Food)).unwrap_err();
        assert!(matches!(
            err,
            PushError::KindMismatch {
                held: Kind::Trash,
                offered: Kind::Food,
                ..
            }
        ));
        assert_eq!(err.into_unit().kind(), Kind::Food);
        assert_eq!(carried.height(), 1);
    }

    #[test]
    fn emptying_resets_kind() {
        let mut pool = UnitPool::new();
        let mut carried = CarriedStack::default();
        carried.add(pool.acquire(Kind::Food)).unwrap();
        pool.release(carried.remove_top().unwrap());
        assert_eq!(carried.kind(), None);
        carried.add(pool.acquire(Kind::Package)).unwrap();
        assert_eq!(carried.kind(), Some(Kind::Package));
    }

    #[test]
    fn accepts_respects_capacity_and_kind() {
        let mut pool = UnitPool::new();
        let mut carried = CarriedStack::default();
        assert!(carried.accepts(Kind::Food, 1));
        carried.add(pool.acquire(Kind::Food)).unwrap();
        assert!(!carried.accepts(Kind::Food, 1));
        assert!(carried.accepts(Kind::Food, 2));
        assert!(!carried.accepts(Kind::Trash, 2));
    }

    #[test]
    fn slots_rise_with_height() {
        let mut pool = UnitPool::new();
        let mut carried = CarriedStack::default();
        for _ in 0..3 {
            carried.add(pool.acquire(Kind::Food)).unwrap();
        }
        let top = carried.remove_top().unwrap();
        assert_eq!(top.slot.y, Fixed64::from_num(0.35) * Fixed64::from_num(2));
    }

    #[test]
    fn drain_yields_top_first() {
        let mut pool = UnitPool::new();
        let mut carried = CarriedStack::default();
        let ids: Vec<_> = (0..3)
            .map(|_| {
                let u = pool.acquire(Kind::Food);
                let id = u.id();
                carried.add(u).unwrap();
                id
            })
            .collect();
        let drained: Vec<_> = carried.drain().map(|u| u.id()).collect();
        assert_eq!(drained, ids.into_iter().rev().collect::<Vec<_>>());
        assert_eq!(carried.kind(), None);
    }
}
