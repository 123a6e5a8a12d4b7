//! Reusable unit instances, handed out and reclaimed by kind.
//!
//! Every unit in the restaurant is born in the [`UnitPool`] and returns to it
//! when it is finally consumed (served, eaten, thrown away or banked). An
//! empty free list never blocks: the pool allocates a fresh instance and logs
//! a warning so prewarm sizes can be tuned.

use slotmap::SlotMap;

use crate::id::UnitId;
use crate::item::{Kind, Unit};

#[derive(Debug, Clone, Copy)]
struct UnitRecord {
    kind: Kind,
    active: bool,
}

/// Per-kind free lists over one slotmap of unit records.
#[derive(Debug, Default)]
pub struct UnitPool {
    records: SlotMap<UnitId, UnitRecord>,
    idle: [Vec<UnitId>; 4],
    emergency_allocations: u64,
}

impl UnitPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `count` idle instances of `kind` up front.
    pub fn prewarm(&mut self, kind: Kind, count: usize) {
        let free = &mut self.idle[kind.index()];
        free.reserve(count);
        for _ in 0..count {
            free.push(self.records.insert(UnitRecord {
                kind,
                active: false,
            }));
        }
    }

    /// Take an idle unit of `kind`, allocating a new one if none is idle.
    pub fn acquire(&mut self, kind: Kind) -> Unit {
        let id = match self.idle[kind.index()].pop() {
            Some(id) => id,
            None => {
                self.emergency_allocations += 1;
                log::warn!(
                    "unit pool for {kind:?} exhausted, allocating ({} total)",
                    self.total(kind) + 1
                );
                self.records.insert(UnitRecord {
                    kind,
                    active: false,
                })
            }
        };
        if let Some(record) = self.records.get_mut(id) {
            record.active = true;
        }
        Unit::new(id, kind)
    }

    /// Deactivate a unit and return it to its kind's free list.
    pub fn release(&mut self, unit: Unit) {
        let id = unit.id();
        if let Some(record) = self.records.get_mut(id) {
            debug_assert!(record.active, "released an idle unit");
            record.active = false;
            self.idle[record.kind.index()].push(id);
        }
    }

    /// Release every unit yielded by `units`.
    pub fn release_all(&mut self, units: impl IntoIterator<Item = Unit>) {
        for unit in units {
            self.release(unit);
        }
    }

    pub fn idle_count(&self, kind: Kind) -> usize {
        self.idle[kind.index()].len()
    }

    pub fn active_count(&self, kind: Kind) -> usize {
        self.records
            .values()
            .filter(|r| r.kind == kind && r.active)
            .count()
    }

    /// Every instance of `kind` ever created, active or idle.
    pub fn total(&self, kind: Kind) -> usize {
        self.records.values().filter(|r| r.kind == kind).count()
    }

    /// How many acquires found the free list empty.
    pub fn emergency_allocations(&self) -> u64 {
        self.emergency_allocations
    }
}
