//! Unbounded source piles.
//!
//! A pile is where units appear: a food machine's output tray, a packing
//! table's finished packages, the trash left on a table. Units are laid out
//! on a grid (`length` columns by `width` rows per tier, tiers stacked
//! upward) so displayed units never overlap. Anyone with room may draw from
//! the top.

use crate::carried::CarriedStack;
use crate::event::Cue;
use crate::fixed::Fixed64;
use crate::item::{Kind, Slot, Unit};
use crate::movement::Zone;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("source is empty")]
    Empty,

    #[error("carrier holds {held:?}, source offers {offered:?}")]
    KindMismatch { held: Kind, offered: Kind },

    #[error("carrier is at capacity ({capacity})")]
    NoHeadroom { capacity: u32 },
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Grid placement rule for pile units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Columns per row.
    pub length: u32,
    /// Rows per tier.
    pub width: u32,
    pub spacing: Slot,
}

impl GridLayout {
    pub fn new(length: u32, width: u32, spacing: Slot) -> Self {
        Self {
            length: length.max(1),
            width: width.max(1),
            spacing,
        }
    }

    /// Slot for the unit at `index`, centered on the pile anchor.
    pub fn slot(&self, index: u32) -> Slot {
        let row = (index / self.length) % self.width;
        let column = index % self.length;
        let tier = index / (self.length * self.width);
        let half = Fixed64::from_num(0.5);
        let center_x = self.spacing.x * Fixed64::from_num(self.length - 1) * half;
        let center_z = self.spacing.z * Fixed64::from_num(self.width - 1) * half;
        Slot {
            x: self.spacing.x * Fixed64::from_num(column) - center_x,
            y: self.spacing.y * Fixed64::from_num(tier),
            z: self.spacing.z * Fixed64::from_num(row) - center_z,
        }
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        let s = Fixed64::from_num(0.5);
        Self::new(3, 3, Slot { x: s, y: Fixed64::from_num(0.3), z: s })
    }
}

// ---------------------------------------------------------------------------
// Source pile
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SourcePile {
    kind: Kind,
    units: Vec<Unit>,
    layout: GridLayout,
    drop_interval: Fixed64,
    drop_timer: Fixed64,
    enabled: bool,
    pub zone: Zone,
}

impl SourcePile {
    pub fn new(kind: Kind, layout: GridLayout, drop_interval: Fixed64, zone: Zone) -> Self {
        Self {
            kind,
            units: Vec::new(),
            layout,
            drop_interval,
            drop_timer: Fixed64::ZERO,
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

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Push a unit and lay it out on the grid. Debug builds assert the kind.
    pub fn add(&mut self, mut unit: Unit) {
        debug_assert_eq!(unit.kind(), self.kind, "unit added to the wrong pile");
        unit.slot = self.layout.slot(self.count());
        self.units.push(unit);
    }

    pub fn pop(&mut self) -> Option<Unit> {
        self.units.pop()
    }

    /// Height of the next free slot.
    pub fn peak_height(&self) -> Fixed64 {
        self.layout.slot(self.count()).y
    }

    fn check_carrier(&self, carried: &CarriedStack, capacity: u32) -> Result<(), TransferError> {
        if self.is_empty() {
            return Err(TransferError::Empty);
        }
        match carried.kind() {
            Some(held) if held != self.kind => {
                return Err(TransferError::KindMismatch {
                    held,
                    offered: self.kind,
                });
            }
            _ => {}
        }
        if carried.height() >= capacity {
            return Err(TransferError::NoHeadroom { capacity });
        }
        Ok(())
    }

    /// Hand the top unit to an actor carrying at most `capacity` units.
    pub fn try_dispense_one_to(
        &mut self,
        carried: &mut CarriedStack,
        capacity: u32,
    ) -> Result<Cue, TransferError> {
        self.remove_and_transfer_to(carried, capacity)?;
        Ok(Cue::pickup(self.kind))
    }

    /// Worker path: move the top unit into `carried`. Headroom and kind are
    /// checked before anything is popped, so a failed transfer changes
    /// nothing.
    pub fn remove_and_transfer_to(
        &mut self,
        carried: &mut CarriedStack,
        capacity: u32,
    ) -> Result<(), TransferError> {
        self.check_carrier(carried, capacity)?;
        let Some(unit) = self.units.pop() else {
            return Err(TransferError::Empty);
        };
        carried.add(unit).map_err(|err| {
            // Guarded above; put the unit back if the carrier still refused it.
            let unit = err.into_unit();
            let held = carried.kind().unwrap_or(unit.kind());
            self.units.push(unit);
            TransferError::KindMismatch {
                held,
                offered: self.kind,
            }
        })
    }

    /// Passive dispense to an adjacent actor, one unit per drop interval.
    pub fn tick_dispense(
        &mut self,
        dt: Fixed64,
        adjacent: Option<(&mut CarriedStack, u32)>,
    ) -> Option<Cue> {
        let Some((carried, capacity)) = adjacent else {
            self.drop_timer = Fixed64::ZERO;
            return None;
        };
        if self.is_empty() {
            return None;
        }
        self.drop_timer += dt;
        if self.drop_timer < self.drop_interval {
            return None;
        }
        self.drop_timer = Fixed64::ZERO;
        self.try_dispense_one_to(carried, capacity).ok()
    }

    /// Empty the pile, yielding units top first.
    pub fn drain(&mut self) -> impl Iterator<Item = Unit> + '_ {
        self.units.drain(..).rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Vec2;
    use crate::pool::UnitPool;

    fn pile(kind: Kind) -> SourcePile {
        SourcePile::new(
            kind,
            GridLayout::default(),
            Fixed64::from_num(0.03),
            Zone::around(Vec2::default(), Fixed64::from_num(1)),
        )
    }

    #[test]
    fn grid_layout_wraps_rows_then_tiers() {
        let layout = GridLayout::default();
        let first = layout.slot(0);
        let second_row = layout.slot(3);
        let second_tier = layout.slot(9);
        assert_eq!(first.x, Fixed64::from_num(-0.5));
        assert_eq!(first.z, Fixed64::from_num(-0.5));
        assert_eq!(second_row.z, Fixed64::ZERO);
        assert_eq!(second_row.y, Fixed64::ZERO);
        assert_eq!(second_tier.y, Fixed64::from_num(0.3));
        assert_eq!((second_tier.x, second_tier.z), (first.x, first.z));
    }

    #[test]
    fn dispense_respects_kind_lock() {
        let mut pool = UnitPool::new();
        let mut p = pile(Kind::Food);
        p.add(pool.acquire(Kind::Food));
        let mut carried = CarriedStack::default();
        carried.add(pool.acquire(Kind::Trash)).unwrap();
        assert_eq!(
            p.try_dispense_one_to(&mut carried, 5),
            Err(TransferError::KindMismatch {
                held: Kind::Trash,
                offered: Kind::Food
            })
        );
        assert_eq!(p.count(), 1);
    }

    #[test]
    fn dispense_stops_at_capacity() {
        let mut pool = UnitPool::new();
        let mut p = pile(Kind::Food);
        for _ in 0..3 {
            p.add(pool.acquire(Kind::Food));
        }
        let mut carried = CarriedStack::default();
        assert_eq!(p.try_dispense_one_to(&mut carried, 1), Ok(Cue::Pop));
        assert_eq!(
            p.try_dispense_one_to(&mut carried, 1),
            Err(TransferError::NoHeadroom { capacity: 1 })
        );
        assert_eq!(p.count(), 2);
    }

    #[test]
    fn trash_has_its_own_cue() {
        let mut pool = UnitPool::new();
        let mut p = pile(Kind::Trash);
        p.add(pool.acquire(Kind::Trash));
        let mut carried = CarriedStack::default();
        assert_eq!(p.try_dispense_one_to(&mut carried, 3), Ok(Cue::Trash));
    }

    #[test]
    fn empty_pile_reports_empty() {
        let mut p = pile(Kind::Package);
        let mut carried = CarriedStack::default();
        assert_eq!(
            p.remove_and_transfer_to(&mut carried, 3),
            Err(TransferError::Empty)
        );
    }

    #[test]
    fn tick_dispense_waits_for_interval() {
        let mut pool = UnitPool::new();
        let mut p = pile(Kind::Food);
        p.add(pool.acquire(Kind::Food));
        let mut carried = CarriedStack::default();
        let dt = Fixed64::from_num(0.02);
        assert_eq!(p.tick_dispense(dt, Some((&mut carried, 3))), None);
        assert_eq!(p.tick_dispense(dt, Some((&mut carried, 3))), Some(Cue::Pop));
        assert_eq!(carried.height(), 1);
    }

    #[test]
    fn leaving_resets_drop_timer() {
        let mut pool = UnitPool::new();
        let mut p = pile(Kind::Food);
        p.add(pool.acquire(Kind::Food));
        let mut carried = CarriedStack::default();
        let dt = Fixed64::from_num(0.02);
        p.tick_dispense(dt, Some((&mut carried, 3)));
        p.tick_dispense(dt, None);
        assert_eq!(p.tick_dispense(dt, Some((&mut carried, 3))), None);
    }
}
