//! Packing table: turns food into drive-through packages.

use slotmap::SlotMap;

use crate::config::PackingConfig;
use crate::event::{Event, EventLog};
use crate::fixed::{Fixed64, Ticks, f64_to_fixed64};
use crate::id::{PileId, StackId, StationId};
use crate::item::Kind;
use crate::pile::SourcePile;
use crate::pool::UnitPool;
use crate::rate;
use crate::stack::SinkStack;

use super::{WorkSpot, has_worker};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackingRates {
    pub packing_interval: Fixed64,
    /// Packages the table keeps on its pile before it stops packing. Also
    /// the capacity of its food stack.
    pub capacity: u32,
}

impl PackingRates {
    pub fn derive(config: &PackingConfig, unlock_level: u32) -> Self {
        Self {
            packing_interval: rate::production_interval(f64_to_fixed64(config.base_interval), unlock_level),
            capacity: rate::stack_capacity(config.base_stack, config.stack_step, unlock_level),
        }
    }
}

pub struct PackingContext<'a> {
    pub stacks: &'a mut SlotMap<StackId, SinkStack>,
    pub piles: &'a mut SlotMap<PileId, SourcePile>,
    pub pool: &'a mut UnitPool,
    pub events: &'a mut EventLog,
    pub tick: Ticks,
}

#[derive(Debug)]
pub struct PackingTable {
    pub unlock_level: u32,
    pub work_spot: WorkSpot,
    pub food: StackId,
    pub packages: PileId,
    rates: PackingRates,
    foods_per_package: u32,
    finish_delay: Fixed64,
    pack_timer: Fixed64,
    /// Food units already in the box being packed.
    packed: u32,
    /// Boxes closing, with the seconds left until each lands on the pile.
    closing: Vec<Fixed64>,
}

impl PackingTable {
    pub fn new(
        unlock_level: u32,
        work_spot: WorkSpot,
        food: StackId,
        packages: PileId,
        config: &PackingConfig,
    ) -> Self {
        Self {
            unlock_level,
            work_spot,
            food,
            packages,
            rates: PackingRates::derive(config, unlock_level),
            foods_per_package: config.foods_per_package.max(1),
            finish_delay: f64_to_fixed64(config.finish_delay),
            pack_timer: Fixed64::ZERO,
            packed: 0,
            closing: Vec::new(),
        }
    }

    pub fn rates(&self) -> PackingRates {
        self.rates
    }

    pub fn set_rates(&mut self, rates: PackingRates) {
        self.rates = rates;
    }

    /// Food units in the open box.
    pub fn packed(&self) -> u32 {
        self.packed
    }

    pub fn tick(&mut self, id: StationId, dt: Fixed64, ctx: &mut PackingContext<'_>) {
        if self.unlock_level == 0 {
            return;
        }

        let before = self.closing.len();
        self.closing.retain_mut(|left| {
            *left -= dt;
            *left > Fixed64::ZERO
        });
        let landed = before - self.closing.len();
        if let Some(pile) = ctx.piles.get_mut(self.packages) {
            for _ in 0..landed {
                pile.add(ctx.pool.acquire(Kind::Package));
                ctx.events.push(Event::PackagePacked {
                    station: id,
                    tick: ctx.tick,
                });
            }
        }

        self.pack_timer = (self.pack_timer + dt).min(self.rates.packing_interval);
        if self.pack_timer < self.rates.packing_interval {
            return;
        }
        let on_pile = ctx.piles.get(self.packages).map_or(0, SourcePile::count);
        if on_pile + self.closing.len() as u32 >= self.rates.capacity
            || !has_worker(self.unlock_level, &self.work_spot)
        {
            return;
        }
        let Some(food) = ctx.stacks.get_mut(self.food).and_then(SinkStack::remove_top) else {
            return;
        };
        ctx.pool.release(food);
        self.pack_timer = Fixed64::ZERO;
        self.packed += 1;
        if self.packed >= self.foods_per_package {
            self.packed = 0;
            self.closing.push(self.finish_delay.max(Fixed64::DELTA));
        }
    }
}
