//! Service stations.
//!
//! A station owns a stock container, an optional money pile, a work spot and
//! (for consumer-facing stations) a bounded queue. Stations are stored in one
//! slotmap as the [`Station`] enum and dispatched by variant; the restaurant
//! builds the per-variant context from its own fields each frame.

pub mod counter;
pub mod drive_thru;
pub mod packing;
pub mod work_spot;

pub use counter::{Counter, CounterContext};
pub use drive_thru::{DriveThru, DriveThruContext};
pub use packing::{PackingContext, PackingRates, PackingTable};
pub use work_spot::{WorkSpot, has_worker};

use crate::config::StationConfig;
use crate::fixed::{Fixed64, f64_to_fixed64};
use crate::movement::Vec2;
use crate::rate;

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

/// Live numbers for a consumer-facing station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationRates {
    pub spawn_interval: Fixed64,
    pub serve_interval: Fixed64,
    pub stack_capacity: u32,
    pub sell_price: u32,
}

impl StationRates {
    pub fn derive(
        config: &StationConfig,
        unlock_level: u32,
        profit_level: u32,
        spawn_floor: Fixed64,
    ) -> Self {
        let base = f64_to_fixed64(config.base_interval);
        Self {
            spawn_interval: rate::spawn_interval(base, unlock_level, spawn_floor),
            serve_interval: rate::serve_interval(base, unlock_level),
            stack_capacity: rate::stack_capacity(config.base_stack, config.stack_step, unlock_level),
            sell_price: rate::sell_price(
                f64_to_fixed64(config.base_price),
                f64_to_fixed64(config.price_growth),
                profit_level,
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Sites
// ---------------------------------------------------------------------------

/// Where a counter's fixtures stand.
#[derive(Debug, Clone)]
pub struct CounterSite {
    pub level: u32,
    pub food_stack: Vec2,
    pub money_pile: Vec2,
    pub work_spot: Vec2,
    /// Queue points, front first.
    pub queue: Vec<Vec2>,
    pub spawn: Vec2,
    pub exit: Vec2,
}

#[derive(Debug, Clone)]
pub struct DriveThruSite {
    pub level: u32,
    pub package_stack: Vec2,
    pub money_pile: Vec2,
    pub work_spot: Vec2,
    /// Lane points, window first.
    pub lane: Vec<Vec2>,
    pub spawn: Vec2,
    pub exit: Vec2,
}

#[derive(Debug, Clone)]
pub struct PackingSite {
    pub level: u32,
    pub food_stack: Vec2,
    pub package_pile: Vec2,
    pub work_spot: Vec2,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Station {
    Counter(Counter),
    DriveThru(DriveThru),
    Packing(PackingTable),
}

impl Station {
    pub fn unlock_level(&self) -> u32 {
        match self {
            Station::Counter(s) => s.unlock_level,
            Station::DriveThru(s) => s.unlock_level,
            Station::Packing(s) => s.unlock_level,
        }
    }

    pub(crate) fn unlock_level_mut(&mut self) -> &mut u32 {
        match self {
            Station::Counter(s) => &mut s.unlock_level,
            Station::DriveThru(s) => &mut s.unlock_level,
            Station::Packing(s) => &mut s.unlock_level,
        }
    }

    pub fn work_spot(&self) -> &WorkSpot {
        match self {
            Station::Counter(s) => &s.work_spot,
            Station::DriveThru(s) => &s.work_spot,
            Station::Packing(s) => &s.work_spot,
        }
    }

    pub fn work_spot_mut(&mut self) -> &mut WorkSpot {
        match self {
            Station::Counter(s) => &mut s.work_spot,
            Station::DriveThru(s) => &mut s.work_spot,
            Station::Packing(s) => &mut s.work_spot,
        }
    }

    pub fn has_worker(&self) -> bool {
        has_worker(self.unlock_level(), self.work_spot())
    }

    /// Number of consumers waiting in line (0 for packing tables).
    pub fn queue_len(&self) -> usize {
        match self {
            Station::Counter(s) => s.queue().len(),
            Station::DriveThru(s) => s.queue().len(),
            Station::Packing(_) => 0,
        }
    }

    pub fn as_counter(&self) -> Option<&Counter> {
        match self {
            Station::Counter(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_drive_thru(&self) -> Option<&DriveThru> {
        match self {
            Station::DriveThru(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_packing(&self) -> Option<&PackingTable> {
        match self {
            Station::Packing(s) => Some(s),
            _ => None,
        }
    }
}
