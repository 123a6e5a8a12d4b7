//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::RestaurantConfig;
use crate::fixed::Fixed64;
use crate::id::*;
use crate::movement::Vec2;
use crate::restaurant::Restaurant;
use crate::seating::SeatingSite;
use crate::station::{CounterSite, DriveThruSite, PackingSite};

// ===========================================================================
// Scalars
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

pub fn pos(x: f64, z: f64) -> Vec2 {
    Vec2::from_f64(x, z)
}

/// Somewhere no zone reaches.
pub fn nowhere() -> Vec2 {
    pos(-50.0, -50.0)
}

/// Frames in `seconds` of simulated time at the default frame rate.
pub fn frames(seconds: f64) -> u64 {
    (seconds * 60.0).ceil() as u64
}

// ===========================================================================
// Sites
// ===========================================================================
//
// The standard floor, seen from above (x right, z down):
//
//   machine (0,0)     counter stack (5,0)     drive-thru stack (15,0)
//   bin (-5,0)        counter spot (5,2)      drive-thru spot (15,2)
//                     queue (5,-2..)          lane (15,-2..)
//   packing stack (10,5) / package pile (12,5) / spot (10,7)
//   tables along z = 10

pub fn counter_site(level: u32) -> CounterSite {
    CounterSite {
        level,
        food_stack: pos(5.0, 0.0),
        money_pile: pos(7.0, 0.0),
        work_spot: pos(5.0, 2.0),
        queue: (0..10).map(|i| pos(5.0, -2.0 - i as f64)).collect(),
        spawn: pos(5.0, -14.0),
        exit: pos(9.0, -14.0),
    }
}

pub fn drive_thru_site(level: u32) -> DriveThruSite {
    DriveThruSite {
        level,
        package_stack: pos(15.0, 0.0),
        money_pile: pos(17.0, 0.0),
        work_spot: pos(15.0, 2.0),
        lane: (0..10).map(|i| pos(15.0, -2.0 - 2.0 * i as f64)).collect(),
        spawn: pos(15.0, -22.0),
        exit: pos(20.0, -22.0),
    }
}

pub fn packing_site(level: u32) -> PackingSite {
    PackingSite {
        level,
        food_stack: pos(10.0, 5.0),
        package_pile: pos(12.0, 5.0),
        work_spot: pos(10.0, 7.0),
    }
}

/// A two-seat table at `x`.
pub fn seating_site(level: u32, x: f64) -> SeatingSite {
    SeatingSite {
        level,
        seats: vec![pos(x, 10.0), pos(x + 1.0, 10.0)],
        trash_pile: pos(x + 0.5, 12.0),
        money_pile: pos(x + 2.5, 12.0),
    }
}

// ===========================================================================
// Restaurants
// ===========================================================================

/// Default balance, a fixed seed and the player parked out of every zone.
pub fn quiet_restaurant() -> Restaurant {
    quiet_restaurant_with(RestaurantConfig::default())
}

pub fn quiet_restaurant_with(config: RestaurantConfig) -> Restaurant {
    let Ok(mut r) = Restaurant::new(config) else {
        panic!("test config must validate");
    };
    r.place_player(nowhere());
    r.set_staff_room(pos(0.0, -5.0));
    r
}

/// Ids of the fixtures in [`lunch_spot`].
#[derive(Debug, Clone)]
pub struct LunchSpot {
    pub machine: MachineId,
    pub counter: StationId,
    pub drive_thru: StationId,
    pub packing: StationId,
    pub tables: Vec<SeatingId>,
    pub bin: BinId,
}

/// A complete restaurant: one of every fixture, all at `level`, with three
/// tables.
pub fn lunch_spot(config: RestaurantConfig, level: u32) -> (Restaurant, LunchSpot) {
    let mut r = quiet_restaurant_with(config);
    let machine = r.add_food_machine(pos(0.0, 0.0), level);
    let counter = r.add_counter(counter_site(level));
    let drive_thru = r.add_drive_thru(drive_thru_site(level));
    let packing = r.add_packing_table(packing_site(level));
    let tables = [0.0, 5.0, 10.0]
        .into_iter()
        .map(|x| r.add_seating(seating_site(level, x)))
        .collect();
    let bin = r.add_trash_bin(pos(-5.0, 0.0));
    (
        r,
        LunchSpot {
            machine,
            counter,
            drive_thru,
            packing,
            tables,
            bin,
        },
    )
}

/// Fill a station's stock stack straight from the pool.
pub fn stock_stack(r: &mut Restaurant, stack: StackId, count: u32) -> u32 {
    let Some(kind) = r.stack(stack).map(|s| s.kind()) else {
        return 0;
    };
    let mut added = 0;
    for _ in 0..count {
        let unit = r.pool_mut().acquire(kind);
        let Some(s) = r.stack_mut(stack) else {
            break;
        };
        match s.add(unit) {
            Ok(()) => added += 1,
            Err(err) => {
                r.pool_mut().release(err.into_unit());
                break;
            }
        }
    }
    added
}

pub fn counter_food(r: &Restaurant, counter: StationId) -> StackId {
    match r.station(counter).and_then(|s| s.as_counter()) {
        Some(c) => c.food,
        None => panic!("not a counter"),
    }
}

pub fn drive_thru_packages(r: &Restaurant, station: StationId) -> StackId {
    match r.station(station).and_then(|s| s.as_drive_thru()) {
        Some(d) => d.packages,
        None => panic!("not a drive-through"),
    }
}
