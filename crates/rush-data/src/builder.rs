//! Turning a [`FloorPlan`] into a running [`Restaurant`].

use std::collections::HashMap;
use std::path::Path;

use rush_core::config::RestaurantConfig;
use rush_core::id::{BinId, MachineId, SeatingId, StationId};
use rush_core::movement::Vec2;
use rush_core::restaurant::Restaurant;
use rush_core::seating::SeatingSite;
use rush_core::station::{CounterSite, DriveThruSite, PackingSite};
use rush_core::unlock::Unlockable;

use crate::loader::{DataLoadError, check_duplicate, resolve_name};
use crate::schema::{FloorPlan, Point};

/// A restaurant built from data, with fixture names resolved to ids.
#[derive(Debug)]
pub struct BuiltRestaurant {
    pub restaurant: Restaurant,
    pub machines: HashMap<String, MachineId>,
    pub stations: HashMap<String, StationId>,
    pub seatings: HashMap<String, SeatingId>,
    pub bins: HashMap<String, BinId>,
}

fn point(p: Point) -> Vec2 {
    Vec2::from_f64(p.0, p.1)
}

fn points(ps: &[Point]) -> Vec<Vec2> {
    ps.iter().copied().map(point).collect()
}

/// Build a restaurant from a plan. `file` is only used in error messages.
///
/// The staff room is set before any fixture goes in, so employees hired by
/// the starting ledger already stand there.
pub fn build_restaurant(
    config: RestaurantConfig,
    plan: &FloorPlan,
    file: &Path,
) -> Result<BuiltRestaurant, DataLoadError> {
    let mut restaurant = Restaurant::new(config).map_err(|source| DataLoadError::Config {
        file: file.to_path_buf(),
        source,
    })?;
    if let Some(room) = plan.staff_room {
        restaurant.set_staff_room(point(room));
    }
    if let Some(start) = plan.player_start {
        restaurant.place_player(point(start));
    }

    // One namespace for every fixture so unlock orders are unambiguous.
    let mut names: HashMap<String, Unlockable> = HashMap::new();
    let mut machines = HashMap::new();
    let mut stations = HashMap::new();
    let mut seatings = HashMap::new();
    let mut bins = HashMap::new();

    for m in &plan.machines {
        check_duplicate(&names, &m.name, file)?;
        let id = restaurant.add_food_machine(point(m.position), m.level);
        names.insert(m.name.clone(), Unlockable::Machine(id));
        machines.insert(m.name.clone(), id);
    }

    for c in &plan.counters {
        check_duplicate(&names, &c.name, file)?;
        let id = restaurant.add_counter(CounterSite {
            level: c.level,
            food_stack: point(c.food_stack),
            money_pile: point(c.money_pile),
            work_spot: point(c.work_spot),
            queue: points(&c.queue),
            spawn: point(c.spawn),
            exit: point(c.exit),
        });
        names.insert(c.name.clone(), Unlockable::Station(id));
        stations.insert(c.name.clone(), id);
    }

    for d in &plan.drive_thrus {
        check_duplicate(&names, &d.name, file)?;
        let id = restaurant.add_drive_thru(DriveThruSite {
            level: d.level,
            package_stack: point(d.package_stack),
            money_pile: point(d.money_pile),
            work_spot: point(d.work_spot),
            lane: points(&d.lane),
            spawn: point(d.spawn),
            exit: point(d.exit),
        });
        names.insert(d.name.clone(), Unlockable::Station(id));
        stations.insert(d.name.clone(), id);
    }

    for p in &plan.packing_tables {
        check_duplicate(&names, &p.name, file)?;
        let id = restaurant.add_packing_table(PackingSite {
            level: p.level,
            food_stack: point(p.food_stack),
            package_pile: point(p.package_pile),
            work_spot: point(p.work_spot),
        });
        names.insert(p.name.clone(), Unlockable::Station(id));
        stations.insert(p.name.clone(), id);
    }

    for s in &plan.seatings {
        check_duplicate(&names, &s.name, file)?;
        let id = restaurant.add_seating(SeatingSite {
            level: s.level,
            seats: points(&s.seats),
            trash_pile: point(s.trash_pile),
            money_pile: point(s.money_pile),
        });
        names.insert(s.name.clone(), Unlockable::Seating(id));
        seatings.insert(s.name.clone(), id);
    }

    // Bins are never sold, so they stay out of the unlock namespace.
    for b in &plan.bins {
        check_duplicate(&names, &b.name, file)?;
        check_duplicate(&bins, &b.name, file)?;
        let id = restaurant.add_trash_bin(point(b.position));
        bins.insert(b.name.clone(), id);
    }

    if let Some(unlock) = &plan.unlock {
        let order = unlock
            .order
            .iter()
            .map(|name| resolve_name(&names, name, file, "unlockable fixture").copied())
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("unlock plan sells {} fixtures", order.len());
        restaurant.set_unlock_plan(point(unlock.buyer), order);
    }

    log::info!(
        "built restaurant from {}: {} machines, {} stations, {} tables, {} bins",
        file.display(),
        machines.len(),
        stations.len(),
        seatings.len(),
        bins.len()
    );

    Ok(BuiltRestaurant {
        restaurant,
        machines,
        stations,
        seatings,
        bins,
    })
}
