//! The restaurant: owns every fixture, actor and container and drives them
//! through a fixed per-frame pipeline.
//!
//! # Frame pipeline
//!
//! Each `step()` runs:
//! 1. **Upgrades** -- poll the ledger revision; re-derive rates if it moved.
//! 2. **Containers** -- player-triggered transfers, money collection, trash
//!    bins, unlock payments, work-spot sensing.
//! 3. **Producers** -- food machines.
//! 4. **Stations** -- counters, drive-throughs, packing tables, tables.
//! 5. **Actors** -- player, customers, cars, employees.
//! 6. **Bookkeeping** -- frame counter and state hash.
//!
//! Every container mutation is a single push or pop; a transfer between two
//! containers checks headroom before it pops. Within a phase, fixtures run in
//! slotmap insertion order, so two employees racing for one pile resolve in
//! hiring order.

use slotmap::SlotMap;

use crate::bin::TrashBin;
use crate::car::Car;
use crate::config::{ConfigError, RestaurantConfig};
use crate::customer::{Customer, CustomerContext, CustomerOutcome};
use crate::employee::{ChoreTimings, Employee, EmployeeContext, EmployeeRates};
use crate::event::{Event, EventLog};
use crate::fixed::{Fixed64, Ticks, f64_to_fixed64};
use crate::id::*;
use crate::item::{Kind, KindOffsets};
use crate::ledger::{Ledger, LedgerError, RestaurantLedger, Upgrade};
use crate::machine::{FoodMachine, MachineRates};
use crate::money::{MoneyPile, MoneyRules};
use crate::movement::{Vec2, Waypoints, Zone};
use crate::pile::{GridLayout, SourcePile};
use crate::player::{Player, PlayerRates};
use crate::pool::UnitPool;
use crate::rate;
use crate::rng::SimRng;
use crate::seating::{MealTimings, Seating, SeatingContext, SeatingPlan, SeatingRates, SeatingSite};
use crate::sim::{AdvanceResult, SimState, SimulationStrategy, StateHash};
use crate::stack::SinkStack;
use crate::station::{
    Counter, CounterContext, CounterSite, DriveThru, DriveThruContext, DriveThruSite,
    PackingContext, PackingRates, PackingSite, PackingTable, Station, StationRates, WorkSpot,
};
use crate::unlock::{UnlockPlan, Unlockable};

/// Config values converted once to fixed point.
#[derive(Debug, Clone, Copy)]
struct Timings {
    frame: Fixed64,
    zone_radius: Fixed64,
    drop_interval: Fixed64,
    intake_interval: Fixed64,
    spawn_floor: Fixed64,
    customer_speed: Fixed64,
    car_speed: Fixed64,
    seat_walk_delay: Fixed64,
    place_interval: Fixed64,
    throw_interval: Fixed64,
    chores: ChoreTimings,
    meals: MealTimings,
}

impl Timings {
    fn from_config(config: &RestaurantConfig) -> Self {
        let s = &config.seating;
        Self {
            frame: config.frame(),
            zone_radius: f64_to_fixed64(config.containers.zone_radius),
            drop_interval: f64_to_fixed64(config.containers.pile_drop_interval),
            intake_interval: f64_to_fixed64(config.containers.stack_intake_interval),
            spawn_floor: f64_to_fixed64(config.spawn_interval_floor),
            customer_speed: f64_to_fixed64(config.customer_speed),
            car_speed: f64_to_fixed64(config.car_speed),
            seat_walk_delay: f64_to_fixed64(s.seat_walk_delay),
            place_interval: f64_to_fixed64(s.place_interval),
            throw_interval: f64_to_fixed64(config.player.transfer_interval),
            chores: ChoreTimings {
                transfer_interval: f64_to_fixed64(config.employee.transfer_interval),
                pause: f64_to_fixed64(config.employee.pause),
            },
            meals: MealTimings {
                trash_interval: f64_to_fixed64(s.trash_interval),
                leave_delay_step: f64_to_fixed64(s.leave_delay_step),
                leave_delay_range: (s.leave_delay_min, s.leave_delay_max),
            },
        }
    }
}

pub struct Restaurant {
    config: RestaurantConfig,
    strategy: SimulationStrategy,
    pub sim_state: SimState,
    timings: Timings,
    offsets: KindOffsets,
    layout: GridLayout,
    money_rules: MoneyRules,

    ledger: Box<dyn Ledger>,
    /// Ledger revision the current rates were derived from.
    seen_revision: u64,
    rng: SimRng,
    pool: UnitPool,
    events: EventLog,

    piles: SlotMap<PileId, SourcePile>,
    stacks: SlotMap<StackId, SinkStack>,
    money_piles: SlotMap<MoneyPileId, MoneyPile>,
    machines: SlotMap<MachineId, FoodMachine>,
    stations: SlotMap<StationId, Station>,
    seatings: SlotMap<SeatingId, Seating>,
    bins: SlotMap<BinId, TrashBin>,
    customers: SlotMap<CustomerId, Customer>,
    cars: SlotMap<CarId, Car>,
    employees: SlotMap<EmployeeId, Employee>,
    player: Player,
    unlocks: Option<UnlockPlan>,
    staff_room: Vec2,

    last_state_hash: u64,
}

impl std::fmt::Debug for Restaurant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Restaurant")
            .field("tick", &self.sim_state.tick)
            .field("money", &self.ledger.money())
            .field("stations", &self.stations.len())
            .field("customers", &self.customers.len())
            .field("cars", &self.cars.len())
            .field("employees", &self.employees.len())
            .finish_non_exhaustive()
    }
}

impl Restaurant {
    /// An empty restaurant with an in-memory ledger seeded from `config`.
    pub fn new(config: RestaurantConfig) -> Result<Self, ConfigError> {
        let ledger = RestaurantLedger::new(config.starting_money, config.upgrade_price.curve());
        Self::with_ledger(config, Box::new(ledger))
    }

    /// An empty restaurant reading progression from an external ledger.
    pub fn with_ledger(config: RestaurantConfig, ledger: Box<dyn Ledger>) -> Result<Self, ConfigError> {
        config.validate()?;
        let timings = Timings::from_config(&config);
        let offsets = config.containers.offsets();
        let mut pool = UnitPool::new();
        pool.prewarm(Kind::Food, config.pool.food);
        pool.prewarm(Kind::Trash, config.pool.trash);
        pool.prewarm(Kind::Package, config.pool.package);
        pool.prewarm(Kind::Money, config.pool.money);

        let player_rates = player_rates(&config, ledger.as_ref());
        let mut restaurant = Self {
            strategy: SimulationStrategy::Tick,
            sim_state: SimState::new(),
            timings,
            offsets,
            layout: config.containers.layout(),
            money_rules: config.containers.money_rules(),
            seen_revision: ledger.revision(),
            ledger,
            rng: SimRng::new(config.seed),
            pool,
            events: EventLog::new(config.event_capacity),
            piles: SlotMap::with_key(),
            stacks: SlotMap::with_key(),
            money_piles: SlotMap::with_key(),
            machines: SlotMap::with_key(),
            stations: SlotMap::with_key(),
            seatings: SlotMap::with_key(),
            bins: SlotMap::with_key(),
            customers: SlotMap::with_key(),
            cars: SlotMap::with_key(),
            employees: SlotMap::with_key(),
            player: Player::new(Vec2::default(), player_rates, offsets),
            unlocks: None,
            staff_room: Vec2::default(),
            last_state_hash: 0,
            config,
        };
        restaurant.refresh_rates();
        Ok(restaurant)
    }

    /// Switch between one-frame-per-call and real-time stepping.
    pub fn set_strategy(&mut self, strategy: SimulationStrategy) {
        self.strategy = strategy;
    }

    pub fn config(&self) -> &RestaurantConfig {
        &self.config
    }

    fn zone(&self, center: Vec2) -> Zone {
        Zone::around(center, self.timings.zone_radius)
    }

    fn new_pile(&mut self, kind: Kind, at: Vec2) -> PileId {
        let pile = SourcePile::new(kind, self.layout, self.timings.drop_interval, self.zone(at));
        self.piles.insert(pile)
    }

    fn new_stack(&mut self, kind: Kind, at: Vec2) -> StackId {
        let stack = SinkStack::new(
            kind,
            0,
            self.offsets.get(kind),
            self.timings.intake_interval,
            self.zone(at),
        );
        self.stacks.insert(stack)
    }

    fn new_money_pile(&mut self, at: Vec2) -> MoneyPileId {
        let pile = MoneyPile::new(self.money_rules, self.layout, self.zone(at));
        self.money_piles.insert(pile)
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    pub fn add_food_machine(&mut self, position: Vec2, level: u32) -> MachineId {
        let pile = self.new_pile(Kind::Food, position);
        let rates = MachineRates::derive(&self.config.machine, level);
        let id = self.machines.insert(FoodMachine::new(level, pile, rates));
        self.refresh_rates();
        id
    }

    pub fn add_counter(&mut self, site: CounterSite) -> StationId {
        let food = self.new_stack(Kind::Food, site.food_stack);
        let money = self.new_money_pile(site.money_pile);
        let cfg = &self.config.counter;
        let rates = StationRates::derive(cfg, site.level, 0, self.timings.spawn_floor);
        let counter = Counter::new(
            site.level,
            WorkSpot::new(self.zone(site.work_spot)),
            food,
            money,
            Waypoints::new(site.queue),
            site.spawn,
            site.exit,
            cfg.queue_capacity,
            (cfg.min_order, cfg.max_order),
            rates,
        );
        let id = self.stations.insert(Station::Counter(counter));
        self.refresh_rates();
        id
    }

    pub fn add_drive_thru(&mut self, site: DriveThruSite) -> StationId {
        let packages = self.new_stack(Kind::Package, site.package_stack);
        let money = self.new_money_pile(site.money_pile);
        let cfg = self.config.drive_thru.as_station();
        let rates = StationRates::derive(&cfg, site.level, 0, self.timings.spawn_floor);
        let drive_thru = DriveThru::new(
            site.level,
            WorkSpot::new(self.zone(site.work_spot)),
            packages,
            money,
            Waypoints::new(site.lane),
            site.spawn,
            site.exit,
            cfg.queue_capacity,
            (cfg.min_order, cfg.max_order),
            f64_to_fixed64(cfg.finish_delay),
            rates,
        );
        let id = self.stations.insert(Station::DriveThru(drive_thru));
        self.refresh_rates();
        id
    }

    pub fn add_packing_table(&mut self, site: PackingSite) -> StationId {
        let food = self.new_stack(Kind::Food, site.food_stack);
        let packages = self.new_pile(Kind::Package, site.package_pile);
        let table = PackingTable::new(
            site.level,
            WorkSpot::new(self.zone(site.work_spot)),
            food,
            packages,
            &self.config.packing,
        );
        let id = self.stations.insert(Station::Packing(table));
        self.refresh_rates();
        id
    }

    pub fn add_seating(&mut self, site: SeatingSite) -> SeatingId {
        let trash = self.new_pile(Kind::Trash, site.trash_pile);
        let money = self.new_money_pile(site.money_pile);
        let seats = site.seats.len() as u32;
        let rates = seating_rates(&self.config, site.level, seats, 0);
        let seating = Seating::new(site.level, site.seats, trash, money, rates, self.timings.meals);
        let id = self.seatings.insert(seating);
        self.refresh_rates();
        id
    }

    pub fn add_trash_bin(&mut self, position: Vec2) -> BinId {
        let bin = TrashBin::new(self.zone(position), self.timings.throw_interval);
        self.bins.insert(bin)
    }

    /// Install the unlock buyer and the order fixtures are sold in.
    pub fn set_unlock_plan(&mut self, buyer: Vec2, order: Vec<Unlockable>) -> &mut UnlockPlan {
        let plan = UnlockPlan::new(
            self.zone(buyer),
            order,
            self.config.unlock_price.curve(),
            f64_to_fixed64(self.config.unlock_pay_interval),
            f64_to_fixed64(self.config.unlock_pay_duration),
        );
        self.unlocks.insert(plan)
    }

    /// Where hired employees appear.
    pub fn set_staff_room(&mut self, position: Vec2) {
        self.staff_room = position;
    }

    // -----------------------------------------------------------------------
    // Host input
    // -----------------------------------------------------------------------

    pub fn place_player(&mut self, position: Vec2) {
        self.player.place(position);
    }

    pub fn player_walk_to(&mut self, destination: Vec2) {
        self.player.walk_to(destination);
    }

    /// External worker-presence signal for a station's work spot.
    pub fn set_work_spot_occupied(&mut self, station: StationId, occupied: bool) -> bool {
        match self.stations.get_mut(station) {
            Some(s) => {
                s.work_spot_mut().set_occupied(occupied);
                true
            }
            None => false,
        }
    }

    /// Buy the next level of `upgrade`. Rates follow on the next frame.
    pub fn purchase_upgrade(&mut self, upgrade: Upgrade) -> Result<u32, LedgerError> {
        match self.ledger.purchase_upgrade(upgrade) {
            Ok(level) => {
                log::info!("upgrade {upgrade:?} bought, now level {level}");
                self.events.push(Event::UpgradePurchased {
                    upgrade,
                    level,
                    tick: self.sim_state.tick,
                });
                Ok(level)
            }
            Err(err) => {
                log::warn!("upgrade {upgrade:?} rejected: {err}");
                Err(err)
            }
        }
    }

    /// Raise a fixture's unlock level by one. Returns the new level.
    pub fn unlock(&mut self, target: Unlockable) -> Option<u32> {
        let level = match target {
            Unlockable::Station(id) => {
                let level = self.stations.get_mut(id)?.unlock_level_mut();
                *level += 1;
                *level
            }
            Unlockable::Machine(id) => {
                let machine = self.machines.get_mut(id)?;
                machine.unlock_level += 1;
                machine.unlock_level
            }
            Unlockable::Seating(id) => {
                let seating = self.seatings.get_mut(id)?;
                seating.unlock_level += 1;
                seating.unlock_level
            }
        };
        log::info!("{target:?} unlocked to level {level}");
        self.events.push(Event::Unlocked {
            target,
            level,
            tick: self.sim_state.tick,
        });
        self.refresh_rates();
        Some(level)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn tick(&self) -> Ticks {
        self.sim_state.tick
    }

    pub fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    pub fn money(&self) -> i64 {
        self.ledger.money()
    }

    pub fn pool(&self) -> &UnitPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut UnitPool {
        &mut self.pool
    }

    pub fn pile(&self, id: PileId) -> Option<&SourcePile> {
        self.piles.get(id)
    }

    pub fn stack(&self, id: StackId) -> Option<&SinkStack> {
        self.stacks.get(id)
    }

    pub fn stack_mut(&mut self, id: StackId) -> Option<&mut SinkStack> {
        self.stacks.get_mut(id)
    }

    pub fn pile_mut(&mut self, id: PileId) -> Option<&mut SourcePile> {
        self.piles.get_mut(id)
    }

    pub fn money_pile(&self, id: MoneyPileId) -> Option<&MoneyPile> {
        self.money_piles.get(id)
    }

    pub fn machine(&self, id: MachineId) -> Option<&FoodMachine> {
        self.machines.get(id)
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn seating(&self, id: SeatingId) -> Option<&Seating> {
        self.seatings.get(id)
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.get(id)
    }

    pub fn customers(&self) -> impl Iterator<Item = (CustomerId, &Customer)> {
        self.customers.iter()
    }

    pub fn car(&self, id: CarId) -> Option<&Car> {
        self.cars.get(id)
    }

    pub fn employees(&self) -> impl Iterator<Item = (EmployeeId, &Employee)> {
        self.employees.iter()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn unlock_plan(&self) -> Option<&UnlockPlan> {
        self.unlocks.as_ref()
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    /// Hash computed at the end of the last frame.
    pub fn state_hash(&self) -> u64 {
        self.last_state_hash
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Advance the simulation. In tick mode, runs exactly one frame; in delta
    /// mode, accumulates `dt` seconds and runs as many frames as fit.
    pub fn advance(&mut self, dt: Fixed64) -> AdvanceResult {
        let mut result = AdvanceResult::default();
        match self.strategy.clone() {
            SimulationStrategy::Tick => {
                self.step_internal(self.timings.frame);
                result.steps_run = 1;
            }
            SimulationStrategy::Delta { fixed_timestep } => {
                self.sim_state.accumulator += dt;
                if fixed_timestep <= Fixed64::ZERO {
                    return result;
                }
                while self.sim_state.accumulator >= fixed_timestep {
                    self.sim_state.accumulator -= fixed_timestep;
                    self.step_internal(fixed_timestep);
                    result.steps_run += 1;
                }
            }
        }
        result
    }

    /// Run a single frame of the configured length.
    pub fn step(&mut self) -> AdvanceResult {
        self.step_internal(self.timings.frame);
        AdvanceResult { steps_run: 1 }
    }

    /// Run `frames` frames.
    pub fn run(&mut self, frames: u64) {
        for _ in 0..frames {
            self.step_internal(self.timings.frame);
        }
    }

    fn step_internal(&mut self, dt: Fixed64) {
        self.phase_upgrades();
        self.phase_containers(dt);
        self.phase_producers(dt);
        self.phase_stations(dt);
        self.phase_actors(dt);
        self.phase_bookkeeping(dt);
    }

    // -----------------------------------------------------------------------
    // Phase 1: upgrades
    // -----------------------------------------------------------------------

    fn phase_upgrades(&mut self) {
        if self.ledger.revision() != self.seen_revision {
            self.refresh_rates();
        }
    }

    /// Re-derive every rate-dependent number from unlock and upgrade levels.
    fn refresh_rates(&mut self) {
        let ledger = self.ledger.as_ref();
        let profit = ledger.upgrade_level(Upgrade::Profit);
        let floor = self.timings.spawn_floor;
        let drive_thru_cfg = self.config.drive_thru.as_station();

        for station in self.stations.values_mut() {
            let level = station.unlock_level();
            match station {
                Station::Counter(c) => {
                    let rates = StationRates::derive(&self.config.counter, level, profit, floor);
                    c.set_rates(rates);
                    configure_stack(&mut self.stacks, c.food, rates.stack_capacity, level > 0);
                }
                Station::DriveThru(d) => {
                    let rates = StationRates::derive(&drive_thru_cfg, level, profit, floor);
                    d.set_rates(rates);
                    configure_stack(&mut self.stacks, d.packages, rates.stack_capacity, level > 0);
                }
                Station::Packing(p) => {
                    let rates = PackingRates::derive(&self.config.packing, level);
                    p.set_rates(rates);
                    configure_stack(&mut self.stacks, p.food, rates.capacity, level > 0);
                    if let Some(pile) = self.piles.get_mut(p.packages) {
                        pile.set_enabled(level > 0);
                    }
                }
            }
        }

        for machine in self.machines.values_mut() {
            machine.set_rates(MachineRates::derive(&self.config.machine, machine.unlock_level));
            if let Some(pile) = self.piles.get_mut(machine.pile) {
                pile.set_enabled(machine.unlock_level > 0);
            }
        }

        for seating in self.seatings.values_mut() {
            let rates = seating_rates(&self.config, seating.unlock_level, seating.seat_count(), profit);
            seating.set_rates(rates);
        }

        let employee_rates = employee_rates(&self.config, ledger);
        for employee in self.employees.values_mut() {
            employee.set_rates(employee_rates);
        }
        self.player.set_rates(player_rates(&self.config, ledger));

        let wanted = ledger.upgrade_level(Upgrade::EmployeeAmount) as usize;
        while self.employees.len() < wanted {
            let employee = Employee::new(self.staff_room, employee_rates, self.offsets);
            let id = self.employees.insert(employee);
            log::info!("hired employee {id:?}");
            self.events.push(Event::EmployeeHired {
                employee: id,
                tick: self.sim_state.tick,
            });
        }

        self.seen_revision = self.ledger.revision();
    }

    // -----------------------------------------------------------------------
    // Phase 2: containers
    // -----------------------------------------------------------------------

    fn phase_containers(&mut self, dt: Fixed64) {
        let tick = self.sim_state.tick;
        let here = self.player.position();
        let capacity = self.player.capacity();

        for station in self.stations.values_mut() {
            station.work_spot_mut().sense([&here]);
        }

        for pile in self.piles.values_mut() {
            if !pile.is_enabled() {
                continue;
            }
            let adjacent = if pile.zone.contains(here) {
                Some((&mut self.player.carried, capacity))
            } else {
                None
            };
            if pile.tick_dispense(dt, adjacent).is_some() {
                log::trace!("player picked up {:?}", pile.kind());
                self.events.push(Event::UnitPickedUp {
                    kind: pile.kind(),
                    tick,
                });
            }
        }

        for stack in self.stacks.values_mut() {
            if !stack.is_enabled() {
                continue;
            }
            let adjacent = if stack.zone.contains(here) {
                Some(&mut self.player.carried)
            } else {
                None
            };
            if stack.tick_intake(dt, adjacent) {
                self.events.push(Event::UnitDeposited {
                    kind: stack.kind(),
                    tick,
                });
            }
        }

        for (id, pile) in self.money_piles.iter_mut() {
            let present = pile.zone().contains(here);
            let credited = pile.tick_collect(dt, present, self.ledger.as_mut(), &mut self.pool);
            if credited > 0 {
                self.events.push(Event::MoneyCollected {
                    pile: id,
                    amount: credited,
                    tick,
                });
            }
        }

        for bin in self.bins.values_mut() {
            let adjacent = if bin.zone.contains(here) {
                Some(&mut self.player.carried)
            } else {
                None
            };
            if let Some(kind) = bin.tick_throw(dt, adjacent, &mut self.pool) {
                self.events.push(Event::UnitDiscarded { kind, tick });
            }
        }

        let paid_off = match self.unlocks.as_mut() {
            Some(plan) => {
                let present = plan.zone.contains(here);
                plan.tick_payment(dt, present, self.ledger.as_mut())
            }
            None => None,
        };
        if let Some(target) = paid_off {
            self.unlock(target);
        }
    }

    // -----------------------------------------------------------------------
    // Phase 3: producers
    // -----------------------------------------------------------------------

    fn phase_producers(&mut self, dt: Fixed64) {
        let tick = self.sim_state.tick;
        for (id, machine) in self.machines.iter_mut() {
            let Some(pile) = self.piles.get_mut(machine.pile) else {
                continue;
            };
            if machine.tick(dt, pile, &mut self.pool) {
                self.events.push(Event::FoodProduced { machine: id, tick });
            }
        }
    }

    // -----------------------------------------------------------------------
    // Phase 4: stations
    // -----------------------------------------------------------------------

    fn phase_stations(&mut self, dt: Fixed64) {
        let tick = self.sim_state.tick;
        let timings = self.timings;

        for (id, station) in self.stations.iter_mut() {
            match station {
                Station::Counter(counter) => {
                    let mut seats = SeatingPlan::new(&mut self.seatings, &self.piles);
                    let mut ctx = CounterContext {
                        stacks: &mut self.stacks,
                        money_piles: &mut self.money_piles,
                        customers: &mut self.customers,
                        seats: &mut seats,
                        pool: &mut self.pool,
                        rng: &mut self.rng,
                        events: &mut self.events,
                        tick,
                        customer_speed: timings.customer_speed,
                        offsets: self.offsets,
                        seat_walk_delay: timings.seat_walk_delay,
                    };
                    counter.tick(id, dt, &mut ctx);
                }
                Station::DriveThru(drive_thru) => {
                    let mut ctx = DriveThruContext {
                        stacks: &mut self.stacks,
                        money_piles: &mut self.money_piles,
                        cars: &mut self.cars,
                        pool: &mut self.pool,
                        rng: &mut self.rng,
                        events: &mut self.events,
                        tick,
                        car_speed: timings.car_speed,
                    };
                    drive_thru.tick(id, dt, &mut ctx);
                }
                Station::Packing(table) => {
                    let mut ctx = PackingContext {
                        stacks: &mut self.stacks,
                        piles: &mut self.piles,
                        pool: &mut self.pool,
                        events: &mut self.events,
                        tick,
                    };
                    table.tick(id, dt, &mut ctx);
                }
            }
        }

        let mut ctx = SeatingContext {
            piles: &mut self.piles,
            money_piles: &mut self.money_piles,
            customers: &mut self.customers,
            pool: &mut self.pool,
            rng: &mut self.rng,
            events: &mut self.events,
            tick,
        };
        for (id, seating) in self.seatings.iter_mut() {
            seating.tick(id, dt, &mut ctx);
        }
    }

    // -----------------------------------------------------------------------
    // Phase 5: actors
    // -----------------------------------------------------------------------

    fn phase_actors(&mut self, dt: Fixed64) {
        let tick = self.sim_state.tick;
        self.player.tick(dt);

        let mut departed = Vec::new();
        {
            let mut ctx = CustomerContext {
                seatings: &mut self.seatings,
                pool: &mut self.pool,
                place_interval: self.timings.place_interval,
            };
            for (id, customer) in self.customers.iter_mut() {
                match customer.tick(dt, &mut ctx) {
                    CustomerOutcome::Seated(seating) => self.events.push(Event::CustomerSeated {
                        customer: id,
                        seating,
                        tick,
                    }),
                    CustomerOutcome::Departed => departed.push(id),
                    CustomerOutcome::Idle => {}
                }
            }
        }
        for id in departed {
            if let Some(mut customer) = self.customers.remove(id) {
                self.pool.release_all(customer.take_carried());
                log::debug!("customer {id:?} left");
                self.events.push(Event::CustomerDeparted { customer: id, tick });
            }
        }

        let gone: Vec<CarId> = self
            .cars
            .iter_mut()
            .filter_map(|(id, car)| car.tick(dt).then_some(id))
            .collect();
        for id in gone {
            self.cars.remove(id);
            self.events.push(Event::CarDeparted { car: id, tick });
        }

        let mut ctx = EmployeeContext {
            piles: &mut self.piles,
            stacks: &mut self.stacks,
            bins: &self.bins,
            pool: &mut self.pool,
            rng: &mut self.rng,
            events: &mut self.events,
            tick,
            timings: self.timings.chores,
        };
        for (id, employee) in self.employees.iter_mut() {
            employee.tick(id, dt, &mut ctx);
        }
    }

    // -----------------------------------------------------------------------
    // Phase 6: bookkeeping
    // -----------------------------------------------------------------------

    fn phase_bookkeeping(&mut self, dt: Fixed64) {
        self.sim_state.tick += 1;
        self.sim_state.elapsed += dt;
        self.last_state_hash = self.compute_state_hash();
    }

    fn compute_state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        h.write_u64(self.sim_state.tick);
        h.write_i64(self.ledger.money());
        h.write_u64(self.rng.state());
        for pile in self.piles.values() {
            h.write_u32(pile.count());
        }
        for stack in self.stacks.values() {
            h.write_u32(stack.count());
        }
        for pile in self.money_piles.values() {
            h.write_u32(pile.visible());
            h.write_u64(pile.hidden_amount());
        }
        for station in self.stations.values() {
            h.write_u32(station.unlock_level());
            h.write_u64(station.queue_len() as u64);
        }
        for customer in self.customers.values() {
            h.write_fixed64(customer.mover.position.x);
            h.write_fixed64(customer.mover.position.z);
            h.write_u32(customer.order().map_or(0, |o| o.remaining()));
        }
        for car in self.cars.values() {
            h.write_fixed64(car.mover.position.x);
            h.write_fixed64(car.mover.position.z);
            h.write_u32(car.order().map_or(0, |o| o.remaining()));
        }
        for employee in self.employees.values() {
            h.write_fixed64(employee.mover.position.x);
            h.write_fixed64(employee.mover.position.z);
            h.write_u32(employee.carried().height());
        }
        h.write_fixed64(self.player.position().x);
        h.write_fixed64(self.player.position().z);
        h.write_u32(self.player.carried.height());
        h.finish()
    }
}

fn configure_stack(stacks: &mut SlotMap<StackId, SinkStack>, id: StackId, capacity: u32, enabled: bool) {
    if let Some(stack) = stacks.get_mut(id) {
        stack.set_max_capacity(capacity);
        stack.set_enabled(enabled);
    }
}

fn seating_rates(config: &RestaurantConfig, level: u32, seats: u32, profit: u32) -> SeatingRates {
    let s = &config.seating;
    SeatingRates {
        eat_time: rate::eat_time(f64_to_fixed64(s.base_eat_time), level, seats),
        tip_chance: rate::tip_chance(f64_to_fixed64(s.tip_chance), f64_to_fixed64(s.tip_chance_step), level),
        tip_range: rate::tip_range(s.tip_min, s.tip_max, profit),
    }
}

fn employee_rates(config: &RestaurantConfig, ledger: &dyn Ledger) -> EmployeeRates {
    let e = &config.employee;
    EmployeeRates {
        capacity: rate::carry_capacity(
            e.base_capacity,
            e.capacity_step,
            ledger.upgrade_level(Upgrade::EmployeeCapacity),
        ),
        speed: rate::walk_speed(
            f64_to_fixed64(e.base_speed),
            f64_to_fixed64(e.speed_step),
            ledger.upgrade_level(Upgrade::EmployeeSpeed),
        ),
    }
}

fn player_rates(config: &RestaurantConfig, ledger: &dyn Ledger) -> PlayerRates {
    let p = &config.player;
    PlayerRates {
        capacity: rate::carry_capacity(
            p.base_capacity,
            p.capacity_step,
            ledger.upgrade_level(Upgrade::PlayerCapacity),
        ),
        speed: rate::walk_speed(
            f64_to_fixed64(p.base_speed),
            f64_to_fixed64(p.speed_step),
            ledger.upgrade_level(Upgrade::PlayerSpeed),
        ),
    }
}
