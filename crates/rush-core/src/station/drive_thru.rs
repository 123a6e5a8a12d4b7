//! Drive-through window.
//!
//! Same service loop as the counter, with cars instead of customers and
//! packages instead of food. Packages are consumed at the window. A finished
//! car lingers for `finish_delay` before it pulls away and the lane moves up.

use slotmap::SlotMap;

use crate::car::Car;
use crate::event::{Event, EventLog};
use crate::fixed::{Fixed64, Ticks};
use crate::id::{CarId, MoneyPileId, StackId, StationId};
use crate::item::Kind;
use crate::money::MoneyPile;
use crate::movement::{Vec2, Waypoints};
use crate::pool::UnitPool;
use crate::queue::{ServicePhase, ServiceQueue};
use crate::rng::SimRng;
use crate::stack::SinkStack;

use super::{StationRates, WorkSpot, has_worker};

pub struct DriveThruContext<'a> {
    pub stacks: &'a mut SlotMap<StackId, SinkStack>,
    pub money_piles: &'a mut SlotMap<MoneyPileId, MoneyPile>,
    pub cars: &'a mut SlotMap<CarId, Car>,
    pub pool: &'a mut UnitPool,
    pub rng: &'a mut SimRng,
    pub events: &'a mut EventLog,
    pub tick: Ticks,
    pub car_speed: Fixed64,
}

#[derive(Debug)]
pub struct DriveThru {
    pub unlock_level: u32,
    pub work_spot: WorkSpot,
    pub packages: StackId,
    pub money: MoneyPileId,
    queue: ServiceQueue<CarId>,
    lane: Waypoints,
    spawn: Vec2,
    exit: Vec2,
    rates: StationRates,
    order_range: (u32, u32),
    finish_delay: Fixed64,
    spawn_timer: Fixed64,
    serve_timer: Fixed64,
    /// Counts down once the front car's order is complete.
    finishing: Option<Fixed64>,
}

impl DriveThru {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        unlock_level: u32,
        work_spot: WorkSpot,
        packages: StackId,
        money: MoneyPileId,
        lane: Waypoints,
        spawn: Vec2,
        exit: Vec2,
        queue_capacity: usize,
        order_range: (u32, u32),
        finish_delay: Fixed64,
        rates: StationRates,
    ) -> Self {
        Self {
            unlock_level,
            work_spot,
            packages,
            money,
            queue: ServiceQueue::new(queue_capacity),
            lane,
            spawn,
            exit,
            rates,
            order_range,
            finish_delay,
            spawn_timer: Fixed64::ZERO,
            serve_timer: Fixed64::ZERO,
            finishing: None,
        }
    }

    pub fn queue(&self) -> &ServiceQueue<CarId> {
        &self.queue
    }

    pub fn rates(&self) -> StationRates {
        self.rates
    }

    pub fn set_rates(&mut self, rates: StationRates) {
        self.rates = rates;
    }

    pub fn tick(&mut self, id: StationId, dt: Fixed64, ctx: &mut DriveThruContext<'_>) {
        if self.unlock_level == 0 {
            return;
        }
        self.tick_spawn(id, dt, ctx);
        self.tick_service(id, dt, ctx);
    }

    fn tick_spawn(&mut self, id: StationId, dt: Fixed64, ctx: &mut DriveThruContext<'_>) {
        if self.queue.is_full() {
            self.spawn_timer = Fixed64::ZERO;
            return;
        }
        self.spawn_timer += dt;
        if self.spawn_timer < self.rates.spawn_interval {
            return;
        }
        self.spawn_timer = Fixed64::ZERO;
        let position = self.queue.len();
        let car = Car::new(id, self.spawn, ctx.car_speed, &self.lane, position);
        let car_id = ctx.cars.insert(car);
        if self.queue.push_back(car_id).is_err() {
            ctx.cars.remove(car_id);
            return;
        }
        log::debug!("drive-through {id:?}: car {car_id:?} joins at {position}");
        ctx.events.push(Event::ConsumerSpawned {
            station: id,
            tick: ctx.tick,
        });
    }

    fn tick_service(&mut self, id: StationId, dt: Fixed64, ctx: &mut DriveThruContext<'_>) {
        let Some(front_id) = self.queue.front() else {
            self.serve_timer = Fixed64::ZERO;
            return;
        };
        let Some(front) = ctx.cars.get_mut(front_id) else {
            self.queue.dequeue_front();
            self.reflow(ctx);
            return;
        };

        if front.phase() == ServicePhase::AwaitingOrder {
            let (low, high) = self.order_range;
            let count = ctx.rng.range(low, high);
            front.place_order(count);
            ctx.events.push(Event::OrderPlaced {
                station: id,
                count,
                tick: ctx.tick,
            });
        }

        self.serve_timer = (self.serve_timer + dt).min(self.rates.serve_interval);

        match front.phase() {
            ServicePhase::Ordered if self.serve_timer >= self.rates.serve_interval => {
                if !has_worker(self.unlock_level, &self.work_spot) {
                    return;
                }
                let Some(package) = ctx.stacks.get_mut(self.packages).and_then(SinkStack::remove_top) else {
                    return;
                };
                ctx.pool.release(package);
                let remaining = front.receive();
                self.serve_timer = Fixed64::ZERO;
                ctx.events.push(Event::UnitServed {
                    station: id,
                    kind: Kind::Package,
                    remaining,
                    tick: ctx.tick,
                });
                if let Some(pile) = ctx.money_piles.get_mut(self.money) {
                    for _ in 0..self.rates.sell_price {
                        pile.add_money(ctx.pool);
                    }
                    ctx.events.push(Event::PaymentMinted {
                        station: id,
                        amount: self.rates.sell_price,
                        tick: ctx.tick,
                    });
                }
            }
            ServicePhase::Served => {
                let left = self.finishing.unwrap_or(self.finish_delay) - dt;
                if left > Fixed64::ZERO {
                    self.finishing = Some(left);
                    return;
                }
                self.finishing = None;
                front.leave(self.exit);
                self.queue.dequeue_front();
                self.serve_timer = Fixed64::ZERO;
                self.reflow(ctx);
                log::debug!("drive-through {id:?}: car {front_id:?} pulls away");
            }
            _ => {}
        }
    }

    fn reflow(&self, ctx: &mut DriveThruContext<'_>) {
        self.queue.reflow(|car, position| {
            if let Some(c) = ctx.cars.get_mut(car) {
                c.assign_slot(position, self.lane.point(position));
            }
        });
    }
}
