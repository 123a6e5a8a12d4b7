//! Walk-in counter.
//!
//! Spawns customers into a bounded line, takes the front customer's order,
//! serves it one food unit per serve interval while a worker is present, and
//! releases the customer to a seat once the order is complete. Every unit
//! served mints `sell_price` money units, one deposit at a time.

use slotmap::SlotMap;

use crate::customer::Customer;
use crate::event::{Event, EventLog};
use crate::fixed::{Fixed64, Ticks};
use crate::id::{CustomerId, MoneyPileId, StackId, StationId};
use crate::item::{Kind, KindOffsets};
use crate::money::MoneyPile;
use crate::movement::{Vec2, Waypoints};
use crate::pool::UnitPool;
use crate::queue::{ServicePhase, ServiceQueue};
use crate::rng::SimRng;
use crate::seating::SeatFinder;
use crate::stack::SinkStack;

use super::{StationRates, WorkSpot, has_worker};

pub struct CounterContext<'a> {
    pub stacks: &'a mut SlotMap<StackId, SinkStack>,
    pub money_piles: &'a mut SlotMap<MoneyPileId, MoneyPile>,
    pub customers: &'a mut SlotMap<CustomerId, Customer>,
    pub seats: &'a mut dyn SeatFinder,
    pub pool: &'a mut UnitPool,
    pub rng: &'a mut SimRng,
    pub events: &'a mut EventLog,
    pub tick: Ticks,
    pub customer_speed: Fixed64,
    pub offsets: KindOffsets,
    /// Pause between being released and walking to the seat.
    pub seat_walk_delay: Fixed64,
}

#[derive(Debug)]
pub struct Counter {
    pub unlock_level: u32,
    pub work_spot: WorkSpot,
    pub food: StackId,
    pub money: MoneyPileId,
    queue: ServiceQueue<CustomerId>,
    waypoints: Waypoints,
    spawn: Vec2,
    exit: Vec2,
    rates: StationRates,
    order_range: (u32, u32),
    spawn_timer: Fixed64,
    serve_timer: Fixed64,
}

impl Counter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        unlock_level: u32,
        work_spot: WorkSpot,
        food: StackId,
        money: MoneyPileId,
        waypoints: Waypoints,
        spawn: Vec2,
        exit: Vec2,
        queue_capacity: usize,
        order_range: (u32, u32),
        rates: StationRates,
    ) -> Self {
        Self {
            unlock_level,
            work_spot,
            food,
            money,
            queue: ServiceQueue::new(queue_capacity),
            waypoints,
            spawn,
            exit,
            rates,
            order_range,
            spawn_timer: Fixed64::ZERO,
            serve_timer: Fixed64::ZERO,
        }
    }

    pub fn queue(&self) -> &ServiceQueue<CustomerId> {
        &self.queue
    }

    pub fn rates(&self) -> StationRates {
        self.rates
    }

    pub fn set_rates(&mut self, rates: StationRates) {
        self.rates = rates;
    }

    pub fn waypoints(&self) -> &Waypoints {
        &self.waypoints
    }

    pub fn tick(&mut self, id: StationId, dt: Fixed64, ctx: &mut CounterContext<'_>) {
        if self.unlock_level == 0 {
            return;
        }
        self.tick_spawn(id, dt, ctx);
        self.tick_service(id, dt, ctx);
    }

    fn tick_spawn(&mut self, id: StationId, dt: Fixed64, ctx: &mut CounterContext<'_>) {
        if self.queue.is_full() {
            self.spawn_timer = Fixed64::ZERO;
            return;
        }
        self.spawn_timer += dt;
        if self.spawn_timer < self.rates.spawn_interval {
            return;
        }
        self.spawn_timer = Fixed64::ZERO;
        let mut customer = Customer::new(id, self.spawn, ctx.customer_speed, self.exit, ctx.offsets);
        let position = self.queue.len();
        customer.assign_slot(position, self.waypoints.point(position));
        let customer_id = ctx.customers.insert(customer);
        if self.queue.push_back(customer_id).is_err() {
            ctx.customers.remove(customer_id);
            return;
        }
        log::debug!("counter {id:?}: customer {customer_id:?} joins at {position}");
        ctx.events.push(Event::ConsumerSpawned {
            station: id,
            tick: ctx.tick,
        });
    }

    fn tick_service(&mut self, id: StationId, dt: Fixed64, ctx: &mut CounterContext<'_>) {
        let Some(front_id) = self.queue.front() else {
            self.serve_timer = Fixed64::ZERO;
            return;
        };
        let Some(front) = ctx.customers.get_mut(front_id) else {
            // Despawned externally; drop it from the line.
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

        // The timer saturates so a blocked station serves on the first frame
        // after the block clears.
        self.serve_timer = (self.serve_timer + dt).min(self.rates.serve_interval);

        match front.phase() {
            ServicePhase::Ordered if self.serve_timer >= self.rates.serve_interval => {
                if !has_worker(self.unlock_level, &self.work_spot) {
                    return;
                }
                let Some(stack) = ctx.stacks.get_mut(self.food) else {
                    return;
                };
                let Some(food) = stack.remove_top() else {
                    return;
                };
                let remaining = match front.receive(food) {
                    Ok(remaining) => remaining,
                    Err(food) => {
                        ctx.pool.release(food);
                        return;
                    }
                };
                self.serve_timer = Fixed64::ZERO;
                ctx.events.push(Event::UnitServed {
                    station: id,
                    kind: Kind::Food,
                    remaining,
                    tick: ctx.tick,
                });
                self.mint_payment(id, ctx);
            }
            ServicePhase::Served => {
                let Some(seat) = ctx.seats.find_seat(front_id, ctx.rng) else {
                    return;
                };
                if let Some(front) = ctx.customers.get_mut(front_id) {
                    front.route_to_seat(seat, ctx.seat_walk_delay);
                }
                self.queue.dequeue_front();
                self.reflow(ctx);
                log::debug!("counter {id:?}: customer {front_id:?} seated at {:?}", seat.seating);
            }
            _ => {}
        }
    }

    fn mint_payment(&self, id: StationId, ctx: &mut CounterContext<'_>) {
        let Some(pile) = ctx.money_piles.get_mut(self.money) else {
            return;
        };
        for _ in 0..self.rates.sell_price {
            pile.add_money(ctx.pool);
        }
        ctx.events.push(Event::PaymentMinted {
            station: id,
            amount: self.rates.sell_price,
            tick: ctx.tick,
        });
    }

    fn reflow(&self, ctx: &mut CounterContext<'_>) {
        self.queue.reflow(|customer, position| {
            if let Some(c) = ctx.customers.get_mut(customer) {
                c.assign_slot(position, self.waypoints.point(position));
            }
        });
    }
}
