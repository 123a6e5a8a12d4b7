//! Walk-in customers.
//!
//! A customer walks to its queue slot, orders when it reaches the front,
//! collects its food, waits a moment, walks to the seat it was given, puts
//! the food on the table one unit at a time and then waits for the table to
//! finish eating. The table sends it home.

use slotmap::SlotMap;

use crate::carried::CarriedStack;
use crate::fixed::Fixed64;
use crate::id::{SeatingId, StationId};
use crate::item::{KindOffsets, Unit};
use crate::movement::{Mover, Vec2};
use crate::pool::UnitPool;
use crate::queue::{Order, ServicePhase};
use crate::seating::{SeatAssignment, Seating};

/// Resumption point of a customer's visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Lining,
    WaitingToWalk { seat: SeatAssignment, remaining: Fixed64 },
    WalkingToSeat { seat: SeatAssignment },
    Unpacking { seat: SeatAssignment, timer: Fixed64 },
    Dining { seat: SeatAssignment },
    Leaving,
    Gone,
}

/// What a frame of a customer's visit produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerOutcome {
    Idle,
    Seated(SeatingId),
    Departed,
}

pub struct CustomerContext<'a> {
    pub seatings: &'a mut SlotMap<SeatingId, Seating>,
    pub pool: &'a mut UnitPool,
    pub place_interval: Fixed64,
}

#[derive(Debug)]
pub struct Customer {
    pub station: StationId,
    pub mover: Mover,
    phase: ServicePhase,
    order: Option<Order>,
    queue_position: usize,
    carried: CarriedStack,
    visit: Visit,
    exit: Vec2,
}

impl Customer {
    pub fn new(
        station: StationId,
        spawn: Vec2,
        speed: Fixed64,
        exit: Vec2,
        offsets: KindOffsets,
    ) -> Self {
        Self {
            station,
            mover: Mover::new(spawn, speed),
            phase: ServicePhase::Queued,
            order: None,
            queue_position: 0,
            carried: CarriedStack::new(offsets),
            visit: Visit::Lining,
            exit,
        }
    }

    pub fn phase(&self) -> ServicePhase {
        self.phase
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn queue_position(&self) -> usize {
        self.queue_position
    }

    pub fn visit(&self) -> Visit {
        self.visit
    }

    /// Food in hand.
    pub fn carried_height(&self) -> u32 {
        self.carried.height()
    }

    /// Move to queue slot `position` at `point`.
    pub fn assign_slot(&mut self, position: usize, point: Vec2) {
        self.queue_position = position;
        self.mover.set_destination(point);
    }

    pub(crate) fn place_order(&mut self, count: u32) {
        assert_eq!(
            self.phase,
            ServicePhase::AwaitingOrder,
            "only the front customer orders"
        );
        self.order = Some(Order::new(count));
        self.phase = ServicePhase::Ordered;
    }

    /// Hand over one unit of the order. Returns what is still owed.
    pub(crate) fn receive(&mut self, unit: Unit) -> Result<u32, Unit> {
        let Some(order) = self.order.as_mut() else {
            panic!("served a customer that has not ordered");
        };
        self.carried.add(unit).map_err(|e| e.into_unit())?;
        let remaining = order.fill_one();
        if remaining == 0 {
            self.phase = ServicePhase::Served;
        }
        Ok(remaining)
    }

    pub(crate) fn route_to_seat(&mut self, seat: SeatAssignment, delay: Fixed64) {
        self.phase = ServicePhase::Routed;
        self.visit = Visit::WaitingToWalk {
            seat,
            remaining: delay,
        };
    }

    /// Sent home by the table.
    pub(crate) fn leave(&mut self) {
        self.phase = ServicePhase::Routed;
        self.visit = Visit::Leaving;
        self.mover.set_destination(self.exit);
    }

    /// Units still held when the customer is despawned.
    pub(crate) fn take_carried(&mut self) -> Vec<Unit> {
        self.carried.drain().collect()
    }

    pub fn tick(&mut self, dt: Fixed64, ctx: &mut CustomerContext<'_>) -> CustomerOutcome {
        match self.visit {
            Visit::Lining => {
                let arrived = self.mover.advance(dt);
                if arrived && self.queue_position == 0 && self.phase == ServicePhase::Queued {
                    self.phase = ServicePhase::AwaitingOrder;
                }
            }
            Visit::WaitingToWalk { seat, remaining } => {
                let remaining = remaining - dt;
                if remaining <= Fixed64::ZERO {
                    self.mover.set_destination(seat.position);
                    self.visit = Visit::WalkingToSeat { seat };
                } else {
                    self.visit = Visit::WaitingToWalk { seat, remaining };
                }
            }
            Visit::WalkingToSeat { seat } => {
                if self.mover.advance(dt) {
                    self.visit = Visit::Unpacking {
                        seat,
                        timer: Fixed64::ZERO,
                    };
                    return CustomerOutcome::Seated(seat.seating);
                }
            }
            Visit::Unpacking { seat, timer } => {
                let mut timer = timer + dt;
                if timer >= ctx.place_interval {
                    timer = Fixed64::ZERO;
                    if let Some(food) = self.carried.remove_top() {
                        match ctx.seatings.get_mut(seat.seating) {
                            Some(table) => table.place_food(food),
                            None => ctx.pool.release(food),
                        }
                    }
                }
                if self.carried.is_empty() {
                    if let Some(table) = ctx.seatings.get_mut(seat.seating) {
                        table.mark_ready(seat.seat);
                    }
                    self.visit = Visit::Dining { seat };
                } else {
                    self.visit = Visit::Unpacking { seat, timer };
                }
            }
            Visit::Dining { .. } => {}
            Visit::Leaving => {
                if self.mover.advance(dt) {
                    self.visit = Visit::Gone;
                    self.phase = ServicePhase::Removed;
                    return CustomerOutcome::Departed;
                }
            }
            Visit::Gone => {}
        }
        CustomerOutcome::Idle
    }
}
