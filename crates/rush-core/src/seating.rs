//! Tables, seats and the meal cycle.
//!
//! A table fills up seat by seat. Once every seat is taken and every diner
//! has put its food down, the table eats one unit per `eat_time / foods`
//! seconds; each eaten unit becomes a piece of trash and may leave a tip.
//! The trash is dropped on the table's trash pile, then the diners leave one
//! by one. A table with trash on it takes no new diners.

use slotmap::SlotMap;

use crate::fixed::{Fixed64, Ticks};
use crate::customer::Customer;
use crate::event::{Event, EventLog};
use crate::id::{CustomerId, MoneyPileId, PileId, SeatingId};
use crate::item::{Kind, Unit};
use crate::money::MoneyPile;
use crate::movement::Vec2;
use crate::pile::SourcePile;
use crate::pool::UnitPool;
use crate::rng::SimRng;

// ---------------------------------------------------------------------------
// Seat lookup
// ---------------------------------------------------------------------------

/// A reserved seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatAssignment {
    pub seating: SeatingId,
    pub seat: usize,
    pub position: Vec2,
}

/// Downstream capacity for served customers.
pub trait SeatFinder {
    /// Reserve a seat for `customer`, or `None` if every table is busy.
    fn find_seat(&mut self, customer: CustomerId, rng: &mut SimRng) -> Option<SeatAssignment>;
}

/// Seat lookup over the restaurant's tables: a partly filled table first,
/// otherwise a random empty one.
pub struct SeatingPlan<'a> {
    seatings: &'a mut SlotMap<SeatingId, Seating>,
    piles: &'a SlotMap<PileId, SourcePile>,
}

impl<'a> SeatingPlan<'a> {
    pub fn new(
        seatings: &'a mut SlotMap<SeatingId, Seating>,
        piles: &'a SlotMap<PileId, SourcePile>,
    ) -> Self {
        Self { seatings, piles }
    }

    fn trash_on(&self, table: &Seating) -> u32 {
        self.piles.get(table.trash).map_or(0, SourcePile::count)
    }
}

impl SeatFinder for SeatingPlan<'_> {
    fn find_seat(&mut self, customer: CustomerId, rng: &mut SimRng) -> Option<SeatAssignment> {
        let semi_full = self
            .seatings
            .iter()
            .find(|(_, t)| t.is_semi_full(self.trash_on(t)))
            .map(|(id, _)| id);
        let chosen = match semi_full {
            Some(id) => id,
            None => {
                let empty: Vec<SeatingId> = self
                    .seatings
                    .iter()
                    .filter(|(_, t)| t.is_empty(self.trash_on(t)))
                    .map(|(id, _)| id)
                    .collect();
                empty[rng.pick(empty.len())?]
            }
        };
        let table = self.seatings.get_mut(chosen)?;
        let seat = table.reserve(customer)?;
        Some(SeatAssignment {
            seating: chosen,
            seat,
            position: table.seats[seat],
        })
    }
}

/// Where a table's fixtures stand.
#[derive(Debug, Clone)]
pub struct SeatingSite {
    pub level: u32,
    pub seats: Vec<Vec2>,
    pub trash_pile: Vec2,
    pub money_pile: Vec2,
}

// ---------------------------------------------------------------------------
// Table state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePhase {
    /// Taking diners.
    Waiting,
    Eating { timer: Fixed64, per_food: Fixed64 },
    Littering { timer: Fixed64 },
    Dismissing { timer: Fixed64, delay: Fixed64 },
}

/// Live numbers for a table, re-derived on unlock or profit changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatingRates {
    pub eat_time: Fixed64,
    pub tip_chance: Fixed64,
    pub tip_range: (u32, u32),
}

/// Fixed timings of the meal cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MealTimings {
    pub trash_interval: Fixed64,
    pub leave_delay_step: Fixed64,
    pub leave_delay_range: (u32, u32),
}

pub struct SeatingContext<'a> {
    pub piles: &'a mut SlotMap<PileId, SourcePile>,
    pub money_piles: &'a mut SlotMap<MoneyPileId, MoneyPile>,
    pub customers: &'a mut SlotMap<CustomerId, Customer>,
    pub pool: &'a mut UnitPool,
    pub rng: &'a mut SimRng,
    pub events: &'a mut EventLog,
    pub tick: Ticks,
}

#[derive(Debug)]
pub struct Seating {
    pub unlock_level: u32,
    pub trash: PileId,
    pub money: MoneyPileId,
    seats: Vec<Vec2>,
    diners: Vec<Option<CustomerId>>,
    ready: Vec<bool>,
    plates: Vec<Unit>,
    pending_trash: u32,
    phase: TablePhase,
    rates: SeatingRates,
    timings: MealTimings,
}

impl Seating {
    pub fn new(
        unlock_level: u32,
        seats: Vec<Vec2>,
        trash: PileId,
        money: MoneyPileId,
        rates: SeatingRates,
        timings: MealTimings,
    ) -> Self {
        let n = seats.len();
        Self {
            unlock_level,
            trash,
            money,
            seats,
            diners: vec![None; n],
            ready: vec![false; n],
            plates: Vec::new(),
            pending_trash: 0,
            phase: TablePhase::Waiting,
            rates,
            timings,
        }
    }

    pub fn seat_count(&self) -> u32 {
        self.seats.len() as u32
    }

    pub fn diner_count(&self) -> u32 {
        self.diners.iter().filter(|d| d.is_some()).count() as u32
    }

    pub fn plates(&self) -> u32 {
        self.plates.len() as u32
    }

    pub fn phase(&self) -> TablePhase {
        self.phase
    }

    pub fn rates(&self) -> SeatingRates {
        self.rates
    }

    pub fn set_rates(&mut self, rates: SeatingRates) {
        self.rates = rates;
    }

    fn accepting(&self, trash: u32) -> bool {
        self.unlock_level > 0 && trash == 0 && self.phase == TablePhase::Waiting
    }

    /// Some seats taken, some free, no trash.
    pub fn is_semi_full(&self, trash: u32) -> bool {
        let diners = self.diner_count();
        self.accepting(trash) && diners > 0 && diners < self.seat_count()
    }

    /// No diners and no trash.
    pub fn is_empty(&self, trash: u32) -> bool {
        self.accepting(trash) && self.diner_count() == 0 && !self.seats.is_empty()
    }

    fn reserve(&mut self, customer: CustomerId) -> Option<usize> {
        let seat = self.diners.iter().position(Option::is_none)?;
        self.diners[seat] = Some(customer);
        self.ready[seat] = false;
        Some(seat)
    }

    pub(crate) fn place_food(&mut self, food: Unit) {
        self.plates.push(food);
    }

    pub(crate) fn mark_ready(&mut self, seat: usize) {
        if let Some(r) = self.ready.get_mut(seat) {
            *r = true;
        }
    }

    fn all_seated_and_ready(&self) -> bool {
        !self.seats.is_empty()
            && self.diners.iter().all(Option::is_some)
            && self.ready.iter().all(|r| *r)
    }

    fn leave_delay(&self, rng: &mut SimRng) -> Fixed64 {
        let (low, high) = self.timings.leave_delay_range;
        self.timings.leave_delay_step * Fixed64::from_num(rng.range(low, high))
    }

    pub fn tick(&mut self, id: SeatingId, dt: Fixed64, ctx: &mut SeatingContext<'_>) {
        if self.unlock_level == 0 {
            return;
        }
        match self.phase {
            TablePhase::Waiting => {
                if self.all_seated_and_ready() && !self.plates.is_empty() {
                    let per_food = self.rates.eat_time / Fixed64::from_num(self.plates.len());
                    self.phase = TablePhase::Eating {
                        timer: Fixed64::ZERO,
                        per_food,
                    };
                }
            }
            TablePhase::Eating { timer, per_food } => {
                let mut timer = timer + dt;
                if timer >= per_food {
                    timer = Fixed64::ZERO;
                    self.eat_one(id, ctx);
                }
                self.phase = if self.plates.is_empty() {
                    TablePhase::Littering {
                        timer: Fixed64::ZERO,
                    }
                } else {
                    TablePhase::Eating { timer, per_food }
                };
            }
            TablePhase::Littering { timer } => {
                let mut timer = timer + dt;
                if timer >= self.timings.trash_interval {
                    timer = Fixed64::ZERO;
                    if self.pending_trash > 0 {
                        if let Some(pile) = ctx.piles.get_mut(self.trash) {
                            pile.add(ctx.pool.acquire(Kind::Trash));
                        }
                        self.pending_trash -= 1;
                    }
                }
                self.phase = if self.pending_trash == 0 {
                    TablePhase::Dismissing {
                        timer: Fixed64::ZERO,
                        delay: self.leave_delay(ctx.rng),
                    }
                } else {
                    TablePhase::Littering { timer }
                };
            }
            TablePhase::Dismissing { timer, delay } => {
                let timer = timer + dt;
                if timer < delay {
                    self.phase = TablePhase::Dismissing { timer, delay };
                    return;
                }
                if let Some(seat) = self.diners.iter().rposition(Option::is_some) {
                    if let Some(customer) = self.diners[seat].take().and_then(|c| ctx.customers.get_mut(c)) {
                        customer.leave();
                    }
                    self.ready[seat] = false;
                }
                self.phase = if self.diner_count() == 0 {
                    TablePhase::Waiting
                } else {
                    TablePhase::Dismissing {
                        timer: Fixed64::ZERO,
                        delay: self.leave_delay(ctx.rng),
                    }
                };
            }
        }
    }

    fn eat_one(&mut self, id: SeatingId, ctx: &mut SeatingContext<'_>) {
        let Some(food) = self.plates.pop() else {
            return;
        };
        ctx.pool.release(food);
        self.pending_trash += 1;
        if !ctx.rng.chance(self.rates.tip_chance) {
            return;
        }
        let (low, high) = self.rates.tip_range;
        let amount = ctx.rng.range(low, high);
        if let Some(pile) = ctx.money_piles.get_mut(self.money) {
            for _ in 0..amount {
                pile.add_money(ctx.pool);
            }
        }
        ctx.events.push(Event::TipLeft {
            seating: id,
            amount,
            tick: ctx.tick,
        });
    }
}
