//! Employees and their chore loop.
//!
//! An idle employee picks one of three chores at random. A chore binds a
//! source pile and a target, then runs as a linear state machine:
//!
//! ```text
//! Idle -> ToSource -> Gathering -> Resting -> ToTarget -> Delivering -> CoolingDown -> Idle
//! ```
//!
//! Walking to the source aborts if the pile runs dry on the way. Units
//! already carried are never dropped: an aborted chore leaves them in hand,
//! and only a chore of the same kind can be picked up next.

use slotmap::SlotMap;

use crate::bin::TrashBin;
use crate::carried::CarriedStack;
use crate::event::{Event, EventLog};
use crate::fixed::{Fixed64, Ticks};
use crate::id::{BinId, EmployeeId, PileId, StackId};
use crate::item::{Kind, KindOffsets};
use crate::movement::{Mover, Vec2};
use crate::pile::SourcePile;
use crate::pool::UnitPool;
use crate::rng::SimRng;
use crate::stack::SinkStack;

/// What an employee can be sent to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Chore {
    CleanTrash,
    RefillFood,
    RefillPackage,
}

impl Chore {
    pub const ALL: [Chore; 3] = [Chore::CleanTrash, Chore::RefillFood, Chore::RefillPackage];

    pub fn kind(self) -> Kind {
        match self {
            Chore::CleanTrash => Kind::Trash,
            Chore::RefillFood => Kind::Food,
            Chore::RefillPackage => Kind::Package,
        }
    }
}

/// Where a chore's units end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Stack(StackId),
    Bin(BinId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub chore: Chore,
    pub source: PileId,
    pub target: Target,
}

/// Resumption point of the chore loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errand {
    Idle,
    ToSource,
    Gathering { timer: Fixed64 },
    Resting { left: Fixed64 },
    ToTarget,
    Delivering { timer: Fixed64 },
    CoolingDown { left: Fixed64 },
}

/// Live numbers for employees, re-derived on upgrades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmployeeRates {
    pub capacity: u32,
    pub speed: Fixed64,
}

/// Fixed timings of the chore loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoreTimings {
    pub transfer_interval: Fixed64,
    pub pause: Fixed64,
}

pub struct EmployeeContext<'a> {
    pub piles: &'a mut SlotMap<PileId, SourcePile>,
    pub stacks: &'a mut SlotMap<StackId, SinkStack>,
    pub bins: &'a SlotMap<BinId, TrashBin>,
    pub pool: &'a mut UnitPool,
    pub rng: &'a mut SimRng,
    pub events: &'a mut EventLog,
    pub tick: Ticks,
    pub timings: ChoreTimings,
}

#[derive(Debug)]
pub struct Employee {
    pub mover: Mover,
    carried: CarriedStack,
    capacity: u32,
    errand: Errand,
    job: Option<Job>,
}

impl Employee {
    pub fn new(position: Vec2, rates: EmployeeRates, offsets: KindOffsets) -> Self {
        Self {
            mover: Mover::new(position, rates.speed),
            carried: CarriedStack::new(offsets),
            capacity: rates.capacity,
            errand: Errand::Idle,
            job: None,
        }
    }

    pub fn set_rates(&mut self, rates: EmployeeRates) {
        self.capacity = rates.capacity;
        self.mover.speed = rates.speed;
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn errand(&self) -> Errand {
        self.errand
    }

    pub fn job(&self) -> Option<Job> {
        self.job
    }

    pub fn carried(&self) -> &CarriedStack {
        &self.carried
    }

    /// Pick a chore. Returns `None` when the rolled chore has no valid
    /// source/target pair; the next idle frame rolls again.
    fn choose_job(&self, ctx: &mut EmployeeContext<'_>) -> Option<Job> {
        let chore = Chore::ALL[ctx.rng.pick(Chore::ALL.len())?];
        if self.carried.kind().is_some_and(|k| k != chore.kind()) {
            return None;
        }
        let sources: Vec<PileId> = ctx
            .piles
            .iter()
            .filter(|(_, p)| p.kind() == chore.kind() && p.is_enabled() && !p.is_empty())
            .map(|(id, _)| id)
            .collect();
        let targets: Vec<Target> = match chore {
            Chore::CleanTrash => ctx.bins.keys().map(Target::Bin).collect(),
            Chore::RefillFood | Chore::RefillPackage => ctx
                .stacks
                .iter()
                .filter(|(_, s)| s.kind() == chore.kind() && s.is_enabled() && !s.is_full())
                .map(|(id, _)| Target::Stack(id))
                .collect(),
        };
        let source = sources[ctx.rng.pick(sources.len())?];
        let target = targets[ctx.rng.pick(targets.len())?];
        Some(Job {
            chore,
            source,
            target,
        })
    }

    fn target_position(&self, target: Target, ctx: &EmployeeContext<'_>) -> Option<Vec2> {
        match target {
            Target::Stack(id) => ctx.stacks.get(id).map(|s| s.zone.center),
            Target::Bin(id) => ctx.bins.get(id).map(|b| b.zone.center),
        }
    }

    fn abort(&mut self, id: EmployeeId, job: Job, ctx: &mut EmployeeContext<'_>) {
        log::debug!("employee {id:?}: {:?} aborted", job.chore);
        ctx.events.push(Event::ChoreAborted {
            employee: id,
            chore: job.chore,
            tick: ctx.tick,
        });
        self.job = None;
        self.errand = Errand::Idle;
        self.mover.halt();
    }

    pub fn tick(&mut self, id: EmployeeId, dt: Fixed64, ctx: &mut EmployeeContext<'_>) {
        let timings = ctx.timings;
        let job = match (self.errand, self.job) {
            (Errand::Idle, _) => {
                let Some(job) = self.choose_job(ctx) else {
                    return;
                };
                let Some(source) = ctx.piles.get(job.source) else {
                    return;
                };
                self.mover.set_destination(source.zone.center);
                self.job = Some(job);
                self.errand = Errand::ToSource;
                log::debug!("employee {id:?}: starting {:?}", job.chore);
                ctx.events.push(Event::ChoreStarted {
                    employee: id,
                    chore: job.chore,
                    tick: ctx.tick,
                });
                return;
            }
            (_, Some(job)) => job,
            (_, None) => {
                self.errand = Errand::Idle;
                return;
            }
        };

        match self.errand {
            Errand::Idle => {}
            Errand::ToSource => {
                let depleted = ctx.piles.get(job.source).is_none_or(SourcePile::is_empty);
                if depleted {
                    self.abort(id, job, ctx);
                    return;
                }
                if self.mover.advance(dt) {
                    self.errand = Errand::Gathering {
                        timer: Fixed64::ZERO,
                    };
                }
            }
            Errand::Gathering { timer } => {
                let Some(pile) = ctx.piles.get_mut(job.source) else {
                    self.abort(id, job, ctx);
                    return;
                };
                if pile.is_empty() || !self.carried.accepts(job.chore.kind(), self.capacity) {
                    if self.carried.is_empty() {
                        self.abort(id, job, ctx);
                    } else {
                        self.errand = Errand::Resting { left: timings.pause };
                    }
                    return;
                }
                let mut timer = timer + dt;
                if timer >= timings.transfer_interval {
                    timer = Fixed64::ZERO;
                    if pile.remove_and_transfer_to(&mut self.carried, self.capacity).is_ok() {
                        log::trace!("employee {id:?}: picked up {:?}", job.chore.kind());
                        ctx.events.push(Event::UnitPickedUp {
                            kind: job.chore.kind(),
                            tick: ctx.tick,
                        });
                    }
                }
                self.errand = Errand::Gathering { timer };
            }
            Errand::Resting { left } => {
                let left = left - dt;
                if left > Fixed64::ZERO {
                    self.errand = Errand::Resting { left };
                    return;
                }
                match self.target_position(job.target, ctx) {
                    Some(pos) => {
                        self.mover.set_destination(pos);
                        self.errand = Errand::ToTarget;
                    }
                    None => self.abort(id, job, ctx),
                }
            }
            Errand::ToTarget => {
                if self.mover.advance(dt) {
                    self.errand = Errand::Delivering {
                        timer: Fixed64::ZERO,
                    };
                }
            }
            Errand::Delivering { timer } => {
                if self.carried.is_empty() {
                    self.errand = Errand::CoolingDown { left: timings.pause };
                    return;
                }
                let mut timer = timer + dt;
                if timer >= timings.transfer_interval {
                    timer = Fixed64::ZERO;
                    if !self.deliver_one(job, ctx) {
                        match job.target {
                            Target::Stack(stack) if ctx.stacks.contains_key(stack) => {}
                            _ => {
                                self.abort(id, job, ctx);
                                return;
                            }
                        }
                    }
                }
                self.errand = Errand::Delivering { timer };
            }
            Errand::CoolingDown { left } => {
                let left = left - dt;
                if left > Fixed64::ZERO {
                    self.errand = Errand::CoolingDown { left };
                    return;
                }
                ctx.events.push(Event::ChoreFinished {
                    employee: id,
                    chore: job.chore,
                    tick: ctx.tick,
                });
                self.job = None;
                self.errand = Errand::Idle;
            }
        }
    }

    /// Hand one unit to the target. A full stack keeps the unit with the
    /// employee until room appears.
    fn deliver_one(&mut self, job: Job, ctx: &mut EmployeeContext<'_>) -> bool {
        match job.target {
            Target::Stack(stack_id) => {
                let Some(stack) = ctx.stacks.get_mut(stack_id) else {
                    return false;
                };
                if stack.is_full() || self.carried.kind() != Some(stack.kind()) {
                    return false;
                }
                let Some(unit) = self.carried.remove_top() else {
                    return false;
                };
                let kind = unit.kind();
                if let Err(err) = stack.add(unit) {
                    let _ = self.carried.add(err.into_unit());
                    return false;
                }
                ctx.events.push(Event::UnitDeposited {
                    kind,
                    tick: ctx.tick,
                });
                true
            }
            Target::Bin(bin_id) => {
                let Some(bin) = ctx.bins.get(bin_id) else {
                    return false;
                };
                let Some(unit) = self.carried.remove_top() else {
                    return false;
                };
                let kind = bin.throw(unit, ctx.pool);
                ctx.events.push(Event::UnitDiscarded {
                    kind,
                    tick: ctx.tick,
                });
                true
            }
        }
    }
}
