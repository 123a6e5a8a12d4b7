//! Simulation events and feedback cues.
//!
//! Everything observable that happens during a frame is recorded as an
//! [`Event`] in a pre-allocated ring buffer ([`EventLog`]) that the host
//! drains at its own pace. Events that a player would hear map to a [`Cue`].

use crate::employee::Chore;
use crate::fixed::Ticks;
use crate::id::*;
use crate::item::Kind;
use crate::ledger::Upgrade;
use crate::unlock::Unlockable;

// ---------------------------------------------------------------------------
// Cues
// ---------------------------------------------------------------------------

/// Audio feedback the host may play for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Pop,
    Trash,
    Bin,
    Money,
    Kaching,
}

impl Cue {
    /// The cue played when a unit of `kind` is picked up.
    pub fn pickup(kind: Kind) -> Cue {
        match kind {
            Kind::Food | Kind::Package => Cue::Pop,
            Kind::Trash => Cue::Trash,
            Kind::Money => Cue::Money,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A simulation event. All events carry the frame at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // -- Transfers --
    UnitPickedUp {
        kind: Kind,
        tick: Ticks,
    },
    UnitDeposited {
        kind: Kind,
        tick: Ticks,
    },
    UnitDiscarded {
        kind: Kind,
        tick: Ticks,
    },

    // -- Production --
    FoodProduced {
        machine: MachineId,
        tick: Ticks,
    },
    PackagePacked {
        station: StationId,
        tick: Ticks,
    },

    // -- Service --
    ConsumerSpawned {
        station: StationId,
        tick: Ticks,
    },
    OrderPlaced {
        station: StationId,
        count: u32,
        tick: Ticks,
    },
    UnitServed {
        station: StationId,
        kind: Kind,
        remaining: u32,
        tick: Ticks,
    },
    PaymentMinted {
        station: StationId,
        amount: u32,
        tick: Ticks,
    },
    CustomerSeated {
        customer: CustomerId,
        seating: SeatingId,
        tick: Ticks,
    },
    CustomerDeparted {
        customer: CustomerId,
        tick: Ticks,
    },
    CarDeparted {
        car: CarId,
        tick: Ticks,
    },
    TipLeft {
        seating: SeatingId,
        amount: u32,
        tick: Ticks,
    },

    // -- Money --
    MoneyCollected {
        pile: MoneyPileId,
        amount: u64,
        tick: Ticks,
    },

    // -- Employees --
    EmployeeHired {
        employee: EmployeeId,
        tick: Ticks,
    },
    ChoreStarted {
        employee: EmployeeId,
        chore: Chore,
        tick: Ticks,
    },
    ChoreAborted {
        employee: EmployeeId,
        chore: Chore,
        tick: Ticks,
    },
    ChoreFinished {
        employee: EmployeeId,
        chore: Chore,
        tick: Ticks,
    },

    // -- Progression --
    UpgradePurchased {
        upgrade: Upgrade,
        level: u32,
        tick: Ticks,
    },
    Unlocked {
        target: Unlockable,
        level: u32,
        tick: Ticks,
    },
}

impl Event {
    /// Feedback cue for this event, if any.
    pub fn cue(&self) -> Option<Cue> {
        match self {
            Event::UnitPickedUp { kind, .. } => Some(Cue::pickup(*kind)),
            Event::UnitDeposited { kind, .. } => Some(Cue::pickup(*kind)),
            Event::UnitDiscarded { .. } => Some(Cue::Bin),
            Event::MoneyCollected { .. } => Some(Cue::Money),
            Event::UpgradePurchased { .. } | Event::Unlocked { .. } => Some(Cue::Kaching),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// EventLog: pre-allocated ring buffer
// ---------------------------------------------------------------------------

/// A pre-allocated ring buffer for events. Fixed capacity; when full, the
/// oldest events are dropped.
#[derive(Debug)]
pub struct EventLog {
    events: Vec<Option<Event>>,
    /// Write position (wraps around).
    head: usize,
    len: usize,
    /// Total events ever written (including dropped).
    total_written: u64,
    /// Events overwritten before anyone drained them.
    dropped: u64,
}

impl EventLog {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            total_written: 0,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        } else {
            self.dropped += 1;
        }
        self.total_written += 1;
    }

    pub fn capacity(&self) -> usize {
        self.events.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Events that were overwritten before being drained.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Iterate over events from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        let start = if self.len < self.capacity() { 0 } else { self.head };
        let cap = self.capacity();
        (0..self.len).filter_map(move |i| self.events[(start + i) % cap].as_ref())
    }

    /// Take every stored event, oldest first, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Event> {
        let start = if self.len < self.capacity() { 0 } else { self.head };
        let cap = self.capacity();
        let mut out = Vec::with_capacity(self.len);
        for i in 0..self.len {
            if let Some(event) = self.events[(start + i) % cap].take() {
                out.push(event);
            }
        }
        self.head = 0;
        self.len = 0;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picked(tick: Ticks) -> Event {
        Event::UnitPickedUp {
            kind: Kind::Food,
            tick,
        }
    }

    #[test]
    fn ring_drops_oldest() {
        let mut log = EventLog::new(3);
        for t in 0..5 {
            log.push(picked(t));
        }
        let ticks: Vec<_> = log
            .iter()
            .map(|e| match e {
                Event::UnitPickedUp { tick, .. } => *tick,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(ticks, vec![2, 3, 4]);
        assert_eq!(log.dropped_count(), 2);
    }

    #[test]
    fn drain_empties_in_order() {
        let mut log = EventLog::new(4);
        log.push(picked(1));
        log.push(picked(2));
        let drained = log.drain();
        assert_eq!(drained, vec![picked(1), picked(2)]);
        assert!(log.is_empty());
        log.push(picked(3));
        assert_eq!(log.drain(), vec![picked(3)]);
    }

    #[test]
    fn pickup_cues_by_kind() {
        assert_eq!(Cue::pickup(Kind::Food), Cue::Pop);
        assert_eq!(Cue::pickup(Kind::Package), Cue::Pop);
        assert_eq!(Cue::pickup(Kind::Trash), Cue::Trash);
        let discard = Event::UnitDiscarded {
            kind: Kind::Trash,
            tick: 0,
        };
        assert_eq!(discard.cue(), Some(Cue::Bin));
    }

    #[test]
    fn drained_events_are_not_counted_as_dropped() {
        let mut log = EventLog::new(3);
        for t in 0..3 {
            log.push(picked(t));
        }
        assert_eq!(log.drain().len(), 3);
        for t in 3..6 {
            log.push(picked(t));
        }
        assert_eq!(log.total_written(), 6);
        assert_eq!(log.dropped_count(), 0);

        log.push(picked(6));
        assert_eq!(log.dropped_count(), 1);
        assert_eq!(log.len(), 3);
    }
}
