//! Rush Core -- the simulation core of a restaurant tycoon game.
//!
//! Food machines fill piles, actors carry units to station stacks, stations
//! serve queued customers and cars, tables turn food into trash and tips, and
//! money piles pay out to the ledger. Every transfer moves exactly one unit.
//!
//! # Frame Pipeline
//!
//! Each call to [`restaurant::Restaurant::step`] advances the restaurant by
//! one frame through the following phases:
//!
//! 1. **Upgrades** -- Re-derive rates when the ledger revision changed.
//! 2. **Containers** -- Player-adjacent piles, stacks, bins, money piles and
//!    the unlock buyer transfer one unit per interval.
//! 3. **Producers** -- Food machines fill their piles.
//! 4. **Stations** -- Counters, drive-throughs, packing tables and tables.
//! 5. **Actors** -- Player, customers, cars and employees move and act.
//! 6. **Bookkeeping** -- Increment the frame counter and compute the state hash.
//!
//! # Key Types
//!
//! - [`restaurant::Restaurant`] -- Owns every fixture and runs the pipeline.
//! - [`pool::UnitPool`] -- Recycles units per kind; never runs dry.
//! - [`pile::SourcePile`], [`stack::SinkStack`], [`carried::CarriedStack`],
//!   [`money::MoneyPile`] -- The four container shapes.
//! - [`station::Station`] -- Counter, drive-through and packing table.
//! - [`ledger::Ledger`] -- Money and upgrade levels, owned by the host.
//! - [`rate`] -- Level-to-number formulas.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.

pub mod bin;
pub mod car;
pub mod carried;
pub mod config;
pub mod customer;
pub mod employee;
pub mod event;
pub mod fixed;
pub mod id;
pub mod item;
pub mod ledger;
pub mod machine;
pub mod money;
pub mod movement;
pub mod pile;
pub mod player;
pub mod pool;
pub mod queue;
pub mod rate;
pub mod restaurant;
pub mod rng;
pub mod seating;
pub mod sim;
pub mod stack;
pub mod station;
pub mod unlock;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
