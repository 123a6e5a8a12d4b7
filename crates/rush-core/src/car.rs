//! Drive-through cars.
//!
//! A car drives down the lane one waypoint at a time, from the entry end to
//! its own queue slot, and orders once it holds slot 0. Packages it receives
//! are consumed on the spot; after its order is complete the drive-through
//! sends it to the exit.

use std::collections::VecDeque;

use crate::fixed::Fixed64;
use crate::id::StationId;
use crate::movement::{Mover, Vec2, Waypoints};
use crate::queue::{Order, ServicePhase};

#[derive(Debug)]
pub struct Car {
    pub station: StationId,
    pub mover: Mover,
    phase: ServicePhase,
    order: Option<Order>,
    queue_position: usize,
    path: VecDeque<Vec2>,
}

impl Car {
    /// A car entering the lane bound for slot `position`.
    pub fn new(station: StationId, spawn: Vec2, speed: Fixed64, lane: &Waypoints, position: usize) -> Self {
        let path = (position..=lane.last_index().max(position))
            .rev()
            .map(|i| lane.point(i))
            .collect();
        Self {
            station,
            mover: Mover::new(spawn, speed),
            phase: ServicePhase::Queued,
            order: None,
            queue_position: position,
            path,
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

    /// Advance one slot after the car in front left.
    pub fn assign_slot(&mut self, position: usize, point: Vec2) {
        if position != self.queue_position {
            self.queue_position = position;
            self.path.push_back(point);
        }
    }

    pub(crate) fn place_order(&mut self, count: u32) {
        assert_eq!(
            self.phase,
            ServicePhase::AwaitingOrder,
            "only the front car orders"
        );
        self.order = Some(Order::new(count));
        self.phase = ServicePhase::Ordered;
    }

    /// Record one package handed through the window.
    pub(crate) fn receive(&mut self) -> u32 {
        let Some(order) = self.order.as_mut() else {
            panic!("served a car that has not ordered");
        };
        let remaining = order.fill_one();
        if remaining == 0 {
            self.phase = ServicePhase::Served;
        }
        remaining
    }

    pub(crate) fn leave(&mut self, exit: Vec2) {
        self.phase = ServicePhase::Routed;
        self.path.clear();
        self.path.push_back(exit);
    }

    /// Returns `true` once the car has left the lane for good.
    pub fn tick(&mut self, dt: Fixed64) -> bool {
        if let Some(next) = self.path.front().copied() {
            self.mover.set_destination(next);
            if self.mover.advance(dt) {
                self.path.pop_front();
            }
        }
        if !self.path.is_empty() {
            return false;
        }
        match self.phase {
            ServicePhase::Queued if self.queue_position == 0 => {
                self.phase = ServicePhase::AwaitingOrder;
                false
            }
            ServicePhase::Routed => {
                self.phase = ServicePhase::Removed;
                true
            }
            _ => false,
        }
    }
}
