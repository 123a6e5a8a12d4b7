//! Positions, trigger zones and straight-line walking.
//!
//! Movement is deliberately simple: an actor closes the gap to its
//! destination on each axis by at most `speed * dt` per frame. There is no
//! pathing; arrival is exact because the final step is clamped.

use crate::fixed::Fixed64;

/// A point on the restaurant floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Vec2 {
    pub x: Fixed64,
    pub z: Fixed64,
}

impl Vec2 {
    pub fn new(x: Fixed64, z: Fixed64) -> Self {
        Self { x, z }
    }

    pub fn from_f64(x: f64, z: f64) -> Self {
        Self::new(Fixed64::from_num(x), Fixed64::from_num(z))
    }
}

/// Axis-aligned trigger area around a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Zone {
    pub center: Vec2,
    pub half_extent: Vec2,
}

impl Zone {
    pub fn new(center: Vec2, half_extent: Vec2) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    /// Square zone of the given half width.
    pub fn around(center: Vec2, radius: Fixed64) -> Self {
        Self::new(center, Vec2::new(radius, radius))
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (p.x - self.center.x).abs() <= self.half_extent.x
            && (p.z - self.center.z).abs() <= self.half_extent.z
    }
}

/// Walks a position towards a destination at a fixed speed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mover {
    pub position: Vec2,
    pub speed: Fixed64,
    destination: Option<Vec2>,
}

impl Mover {
    pub fn new(position: Vec2, speed: Fixed64) -> Self {
        Self {
            position,
            speed,
            destination: None,
        }
    }

    pub fn set_destination(&mut self, destination: Vec2) {
        self.destination = Some(destination);
    }

    pub fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    /// Drop the destination and stay put.
    pub fn halt(&mut self) {
        self.destination = None;
    }

    /// Advance one frame. Returns `true` once the destination is reached
    /// (and on every later call until a new destination is set).
    pub fn advance(&mut self, dt: Fixed64) -> bool {
        let Some(target) = self.destination else {
            return true;
        };
        let reach = self.speed.saturating_mul(dt);
        self.position.x = approach(self.position.x, target.x, reach);
        self.position.z = approach(self.position.z, target.z, reach);
        self.position == target
    }

    pub fn arrived(&self) -> bool {
        self.destination.is_none_or(|d| d == self.position)
    }
}

fn approach(from: Fixed64, to: Fixed64, reach: Fixed64) -> Fixed64 {
    if from < to {
        (from + reach).min(to)
    } else {
        (from - reach).max(to)
    }
}

/// An ordered chain of queue points. Index 0 is the service point.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Waypoints {
    points: Vec<Vec2>,
}

impl Waypoints {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// The point for queue slot `index`; slots past the end share the last
    /// point.
    pub fn point(&self, index: usize) -> Vec2 {
        match self.points.get(index) {
            Some(p) => *p,
            None => self.points.last().copied().unwrap_or_default(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}
