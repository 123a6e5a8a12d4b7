use crate::carried::CarriedStack;
use crate::fixed::Fixed64;
use crate::item::KindOffsets;
use crate::movement::{Mover, Vec2};

/// Live numbers for the player, re-derived on upgrades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerRates {
    pub capacity: u32,
    pub speed: Fixed64,
}

/// The host-controlled actor. Where the player stands decides which piles
/// hand it units, which stacks take them, and which money piles, work spots
/// and buyers it triggers.
#[derive(Debug)]
pub struct Player {
    pub mover: Mover,
    pub carried: CarriedStack,
    capacity: u32,
}

impl Player {
    pub fn new(position: Vec2, rates: PlayerRates, offsets: KindOffsets) -> Self {
        Self {
            mover: Mover::new(position, rates.speed),
            carried: CarriedStack::new(offsets),
            capacity: rates.capacity,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.mover.position
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn set_rates(&mut self, rates: PlayerRates) {
        self.capacity = rates.capacity;
        self.mover.speed = rates.speed;
    }

    /// Teleport, cancelling any walk in progress.
    pub fn place(&mut self, position: Vec2) {
        self.mover.position = position;
        self.mover.halt();
    }

    pub fn walk_to(&mut self, destination: Vec2) {
        self.mover.set_destination(destination);
    }

    pub fn tick(&mut self, dt: Fixed64) {
        self.mover.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_at_its_speed() {
        let rates = PlayerRates {
            capacity: 5,
            speed: Fixed64::from_num(3),
        };
        let mut player = Player::new(Vec2::default(), rates, KindOffsets::default());
        player.walk_to(Vec2::from_f64(6.0, 0.0));
        player.tick(Fixed64::from_num(1));
        assert_eq!(player.position(), Vec2::from_f64(3.0, 0.0));
        player.set_rates(PlayerRates {
            capacity: 8,
            speed: Fixed64::from_num(6),
        });
        player.tick(Fixed64::from_num(1));
        assert_eq!(player.position(), Vec2::from_f64(6.0, 0.0));
        assert_eq!(player.capacity(), 8);
    }
}
