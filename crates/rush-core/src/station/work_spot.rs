use crate::movement::{Vec2, Zone};

/// Where a worker has to stand for a low-level station to operate.
///
/// Occupancy is the union of an external override (a host-side sensor or a
/// test) and what the restaurant senses from actor positions each frame.
#[derive(Debug, Clone)]
pub struct WorkSpot {
    pub zone: Zone,
    forced: bool,
    sensed: bool,
}

impl WorkSpot {
    pub fn new(zone: Zone) -> Self {
        Self {
            zone,
            forced: false,
            sensed: false,
        }
    }

    /// External presence signal. Stays set until cleared.
    pub fn set_occupied(&mut self, occupied: bool) {
        self.forced = occupied;
    }

    /// Refresh the sensed half from actor positions.
    pub fn sense<'a>(&mut self, actors: impl IntoIterator<Item = &'a Vec2>) {
        self.sensed = actors.into_iter().any(|p| self.zone.contains(*p));
    }

    pub fn is_occupied(&self) -> bool {
        self.forced || self.sensed
    }
}

/// Level 1 stations need someone on the work spot; from level 2 on the
/// station is staffed automatically.
pub fn has_worker(unlock_level: u32, spot: &WorkSpot) -> bool {
    unlock_level >= 2 || (unlock_level == 1 && spot.is_occupied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Fixed64;

    fn spot() -> WorkSpot {
        WorkSpot::new(Zone::around(Vec2::default(), Fixed64::from_num(0.5)))
    }

    #[test]
    fn level_one_needs_presence() {
        let mut s = spot();
        assert!(!has_worker(1, &s));
        s.sense([&Vec2::from_f64(0.2, 0.2)]);
        assert!(has_worker(1, &s));
        s.sense([&Vec2::from_f64(3.0, 0.0)]);
        assert!(!has_worker(1, &s));
    }

    #[test]
    fn forced_presence_survives_sensing() {
        let mut s = spot();
        s.set_occupied(true);
        s.sense(std::iter::empty());
        assert!(has_worker(1, &s));
    }

    #[test]
    fn level_two_is_always_staffed() {
        assert!(has_worker(2, &spot()));
        assert!(!has_worker(0, &spot()));
    }
}
