use crate::carried::CarriedStack;
use crate::fixed::Fixed64;
use crate::item::{Kind, Unit};
use crate::movement::Zone;
use crate::pool::UnitPool;

/// Takes anything an actor throws at it and returns it to the pool.
#[derive(Debug)]
pub struct TrashBin {
    pub zone: Zone,
    throw_interval: Fixed64,
    timer: Fixed64,
}

impl TrashBin {
    pub fn new(zone: Zone, throw_interval: Fixed64) -> Self {
        Self {
            zone,
            throw_interval,
            timer: Fixed64::ZERO,
        }
    }

    /// Discard a single unit.
    pub fn throw(&self, unit: Unit, pool: &mut UnitPool) -> Kind {
        let kind = unit.kind();
        pool.release(unit);
        kind
    }

    /// One unit off an adjacent actor's stack per throw interval.
    pub fn tick_throw(
        &mut self,
        dt: Fixed64,
        adjacent: Option<&mut CarriedStack>,
        pool: &mut UnitPool,
    ) -> Option<Kind> {
        let carried = match adjacent {
            Some(c) if !c.is_empty() => c,
            _ => {
                self.timer = Fixed64::ZERO;
                return None;
            }
        };
        self.timer += dt;
        if self.timer < self.throw_interval {
            return None;
        }
        self.timer = Fixed64::ZERO;
        carried.remove_top().map(|unit| self.throw(unit, pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Vec2;

    #[test]
    fn empties_a_stack_one_unit_at_a_time() {
        let mut pool = UnitPool::new();
        let mut bin = TrashBin::new(
            Zone::around(Vec2::default(), Fixed64::from_num(1)),
            Fixed64::from_num(0.03),
        );
        let mut carried = CarriedStack::default();
        for _ in 0..3 {
            carried.add(pool.acquire(Kind::Trash)).unwrap();
        }
        let dt = Fixed64::from_num(0.03);
        assert_eq!(bin.tick_throw(dt, Some(&mut carried), &mut pool), Some(Kind::Trash));
        assert_eq!(carried.height(), 2);
        for _ in 0..5 {
            bin.tick_throw(dt, Some(&mut carried), &mut pool);
        }
        assert!(carried.is_empty());
        assert_eq!(pool.active_count(Kind::Trash), 0);
    }
}
