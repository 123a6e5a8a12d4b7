//! Tunable numbers for a restaurant.
//!
//! [`RestaurantConfig`] is plain serde data with `f64` fields so it reads
//! naturally from RON, TOML or JSON (see the `rush-data` crate). Values are
//! converted to [`Fixed64`] once, when the restaurant is built or its rates
//! are re-derived; floats never enter the frame loop. Every field has a
//! default matching the shipped game balance, so a config file only needs
//! the values it changes.

use serde::{Deserialize, Serialize};

use crate::fixed::{Fixed64, f64_to_fixed64};
use crate::item::{KindOffsets, Slot};
use crate::money::MoneyRules;
use crate::pile::GridLayout;
use crate::rate::PriceCurve;

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// NaN, infinite, or too large to fit a `Fixed64`.
    #[error("{field} must be finite and smaller than 2^31 in magnitude, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must lie in [{low}, {high}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        low: f64,
        high: f64,
    },

    #[error("{field} must be at least 1")]
    Zero { field: &'static str },

    #[error("{field} range [{low}, {high}) is empty")]
    EmptyRange {
        field: &'static str,
        low: u32,
        high: u32,
    },
}

/// Largest magnitude a file value may have and still convert to `Fixed64`.
pub const FIXED_LIMIT: f64 = 2_147_483_647.0;

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value.abs() < FIXED_LIMIT {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn within(field: &'static str, value: f64, low: f64, high: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if (low..=high).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, low, high })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    within(field, value, 0.0, FIXED_LIMIT)
}

fn nonzero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::Zero { field })
    } else {
        Ok(())
    }
}

fn range(field: &'static str, low: u32, high: u32) -> Result<(), ConfigError> {
    if low == 0 || high <= low {
        Err(ConfigError::EmptyRange { field, low, high })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Sections
// ===========================================================================

/// Units allocated per kind before the first frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub food: usize,
    pub trash: usize,
    pub package: usize,
    pub money: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            food: 64,
            trash: 32,
            package: 32,
            money: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Seconds between units handed out by a pile to an adjacent actor.
    pub pile_drop_interval: f64,
    /// Seconds between units a stack takes from an adjacent actor.
    pub stack_intake_interval: f64,
    pub food_offset: f64,
    pub trash_offset: f64,
    pub package_offset: f64,
    pub pile_length: u32,
    pub pile_width: u32,
    /// Grid spacing `[x, y, z]`.
    pub pile_spacing: [f64; 3],
    pub money_max_visible: u32,
    pub money_collect_multiplier: u32,
    pub money_burst_threshold: u32,
    pub money_collect_interval: f64,
    /// Half width of the square trigger zone around every fixture.
    pub zone_radius: f64,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            pile_drop_interval: 0.03,
            stack_intake_interval: 0.05,
            food_offset: 0.35,
            trash_offset: 0.18,
            package_offset: 0.3,
            pile_length: 3,
            pile_width: 3,
            pile_spacing: [0.5, 0.3, 0.5],
            money_max_visible: 120,
            money_collect_multiplier: 2,
            money_burst_threshold: 8,
            money_collect_interval: 0.03,
            zone_radius: 1.0,
        }
    }
}

impl ContainerConfig {
    pub fn offsets(&self) -> KindOffsets {
        KindOffsets::new(
            f64_to_fixed64(self.food_offset),
            f64_to_fixed64(self.trash_offset),
            f64_to_fixed64(self.package_offset),
            Fixed64::ZERO,
        )
    }

    pub fn layout(&self) -> GridLayout {
        let [x, y, z] = self.pile_spacing;
        GridLayout::new(
            self.pile_length,
            self.pile_width,
            Slot {
                x: f64_to_fixed64(x),
                y: f64_to_fixed64(y),
                z: f64_to_fixed64(z),
            },
        )
    }

    pub fn money_rules(&self) -> MoneyRules {
        MoneyRules {
            max_visible: self.money_max_visible,
            collect_multiplier: self.money_collect_multiplier,
            burst_threshold: self.money_burst_threshold,
            collect_interval: f64_to_fixed64(self.money_collect_interval),
        }
    }
}

/// Counter balance. Also the shape every consumer-serving station reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub base_interval: f64,
    pub base_price: f64,
    pub price_growth: f64,
    pub base_stack: u32,
    pub stack_step: u32,
    pub queue_capacity: usize,
    /// Order sizes are drawn from `[min_order, max_order)`.
    pub min_order: u32,
    pub max_order: u32,
    /// Pause after an order completes before the consumer leaves.
    pub finish_delay: f64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            base_interval: 1.5,
            base_price: 5.0,
            price_growth: 1.25,
            base_stack: 30,
            stack_step: 5,
            queue_capacity: 10,
            min_order: 1,
            max_order: 6,
            finish_delay: 0.0,
        }
    }
}

/// Drive-through balance. Kept as its own type so a partial section in a
/// file falls back to drive-through defaults, not counter ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveThruConfig {
    pub base_interval: f64,
    pub base_price: f64,
    pub price_growth: f64,
    pub base_stack: u32,
    pub stack_step: u32,
    pub queue_capacity: usize,
    pub min_order: u32,
    pub max_order: u32,
    pub finish_delay: f64,
}

impl Default for DriveThruConfig {
    fn default() -> Self {
        Self {
            base_interval: 1.5,
            base_price: 15.0,
            price_growth: 1.25,
            base_stack: 30,
            stack_step: 5,
            queue_capacity: 10,
            min_order: 1,
            max_order: 5,
            finish_delay: 0.5,
        }
    }
}

impl DriveThruConfig {
    pub fn as_station(&self) -> StationConfig {
        StationConfig {
            base_interval: self.base_interval,
            base_price: self.base_price,
            price_growth: self.price_growth,
            base_stack: self.base_stack,
            stack_step: self.stack_step,
            queue_capacity: self.queue_capacity,
            min_order: self.min_order,
            max_order: self.max_order,
            finish_delay: self.finish_delay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingConfig {
    pub base_interval: f64,
    pub base_stack: u32,
    pub stack_step: u32,
    pub foods_per_package: u32,
    pub finish_delay: f64,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            base_interval: 1.5,
            base_stack: 30,
            stack_step: 5,
            foods_per_package: 4,
            finish_delay: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub base_interval: f64,
    pub base_capacity: u32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            base_interval: 1.5,
            base_capacity: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatingConfig {
    /// Eating seconds per seat at level 1.
    pub base_eat_time: f64,
    pub tip_chance: f64,
    pub tip_chance_step: f64,
    /// Tips are drawn from `[tip_min, tip_max + profit level)`.
    pub tip_min: u32,
    pub tip_max: u32,
    /// Delay before a served customer walks to the seat.
    pub seat_walk_delay: f64,
    /// Seconds between food units put on the table.
    pub place_interval: f64,
    /// Seconds between trash units dropped after eating.
    pub trash_interval: f64,
    /// Diners leave `step * [min, max)` seconds apart.
    pub leave_delay_step: f64,
    pub leave_delay_min: u32,
    pub leave_delay_max: u32,
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            base_eat_time: 5.0,
            tip_chance: 0.4,
            tip_chance_step: 0.1,
            tip_min: 2,
            tip_max: 5,
            seat_walk_delay: 0.3,
            place_interval: 0.05,
            trash_interval: 0.05,
            leave_delay_step: 0.5,
            leave_delay_min: 1,
            leave_delay_max: 4,
        }
    }
}

/// Capacity and speed curves for a kind of actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorConfig {
    pub base_capacity: u32,
    pub capacity_step: u32,
    pub base_speed: f64,
    pub speed_step: f64,
    /// Seconds between single-unit transfers.
    pub transfer_interval: f64,
    /// Pause after gathering and after delivering.
    pub pause: f64,
}

/// Employee section. Player and employee sections are separate types so a
/// partial section falls back to its own actor's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeConfig {
    pub base_capacity: u32,
    pub capacity_step: u32,
    pub base_speed: f64,
    pub speed_step: f64,
    pub transfer_interval: f64,
    pub pause: f64,
}

impl Default for EmployeeConfig {
    fn default() -> Self {
        Self {
            base_capacity: 3,
            capacity_step: 1,
            base_speed: 2.5,
            speed_step: 0.1,
            transfer_interval: 0.03,
            pause: 0.5,
        }
    }
}

impl EmployeeConfig {
    pub fn as_actor(&self) -> ActorConfig {
        ActorConfig {
            base_capacity: self.base_capacity,
            capacity_step: self.capacity_step,
            base_speed: self.base_speed,
            speed_step: self.speed_step,
            transfer_interval: self.transfer_interval,
            pause: self.pause,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub base_capacity: u32,
    pub capacity_step: u32,
    pub base_speed: f64,
    pub speed_step: f64,
    /// Also the trash bin's throw interval.
    pub transfer_interval: f64,
    pub pause: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_capacity: 5,
            capacity_step: 3,
            base_speed: 3.0,
            speed_step: 0.2,
            transfer_interval: 0.03,
            pause: 0.0,
        }
    }
}

impl PlayerConfig {
    pub fn as_actor(&self) -> ActorConfig {
        ActorConfig {
            base_capacity: self.base_capacity,
            capacity_step: self.capacity_step,
            base_speed: self.base_speed,
            speed_step: self.speed_step,
            transfer_interval: self.transfer_interval,
            pause: self.pause,
        }
    }
}

/// `base * growth^n`, rounded to a multiple of `rounding_unit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceConfig {
    pub base: f64,
    pub growth: f64,
    pub rounding_unit: u32,
}

impl PriceConfig {
    pub fn curve(&self) -> PriceCurve {
        PriceCurve {
            base: f64_to_fixed64(self.base),
            growth: f64_to_fixed64(self.growth),
            rounding_unit: self.rounding_unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradePriceConfig {
    pub base: f64,
    pub growth: f64,
    pub rounding_unit: u32,
}

impl Default for UpgradePriceConfig {
    fn default() -> Self {
        Self {
            base: 250.0,
            growth: 1.5,
            rounding_unit: 50,
        }
    }
}

impl UpgradePriceConfig {
    pub fn as_price(&self) -> PriceConfig {
        PriceConfig {
            base: self.base,
            growth: self.growth,
            rounding_unit: self.rounding_unit,
        }
    }

    pub fn curve(&self) -> PriceCurve {
        self.as_price().curve()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnlockPriceConfig {
    pub base: f64,
    pub growth: f64,
    pub rounding_unit: u32,
}

impl Default for UnlockPriceConfig {
    fn default() -> Self {
        Self {
            base: 75.0,
            growth: 1.1,
            rounding_unit: 5,
        }
    }
}

impl UnlockPriceConfig {
    pub fn as_price(&self) -> PriceConfig {
        PriceConfig {
            base: self.base,
            growth: self.growth,
            rounding_unit: self.rounding_unit,
        }
    }

    pub fn curve(&self) -> PriceCurve {
        self.as_price().curve()
    }
}

// ===========================================================================
// Root
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantConfig {
    /// Seconds per simulation frame.
    pub frame_seconds: f64,
    pub seed: u64,
    pub starting_money: i64,
    /// Events kept before the oldest are overwritten.
    pub event_capacity: usize,
    /// Lower bound on consumer spawn intervals.
    pub spawn_interval_floor: f64,
    pub customer_speed: f64,
    pub car_speed: f64,
    pub pool: PoolConfig,
    pub containers: ContainerConfig,
    pub counter: StationConfig,
    pub drive_thru: DriveThruConfig,
    pub packing: PackingConfig,
    pub machine: MachineConfig,
    pub seating: SeatingConfig,
    pub employee: EmployeeConfig,
    pub player: PlayerConfig,
    pub upgrade_price: UpgradePriceConfig,
    pub unlock_price: UnlockPriceConfig,
    /// Seconds between unlock installments.
    pub unlock_pay_interval: f64,
    /// Seconds a full unlock payment takes when money is plentiful.
    pub unlock_pay_duration: f64,
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            frame_seconds: 1.0 / 60.0,
            seed: 0x5EED,
            starting_money: 1000,
            event_capacity: 1024,
            spawn_interval_floor: 0.25,
            customer_speed: 3.5,
            car_speed: 5.0,
            pool: PoolConfig::default(),
            containers: ContainerConfig::default(),
            counter: StationConfig::default(),
            drive_thru: DriveThruConfig::default(),
            packing: PackingConfig::default(),
            machine: MachineConfig::default(),
            seating: SeatingConfig::default(),
            employee: EmployeeConfig::default(),
            player: PlayerConfig::default(),
            upgrade_price: UpgradePriceConfig::default(),
            unlock_price: UnlockPriceConfig::default(),
            unlock_pay_interval: 0.03,
            unlock_pay_duration: 3.0,
        }
    }
}

impl RestaurantConfig {
    pub fn frame(&self) -> Fixed64 {
        f64_to_fixed64(self.frame_seconds)
    }

    /// Reject values that would stall the loop or not fit a `Fixed64`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("frame_seconds", self.frame_seconds)?;
        positive("spawn_interval_floor", self.spawn_interval_floor)?;
        positive("customer_speed", self.customer_speed)?;
        positive("car_speed", self.car_speed)?;
        positive("unlock_pay_interval", self.unlock_pay_interval)?;
        positive("unlock_pay_duration", self.unlock_pay_duration)?;
        nonzero("event_capacity", self.event_capacity as u64)?;

        let c = &self.containers;
        positive("containers.pile_drop_interval", c.pile_drop_interval)?;
        positive("containers.stack_intake_interval", c.stack_intake_interval)?;
        positive("containers.money_collect_interval", c.money_collect_interval)?;
        positive("containers.zone_radius", c.zone_radius)?;
        nonzero("containers.money_max_visible", u64::from(c.money_max_visible))?;
        nonzero("containers.money_collect_multiplier", u64::from(c.money_collect_multiplier))?;
        non_negative("containers.food_offset", c.food_offset)?;
        non_negative("containers.trash_offset", c.trash_offset)?;
        non_negative("containers.package_offset", c.package_offset)?;
        for spacing in c.pile_spacing {
            finite("containers.pile_spacing", spacing)?;
        }

        let drive_thru = self.drive_thru.as_station();
        for (name, station) in [("counter", &self.counter), ("drive_thru", &drive_thru)] {
            positive(name, station.base_interval)?;
            positive(name, station.base_price)?;
            positive(name, station.price_growth)?;
            nonzero(name, station.queue_capacity as u64)?;
            range(name, station.min_order, station.max_order)?;
            non_negative(name, station.finish_delay)?;
        }

        positive("packing.base_interval", self.packing.base_interval)?;
        nonzero("packing.foods_per_package", u64::from(self.packing.foods_per_package))?;
        non_negative("packing.finish_delay", self.packing.finish_delay)?;
        positive("machine.base_interval", self.machine.base_interval)?;
        nonzero("machine.base_capacity", u64::from(self.machine.base_capacity))?;

        let s = &self.seating;
        positive("seating.base_eat_time", s.base_eat_time)?;
        positive("seating.place_interval", s.place_interval)?;
        positive("seating.trash_interval", s.trash_interval)?;
        within("seating.tip_chance", s.tip_chance, 0.0, 1.0)?;
        within("seating.tip_chance_step", s.tip_chance_step, 0.0, 1.0)?;
        non_negative("seating.seat_walk_delay", s.seat_walk_delay)?;
        non_negative("seating.leave_delay_step", s.leave_delay_step)?;
        range("seating.tip", s.tip_min, s.tip_max)?;
        range("seating.leave_delay", s.leave_delay_min, s.leave_delay_max)?;

        for (name, actor) in [("employee", self.employee.as_actor()), ("player", self.player.as_actor())] {
            nonzero(name, u64::from(actor.base_capacity))?;
            positive(name, actor.base_speed)?;
            non_negative(name, actor.speed_step)?;
            positive(name, actor.transfer_interval)?;
            non_negative(name, actor.pause)?;
        }

        let prices = [
            ("upgrade_price", self.upgrade_price.as_price()),
            ("unlock_price", self.unlock_price.as_price()),
        ];
        for (name, curve) in prices {
            positive(name, curve.base)?;
            positive(name, curve.growth)?;
            nonzero(name, u64::from(curve.rounding_unit))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(RestaurantConfig::default().validate(), Ok(()));
    }

    #[test]
    fn drive_thru_differs_from_counter() {
        let cfg = RestaurantConfig::default();
        assert_eq!(cfg.drive_thru.base_price, 15.0);
        assert_eq!(cfg.drive_thru.max_order, 5);
        assert_eq!(cfg.counter.max_order, 6);
        assert_eq!(cfg.counter.base_interval, cfg.drive_thru.base_interval);
    }

    #[test]
    fn rejects_zero_rounding_unit() {
        let mut cfg = RestaurantConfig::default();
        cfg.unlock_price.rounding_unit = 0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::Zero {
                field: "unlock_price"
            })
        );
    }

    #[test]
    fn rejects_empty_order_range() {
        let mut cfg = RestaurantConfig::default();
        cfg.drive_thru.max_order = 1;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::EmptyRange { field: "drive_thru", .. })
        ));
    }

    #[test]
    fn partial_drive_thru_section_keeps_its_own_defaults() {
        let cfg: RestaurantConfig =
            serde_json::from_str(r#"{ "drive_thru": { "base_price": 20.0 } }"#).unwrap();
        assert_eq!(cfg.drive_thru.base_price, 20.0);
        assert_eq!(cfg.drive_thru.max_order, 5);
        assert_eq!(cfg.drive_thru.finish_delay, 0.5);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: RestaurantConfig =
            serde_json::from_str(r#"{ "starting_money": 50, "counter": { "base_price": 7.0 } }"#).unwrap();
        assert_eq!(cfg.starting_money, 50);
        assert_eq!(cfg.counter.base_price, 7.0);
        assert_eq!(cfg.counter.base_stack, 30);
        assert_eq!(cfg.drive_thru.base_price, 15.0);
    }

    #[test]
    fn partial_player_and_unlock_sections_keep_their_own_defaults() {
        let cfg: RestaurantConfig =
            serde_json::from_str(r#"{"player":{"base_speed":4.0},"unlock_price":{"growth":1.2}}"#).unwrap();
        assert_eq!(cfg.player.base_speed, 4.0);
        assert_eq!(cfg.player.base_capacity, 5);
        assert_eq!(cfg.player.capacity_step, 3);
        assert_eq!(cfg.unlock_price.growth, 1.2);
        assert_eq!(cfg.unlock_price.base, 75.0);
        assert_eq!(cfg.unlock_price.rounding_unit, 5);
        assert_eq!(cfg.employee, EmployeeConfig::default());
        assert_eq!(cfg.upgrade_price, UpgradePriceConfig::default());
    }

    #[test]
    fn rejects_non_finite_floats() {
        let mut cfg = RestaurantConfig::default();
        cfg.seating.tip_chance = f64::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotFinite { field: "seating.tip_chance", .. })
        ));

        let mut cfg = RestaurantConfig::default();
        cfg.containers.pile_spacing[1] = f64::INFINITY;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotFinite { field: "containers.pile_spacing", .. })
        ));

        let mut cfg = RestaurantConfig::default();
        cfg.packing.finish_delay = f64::NEG_INFINITY;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotFinite { field: "packing.finish_delay", .. })
        ));
    }

    #[test]
    fn rejects_values_too_large_for_fixed_point() {
        let mut cfg = RestaurantConfig::default();
        cfg.upgrade_price.base = 1e12;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotFinite { field: "upgrade_price", .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_tip_chance_and_negative_delays() {
        let mut cfg = RestaurantConfig::default();
        cfg.seating.tip_chance = 1.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "seating.tip_chance", .. })
        ));

        let mut cfg = RestaurantConfig::default();
        cfg.drive_thru.finish_delay = -0.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "drive_thru", .. })
        ));
    }
}
