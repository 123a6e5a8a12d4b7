//! Serde structs for floor plan files.
//!
//! Positions are `(x, z)` pairs in world units. Every fixture carries a
//! name; names are what unlock orders refer to and what the built
//! restaurant's id maps are keyed by.

use serde::Deserialize;

/// A floor position, `(x, z)`.
pub type Point = (f64, f64);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FloorPlan {
    pub machines: Vec<MachineData>,
    pub counters: Vec<CounterData>,
    pub drive_thrus: Vec<DriveThruData>,
    pub packing_tables: Vec<PackingData>,
    pub seatings: Vec<SeatingData>,
    pub bins: Vec<BinData>,
    pub unlock: Option<UnlockData>,
    /// Where hired employees appear.
    pub staff_room: Option<Point>,
    pub player_start: Option<Point>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MachineData {
    pub name: String,
    pub position: Point,
    /// 0 means locked until bought.
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CounterData {
    pub name: String,
    #[serde(default)]
    pub level: u32,
    pub food_stack: Point,
    pub money_pile: Point,
    pub work_spot: Point,
    /// Front of the line first.
    pub queue: Vec<Point>,
    pub spawn: Point,
    pub exit: Point,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriveThruData {
    pub name: String,
    #[serde(default)]
    pub level: u32,
    pub package_stack: Point,
    pub money_pile: Point,
    pub work_spot: Point,
    /// Window first.
    pub lane: Vec<Point>,
    pub spawn: Point,
    pub exit: Point,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackingData {
    pub name: String,
    #[serde(default)]
    pub level: u32,
    pub food_stack: Point,
    pub package_pile: Point,
    pub work_spot: Point,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeatingData {
    pub name: String,
    #[serde(default)]
    pub level: u32,
    pub seats: Vec<Point>,
    pub trash_pile: Point,
    pub money_pile: Point,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinData {
    pub name: String,
    pub position: Point,
}

/// The unlock buyer and the fixtures it sells, in order.
#[derive(Debug, Clone, Deserialize)]
pub struct UnlockData {
    pub buyer: Point,
    pub order: Vec<String>,
}
