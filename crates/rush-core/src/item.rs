use crate::fixed::Fixed64;
use crate::id::UnitId;

/// Category of a fungible inventory unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Kind {
    Food,
    Trash,
    Package,
    Money,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::Food, Kind::Trash, Kind::Package, Kind::Money];

    /// Dense index for per-kind arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Layout offset of a unit relative to its container's anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slot {
    pub x: Fixed64,
    pub y: Fixed64,
    pub z: Fixed64,
}

impl Slot {
    pub fn vertical(y: Fixed64) -> Self {
        Self {
            y,
            ..Self::default()
        }
    }
}

/// A pooled inventory unit. Owned by exactly one container at a time.
///
/// Deliberately not `Clone`: the only way to get a `Unit` is from
/// [`UnitPool::acquire`](crate::pool::UnitPool::acquire) or by popping it off
/// a container, and the only way to get rid of one is to push it somewhere
/// or release it back to the pool.
#[derive(Debug, PartialEq, Eq)]
pub struct Unit {
    id: UnitId,
    kind: Kind,
    pub slot: Slot,
}

impl Unit {
    pub(crate) fn new(id: UnitId, kind: Kind) -> Self {
        Self {
            id,
            kind,
            slot: Slot::default(),
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }
}

/// Per-kind vertical spacing used by stacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindOffsets {
    offsets: [Fixed64; 4],
}

impl KindOffsets {
    pub fn new(food: Fixed64, trash: Fixed64, package: Fixed64, money: Fixed64) -> Self {
        Self {
            offsets: [food, trash, package, money],
        }
    }

    pub fn get(&self, kind: Kind) -> Fixed64 {
        self.offsets[kind.index()]
    }
}

impl Default for KindOffsets {
    fn default() -> Self {
        Self::new(
            Fixed64::from_num(0.35),
            Fixed64::from_num(0.18),
            Fixed64::from_num(0.3),
            Fixed64::ZERO,
        )
    }
}
