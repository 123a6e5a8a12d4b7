use slotmap::new_key_type;

new_key_type! {
    /// Identifies a pooled inventory unit (food, trash, package, money).
    pub struct UnitId;

    /// Identifies a source pile.
    pub struct PileId;

    /// Identifies a capacity-bounded sink stack.
    pub struct StackId;

    /// Identifies a money pile.
    pub struct MoneyPileId;

    /// Identifies a service station (counter, drive-through, packing table).
    pub struct StationId;

    /// Identifies a food machine.
    pub struct MachineId;

    /// Identifies a table with its seats.
    pub struct SeatingId;

    /// Identifies a trash bin.
    pub struct BinId;

    /// Identifies a walk-in customer.
    pub struct CustomerId;

    /// Identifies a drive-through car.
    pub struct CarId;

    /// Identifies an employee.
    pub struct EmployeeId;
}
