//! Bill snapshot types

use rust_decimal::Decimal;
use std::fmt;

/// Whether more cart entries may follow a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillKind {
    /// Running total after one cart entry
    Interim,
    /// Closing total emitted once the caller ends its stream
    Final,
}

impl BillKind {
    /// Human-readable label used by the console driver
    pub fn label(self) -> &'static str {
        match self {
            BillKind::Interim => "Interim Bill",
            BillKind::Final => "Final Bill",
        }
    }
}

impl fmt::Display for BillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillKind::Interim => f.write_str("INTERIM"),
            BillKind::Final => f.write_str("FINAL"),
        }
    }
}

/// Point-in-time totals of one order call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillSnapshot {
    pub kind: BillKind,

    /// Sum of all accepted quantities so far
    pub total_quantity: u64,

    /// Sum of `unit_price * quantity` over all accepted entries so far
    pub total_amount: Decimal,
}

impl BillSnapshot {
    pub fn new(kind: BillKind, total_quantity: u64, total_amount: Decimal) -> Self {
        Self {
            kind,
            total_quantity,
            total_amount,
        }
    }

    /// Whether both snapshots carry the same totals, ignoring their kind
    pub fn same_totals(&self, other: &BillSnapshot) -> bool {
        self.total_quantity == other.total_quantity && self.total_amount == other.total_amount
    }
}
