//! Cart entry type
//!
//! A cart entry is the inbound message of both order modes. The quantity is
//! signed on the wire so that a negative value can reach the engine and be
//! rejected, rather than wrapping around at the transport.

/// One (item, quantity) line submitted by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    /// Catalog name of the item being ordered
    pub item_name: String,

    /// Number of units; must not be negative
    pub quantity: i64,
}

impl CartEntry {
    pub fn new(item_name: impl Into<String>, quantity: i64) -> Self {
        Self {
            item_name: item_name.into(),
            quantity,
        }
    }
}
