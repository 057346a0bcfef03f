//! Catalog entry type

use rust_decimal::Decimal;

/// One item on sale and its unit price
///
/// Immutable once the catalog is built; the name is the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogEntry {
    /// Unique item name
    pub name: String,

    /// Price of a single unit, never negative
    pub unit_price: Decimal,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            unit_price,
        }
    }
}
