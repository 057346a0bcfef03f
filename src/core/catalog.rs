//! Immutable item catalog
//!
//! The catalog is built once per session and shared read-only between all
//! calls (`Arc<Catalog>`). It keeps entries in insertion order for listing and
//! an index by name for lookups.

use crate::core::traits::PriceLookup;
use crate::types::{BillingError, CatalogEntry};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Items stocked by the demo fruit stand, in listing order
const FRUIT_STAND: [(&str, i64); 3] = [("Pineapple", 100), ("Oranges", 20), ("Banana", 10)];

/// Name to unit price lookup table
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from entries in listing order
    ///
    /// # Errors
    ///
    /// Returns `BillingError::InvalidCatalog` if a name is empty or repeated,
    /// or a unit price is negative.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, BillingError> {
        let mut index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(BillingError::invalid_catalog(format!(
                    "entry {} has an empty name",
                    position + 1
                )));
            }
            if entry.unit_price < Decimal::ZERO {
                return Err(BillingError::invalid_catalog(format!(
                    "item '{}' has negative price {}",
                    entry.name, entry.unit_price
                )));
            }
            if index.insert(entry.name.clone(), position).is_some() {
                return Err(BillingError::invalid_catalog(format!(
                    "item '{}' is listed more than once",
                    entry.name
                )));
            }
        }

        Ok(Self { entries, index })
    }

    /// The fruit stand stocked by the demo storekeeper
    ///
    /// Shared by the service and the demo client so both sides agree on what
    /// is for sale.
    pub fn fruit_stand() -> Self {
        let entries: Vec<CatalogEntry> = FRUIT_STAND
            .iter()
            .map(|(name, price)| CatalogEntry::new(*name, Decimal::from(*price)))
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.name.clone(), position))
            .collect();

        Self { entries, index }
    }

    /// Resolve an item name to its unit price
    pub fn lookup(&self, name: &str) -> Result<Decimal, BillingError> {
        self.get(name)
            .map(|entry| entry.unit_price)
            .ok_or_else(|| BillingError::item_not_found(name))
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    /// All entries in listing order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PriceLookup for Catalog {
    fn unit_price(&self, name: &str) -> Result<Decimal, BillingError> {
        self.lookup(name)
    }
}
