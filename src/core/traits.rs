//! Core traits for price resolution
//!
//! The accumulator only needs to turn an item name into a unit price. Keeping
//! that behind a trait lets the fold run against the session catalog or any
//! other read-only price table.

use crate::types::BillingError;
use rust_decimal::Decimal;

/// Read-only item name to unit price resolution
///
/// Implementations must be safe to share between concurrently running calls.
pub trait PriceLookup: Send + Sync {
    /// Resolve the unit price of `name`
    ///
    /// # Errors
    ///
    /// Returns `BillingError::ItemNotFound` if no item carries that name.
    fn unit_price(&self, name: &str) -> Result<Decimal, BillingError>;
}
