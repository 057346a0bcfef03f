//! CSV format handling for catalogs, carts and bills
//!
//! This module centralizes all CSV format concerns, providing:
//! - Record structures for catalog (`name,price`) and cart (`item,quantity`) files
//! - Conversion from CSV records to domain types
//! - Bill output serialization (`kind,total_quantity,total_amount`)
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{BillSnapshot, BillingError, CartEntry, CatalogEntry};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Catalog CSV row: `name,price`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CatalogCsvRecord {
    pub name: String,
    pub price: String,
}

/// Cart CSV row: `item,quantity`
///
/// The quantity is kept as text so conversion can report the offending value.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CartCsvRecord {
    pub item: String,
    pub quantity: String,
}

/// Convert a catalog row into a catalog entry
///
/// Only the price format is checked here; name uniqueness and price sign are
/// validated when the catalog is built.
pub fn convert_catalog_record(record: CatalogCsvRecord) -> Result<CatalogEntry, String> {
    let price = Decimal::from_str(record.price.trim())
        .map_err(|_| format!("Invalid price '{}' for item '{}'", record.price, record.name))?;

    Ok(CatalogEntry::new(record.name.trim(), price))
}

/// Convert a cart row into a cart entry
///
/// Negative quantities and blank item names are passed through untouched;
/// rejecting them is the billing service's job.
pub fn convert_cart_record(record: CartCsvRecord) -> Result<CartEntry, String> {
    let quantity = i64::from_str(record.quantity.trim()).map_err(|_| {
        format!(
            "Invalid quantity '{}' for item '{}'",
            record.quantity, record.item
        )
    })?;

    Ok(CartEntry::new(record.item.trim(), quantity))
}

/// Write bill snapshots in CSV format
///
/// Columns: kind, total_quantity, total_amount. Amounts are written with two
/// decimal places. Snapshots keep the order they were emitted in.
pub fn write_bills_csv(bills: &[BillSnapshot], output: &mut dyn Write) -> Result<(), BillingError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["kind", "total_quantity", "total_amount"])?;

    for bill in bills {
        writer.write_record(&[
            bill.kind.to_string(),
            bill.total_quantity.to_string(),
            format!("{:.2}", bill.total_amount),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
