//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, bill serialization)
//! - `catalog_reader` - Synchronous catalog loading
//! - `cart_reader` - Asynchronous cart reader, one entry at a time

pub mod cart_reader;
pub mod catalog_reader;
pub mod csv_format;

pub use cart_reader::CartReader;
pub use catalog_reader::{load_catalog, read_catalog};
pub use csv_format::{convert_cart_record, convert_catalog_record, write_bills_csv};
