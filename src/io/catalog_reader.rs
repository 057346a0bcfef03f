//! Catalog loading from CSV
//!
//! Reads a `name,price` CSV file into a validated [`Catalog`]. Unlike cart
//! files, a catalog is all-or-nothing: one bad row fails the whole load.

use crate::core::Catalog;
use crate::io::csv_format::{convert_catalog_record, CatalogCsvRecord};
use crate::types::BillingError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Load a catalog from a CSV file
///
/// # Errors
///
/// - `IoError` if the file cannot be opened
/// - `ParseError` if a row is malformed
/// - `InvalidCatalog` if names repeat or a price is negative
pub fn load_catalog(path: &Path) -> Result<Catalog, BillingError> {
    let file = File::open(path).map_err(|e| BillingError::IoError {
        message: format!("Failed to open catalog '{}': {}", path.display(), e),
    })?;

    let catalog = read_catalog(file)?;
    info!(path = %path.display(), items = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Read a catalog from any CSV source
pub fn read_catalog<R: Read>(source: R) -> Result<Catalog, BillingError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);

    let mut entries = Vec::new();
    for (index, result) in reader.deserialize::<CatalogCsvRecord>().enumerate() {
        let record = result?;
        let entry = convert_catalog_record(record).map_err(|message| BillingError::ParseError {
            // Header is line 1
            line: Some(index as u64 + 2),
            message,
        })?;
        entries.push(entry);
    }

    Catalog::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_catalog() {
        let csv_content = "name,price\nApple,0.35\nMelon, 2.50\n";

        let catalog = read_catalog(csv_content.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("Apple"), Ok(Decimal::new(35, 2)));
        assert_eq!(catalog.lookup("Melon"), Ok(Decimal::new(250, 2)));
    }

    #[test]
    fn test_read_catalog_matches_fruit_stand() {
        let csv_content = "name,price\nPineapple,100\nOranges,20\nBanana,10\n";

        let catalog = read_catalog(csv_content.as_bytes()).unwrap();
        assert_eq!(catalog, Catalog::fruit_stand());
    }

    #[test]
    fn test_read_catalog_reports_bad_price_line() {
        let csv_content = "name,price\nApple,0.35\nMelon,free\n";

        let error = read_catalog(csv_content.as_bytes()).unwrap_err();
        assert!(matches!(error, BillingError::ParseError { line: Some(3), .. }));
    }

    #[test]
    fn test_read_catalog_rejects_duplicates() {
        let csv_content = "name,price\nApple,0.35\nApple,0.40\n";

        let error = read_catalog(csv_content.as_bytes()).unwrap_err();
        assert!(matches!(error, BillingError::InvalidCatalog { .. }));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"name,price\nBanana,10\n")
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.lookup("Banana"), Ok(Decimal::from(10)));
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let error = load_catalog(Path::new("nonexistent_catalog.csv")).unwrap_err();
        assert!(matches!(error, BillingError::IoError { .. }));
        assert!(error.to_string().contains("Failed to open catalog"));
    }
}
