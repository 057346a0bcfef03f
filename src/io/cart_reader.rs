//! Asynchronous cart reader
//!
//! Reads `item,quantity` rows from a CSV source one entry at a time, so a
//! cart file can be streamed into an order call without being loaded whole.
//!
//! # Design
//!
//! The CartReader uses:
//! - csv-async for streaming CSV parsing
//! - tokio file I/O behind the tokio-util compat layer
//! - csv_format for row conversion

use crate::io::csv_format::{convert_cart_record, CartCsvRecord};
use crate::types::{BillingError, CartEntry};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::path::Path;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

/// Asynchronous CSV cart reader
pub struct CartReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line: u64,
}

impl CartReader<Compat<tokio::fs::File>> {
    /// Open a cart file
    pub async fn open(path: &Path) -> Result<Self, BillingError> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| BillingError::IoError {
                message: format!("Failed to open cart '{}': {}", path.display(), e),
            })?;

        Ok(Self::new(file.compat()))
    }
}

impl<R: AsyncRead + Unpin + Send + 'static> CartReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        // Header occupies line 1
        Self {
            csv_reader,
            line: 1,
        }
    }

    /// Read the next cart entry
    ///
    /// Returns `None` at end of file. A malformed row yields a `ParseError`
    /// carrying its line number; the caller decides whether to go on.
    pub async fn next_entry(&mut self) -> Option<Result<CartEntry, BillingError>> {
        let record = {
            let mut records = self.csv_reader.deserialize::<CartCsvRecord>();
            records.next().await?
        };
        self.line += 1;

        let result = match record {
            Ok(record) => convert_cart_record(record).map_err(|message| BillingError::ParseError {
                line: Some(self.line),
                message,
            }),
            Err(e) => Err(BillingError::ParseError {
                line: Some(self.line),
                message: e.to_string(),
            }),
        };
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    async fn read_all<R: AsyncRead + Unpin + Send + 'static>(
        reader: &mut CartReader<R>,
    ) -> Vec<Result<CartEntry, BillingError>> {
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await {
            entries.push(entry);
        }
        entries
    }

    #[tokio::test]
    async fn test_cart_reader_reads_in_order() {
        let csv_content = "item,quantity\nPineapple,10\nOranges,20\nBanana,30\n";
        let mut reader = CartReader::new(Cursor::new(csv_content.as_bytes()));

        let entries = read_all(&mut reader).await;
        assert_eq!(
            entries,
            [
                Ok(CartEntry::new("Pineapple", 10)),
                Ok(CartEntry::new("Oranges", 20)),
                Ok(CartEntry::new("Banana", 30)),
            ]
        );
    }

    #[tokio::test]
    async fn test_cart_reader_empty_cart() {
        let csv_content = "item,quantity\n";
        let mut reader = CartReader::new(Cursor::new(csv_content.as_bytes()));

        assert!(reader.next_entry().await.is_none());
    }

    #[tokio::test]
    async fn test_cart_reader_whitespace_handling() {
        let csv_content = "item,quantity\n  Banana  ,  3  \n";
        let mut reader = CartReader::new(Cursor::new(csv_content.as_bytes()));

        let entry = reader.next_entry().await.unwrap();
        assert_eq!(entry, Ok(CartEntry::new("Banana", 3)));
    }

    #[tokio::test]
    async fn test_cart_reader_reports_bad_quantity_with_line() {
        let csv_content = "item,quantity\nBanana,3\nOranges,lots\nPineapple,1\n";
        let mut reader = CartReader::new(Cursor::new(csv_content.as_bytes()));

        let entries = read_all(&mut reader).await;
        assert_eq!(entries.len(), 3);
        assert!(matches!(
            entries[1],
            Err(BillingError::ParseError { line: Some(3), .. })
        ));
        assert_eq!(entries[2], Ok(CartEntry::new("Pineapple", 1)));
    }

    #[tokio::test]
    async fn test_cart_reader_open_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"item,quantity\nBanana,2\n")
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");

        let mut reader = CartReader::open(file.path()).await.unwrap();
        assert_eq!(
            reader.next_entry().await,
            Some(Ok(CartEntry::new("Banana", 2)))
        );
    }

    #[tokio::test]
    async fn test_cart_reader_missing_file() {
        let result = CartReader::open(Path::new("nonexistent_cart.csv")).await;
        assert!(matches!(result, Err(BillingError::IoError { .. })));
    }
}
